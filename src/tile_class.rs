//! Named tile sets with fast windowed membership counts.
//!
//! Every row keeps a Fenwick tree over its member flags, so counting the
//! members inside a circular window costs one range query per window row
//! instead of a scan over the class.

// Row and column indices are bounded by the validated map size
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_possible_wrap)]

use crate::map::Coord;

/// Handle to a tile class registered on a [`crate::MapState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileClassId(pub(crate) usize);

impl TileClassId {
    /// Registration index of the class.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Binary indexed tree over one row.
#[derive(Debug, Clone)]
struct RowCounter {
    tree: Vec<u32>,
}

impl RowCounter {
    fn new(len: usize) -> Self {
        Self {
            tree: vec![0; len + 1],
        }
    }

    fn add(&mut self, idx: usize, delta: i32) {
        let mut i = idx + 1;
        while i < self.tree.len() {
            self.tree[i] = self.tree[i].wrapping_add_signed(delta);
            i += i & i.wrapping_neg();
        }
    }

    /// Sum of `[0, end)`.
    fn prefix(&self, end: usize) -> u32 {
        let mut sum = 0;
        let mut i = end.min(self.tree.len() - 1);
        while i > 0 {
            sum += self.tree[i];
            i -= i & i.wrapping_neg();
        }
        sum
    }

    /// Sum of `[start, end)`.
    fn range(&self, start: usize, end: usize) -> u32 {
        self.prefix(end) - self.prefix(start)
    }
}

/// Counts gathered over one radius window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowCount {
    /// Member tiles inside the window.
    pub members: usize,
    /// In-bounds tiles inside the window.
    pub tiles: usize,
}

impl WindowCount {
    /// In-bounds tiles inside the window that are not members.
    #[must_use]
    pub const fn non_members(self) -> usize {
        self.tiles - self.members
    }
}

/// A named, mutable set of tiles.
///
/// Classes are independent: a tile may belong to any number of them.
#[derive(Debug, Clone)]
pub struct TileClass {
    name: String,
    size: i32,
    members: Vec<bool>,
    rows: Vec<RowCounter>,
    len: usize,
}

impl TileClass {
    /// Create an empty class over a map of side `size`.
    #[must_use]
    pub fn new(name: &str, size: i32) -> Self {
        let side = size.max(0) as usize;
        Self {
            name: name.to_string(),
            size,
            members: vec![false; side * side],
            rows: (0..side).map(|_| RowCounter::new(side)).collect(),
            len: 0,
        }
    }

    /// Class name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of member tiles.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the class has no members.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn index(&self, c: Coord) -> Option<usize> {
        if c.x >= 0 && c.z >= 0 && c.x < self.size && c.z < self.size {
            Some(c.z as usize * self.size as usize + c.x as usize)
        } else {
            None
        }
    }

    /// Whether the tile is a member.
    #[must_use]
    pub fn has(&self, c: Coord) -> bool {
        self.index(c).is_some_and(|idx| self.members[idx])
    }

    /// Add a tile. Adding a member again is a no-op.
    ///
    /// Returns `true` if the tile was newly added.
    pub fn add(&mut self, c: Coord) -> bool {
        let Some(idx) = self.index(c) else {
            tracing::debug!(class = %self.name, x = c.x, z = c.z, "ignoring out-of-bounds tile class add");
            return false;
        };
        if self.members[idx] {
            return false;
        }
        self.members[idx] = true;
        self.rows[c.z as usize].add(c.x as usize, 1);
        self.len += 1;
        true
    }

    /// Remove a tile. Returns `true` if it was a member.
    pub fn remove(&mut self, c: Coord) -> bool {
        let Some(idx) = self.index(c) else {
            return false;
        };
        if !self.members[idx] {
            return false;
        }
        self.members[idx] = false;
        self.rows[c.z as usize].add(c.x as usize, -1);
        self.len -= 1;
        true
    }

    /// Iterate over member tiles in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Coord> + '_ {
        let size = self.size.max(1) as usize;
        self.members
            .iter()
            .enumerate()
            .filter(|(_, member)| **member)
            .map(move |(idx, _)| Coord::new((idx % size) as i32, (idx / size) as i32))
    }

    /// Count members and in-bounds tiles inside the circle `dx² + dz² <= r²`.
    ///
    /// Windows that reach past the map edge are clamped. An infinite radius
    /// covers the whole grid; a negative or NaN radius covers nothing.
    #[must_use]
    pub fn count_in_radius(&self, center: Coord, radius: f64) -> WindowCount {
        let mut count = WindowCount::default();
        if radius.is_nan() || radius < 0.0 || self.size <= 0 {
            return count;
        }
        // Wider than any in-grid distance from an in-grid center
        let radius = radius.min(f64::from(self.size) * 2.0);
        let reach = radius.floor() as i32;
        let z_start = (center.z - reach).max(0);
        let z_end = (center.z + reach).min(self.size - 1);
        for z in z_start..=z_end {
            let dz = f64::from(z - center.z);
            let half_span = (radius * radius - dz * dz).max(0.0).sqrt().floor() as i32;
            let x_start = (center.x - half_span).max(0);
            let x_end = (center.x + half_span).min(self.size - 1);
            if x_start > x_end {
                continue;
            }
            let row = &self.rows[z as usize];
            count.members += row.range(x_start as usize, x_end as usize + 1) as usize;
            count.tiles += (x_end - x_start + 1) as usize;
        }
        count
    }

    /// Member tiles within `radius` of `center`.
    #[must_use]
    pub fn count_members_in_radius(&self, center: Coord, radius: f64) -> usize {
        self.count_in_radius(center, radius).members
    }

    /// In-bounds non-member tiles within `radius` of `center`.
    #[must_use]
    pub fn count_non_members_in_radius(&self, center: Coord, radius: f64) -> usize {
        self.count_in_radius(center, radius).non_members()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brute_force(class: &TileClass, center: Coord, radius: f64) -> usize {
        class
            .iter()
            .filter(|c| {
                let dx = f64::from(c.x - center.x);
                let dz = f64::from(c.z - center.z);
                dx * dx + dz * dz <= radius * radius
            })
            .count()
    }

    #[test]
    fn test_add_idempotent() {
        let mut class = TileClass::new("forest", 16);
        assert!(class.add(Coord::new(3, 4)));
        assert!(!class.add(Coord::new(3, 4)));
        assert_eq!(class.len(), 1);
        assert_eq!(class.count_members_in_radius(Coord::new(3, 4), 2.0), 1);
    }

    #[test]
    fn test_remove() {
        let mut class = TileClass::new("forest", 16);
        class.add(Coord::new(1, 1));
        assert!(class.remove(Coord::new(1, 1)));
        assert!(!class.remove(Coord::new(1, 1)));
        assert!(class.is_empty());
        assert_eq!(class.count_members_in_radius(Coord::new(1, 1), 3.0), 0);
    }

    #[test]
    fn test_out_of_bounds_add_ignored() {
        let mut class = TileClass::new("water", 16);
        assert!(!class.add(Coord::new(-1, 0)));
        assert!(!class.add(Coord::new(0, 16)));
        assert!(class.is_empty());
    }

    #[test]
    fn test_radius_zero_is_single_tile() {
        let mut class = TileClass::new("player", 16);
        class.add(Coord::new(5, 5));
        class.add(Coord::new(6, 5));
        let count = class.count_in_radius(Coord::new(5, 5), 0.0);
        assert_eq!(count, WindowCount { members: 1, tiles: 1 });
    }

    #[test]
    fn test_window_clamped_at_corner() {
        let class = TileClass::new("player", 16);
        // Quarter disk of radius 2 around the origin: rows 0..=2 spans 3, 2, 1
        let count = class.count_in_radius(Coord::new(0, 0), 2.0);
        assert_eq!(count.tiles, 6);
        assert_eq!(count.non_members(), 6);

        // Fully outside the map
        let count = class.count_in_radius(Coord::new(-10, -10), 3.0);
        assert_eq!(count, WindowCount::default());
    }

    #[test]
    fn test_infinite_radius_covers_grid() {
        let mut class = TileClass::new("lake", 16);
        class.add(Coord::new(15, 15));
        let count = class.count_in_radius(Coord::new(0, 0), f64::INFINITY);
        assert_eq!(count.members, 1);
        assert_eq!(count.tiles, 256);
        assert_eq!(class.count_non_members_in_radius(Coord::new(3, 3), f64::INFINITY), 255);
        assert_eq!(class.count_in_radius(Coord::new(3, 3), f64::NAN), WindowCount::default());
        assert_eq!(
            class.count_in_radius(Coord::new(3, 3), f64::NEG_INFINITY),
            WindowCount::default()
        );
    }

    #[test]
    fn test_matches_brute_force() {
        let mut class = TileClass::new("mixed", 32);
        for i in 0..32 {
            class.add(Coord::new((i * 7) % 32, (i * 13) % 32));
            class.add(Coord::new(i, i));
        }
        for &(cx, cz, r) in &[(0, 0, 5.0), (16, 16, 7.5), (31, 2, 3.0), (10, 20, 12.0), (5, 5, 0.5)] {
            let center = Coord::new(cx, cz);
            assert_eq!(
                class.count_members_in_radius(center, r),
                brute_force(&class, center, r),
                "center {center:?} radius {r}"
            );
        }
    }
}
