//! Breadth-first distance from the outside of a region.

// Window extents are bounded by the validated map size
#![allow(clippy::cast_sign_loss, clippy::cast_possible_truncation, clippy::cast_possible_wrap)]

use std::collections::VecDeque;

use crate::map::Coord;

/// Rectangular window of grid points, inclusive on both corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Window {
    pub(crate) min: Coord,
    pub(crate) max: Coord,
}

impl Window {
    /// Window spanning `min..=max`, or `None` if it is empty.
    pub(crate) fn new(min: Coord, max: Coord) -> Option<Self> {
        if min.x > max.x || min.z > max.z {
            return None;
        }
        Some(Self { min, max })
    }

    pub(crate) fn width(self) -> usize {
        (self.max.x - self.min.x + 1) as usize
    }

    pub(crate) fn height(self) -> usize {
        (self.max.z - self.min.z + 1) as usize
    }

    pub(crate) fn len(self) -> usize {
        self.width() * self.height()
    }

    pub(crate) fn contains(self, c: Coord) -> bool {
        c.x >= self.min.x && c.z >= self.min.z && c.x <= self.max.x && c.z <= self.max.z
    }

    pub(crate) fn index(self, c: Coord) -> Option<usize> {
        if self.contains(c) {
            Some((c.z - self.min.z) as usize * self.width() + (c.x - self.min.x) as usize)
        } else {
            None
        }
    }

    pub(crate) fn coord(self, idx: usize) -> Coord {
        let w = self.width();
        Coord::new(self.min.x + (idx % w) as i32, self.min.z + (idx / w) as i32)
    }

    /// Row-major iteration over every point.
    pub(crate) fn iter(self) -> impl Iterator<Item = Coord> {
        (self.min.z..=self.max.z)
            .flat_map(move |z| (self.min.x..=self.max.x).map(move |x| Coord::new(x, z)))
    }
}

/// Distances of window points from the nearest outside point.
///
/// Outside points have distance 0; inside points are reached through
/// 8-connected steps, so the first inside ring has distance 1.
#[derive(Debug)]
pub(crate) struct DistanceField {
    window: Window,
    distances: Vec<Option<u32>>,
}

impl DistanceField {
    /// Flood the window from every point where `inside` is false.
    pub(crate) fn from_outside(window: Window, inside: impl Fn(Coord) -> bool) -> Self {
        let mut distances = vec![None; window.len()];
        let mut queue = VecDeque::new();
        let mut is_inside = vec![false; window.len()];

        for (idx, c) in window.iter().enumerate() {
            if inside(c) {
                is_inside[idx] = true;
            } else {
                distances[idx] = Some(0);
                queue.push_back(idx);
            }
        }

        while let Some(idx) = queue.pop_front() {
            let Some(d) = distances[idx] else {
                continue;
            };
            for n in window.coord(idx).neighbors8() {
                let Some(nidx) = window.index(n) else {
                    continue;
                };
                if is_inside[nidx] && distances[nidx].is_none() {
                    distances[nidx] = Some(d + 1);
                    queue.push_back(nidx);
                }
            }
        }

        Self { window, distances }
    }

    /// Distance of `c`, or `None` if it is inside but unreachable from any
    /// outside point of the window (or not in the window at all).
    pub(crate) fn get(&self, c: Coord) -> Option<u32> {
        self.window.index(c).and_then(|idx| self.distances[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_rings() {
        let window = Window::new(Coord::new(0, 0), Coord::new(8, 8)).unwrap();
        let field = DistanceField::from_outside(window, |c| {
            (2..=6).contains(&c.x) && (2..=6).contains(&c.z)
        });
        assert_eq!(field.get(Coord::new(0, 0)), Some(0));
        assert_eq!(field.get(Coord::new(2, 2)), Some(1));
        assert_eq!(field.get(Coord::new(2, 4)), Some(1));
        assert_eq!(field.get(Coord::new(3, 4)), Some(2));
        assert_eq!(field.get(Coord::new(4, 4)), Some(3));
        assert_eq!(field.get(Coord::new(9, 9)), None);
    }

    #[test]
    fn test_fully_inside_is_unreached() {
        let window = Window::new(Coord::new(0, 0), Coord::new(3, 3)).unwrap();
        let field = DistanceField::from_outside(window, |_| true);
        assert_eq!(field.get(Coord::new(1, 1)), None);
    }

    #[test]
    fn test_empty_window() {
        assert!(Window::new(Coord::new(3, 0), Coord::new(2, 5)).is_none());
    }
}
