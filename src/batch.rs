//! Retry-bounded placement of many areas or object groups.
//!
//! Each attempt moves the placer to a fresh random anchor. A batch stops once
//! `num` placements succeeded or `num * retry_factor` attempts failed,
//! whichever comes first. Coming up short is not an error: the outcome
//! simply holds fewer results than requested.

use crate::area::{Area, AreaId};
use crate::constraint::Constraint;
use crate::map::{MapContext, PlacedObject};
use crate::painter::AreaPainter;
use crate::placer::{AreaPlacer, CenteredPlacer, ObjectGroupPlacer};

/// Failed attempts tolerated per requested placement.
pub const DEFAULT_RETRY_FACTOR: u32 = 10;

/// Results of one batch.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome<T> {
    /// Successful placements, in order.
    pub placed: Vec<T>,
    /// Placement attempts made, successful or not.
    pub attempts: u32,
    /// Attempts that failed.
    pub failures: u32,
}

impl<T> BatchOutcome<T> {
    fn new() -> Self {
        Self {
            placed: Vec::new(),
            attempts: 0,
            failures: 0,
        }
    }

    /// Whether every requested placement succeeded.
    #[must_use]
    pub fn is_complete(&self, requested: u32) -> bool {
        self.placed.len() >= requested as usize
    }
}

/// Drives the shared retry loop. `attempt` returns `None` on failure.
fn run_batch<T>(
    ctx: &mut MapContext,
    num: u32,
    retry_factor: u32,
    mut attempt: impl FnMut(&mut MapContext) -> Option<T>,
) -> BatchOutcome<T> {
    let mut outcome = BatchOutcome::new();
    let max_failures = num.saturating_mul(retry_factor);
    let mut successes = 0;

    while successes < num && outcome.failures < max_failures {
        outcome.attempts += 1;
        if let Some(result) = attempt(ctx) {
            outcome.placed.push(result);
            successes += 1;
        } else {
            outcome.failures += 1;
        }
    }
    outcome
}

fn log_shortfall(kind: &'static str, num: u32, placed: usize, attempts: u32) {
    if placed < num as usize {
        tracing::debug!(
            kind,
            requested = num,
            placed,
            attempts,
            "batch placement stopped short"
        );
    }
}

/// Place one area with the placer as configured, then paint it.
///
/// Returns `None` if the placer fails or yields no tiles; nothing is painted
/// in that case.
pub fn create_area<P: AreaPlacer + ?Sized>(
    ctx: &mut MapContext,
    placer: &P,
    painter: &dyn AreaPainter,
    constraint: &dyn Constraint,
) -> Option<Area> {
    let points = placer.place(&ctx.state, &mut ctx.rng, constraint)?;
    if points.is_empty() {
        return None;
    }
    let area = Area::new(AreaId(ctx.state.next_area_id()), points);
    painter.paint(ctx, &area);
    Some(area)
}

/// Place and paint up to `num` areas at random anchors.
///
/// A `retry_factor` of 0 leaves no failure budget, so no attempt is made.
pub fn create_areas(
    ctx: &mut MapContext,
    placer: &mut dyn CenteredPlacer,
    painter: &dyn AreaPainter,
    constraint: &dyn Constraint,
    num: u32,
    retry_factor: u32,
) -> BatchOutcome<Area> {
    let outcome = run_batch(ctx, num, retry_factor, |ctx| {
        let anchor = ctx.random_anchor();
        placer.set_center(anchor);
        create_area(ctx, &*placer, painter, constraint)
    });
    log_shortfall("areas", num, outcome.placed.len(), outcome.attempts);
    outcome
}

/// Place one object group as configured and commit its objects.
///
/// On success every object is added to the map and, if the group has a tile
/// class, the object tiles are tagged with it.
pub fn create_object_group(
    ctx: &mut MapContext,
    placer: &dyn ObjectGroupPlacer,
    player: u8,
    constraint: &dyn Constraint,
) -> Option<Vec<PlacedObject>> {
    let objects = placer.place(&ctx.state, &mut ctx.rng, player, constraint)?;
    if let Some(class) = placer.tile_class() {
        let class = ctx.state.tile_class_mut(class);
        for object in &objects {
            class.add(object.tile());
        }
    }
    for object in &objects {
        ctx.state.add_object(object.clone());
    }
    Some(objects)
}

/// Place up to `num` object groups at random anchors, with the same retry
/// policy as [`create_areas`].
pub fn create_object_groups(
    ctx: &mut MapContext,
    placer: &mut dyn ObjectGroupPlacer,
    player: u8,
    constraint: &dyn Constraint,
    num: u32,
    retry_factor: u32,
) -> BatchOutcome<Vec<PlacedObject>> {
    let outcome = run_batch(ctx, num, retry_factor, |ctx| {
        let anchor = ctx.random_anchor();
        placer.set_center(anchor);
        create_object_group(ctx, &*placer, player, constraint)
    });
    log_shortfall("object groups", num, outcome.placed.len(), outcome.attempts);
    outcome
}
