//! Recursive fractal tree walk
//!
//! The trunk goes straight up from the origin, then every branch splits
//! into a right and a left child that are 0.7 times as long. Branches deep
//! enough may also grow a jittered middle child. Segments are emitted
//! depth first, pre-order: a branch, then its right subtree, its left
//! subtree and finally its middle subtree.

use crate::color::{pale_color, ColorStrategy};
use crate::config::FractalConfig;
use crate::error::Result;
use crate::render::{LineRenderer, Point, Segment};
use rand::Rng;
use std::f64::consts::FRAC_PI_2;

/// Length factor from a branch to its children
pub const SHRINK: f64 = 0.7;
/// Extra length factor for middle branches
pub const MIDDLE_SHRINK: f64 = 0.8;
pub const TRUNK_WIDTH: u32 = 6;
/// Width scale for branches; the thickest branch is one wider than this
pub const MAX_BRANCH_WIDTH: u32 = 6;
/// Middle branches only grow where more than this much depth remains
pub const MIDDLE_MIN_DEPTH: u32 = 2;
pub const DOT_COUNT: usize = 20;
/// Decorative dots need rainbow mode and at least this depth
pub const DOT_MIN_DEPTH: u32 = 5;

/// A branch waiting to be drawn
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BranchTask {
    pub start: Point,
    pub length: f64,
    /// Radians, 0 pointing right, counterclockwise
    pub angle: f64,
    pub depth: u32,
}

/// Axis-aligned box around everything drawn so far
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Bounds {
    fn around(p: Point) -> Self {
        Self { min: p, max: p }
    }

    fn include(&mut self, p: Point) {
        self.min = Point::new(self.min.x.min(p.x), self.min.y.min(p.y));
        self.max = Point::new(self.max.x.max(p.x), self.max.y.max(p.y));
    }

    #[cfg(test)]
    fn contains(&self, p: Point) -> bool {
        (self.min.x..=self.max.x).contains(&p.x) && (self.min.y..=self.max.y).contains(&p.y)
    }
}

/// Bookkeeping for one tree draw
#[derive(Debug, Default)]
pub struct BranchState {
    /// Branch segments emitted so far, trunk excluded
    pub branch_count: u64,
    pub bounds: Option<Bounds>,
}

impl BranchState {
    fn include(&mut self, p: Point) {
        match self.bounds.as_mut() {
            Some(bounds) => bounds.include(p),
            None => self.bounds = Some(Bounds::around(p)),
        }
    }
}

/// What one tree draw emitted
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Trunk included
    pub segments: usize,
    pub dots: usize,
}

/// Stroke width for a branch at `depth`, from 1 at the leaves up to 7
pub fn stroke_width(depth: u32, max_depth: u32) -> u32 {
    if max_depth == 0 {
        return 1;
    }
    let scaled = depth.min(max_depth) as u64 * MAX_BRANCH_WIDTH as u64 / max_depth as u64;
    (scaled as u32 + 1).max(1)
}

pub struct FractalGenerator<'a, R: Rng + ?Sized> {
    config: &'a FractalConfig,
    colors: ColorStrategy,
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> FractalGenerator<'a, R> {
    pub fn new(config: &'a FractalConfig, rng: &'a mut R) -> Self {
        Self {
            colors: config.color,
            config,
            rng,
        }
    }

    /// Draw one complete tree rooted at `origin`
    pub fn run<L: LineRenderer + ?Sized>(&mut self, renderer: &mut L, origin: Point) -> Result<TreeStats> {
        let max_depth = self.config.max_depth;
        let mut state = BranchState::default();

        let trunk_end = Point::new(origin.x, origin.y + self.config.trunk_length);
        let trunk = Segment {
            start: origin,
            end: trunk_end,
            color: self.colors.color_for(max_depth, max_depth, 0, &mut *self.rng),
            width: TRUNK_WIDTH,
            depth: max_depth,
            max_depth,
        };
        renderer.draw_segment(&trunk)?;
        state.include(origin);
        state.include(trunk_end);

        let root = BranchTask {
            start: trunk_end,
            length: self.config.trunk_length * SHRINK,
            angle: FRAC_PI_2,
            depth: max_depth,
        };
        let branches = self.draw_branch(renderer, root, &mut state)?;

        let dots = if self.config.rainbow() && max_depth >= DOT_MIN_DEPTH {
            self.draw_dots(renderer, &state)?
        } else {
            0
        };

        Ok(TreeStats {
            segments: branches + 1,
            dots,
        })
    }

    /// Draw `task` and its whole subtree, returning the number of segments emitted.
    ///
    /// Pending branches live on an explicit stack; children are pushed in
    /// reverse so they pop in right, left, middle order.
    pub fn draw_branch<L: LineRenderer + ?Sized>(
        &mut self,
        renderer: &mut L,
        task: BranchTask,
        state: &mut BranchState,
    ) -> Result<usize> {
        let max_depth = self.config.max_depth;
        let spread = self.config.branch_angle;
        let middle_chance = self.config.middle_chance();

        let mut stack: Vec<BranchTask> = Vec::with_capacity(256);
        stack.push(task);
        let mut emitted = 0;

        while let Some(task) = stack.pop() {
            if task.depth == 0 {
                continue;
            }

            let end = task.start.offset(task.length, task.angle);
            let segment = Segment {
                start: task.start,
                end,
                color: self.colors.color_for(task.depth, max_depth, state.branch_count, &mut *self.rng),
                width: stroke_width(task.depth, max_depth),
                depth: task.depth,
                max_depth,
            };
            renderer.draw_segment(&segment)?;
            state.include(end);
            state.branch_count += 1;
            emitted += 1;

            let length = task.length * SHRINK;
            let child = |angle: f64, length: f64| BranchTask {
                start: end,
                length,
                angle,
                depth: task.depth - 1,
            };

            if task.depth > MIDDLE_MIN_DEPTH && middle_chance > 0.0 && self.rng.gen_bool(middle_chance) {
                // uniform in [-spread/4, +spread/4]
                let jitter = (self.rng.gen::<f64>() - 0.5) * spread * 0.5;
                stack.push(child(task.angle + jitter, length * MIDDLE_SHRINK));
            }
            stack.push(child(task.angle - spread, length));
            stack.push(child(task.angle + spread, length));
        }

        Ok(emitted)
    }

    /// Scatter pale zero-length marks over the tree's bounding box
    fn draw_dots<L: LineRenderer + ?Sized>(&mut self, renderer: &mut L, state: &BranchState) -> Result<usize> {
        let Some(bounds) = state.bounds else {
            return Ok(0);
        };

        for _ in 0..DOT_COUNT {
            let at = Point::new(
                bounds.min.x + (bounds.max.x - bounds.min.x) * self.rng.gen::<f64>(),
                bounds.min.y + (bounds.max.y - bounds.min.y) * self.rng.gen::<f64>(),
            );
            let color = pale_color(&mut *self.rng);
            let width = self.rng.gen_range(1..=3);
            renderer.draw_point(at, color, width)?;
        }
        Ok(DOT_COUNT)
    }
}
