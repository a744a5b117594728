//! Growth pass: enlarge placed boxes into neighbouring free space

use tracing::debug;

use crate::geometry::{Axis, Rect, Size};

use super::score::Cut;
use super::split::{cut_direct, fit_size, DirectCut};
use super::{AllocationKind, Allocator};

/// A placed box that the growth pass moved or enlarged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regrown {
    /// Index into [`Allocator::allocated`]
    pub index: usize,
    pub from: Rect,
    pub to: Rect,
}

fn larger(a: Rect, b: Rect) -> Rect {
    if a.area() > b.area() {
        a
    } else {
        b
    }
}

impl Allocator {
    /// Grow every placed box that is still below its maximum size into the
    /// spare rectangles around it. The grown region is removed from the free
    /// list, the box is re-cut inside it, and the remainder is released.
    pub fn optimize(&mut self) -> Vec<Regrown> {
        let mut regrown = Vec::new();
        for index in 0..self.allocated.len() {
            let allocation = self.allocated[index].clone();
            let AllocationKind::Placed {
                shape,
                align,
                preserve_aspect,
            } = allocation.kind
            else {
                continue;
            };
            let Some(region) = self.expand(allocation.rect, shape.max) else {
                continue;
            };

            self.carve(region);
            let size = fit_size(region.size(), shape, preserve_aspect);
            let DirectCut {
                placed,
                rest,
                leftovers,
            } = cut_direct(region, size, Cut::LeftOrRight, align, self.focus());
            self.allocated[index].rect = placed;
            for piece in [rest, leftovers[0], leftovers[1]] {
                self.release(piece);
            }
            debug!(from = %allocation.rect, to = %placed, "regrown");
            regrown.push(Regrown {
                index,
                from: allocation.rect,
                to: placed,
            });
        }
        regrown
    }

    /// Largest region around `rect` made of `rect` plus adjacent spares,
    /// trying horizontal-then-vertical and vertical-then-horizontal growth
    fn expand(&self, rect: Rect, max: Size) -> Option<Rect> {
        if max.width <= rect.width && max.height <= rect.height {
            return None;
        }
        let wide = self.expand_along(rect, Axis::Horizontal, max);
        let tall = self.expand_along(rect, Axis::Vertical, max);
        match (wide, tall) {
            (Some(wide), Some(tall)) => {
                let wide_then_tall = self.expand_along(wide, Axis::Vertical, max);
                let tall_then_wide = self.expand_along(tall, Axis::Horizontal, max);
                Some(match (wide_then_tall, tall_then_wide) {
                    (Some(a), Some(b)) => larger(a, b),
                    (Some(a), None) => larger(a, tall),
                    (None, Some(b)) => larger(b, wide),
                    (None, None) => larger(wide, tall),
                })
            }
            (wide, tall) => wide.or(tall),
        }
    }

    fn expand_along(&self, rect: Rect, axis: Axis, max: Size) -> Option<Rect> {
        if rect.extent(axis) >= max.extent(axis) {
            return None;
        }
        let cross = axis.cross();
        let (start, span) = (rect.start(cross), rect.extent(cross));

        let mut lo = rect.start(axis);
        loop {
            let next = self.reach(axis, true, lo, start, span);
            if next >= lo {
                break;
            }
            lo = next;
        }
        let mut hi = rect.end(axis);
        loop {
            let next = self.reach(axis, false, hi, start, span);
            if next <= hi {
                break;
            }
            hi = next;
        }

        if lo == rect.start(axis) && hi == rect.end(axis) {
            None
        } else {
            Some(rect.with_span(axis, lo, hi - lo))
        }
    }

    /// How far past `edge` the spares let a band `span` long (starting at
    /// `start` across the axis) extend, toward the low or high side
    fn reach(&self, axis: Axis, toward_low: bool, edge: i32, start: i32, span: i32) -> i32 {
        let cross = axis.cross();
        for spare in self.spares.iter().rev() {
            let adjacent = if toward_low {
                spare.end(axis) == edge
            } else {
                spare.start(axis) == edge
            };
            if !adjacent || spare.start(cross) > start || spare.end(cross) <= start {
                continue;
            }
            let far = if toward_low {
                spare.start(axis)
            } else {
                spare.end(axis)
            };
            let remaining = span - (spare.end(cross) - start);
            if remaining <= 0 {
                return far;
            }
            let rest = self.reach(axis, toward_low, edge, spare.end(cross), remaining);
            return if toward_low { far.max(rest) } else { far.min(rest) };
        }
        edge
    }

    /// Remove `region` from the free list, keeping the parts of each spare
    /// outside it
    fn carve(&mut self, region: Rect) {
        let (hit, keep): (Vec<Rect>, Vec<Rect>) =
            self.spares.iter().copied().partition(|spare| spare.intersects(&region));
        self.spares = keep;
        for piece in hit.iter().flat_map(|spare| spare.subtract(&region)) {
            self.release(piece);
        }
    }
}
