//! Free-rectangle allocator
//!
//! Tracks the unused area of a window as a list of disjoint *spare*
//! rectangles plus one distinguished *main* rectangle, which is reserved for
//! the board and only consumed when no spare can satisfy a request. Boxes are
//! placed by scoring every free rectangle against the request, optionally
//! borrowing a missing sliver from an adjacent rectangle (a *chip*), and
//! returning the leftovers to the spare list, merging them with a neighbour
//! where they line up.
//!
//! # Example
//!
//! ```rust
//! use seat_layout::allocator::{Allocator, AllocatorConfig, PlacementRequest, Shape};
//! use seat_layout::geometry::Rect;
//!
//! let mut alloc = Allocator::from_free(Rect::new(0, 0, 1000, 800), AllocatorConfig::default());
//! let placed = alloc.place(&PlacementRequest::new(Shape::exact(200, 100))).unwrap();
//! assert_eq!(placed.rect.width, 200);
//! ```

mod check;
mod config;
mod grow;
mod request;
mod score;
mod split;

pub use check::{check, Violation, ViolationKind};
pub use config::AllocatorConfig;
pub use grow::Regrown;
pub use request::{Alignment, Placement, PlacementRequest, RequestParseError, Shape};

use std::fmt;

use tracing::{debug, trace, warn};

use crate::geometry::{Edge, Rect, Size};

use score::{Lenders, Scan};

/// A free rectangle the allocator can take space from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Slot {
    Spare(usize),
    Main,
}

/// Why a rectangle was logged as allocated
#[derive(Debug, Clone, PartialEq)]
pub enum AllocationKind {
    /// Placed by [`Allocator::place`]; remembers the footprint shape so the
    /// growth pass can enlarge it later
    Placed {
        shape: Shape,
        align: Alignment,
        preserve_aspect: bool,
    },
    /// Claimed directly by the caller, for example a seat cell
    Reserved,
    /// The main rectangle, handed over as the board
    Board,
}

/// One entry of the allocation log
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub rect: Rect,
    pub kind: AllocationKind,
}

/// A rejected operation, recorded instead of corrupting the free list.
///
/// Malformed input never panics by default: the operation becomes a no-op,
/// the anomaly is logged at `warn` and kept in [`Allocator::anomalies`].
/// With [`AllocatorConfig::with_panic_on_anomaly`] every anomaly except
/// [`Anomaly::PlacementFailed`] panics instead, for tests and debug runs.
#[derive(Debug, Clone, PartialEq)]
pub enum Anomaly {
    NegativeRelease(Rect),
    OutsideWindow(Rect),
    OverlappingRelease { rect: Rect, owned: Rect },
    /// Reserved rectangle not inside a single spare
    NotFree(Rect),
    /// Pieces handed back for a carved strip do not cover it exactly
    UntiledStrip(Rect),
    EmptyRequest(Size),
    PlacementFailed(Size),
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anomaly::NegativeRelease(r) => write!(f, "released negative rectangle {}", r),
            Anomaly::OutsideWindow(r) => write!(f, "rectangle {} lies outside the window", r),
            Anomaly::OverlappingRelease { rect, owned } => {
                write!(f, "released rectangle {} overlaps {}", rect, owned)
            }
            Anomaly::NotFree(r) => write!(f, "reserved rectangle {} is not free space", r),
            Anomaly::UntiledStrip(r) => write!(f, "pieces do not tile strip {}", r),
            Anomaly::EmptyRequest(s) => write!(f, "placement request with empty size {}", s),
            Anomaly::PlacementFailed(s) => write!(f, "no room for {}", s),
        }
    }
}

/// How a strip cut off the main rectangle is divided up. Together the
/// pieces must cover the strip exactly, without overlapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StripLayout {
    /// Logged as reserved
    pub claimed: Vec<Rect>,
    /// Returned to the free list
    pub spare: Vec<Rect>,
}

impl StripLayout {
    /// Hand the whole strip to the free list
    pub fn spare(strip: Rect) -> Self {
        Self {
            claimed: Vec::new(),
            spare: vec![strip],
        }
    }

    /// Claim the whole strip
    pub fn claimed(strip: Rect) -> Self {
        Self {
            claimed: vec![strip],
            spare: Vec::new(),
        }
    }

    fn tiles(&self, strip: Rect) -> bool {
        let pieces: Vec<Rect> = self
            .claimed
            .iter()
            .chain(&self.spare)
            .copied()
            .filter(|r| r.width != 0 && r.height != 0)
            .collect();
        let disjoint = pieces
            .iter()
            .enumerate()
            .all(|(i, a)| pieces[i + 1..].iter().all(|b| !a.intersects(b)));
        pieces.iter().all(|r| !r.is_empty() && strip.contains_rect(r))
            && disjoint
            && pieces.iter().map(Rect::area).sum::<i64>() == strip.area()
    }
}

/// Free-list allocator over one window
#[derive(Debug, Clone)]
pub struct Allocator {
    window: Rect,
    main: Rect,
    spares: Vec<Rect>,
    allocated: Vec<Allocation>,
    anomalies: Vec<Anomaly>,
    config: AllocatorConfig,
}

impl Allocator {
    /// Whole window as the main rectangle, no spares
    pub fn new(window: Rect, config: AllocatorConfig) -> Self {
        Self {
            window,
            main: window,
            spares: Vec::new(),
            allocated: Vec::new(),
            anomalies: Vec::new(),
            config,
        }
    }

    /// Whole window as a single spare, empty main rectangle
    pub fn from_free(window: Rect, config: AllocatorConfig) -> Self {
        let mut alloc = Self::empty(window, config);
        alloc.release(window);
        alloc
    }

    /// Nothing free at all; space enters through [`Allocator::release`]
    pub fn empty(window: Rect, config: AllocatorConfig) -> Self {
        Self {
            main: Rect::new(window.left, window.top, 0, 0),
            ..Self::new(window, config)
        }
    }

    pub fn window(&self) -> Rect {
        self.window
    }

    /// Current main rectangle, possibly empty
    pub fn main(&self) -> Rect {
        self.main
    }

    pub fn spares(&self) -> &[Rect] {
        &self.spares
    }

    pub fn allocated(&self) -> &[Allocation] {
        &self.allocated
    }

    pub fn anomalies(&self) -> &[Anomaly] {
        &self.anomalies
    }

    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    pub fn margin(&self) -> i32 {
        self.config.margin
    }

    pub fn set_allow_chips(&mut self, allow: bool) {
        self.config.allow_chips = allow;
    }

    /// Total area of the spare list
    pub fn free_area(&self) -> i64 {
        self.spares.iter().map(Rect::area).sum()
    }

    pub(crate) fn rect_at(&self, slot: Slot) -> Rect {
        match slot {
            Slot::Spare(index) => self.spares[index],
            Slot::Main => self.main,
        }
    }

    /// Every free rectangle in scan order: spares, then main
    pub(crate) fn slots(&self) -> impl Iterator<Item = (Slot, Rect)> + '_ {
        self.spares
            .iter()
            .enumerate()
            .map(|(index, r)| (Slot::Spare(index), *r))
            .chain(std::iter::once((Slot::Main, self.main)))
    }

    pub(crate) fn replace_slot(&mut self, slot: Slot, rect: Rect) {
        match slot {
            Slot::Spare(index) => self.spares[index] = rect,
            Slot::Main => self.main = rect,
        }
    }

    /// Drop spares emptied by a split
    pub(crate) fn prune(&mut self) {
        self.spares.retain(|r| !r.is_empty());
    }

    /// The rectangle placements orient themselves around
    pub(crate) fn focus(&self) -> Rect {
        if self.main.is_empty() {
            self.window
        } else {
            self.main
        }
    }

    fn report(&mut self, anomaly: Anomaly) {
        warn!(%anomaly, "allocator anomaly");
        if self.config.panic_on_anomaly {
            panic!("allocator anomaly: {}", anomaly);
        }
        self.anomalies.push(anomaly);
    }

    /// Return a rectangle to the free list.
    ///
    /// Empty rectangles are ignored; negative ones, ones outside the window
    /// and ones overlapping space the allocator already accounts for are
    /// rejected as anomalies. Otherwise the rectangle is merged with the most
    /// recently added spare it lines up with (same height and top, touching
    /// left/right, or same width and left, touching above/below), or appended.
    /// At most one merge happens per release.
    pub fn release(&mut self, rect: Rect) -> bool {
        if rect.is_empty() {
            if rect.width < 0 || rect.height < 0 {
                self.report(Anomaly::NegativeRelease(rect));
            }
            return false;
        }
        if !self.window.contains_rect(&rect) {
            self.report(Anomaly::OutsideWindow(rect));
            return false;
        }
        let owned = self
            .spares
            .iter()
            .copied()
            .chain(std::iter::once(self.main))
            .chain(self.allocated.iter().map(|a| a.rect))
            .find(|owned| owned.intersects(&rect));
        if let Some(owned) = owned {
            self.report(Anomaly::OverlappingRelease { rect, owned });
            return false;
        }

        match self.spares.iter_mut().rev().find(|spare| lines_up(spare, &rect)) {
            Some(spare) => {
                trace!(%rect, with = %spare, "coalesce");
                *spare = spare.union(&rect);
            }
            None => self.spares.push(rect),
        }
        true
    }

    /// Place a box, returning its position or `None` if nothing fits.
    ///
    /// Spares are tried first, at first borrowing chips only from other
    /// spares, then also from the main rectangle. The main rectangle itself
    /// is only considered when no spare can take either shape. A box cut from the main rectangle gets
    /// exactly its minimum size. A failed placement changes nothing.
    pub fn place(&mut self, request: &PlacementRequest) -> Option<Placement> {
        if !request.primary.is_valid() {
            self.report(Anomaly::EmptyRequest(request.primary.min));
            return None;
        }
        let margin = self.config.margin;
        let footprints: Vec<(bool, Shape)> = request
            .shapes()
            .map(|(alternate, shape)| (alternate, shape.grown(2 * margin)))
            .collect();
        let preferred = request
            .preferred_aspect
            .unwrap_or(self.config.preferred_aspect);

        // spares on their own, then spares borrowing from main, then main
        let mut scan = Scan::default();
        for lenders in [Lenders::Spares, Lenders::SparesAndMain] {
            if scan.best().is_some() {
                break;
            }
            for index in 0..self.spares.len() {
                for &(alternate, shape) in &footprints {
                    let slot = Slot::Spare(index);
                    self.score(slot, shape.min, preferred, alternate, lenders, &mut scan);
                }
            }
        }
        if scan.best().is_none() && !self.main.is_empty() {
            for &(alternate, shape) in &footprints {
                let lenders = Lenders::Spares;
                self.score(Slot::Main, shape.min, preferred, alternate, lenders, &mut scan);
            }
        }

        let Some(best) = scan.into_best() else {
            debug!(min = %request.primary.min, "placement failed");
            self.anomalies
                .push(Anomaly::PlacementFailed(request.primary.min));
            return None;
        };
        let shape = footprints
            .iter()
            .find(|(alternate, _)| *alternate == best.alternate)
            .map(|(_, shape)| *shape)?;
        let shape = if best.slot == Slot::Main {
            shape.pinned()
        } else {
            shape
        };

        let footprint = match best.chip {
            Some(chip) => {
                self.place_with_chip(best.slot, chip, shape, request.align, request.preserve_aspect)
            }
            None => self.place_direct(
                best.slot,
                best.cut,
                shape,
                request.align,
                request.preserve_aspect,
            ),
        };
        debug!(
            %footprint,
            slot = ?best.slot,
            chip = best.chip.is_some(),
            score = best.score,
            "placed"
        );
        self.allocated.push(Allocation {
            rect: footprint,
            kind: AllocationKind::Placed {
                shape,
                align: request.align,
                preserve_aspect: request.preserve_aspect,
            },
        });
        Some(Placement {
            rect: footprint.inset(margin),
            footprint,
            alternate: best.alternate,
        })
    }

    /// Cut a strip `depth` deep off one edge of the main rectangle and divide
    /// it with `divide`, which gets the strip and says which parts to claim
    /// and which to free. Returns the strip, or `None` with the main
    /// rectangle untouched if the depth does not fit or the pieces do not
    /// tile the strip.
    pub fn carve_main<F>(&mut self, edge: Edge, depth: i32, divide: F) -> Option<Rect>
    where
        F: FnOnce(Rect) -> StripLayout,
    {
        if depth <= 0 || depth > self.main.extent(edge.axis()) {
            return None;
        }
        let (strip, rest) = self.main.take_edge(edge, depth);
        let layout = divide(strip);
        if !layout.tiles(strip) {
            self.report(Anomaly::UntiledStrip(strip));
            return None;
        }
        trace!(%strip, %edge, claimed = layout.claimed.len(), "carve main");
        self.main = rest;
        for rect in layout.claimed.into_iter().filter(|r| !r.is_empty()) {
            self.allocated.push(Allocation {
                rect,
                kind: AllocationKind::Reserved,
            });
        }
        for rect in layout.spare {
            self.release(rect);
        }
        Some(strip)
    }

    /// Move a strip `depth` deep from one edge of the main rectangle to the
    /// free list
    pub fn split_main(&mut self, edge: Edge, depth: i32) -> Option<Rect> {
        self.carve_main(edge, depth, StripLayout::spare)
    }

    /// Claim `rect` out of the spare that contains it, logging it as
    /// allocated and freeing the rest of that spare. Rejects rectangles
    /// that are not wholly inside one spare.
    pub fn reserve(&mut self, rect: Rect) -> bool {
        if rect.is_empty() {
            if rect.width < 0 || rect.height < 0 {
                self.report(Anomaly::NegativeRelease(rect));
            }
            return false;
        }
        if !self.window.contains_rect(&rect) {
            self.report(Anomaly::OutsideWindow(rect));
            return false;
        }
        let Some(index) = self.spares.iter().position(|s| s.contains_rect(&rect)) else {
            self.report(Anomaly::NotFree(rect));
            return false;
        };
        let spare = self.spares.remove(index);
        self.allocated.push(Allocation {
            rect,
            kind: AllocationKind::Reserved,
        });
        for piece in spare.subtract(&rect) {
            self.release(piece);
        }
        true
    }

    /// Remove a logged allocation and return its area to the free list
    pub fn free(&mut self, rect: Rect) -> bool {
        let Some(index) = self.allocated.iter().position(|a| a.rect == rect) else {
            return false;
        };
        self.allocated.remove(index);
        self.release(rect)
    }

    pub fn peek_main(&self) -> Rect {
        self.main
    }

    /// Hand the main rectangle over as the board, inset by the margin.
    /// Returns `None` once the main rectangle has been taken or used up.
    pub fn take_main(&mut self) -> Option<Rect> {
        if self.main.is_empty() {
            return None;
        }
        let board = self.main;
        self.allocated.push(Allocation {
            rect: board,
            kind: AllocationKind::Board,
        });
        self.main = Rect::new(board.left, board.top, 0, 0);
        Some(board.inset(self.config.margin))
    }
}

fn lines_up(spare: &Rect, rect: &Rect) -> bool {
    let side_by_side = spare.height == rect.height
        && spare.top == rect.top
        && (spare.left == rect.right() || spare.right() == rect.left);
    let stacked = spare.width == rect.width
        && spare.left == rect.left
        && (spare.top == rect.bottom() || spare.bottom() == rect.top);
    side_by_side || stacked
}
