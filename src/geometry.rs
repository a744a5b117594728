//! Integer rectangle geometry shared by the allocator and the seating arrangements

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the two screen axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// x, measured by width
    Horizontal,
    /// y, measured by height
    Vertical,
}

impl Axis {
    /// The perpendicular axis
    pub fn cross(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }

    /// Edge at the low end of this axis
    pub fn low_edge(self) -> Edge {
        match self {
            Axis::Horizontal => Edge::Left,
            Axis::Vertical => Edge::Top,
        }
    }

    /// Edge at the high end of this axis
    pub fn high_edge(self) -> Edge {
        match self {
            Axis::Horizontal => Edge::Right,
            Axis::Vertical => Edge::Bottom,
        }
    }
}

/// A side of a rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    /// The axis this edge bounds: left/right bound the horizontal extent
    pub fn axis(self) -> Axis {
        match self {
            Edge::Left | Edge::Right => Axis::Horizontal,
            Edge::Top | Edge::Bottom => Axis::Vertical,
        }
    }

    /// True for the left and top edges
    pub fn is_low(self) -> bool {
        matches!(self, Edge::Left | Edge::Top)
    }

    pub fn opposite(self) -> Edge {
        match self {
            Edge::Left => Edge::Right,
            Edge::Right => Edge::Left,
            Edge::Top => Edge::Bottom,
            Edge::Bottom => Edge::Top,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edge::Left => write!(f, "left"),
            Edge::Right => write!(f, "right"),
            Edge::Top => write!(f, "top"),
            Edge::Bottom => write!(f, "bottom"),
        }
    }
}

/// Width and height in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Build a size from its extent along `axis` and across it
    pub fn along(axis: Axis, extent: i32, cross: i32) -> Self {
        match axis {
            Axis::Horizontal => Self::new(extent, cross),
            Axis::Vertical => Self::new(cross, extent),
        }
    }

    pub fn extent(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    pub fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    /// Swap width and height
    pub fn transposed(&self) -> Self {
        Self::new(self.height, self.width)
    }

    /// Grow both dimensions by `amount`
    pub fn grown(&self, amount: i32) -> Self {
        Self::new(self.width + amount, self.height + amount)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Axis-aligned integer rectangle.
///
/// A rectangle with a non-positive width or height is empty: it covers no
/// area, never intersects anything and is never kept in a free list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Rectangle of `size` with its top-left corner at the given point
    pub fn at(left: i32, top: i32, size: Size) -> Self {
        Self::new(left, top, size.width, size.height)
    }

    /// Right edge x-coordinate (exclusive)
    pub fn right(&self) -> i32 {
        self.left + self.width
    }

    /// Bottom edge y-coordinate (exclusive)
    pub fn bottom(&self) -> i32 {
        self.top + self.height
    }

    pub fn center_x(&self) -> i32 {
        self.left + self.width / 2
    }

    pub fn center_y(&self) -> i32 {
        self.top + self.height / 2
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn area(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            self.size().area()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Low coordinate along `axis`
    pub fn start(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.left,
            Axis::Vertical => self.top,
        }
    }

    /// High (exclusive) coordinate along `axis`
    pub fn end(&self, axis: Axis) -> i32 {
        self.start(axis) + self.extent(axis)
    }

    pub fn extent(&self, axis: Axis) -> i32 {
        self.size().extent(axis)
    }

    /// Midpoint along `axis`
    pub fn mid(&self, axis: Axis) -> i32 {
        match axis {
            Axis::Horizontal => self.center_x(),
            Axis::Vertical => self.center_y(),
        }
    }

    /// Same rectangle with its span along `axis` replaced
    pub fn with_span(&self, axis: Axis, start: i32, extent: i32) -> Rect {
        match axis {
            Axis::Horizontal => Rect::new(start, self.top, extent, self.height),
            Axis::Vertical => Rect::new(self.left, start, self.width, extent),
        }
    }

    /// Check if this rectangle shares any area with another
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.left < other.right()
            && self.right() > other.left
            && self.top < other.bottom()
            && self.bottom() > other.top
    }

    /// Check if `other` lies entirely inside this rectangle
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.left >= self.left
            && other.top >= self.top
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Smallest rectangle containing both
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.left.min(other.left);
        let top = self.top.min(other.top);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(left, top, right - left, bottom - top)
    }

    /// Shrink every side by `amount`
    pub fn inset(&self, amount: i32) -> Rect {
        Rect::new(
            self.left + amount,
            self.top + amount,
            self.width - 2 * amount,
            self.height - 2 * amount,
        )
    }

    /// Split at the absolute coordinate `at` along `axis`, clamped to the
    /// rectangle. Returns the low and high parts; either may be empty.
    pub fn split(&self, axis: Axis, at: i32) -> (Rect, Rect) {
        let at = at.clamp(self.start(axis), self.end(axis).max(self.start(axis)));
        let low = self.with_span(axis, self.start(axis), at - self.start(axis));
        let high = self.with_span(axis, at, self.end(axis) - at);
        (low, high)
    }

    /// Take a strip `depth` deep off `edge`. Returns the strip and the rest.
    pub fn take_edge(&self, edge: Edge, depth: i32) -> (Rect, Rect) {
        let axis = edge.axis();
        if edge.is_low() {
            self.split(axis, self.start(axis) + depth)
        } else {
            let (rest, strip) = self.split(axis, self.end(axis) - depth);
            (strip, rest)
        }
    }

    /// Cut into three along `axis`: before `at`, the `extent` long middle, and after it
    pub fn cut3(&self, axis: Axis, at: i32, extent: i32) -> (Rect, Rect, Rect) {
        let (before, rest) = self.split(axis, at);
        let (middle, after) = rest.split(axis, at + extent);
        (before, middle, after)
    }

    /// The parts of this rectangle not covered by `other`, as at most four
    /// disjoint rectangles: full-width bands above and below, then the left
    /// and right remainders of the middle band.
    pub fn subtract(&self, other: &Rect) -> Vec<Rect> {
        if !self.intersects(other) {
            return if self.is_empty() { Vec::new() } else { vec![*self] };
        }
        let top = other.top.max(self.top);
        let bottom = other.bottom().min(self.bottom());
        let left = other.left.max(self.left);
        let right = other.right().min(self.right());
        [
            Rect::new(self.left, self.top, self.width, top - self.top),
            Rect::new(self.left, bottom, self.width, self.bottom() - bottom),
            Rect::new(self.left, top, left - self.left, bottom - top),
            Rect::new(right, top, self.right() - right, bottom - top),
        ]
        .into_iter()
        .filter(|r| !r.is_empty())
        .collect()
    }

    /// Split in two along the longer side, leaving `gap` between the halves
    pub fn split_pair(&self, gap: i32) -> (Rect, Rect) {
        if self.width > self.height {
            let half = (self.width - gap) / 2;
            (
                Rect::new(self.left, self.top, half, self.height),
                Rect::new(self.left + half + gap, self.top, half, self.height),
            )
        } else {
            let half = (self.height - gap) / 2;
            (
                Rect::new(self.left, self.top, self.width, half),
                Rect::new(self.left, self.top + half + gap, self.width, half),
            )
        }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.left, self.top)
    }
}

/// How close two aspect ratios are, as `sqrt(min/max)`: 1.0 for equal
/// ratios, approaching 0 as they diverge. Degenerate input scores 0.
pub fn aspect_efficiency(a: f64, b: f64) -> f64 {
    let usable = |v: f64| v > 0.0 && v.is_finite();
    if !usable(a) || !usable(b) {
        return 0.0;
    }
    (a.min(b) / a.max(b)).sqrt()
}
