//! Placement requests and results

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{Rect, Size};

/// Preferred position of a placed box relative to the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Right,
    Top,
    Bottom,
    /// Toward the middle of the board
    #[default]
    Center,
    /// Away from the board, toward the window edge
    Edge,
}

/// Where along one axis an alignment puts a box inside a span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Pin {
    Low,
    High,
    Middle,
    NearCenter,
}

impl Alignment {
    /// Left and top pin low, right and bottom pin high, whatever the axis
    pub(crate) fn pin(self) -> Pin {
        match self {
            Alignment::Left | Alignment::Top => Pin::Low,
            Alignment::Right | Alignment::Bottom => Pin::High,
            Alignment::Center => Pin::Middle,
            Alignment::Edge => Pin::NearCenter,
        }
    }
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Alignment::Left => "left",
            Alignment::Right => "right",
            Alignment::Top => "top",
            Alignment::Bottom => "bottom",
            Alignment::Center => "center",
            Alignment::Edge => "edge",
        };
        write!(f, "{}", name)
    }
}

/// Errors from parsing textual placement requests
#[derive(Debug, Error, PartialEq)]
pub enum RequestParseError {
    #[error("unknown alignment '{0}'")]
    Alignment(String),

    #[error("invalid size '{0}', expected WxH or WxH-WxH")]
    Size(String),
}

impl FromStr for Alignment {
    type Err = RequestParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Alignment::Left),
            "right" => Ok(Alignment::Right),
            "top" => Ok(Alignment::Top),
            "bottom" => Ok(Alignment::Bottom),
            "center" | "centre" => Ok(Alignment::Center),
            "edge" => Ok(Alignment::Edge),
            other => Err(RequestParseError::Alignment(other.to_string())),
        }
    }
}

/// Acceptable size range for one orientation of a box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    pub min: Size,
    pub max: Size,
}

impl Shape {
    pub fn new(min_width: i32, min_height: i32, max_width: i32, max_height: i32) -> Self {
        Self {
            min: Size::new(min_width, min_height),
            max: Size::new(max_width.max(min_width), max_height.max(min_height)),
        }
    }

    /// A shape that accepts exactly one size
    pub fn exact(width: i32, height: i32) -> Self {
        Self::new(width, height, width, height)
    }

    /// Both minimum dimensions are positive
    pub fn is_valid(&self) -> bool {
        self.min.width > 0 && self.min.height > 0
    }

    /// Grow minimum and maximum by `amount` on both axes
    pub fn grown(&self, amount: i32) -> Self {
        Self {
            min: self.min.grown(amount),
            max: self.max.grown(amount),
        }
    }

    /// Clamp the maximum down to the minimum
    pub fn pinned(&self) -> Self {
        Self {
            min: self.min,
            max: self.min,
        }
    }
}

impl FromStr for Shape {
    type Err = RequestParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let size = |text: &str| -> Result<Size, RequestParseError> {
            let (w, h) = text
                .split_once(['x', 'X'])
                .ok_or_else(|| RequestParseError::Size(s.to_string()))?;
            let parse = |v: &str| {
                v.trim()
                    .parse::<i32>()
                    .map_err(|_| RequestParseError::Size(s.to_string()))
            };
            Ok(Size::new(parse(w)?, parse(h)?))
        };
        match s.split_once('-') {
            Some((min, max)) => {
                let (min, max) = (size(min)?, size(max)?);
                Ok(Shape::new(min.width, min.height, max.width, max.height))
            }
            None => {
                let exact = size(s)?;
                Ok(Shape::exact(exact.width, exact.height))
            }
        }
    }
}

/// A request for one box, with an optional rotated or reshaped alternative
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementRequest {
    pub primary: Shape,
    pub alternate: Option<Shape>,
    pub align: Alignment,
    /// Grow proportionally from the minimum size instead of independently per axis
    pub preserve_aspect: bool,
    /// Overrides the allocator's preferred main-rectangle aspect for this request
    pub preferred_aspect: Option<f64>,
}

impl PlacementRequest {
    pub fn new(primary: Shape) -> Self {
        Self {
            primary,
            alternate: None,
            align: Alignment::default(),
            preserve_aspect: false,
            preferred_aspect: None,
        }
    }

    pub fn with_alternate(mut self, alternate: Shape) -> Self {
        self.alternate = Some(alternate);
        self
    }

    pub fn with_align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    pub fn with_preserve_aspect(mut self, preserve: bool) -> Self {
        self.preserve_aspect = preserve;
        self
    }

    pub fn with_preferred_aspect(mut self, aspect: f64) -> Self {
        self.preferred_aspect = Some(aspect);
        self
    }

    /// The shapes to try, in order, tagged with whether they are the alternate.
    /// An alternate with a non-positive minimum is ignored.
    pub(crate) fn shapes(&self) -> impl Iterator<Item = (bool, Shape)> + '_ {
        std::iter::once((false, self.primary)).chain(
            self.alternate
                .filter(Shape::is_valid)
                .map(|alternate| (true, alternate)),
        )
    }
}

/// Parses `SHAPE[/SHAPE][@ALIGN]`, for example `200x100-300x150/100x200@edge`
impl FromStr for PlacementRequest {
    type Err = RequestParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (shapes, align) = match s.split_once('@') {
            Some((shapes, align)) => (shapes, align.parse()?),
            None => (s, Alignment::default()),
        };
        let request = match shapes.split_once('/') {
            Some((primary, alternate)) => {
                PlacementRequest::new(primary.parse()?).with_alternate(alternate.parse()?)
            }
            None => PlacementRequest::new(shapes.parse()?),
        };
        Ok(request.with_align(align))
    }
}

/// A successful placement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placement {
    /// The usable box, inside the margin
    pub rect: Rect,
    /// Everything taken from the free space, margin included
    pub footprint: Rect,
    /// The alternate shape was used
    pub alternate: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_exact_shape() {
        let shape: Shape = "200x100".parse().unwrap();
        assert_eq!(shape, Shape::exact(200, 100));
    }

    #[test]
    fn test_parse_range_shape() {
        let shape: Shape = "200x100-300x150".parse().unwrap();
        assert_eq!(shape, Shape::new(200, 100, 300, 150));
    }

    #[test]
    fn test_parse_full_request() {
        let request: PlacementRequest = "200x100-300x150/100x200@edge".parse().unwrap();
        assert_eq!(
            request,
            PlacementRequest::new(Shape::new(200, 100, 300, 150))
                .with_alternate(Shape::exact(100, 200))
                .with_align(Alignment::Edge)
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "200by100".parse::<Shape>(),
            Err(RequestParseError::Size("200by100".to_string()))
        );
        assert_eq!(
            "10x10@middle".parse::<PlacementRequest>(),
            Err(RequestParseError::Alignment("middle".to_string()))
        );
    }

    #[test]
    fn test_max_never_below_min() {
        let shape = Shape::new(50, 50, 10, 80);
        assert_eq!(shape.max, Size::new(50, 80));
    }

    #[test]
    fn test_invalid_alternate_is_skipped() {
        let request = PlacementRequest::new(Shape::exact(10, 10)).with_alternate(Shape::exact(0, 10));
        assert_eq!(request.shapes().count(), 1);
    }
}
