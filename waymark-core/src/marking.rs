//! Painted trail markings.
//!
//! Mappers describe markings as `background:foreground[:...]` where the
//! background names a colour and the foreground a shape, for example
//! `red:stripe` or `blue:triangle`. Parsing never fails: unknown parts
//! fall back to [`MarkingColor::White`] and [`MarkingShape::None`].

/// Colour of a trail marking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum MarkingColor {
    /// Blue paint.
    Blue,
    /// Red paint.
    Red,
    /// Yellow paint.
    Yellow,
    /// Green paint.
    Green,
    /// White paint, also the fallback.
    #[default]
    White,
    /// Orange paint.
    Orange,
    /// Black paint.
    Black,
    /// Purple paint.
    Purple,
}

impl MarkingColor {
    /// Display colour as a `#RRGGBB` string.
    #[must_use]
    pub const fn hex(self) -> &'static str {
        match self {
            Self::Blue => "#0000FF",
            Self::Red => "#FF0000",
            Self::Yellow => "#FFFF00",
            Self::Green => "#00AA00",
            Self::White => "#FFFFFF",
            Self::Orange => "#FFA500",
            Self::Black => "#000000",
            Self::Purple => "#800080",
        }
    }

    /// Uppercase colour name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Blue => "BLUE",
            Self::Red => "RED",
            Self::Yellow => "YELLOW",
            Self::Green => "GREEN",
            Self::White => "WHITE",
            Self::Orange => "ORANGE",
            Self::Black => "BLACK",
            Self::Purple => "PURPLE",
        }
    }

    /// Parse a lowercase colour word, defaulting to white.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "blue" => Self::Blue,
            "red" => Self::Red,
            "yellow" => Self::Yellow,
            "green" => Self::Green,
            "orange" => Self::Orange,
            "black" => Self::Black,
            "purple" | "violet" => Self::Purple,
            _ => Self::White,
        }
    }
}

/// Shape painted on a marking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum MarkingShape {
    /// Horizontal stripe.
    Stripe,
    /// Triangle.
    Triangle,
    /// Cross.
    Cross,
    /// Filled dot.
    Dot,
    /// Rectangle.
    Rectangle,
    /// Arch.
    Arch,
    /// No recognisable shape.
    #[default]
    None,
}

impl MarkingShape {
    /// Uppercase shape name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stripe => "STRIPE",
            Self::Triangle => "TRIANGLE",
            Self::Cross => "CROSS",
            Self::Dot => "DOT",
            Self::Rectangle => "RECTANGLE",
            Self::Arch => "ARCH",
            Self::None => "NONE",
        }
    }

    /// Glyph used when rendering the marking as text.
    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Stripe => "\u{2501}",
            Self::Triangle => "\u{25b2}",
            Self::Cross => "\u{271a}",
            Self::Dot => "\u{25cf}",
            Self::Rectangle => "\u{25a0}",
            Self::Arch => "\u{2229}",
            Self::None => "",
        }
    }

    /// Parse a lowercase shape word, defaulting to [`MarkingShape::None`].
    ///
    /// Only the whole word is matched, so colour-prefixed foregrounds such
    /// as `red_stripe` have no shape.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "stripe" | "bar" => Self::Stripe,
            "triangle" | "pyramid" => Self::Triangle,
            "cross" | "plus" | "x" => Self::Cross,
            "dot" | "circle" | "point" => Self::Dot,
            "rectangle" | "square" | "box" => Self::Rectangle,
            "arch" | "arch_down" => Self::Arch,
            _ => Self::None,
        }
    }
}

/// A parsed trail marking.
///
/// # Examples
/// ```
/// use waymark_core::{MarkingColor, MarkingShape, TrailMarking};
///
/// let marking = TrailMarking::parse(Some("Blue:Triangle"));
/// assert_eq!(marking.color, MarkingColor::Blue);
/// assert_eq!(marking.shape, MarkingShape::Triangle);
/// assert_eq!(marking.hex_color(), "#0000FF");
/// assert_eq!(marking.description(), "BLUE TRIANGLE");
///
/// let unmarked = TrailMarking::parse(None);
/// assert_eq!(unmarked.symbol, "none:none");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrailMarking {
    /// Marking symbol as tagged, trimmed of surrounding whitespace.
    pub symbol: String,
    /// Background colour.
    pub color: MarkingColor,
    /// Foreground shape.
    pub shape: MarkingShape,
}

impl Default for TrailMarking {
    fn default() -> Self {
        Self::unmarked()
    }
}

impl TrailMarking {
    /// Symbol recorded when a route carries no marking.
    pub const UNMARKED_SYMBOL: &'static str = "none:none";

    /// Marking used when the route has no symbol.
    #[must_use]
    pub fn unmarked() -> Self {
        Self {
            symbol: Self::UNMARKED_SYMBOL.to_owned(),
            color: MarkingColor::White,
            shape: MarkingShape::None,
        }
    }

    /// Parse an optional raw symbol.
    #[must_use]
    pub fn parse(symbol: Option<&str>) -> Self {
        let Some(raw) = symbol.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::unmarked();
        };
        let mut parts = raw.split(':');
        let background = parts.next();
        let foreground = parts.next();
        match (background, foreground) {
            (Some(background), Some(foreground)) => Self {
                color: MarkingColor::parse(&background.to_lowercase()),
                shape: MarkingShape::parse(&foreground.to_lowercase()),
                symbol: raw.to_owned(),
            },
            _ => Self {
                symbol: raw.to_owned(),
                color: MarkingColor::White,
                shape: MarkingShape::None,
            },
        }
    }

    /// Display colour as a `#RRGGBB` string.
    #[must_use]
    pub const fn hex_color(&self) -> &'static str {
        self.color.hex()
    }

    /// Text description such as `RED STRIPE`.
    #[must_use]
    pub fn description(&self) -> String {
        format!("{} {}", self.color.as_str(), self.shape.as_str())
    }
}
