//! Ordered trail difficulty grades.
//!
//! Grades are ordered from [`Difficulty::Easy`] to
//! [`Difficulty::Scrambling`]; comparisons such as `difficulty >= Hard` are
//! meaningful.
//!
//! # Examples
//! ```
//! use waymark_core::Difficulty;
//!
//! assert!(Difficulty::Alpine > Difficulty::Hard);
//! assert_eq!(Difficulty::from_hint("Rock_Climbing"), Difficulty::Scrambling);
//! assert_eq!(Difficulty::infer_from_metrics(1600, 12.0), Difficulty::Medium);
//! ```

/// Difficulty grade of a trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum Difficulty {
    /// Gentle walking on clear paths.
    Easy,
    /// Sustained climbs on good paths.
    #[default]
    Medium,
    /// Steep or long routes with some exposure.
    Hard,
    /// High mountain terrain requiring experience.
    Alpine,
    /// Hands-on terrain and rock steps.
    Scrambling,
}

impl Difficulty {
    /// Every grade in ascending order.
    pub const ALL: [Self; 5] = [
        Self::Easy,
        Self::Medium,
        Self::Hard,
        Self::Alpine,
        Self::Scrambling,
    ];

    /// Zero-based position in the ordering.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Easy => 0,
            Self::Medium => 1,
            Self::Hard => 2,
            Self::Alpine => 3,
            Self::Scrambling => 4,
        }
    }

    /// Characteristic maximum slope for the grade, in percent.
    #[must_use]
    pub const fn slope_threshold(self) -> f64 {
        match self {
            Self::Easy => 10.0,
            Self::Medium => 20.0,
            Self::Hard => 30.0,
            Self::Alpine => 40.0,
            Self::Scrambling => 50.0,
        }
    }

    /// Characteristic elevation gain for the grade, in metres.
    #[must_use]
    pub const fn gain_threshold(self) -> u32 {
        match self {
            Self::Easy => 500,
            Self::Medium => 1500,
            Self::Hard => 2500,
            Self::Alpine => 3000,
            Self::Scrambling => 3500,
        }
    }

    /// Whether a trail with the given gain and slope stays within this grade.
    #[must_use]
    pub fn matches(self, elevation_gain: u32, max_slope: f64) -> bool {
        elevation_gain <= self.gain_threshold() && max_slope <= self.slope_threshold()
    }

    /// Short human-readable description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Easy => "Easy walking on well-marked paths",
            Self::Medium => "Moderate hiking with sustained climbs",
            Self::Hard => "Demanding hiking on steep terrain",
            Self::Alpine => "Alpine terrain for experienced hikers",
            Self::Scrambling => "Scrambling with hands-on rock sections",
        }
    }

    /// Lowercase identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Alpine => "alpine",
            Self::Scrambling => "scrambling",
        }
    }

    /// Map a mapper-supplied hint to a grade.
    ///
    /// Matching is case-insensitive. Unrecognised hints map to
    /// [`Difficulty::Medium`].
    #[must_use]
    pub fn from_hint(hint: &str) -> Self {
        match hint.trim().to_lowercase().as_str() {
            "easy" | "simple" => Self::Easy,
            "difficult" | "hard" => Self::Hard,
            "very_difficult" | "alpine" => Self::Alpine,
            "scrambling" | "rock_climbing" => Self::Scrambling,
            _ => Self::Medium,
        }
    }

    /// Infer a grade from the steepest segment and total climb.
    ///
    /// Slope decides first; gain only applies when no slope threshold is
    /// exceeded. Both boundaries are exclusive.
    #[must_use]
    pub fn infer_from_metrics(elevation_gain: u32, max_slope: f64) -> Self {
        if max_slope > 50.0 {
            Self::Scrambling
        } else if max_slope > 40.0 {
            Self::Alpine
        } else if max_slope > 30.0 {
            Self::Hard
        } else if elevation_gain > 3000 {
            Self::Alpine
        } else if elevation_gain > 2500 {
            Self::Hard
        } else if elevation_gain > 1500 {
            Self::Medium
        } else {
            Self::Easy
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            "alpine" => Ok(Self::Alpine),
            "scrambling" => Ok(Self::Scrambling),
            _ => Err(format!("unknown difficulty '{s}'")),
        }
    }
}
