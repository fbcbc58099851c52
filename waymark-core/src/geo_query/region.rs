//! Named regions for bulk ingestion.

use geo::Rect;

use super::bounding_box;
use crate::HazardRule;

/// A named bounding box, optionally with a regional hazard rule.
///
/// # Examples
/// ```
/// use waymark_core::Region;
///
/// let region = Region::by_name("Bucegi").expect("known region");
/// assert_eq!(region.name(), "bucegi");
/// assert_eq!(region.bbox().min().y, 45.20);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    name: String,
    bbox: Rect<f64>,
    hazard_rule: Option<HazardRule>,
}

impl Region {
    /// Create a region from its name and bounding box.
    #[must_use]
    pub fn new(name: impl Into<String>, bbox: Rect<f64>) -> Self {
        Self {
            name: name.into().to_lowercase(),
            bbox,
            hazard_rule: None,
        }
    }

    /// Attach a hazard rule applied to routes in the region.
    #[must_use]
    pub fn with_hazard_rule(mut self, rule: HazardRule) -> Self {
        self.hazard_rule = Some(rule);
        self
    }

    /// The Bucegi Mountains in the Southern Carpathians.
    #[must_use]
    pub fn bucegi() -> Self {
        Self::new("bucegi", bounding_box(45.20, 25.40, 45.50, 25.70))
            .with_hazard_rule(HazardRule::bucegi())
    }

    /// Every preset region.
    #[must_use]
    pub fn presets() -> Vec<Self> {
        vec![Self::bucegi()]
    }

    /// Look up a preset region by case-insensitive name.
    #[must_use]
    pub fn by_name(name: &str) -> Option<Self> {
        let wanted = name.trim().to_lowercase();
        Self::presets().into_iter().find(|region| region.name == wanted)
    }

    /// Lowercase region name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Region extent.
    #[must_use]
    pub const fn bbox(&self) -> &Rect<f64> {
        &self.bbox
    }

    /// Regional hazard rule, if any.
    #[must_use]
    pub const fn hazard_rule(&self) -> Option<&HazardRule> {
        self.hazard_rule.as_ref()
    }
}
