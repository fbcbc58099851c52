//! Hazard and terrain tagging.

use std::collections::BTreeSet;

use crate::Difficulty;
use crate::metrics::TrailMetrics;

/// Hazards added when a route name mentions a keyword.
///
/// Keywords are matched case-insensitively as substrings of the raw name.
///
/// # Examples
/// ```
/// use waymark_core::HazardRule;
///
/// let rule = HazardRule::new("Piatra Craiului", ["chamois_crossings"]);
/// assert!(rule.applies_to("Creasta Piatra Craiului"));
/// assert!(!rule.applies_to("Bucegi Plateau"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HazardRule {
    keyword: String,
    hazards: Vec<String>,
}

impl HazardRule {
    /// Create a rule attaching `hazards` to routes whose name contains
    /// `keyword`.
    #[must_use]
    pub fn new<I, H>(keyword: impl Into<String>, hazards: I) -> Self
    where
        I: IntoIterator<Item = H>,
        H: Into<String>,
    {
        Self {
            keyword: keyword.into().to_lowercase(),
            hazards: hazards.into_iter().map(Into::into).collect(),
        }
    }

    /// The regional rule for the Bucegi Mountains.
    #[must_use]
    pub fn bucegi() -> Self {
        Self::new("bucegi", ["bears", "limited_water_sources"])
    }

    /// Lowercased keyword.
    #[must_use]
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Hazards contributed by the rule.
    #[must_use]
    pub fn hazards(&self) -> &[String] {
        &self.hazards
    }

    /// Whether the rule matches a route name.
    #[must_use]
    pub fn applies_to(&self, name: &str) -> bool {
        name.to_lowercase().contains(&self.keyword)
    }
}

/// Default regional rule table.
#[must_use]
pub fn default_hazard_rules() -> Vec<HazardRule> {
    vec![HazardRule::bucegi()]
}

/// Terrain tags derived from elevation and slope.
pub(crate) fn terrain_tags(metrics: &TrailMetrics) -> BTreeSet<String> {
    let mut terrain = BTreeSet::new();
    if metrics.max_elevation > 2000 {
        terrain.insert("alpine_meadow".to_owned());
    }
    if metrics.max_slope > 30.0 {
        terrain.insert("scramble".to_owned());
    }
    if metrics.max_slope > 40.0 {
        terrain.insert("rock".to_owned());
    }
    if metrics.max_elevation < 1500 {
        terrain.insert("forest".to_owned());
    }
    if metrics.max_elevation > 2200 {
        terrain.insert("exposed_ridge".to_owned());
    }
    terrain
}

/// Hazard tags derived from difficulty, metrics and the regional rules.
pub(crate) fn hazard_tags(
    difficulty: Difficulty,
    metrics: &TrailMetrics,
    name: Option<&str>,
    rules: &[HazardRule],
) -> BTreeSet<String> {
    let mut hazards = BTreeSet::new();
    if difficulty >= Difficulty::Hard {
        hazards.insert("exposure".to_owned());
    }
    if metrics.max_slope > 25.0 {
        hazards.insert("steep_terrain".to_owned());
    }
    if metrics.max_elevation > 2300 {
        hazards.insert("high_altitude".to_owned());
    }
    if difficulty >= Difficulty::Alpine {
        hazards.insert("weather_dependent".to_owned());
    }
    if let Some(name) = name {
        for rule in rules.iter().filter(|rule| rule.applies_to(name)) {
            hazards.extend(rule.hazards.iter().cloned());
        }
    }
    hazards
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn metrics(max_elevation: i32, max_slope: f64) -> TrailMetrics {
        TrailMetrics {
            max_elevation,
            max_slope,
            ..TrailMetrics::default()
        }
    }

    fn tags(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| (*v).to_owned()).collect()
    }

    #[rstest]
    #[case(900, 5.0, &["forest"])]
    #[case(1500, 5.0, &[])]
    #[case(2100, 35.0, &["alpine_meadow", "scramble"])]
    #[case(2400, 45.0, &["alpine_meadow", "exposed_ridge", "rock", "scramble"])]
    fn tags_terrain(#[case] elevation: i32, #[case] slope: f64, #[case] expected: &[&str]) {
        assert_eq!(terrain_tags(&metrics(elevation, slope)), tags(expected));
    }

    #[rstest]
    #[case(Difficulty::Easy, 1000, 5.0, &[])]
    #[case(Difficulty::Hard, 1000, 26.0, &["exposure", "steep_terrain"])]
    #[case(
        Difficulty::Alpine,
        2400,
        5.0,
        &["exposure", "high_altitude", "weather_dependent"]
    )]
    #[case(Difficulty::Scrambling, 1000, 5.0, &["exposure", "weather_dependent"])]
    fn tags_hazards(
        #[case] difficulty: Difficulty,
        #[case] elevation: i32,
        #[case] slope: f64,
        #[case] expected: &[&str],
    ) {
        let hazards = hazard_tags(difficulty, &metrics(elevation, slope), None, &[]);
        assert_eq!(hazards, tags(expected));
    }

    #[rstest]
    #[case(Some("Traseu BUCEGI - Omu"), true)]
    #[case(Some("Piatra Mare"), false)]
    #[case(None, false)]
    fn applies_regional_rules(#[case] name: Option<&str>, #[case] expected: bool) {
        let hazards = hazard_tags(
            Difficulty::Easy,
            &metrics(1000, 0.0),
            name,
            &default_hazard_rules(),
        );
        assert_eq!(hazards.contains("bears"), expected);
        assert_eq!(hazards.contains("limited_water_sources"), expected);
    }
}
