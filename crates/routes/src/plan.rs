use serde::{Deserialize, Serialize};

use crate::interpolate::{Bend, DEFAULT_CURVATURE, LegStrategy, ScreenDirection};

/// Points per interpolated leg.
pub const DEFAULT_LEG_STEPS: usize = 90;

/// Upper bound on points per leg accepted from configuration.
pub const MAX_LEG_STEPS: usize = 10_000;

/// Hand-authored route: the first and last stop are the home office.
pub const DEFAULT_WAYPOINTS: [&str; 9] = [
    "Kathmandu",
    "Dubai",
    "London",
    "New York",
    "San Francisco",
    "Tokyo",
    "Singapore",
    "Sydney",
    "Kathmandu",
];

/// Strategy override for one consecutive `(from, to)` pair of the route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegOverride {
    pub from: String,
    pub to: String,
    pub strategy: LegStrategy,
}

/// Ordered waypoint names plus per-leg interpolation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutePlan {
    pub waypoints: Vec<String>,
    pub overrides: Vec<LegOverride>,
    pub steps: usize,
    pub curvature: f64,
}

impl Default for RoutePlan {
    fn default() -> Self {
        Self {
            waypoints: DEFAULT_WAYPOINTS.iter().map(|s| s.to_string()).collect(),
            // The way home from Sydney bends north on screen.
            overrides: vec![LegOverride {
                from: "Sydney".to_string(),
                to: "Kathmandu".to_string(),
                strategy: LegStrategy::ScreenArc {
                    direction: Some(ScreenDirection::Left),
                    bend: Bend::Up,
                },
            }],
            steps: DEFAULT_LEG_STEPS,
            curvature: DEFAULT_CURVATURE,
        }
    }
}

impl RoutePlan {
    pub fn new(waypoints: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            waypoints: waypoints.into_iter().map(Into::into).collect(),
            overrides: Vec::new(),
            ..Self::default()
        }
    }

    pub fn with_override(mut self, from: &str, to: &str, strategy: LegStrategy) -> Self {
        self.overrides.push(LegOverride {
            from: from.to_string(),
            to: to.to_string(),
            strategy,
        });
        self
    }

    pub fn leg_count(&self) -> usize {
        self.waypoints.len().saturating_sub(1)
    }

    /// Strategy for the leg `from -> to`; the first matching override wins.
    pub fn strategy_for(&self, from: &str, to: &str) -> LegStrategy {
        self.overrides
            .iter()
            .find(|o| o.from == from && o.to == to)
            .map(|o| o.strategy)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_LEG_STEPS, RoutePlan};
    use crate::interpolate::{Bend, LegStrategy, ScreenDirection};

    #[test]
    fn default_plan_has_one_override() {
        let plan = RoutePlan::default();
        assert_eq!(plan.waypoints.len(), 9);
        assert_eq!(plan.leg_count(), 8);
        assert_eq!(plan.steps, DEFAULT_LEG_STEPS);

        let overridden: Vec<_> = plan
            .waypoints
            .windows(2)
            .filter(|w| plan.strategy_for(&w[0], &w[1]) != LegStrategy::SoftGreatCircle)
            .collect();
        assert_eq!(overridden.len(), 1);
        assert_eq!(overridden[0], ["Sydney".to_string(), "Kathmandu".to_string()]);
    }

    #[test]
    fn overrides_are_directional() {
        let plan = RoutePlan::default();
        assert_eq!(
            plan.strategy_for("Sydney", "Kathmandu"),
            LegStrategy::ScreenArc {
                direction: Some(ScreenDirection::Left),
                bend: Bend::Up
            }
        );
        assert_eq!(
            plan.strategy_for("Kathmandu", "Sydney"),
            LegStrategy::SoftGreatCircle
        );
    }

    #[test]
    fn partial_json_fills_defaults() {
        let plan: RoutePlan =
            serde_json::from_str(r#"{"waypoints":["A","B"],"overrides":[]}"#).expect("parse plan");
        assert_eq!(plan.leg_count(), 1);
        assert_eq!(plan.steps, DEFAULT_LEG_STEPS);
        assert!(plan.overrides.is_empty());
    }
}
