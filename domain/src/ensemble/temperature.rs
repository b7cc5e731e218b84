//! Temperature diversification
//!
//! Each invocation in a run gets its own sampling temperature so the
//! ensemble explores more of the answer space than N identical calls
//! would. Three distributions are supported; all of them keep every value
//! inside the configured range.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Inclusive `[min, max]` temperature bound, serialized as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRange(pub f64, pub f64);

impl TemperatureRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self(min, max)
    }

    pub fn min(&self) -> f64 {
        self.0
    }

    pub fn max(&self) -> f64 {
        self.1
    }

    pub fn span(&self) -> f64 {
        self.1 - self.0
    }

    pub fn midpoint(&self) -> f64 {
        (self.0 + self.1) / 2.0
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.0 && value <= self.1
    }

    /// A range is usable when both bounds are finite and min <= max
    pub fn is_valid(&self) -> bool {
        self.0.is_finite() && self.1.is_finite() && self.0 <= self.1
    }
}

impl Default for TemperatureRange {
    fn default() -> Self {
        Self(0.3, 1.0)
    }
}

/// How diversified temperatures are drawn from the range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureDistribution {
    /// Evenly spaced values spanning the range, endpoints included
    #[default]
    Uniform,
    /// Gaussian around the midpoint (sigma = span / 6), clamped into the range
    Normal,
    /// Independent uniform draws within the range
    Random,
}

impl TemperatureDistribution {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureDistribution::Uniform => "uniform",
            TemperatureDistribution::Normal => "normal",
            TemperatureDistribution::Random => "random",
        }
    }
}

impl std::fmt::Display for TemperatureDistribution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TemperatureDistribution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "uniform" => Ok(TemperatureDistribution::Uniform),
            "normal" => Ok(TemperatureDistribution::Normal),
            "random" => Ok(TemperatureDistribution::Random),
            other => Err(format!(
                "unknown temperature distribution '{other}' (expected uniform, normal, or random)"
            )),
        }
    }
}

/// Per-run temperature plan: one value per agent invocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TemperatureSchedule {
    /// Diversification disabled: every invocation uses the base temperature
    Fixed(f64),
    /// Diversification enabled: values drawn from `range` per `distribution`
    Diversified {
        range: TemperatureRange,
        distribution: TemperatureDistribution,
    },
}

impl TemperatureSchedule {
    /// Produce exactly `num_agents` temperatures, each within bounds.
    ///
    /// Pure apart from the random draws; no failure modes.
    pub fn sample(&self, num_agents: usize) -> Vec<f64> {
        match *self {
            TemperatureSchedule::Fixed(base) => vec![base; num_agents],
            TemperatureSchedule::Diversified {
                range,
                distribution,
            } => match distribution {
                TemperatureDistribution::Uniform => linspace(range, num_agents),
                TemperatureDistribution::Normal => normal_clamped(range, num_agents),
                TemperatureDistribution::Random => uniform_draws(range, num_agents),
            },
        }
    }
}

/// Evenly spaced values; first = min and last = max when num_agents >= 2
fn linspace(range: TemperatureRange, num_agents: usize) -> Vec<f64> {
    match num_agents {
        0 => Vec::new(),
        1 => vec![range.min()],
        n => {
            let denom = (n - 1) as f64;
            (0..n)
                .map(|i| range.min() + range.span() * (i as f64 / denom))
                .collect()
        }
    }
}

/// Gaussian around the midpoint, clamped into the range. Clamping (not
/// resampling) means values pile up at the boundaries for wide draws,
/// which is acceptable here.
fn normal_clamped(range: TemperatureRange, num_agents: usize) -> Vec<f64> {
    let sigma = range.span() / 6.0;
    let normal =
        Normal::new(range.midpoint(), sigma).expect("span is non-negative for a valid range");
    let mut rng = rand::rng();

    (0..num_agents)
        .map(|_| normal.sample(&mut rng).clamp(range.min(), range.max()))
        .collect()
}

fn uniform_draws(range: TemperatureRange, num_agents: usize) -> Vec<f64> {
    let mut rng = rand::rng();
    (0..num_agents)
        .map(|_| rng.random_range(range.min()..=range.max()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RANGE: TemperatureRange = TemperatureRange(0.2, 1.0);

    #[test]
    fn test_fixed_schedule_repeats_base() {
        let temps = TemperatureSchedule::Fixed(0.7).sample(5);
        assert_eq!(temps, vec![0.7; 5]);
    }

    #[test]
    fn test_uniform_spans_endpoints() {
        let schedule = TemperatureSchedule::Diversified {
            range: RANGE,
            distribution: TemperatureDistribution::Uniform,
        };
        let temps = schedule.sample(5);

        assert_eq!(temps.len(), 5);
        assert!((temps[0] - 0.2).abs() < 1e-9);
        assert!((temps[4] - 1.0).abs() < 1e-9);
        // Monotonically increasing
        assert!(temps.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_uniform_single_agent_uses_min() {
        let schedule = TemperatureSchedule::Diversified {
            range: RANGE,
            distribution: TemperatureDistribution::Uniform,
        };
        assert_eq!(schedule.sample(1), vec![0.2]);
    }

    #[test]
    fn test_normal_never_leaves_range() {
        let schedule = TemperatureSchedule::Diversified {
            range: RANGE,
            distribution: TemperatureDistribution::Normal,
        };
        for temp in schedule.sample(500) {
            assert!(RANGE.contains(temp), "temperature {temp} out of range");
        }
    }

    #[test]
    fn test_random_stays_within_range() {
        let schedule = TemperatureSchedule::Diversified {
            range: RANGE,
            distribution: TemperatureDistribution::Random,
        };
        let temps = schedule.sample(200);
        assert_eq!(temps.len(), 200);
        assert!(temps.iter().all(|t| RANGE.contains(*t)));
    }

    #[test]
    fn test_degenerate_range_collapses_to_constant() {
        let flat = TemperatureRange(0.5, 0.5);
        for distribution in [
            TemperatureDistribution::Uniform,
            TemperatureDistribution::Normal,
            TemperatureDistribution::Random,
        ] {
            let schedule = TemperatureSchedule::Diversified {
                range: flat,
                distribution,
            };
            assert!(schedule.sample(10).iter().all(|t| *t == 0.5));
        }
    }

    #[test]
    fn test_distribution_parsing() {
        assert_eq!(
            "uniform".parse::<TemperatureDistribution>().unwrap(),
            TemperatureDistribution::Uniform
        );
        assert_eq!(
            "NORMAL".parse::<TemperatureDistribution>().unwrap(),
            TemperatureDistribution::Normal
        );
        assert!("gaussian".parse::<TemperatureDistribution>().is_err());
    }

    #[test]
    fn test_range_validity() {
        assert!(TemperatureRange(0.0, 1.0).is_valid());
        assert!(TemperatureRange(0.5, 0.5).is_valid());
        assert!(!TemperatureRange(1.0, 0.5).is_valid());
        assert!(!TemperatureRange(f64::NAN, 1.0).is_valid());
    }
}
