//! Numerical settings and physical constants shared by the MRT and SET models.

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

/// Stefan–Boltzmann constant [W/(m² K⁴)] as used by the comfort models.
pub const SIGMA: f64 = 5.67e-8;

/// Numerical settings and physical constants of the comfort models.
///
/// Values are fixed by convention but every component takes them from
/// here, so tests can override them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComfortConfig {
    // Radiation
    /// Number of sampled directions over the full sphere.
    pub n_directions: usize,
    /// Stefan–Boltzmann constant [W/(m² K⁴)].
    pub sigma: f64,
    /// Half-width of the box used to look up surface data at intercepts [m].
    pub lookup_radius: f64,
    /// Half-width of the box used to look up air temperature at a point [m].
    pub air_lookup_radius: f64,

    // SET
    /// Wind speed below which no wind correction is applied [m/s].
    pub reference_wind_speed: f64,
    /// Local atmospheric pressure [kPa].
    pub atmospheric_pressure: f64,
    /// Conversion from clo to m²K/W.
    pub clo_to_si: f64,
    /// Convergence threshold on the absolute SET residual [K].
    pub root_tolerance: f64,
    /// Maximum number of root finder iterations.
    pub max_iterations: usize,
    /// Starting point of the SET root find [°C].
    pub initial_guess: f64,
}

impl ComfortConfig {
    pub fn new() -> Self {
        Self {
            n_directions: 1000,
            sigma: SIGMA,
            lookup_radius: 1.0,
            air_lookup_radius: 1.0,
            reference_wind_speed: 0.08,
            atmospheric_pressure: 101.325,
            clo_to_si: 0.155,
            root_tolerance: 1e-9,
            max_iterations: 100,
            initial_guess: 0.0,
        }
    }

    /// Parses a JSON document. Missing keys keep their default values.
    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content).context("Invalid comfort config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.n_directions >= 2, "n_directions must be at least 2");
        ensure!(self.sigma > 0.0, "sigma must be positive");
        ensure!(self.lookup_radius >= 0.0, "lookup_radius must not be negative");
        ensure!(
            self.air_lookup_radius >= 0.0,
            "air_lookup_radius must not be negative"
        );
        ensure!(
            self.reference_wind_speed > 0.0,
            "reference_wind_speed must be positive"
        );
        ensure!(self.root_tolerance > 0.0, "root_tolerance must be positive");
        ensure!(self.max_iterations > 0, "max_iterations must be positive");
        Ok(())
    }
}

impl Default for ComfortConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ComfortConfig::default();
        assert_eq!(config.n_directions, 1000);
        assert_eq!(config.sigma, 5.67e-8);
        assert_eq!(config.reference_wind_speed, 0.08);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() -> Result<()> {
        let config = ComfortConfig::from_json(r#"{ "n_directions": 200, "lookup_radius": 0.5 }"#)?;
        assert_eq!(config.n_directions, 200);
        assert_eq!(config.lookup_radius, 0.5);
        assert_eq!(config.max_iterations, 100);
        Ok(())
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(ComfortConfig::from_json(r#"{ "n_directions": 1 }"#).is_err());
        assert!(ComfortConfig::from_json("not json").is_err());
    }
}
