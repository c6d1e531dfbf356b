//! Longwave and shortwave flux from the surfaces seen at the intercepts.

use serde::Serialize;
use tracing::warn;

use crate::Point;
use crate::sim::field::ScalarOrField;

use super::config::ComfortConfig;

/// Flux received from building surfaces, already weighted by `1 / N_dir`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RadiationTotals {
    /// Emitted longwave flux [W/m²].
    pub longwave_from_surfaces: f64,
    /// Reflected shortwave flux [W/m²].
    pub shortwave_from_surfaces: f64,
    /// Intercepts that contributed.
    pub used_intercepts: usize,
    /// Intercepts without surface temperature data (to be counted as sky).
    pub missing_intercepts: usize,
}

/// Values of `field` at each intercept, `NaN` where the field has no data.
pub fn lookup(intercepts: &[Point], field: &ScalarOrField, radius: f64) -> Vec<f64> {
    field.values_at(intercepts, radius)
}

/// Sums per-intercept flux from value lists of equal length.
///
/// `longwave = Σ ε·σ·T⁴ / n_directions`, `shortwave = Σ reflect / n_directions`,
/// with `T` in Kelvin.
pub fn flux_from_values(
    temperatures: &[f64],
    reflected: &[f64],
    emissivities: &[f64],
    n_directions: usize,
    sigma: f64,
) -> (f64, f64) {
    let n = n_directions as f64;
    let longwave = temperatures
        .iter()
        .zip(emissivities)
        .map(|(t, e)| e * sigma * t.powi(4) / n)
        .sum();
    let shortwave = reflected.iter().map(|r| r / n).sum();
    (longwave, shortwave)
}

/// Looks up surface properties at intercepts and sums their flux.
#[derive(Debug, Clone)]
pub struct SurfaceRadiationAggregator {
    n_directions: usize,
    sigma: f64,
    lookup_radius: f64,
}

impl SurfaceRadiationAggregator {
    pub fn new(config: &ComfortConfig) -> Self {
        Self {
            n_directions: config.n_directions,
            sigma: config.sigma,
            lookup_radius: config.lookup_radius,
        }
    }

    /// Aggregates surface flux over `intercepts`.
    ///
    /// - `temperature`: surface temperature [K]
    /// - `reflect`: reflected shortwave leaving the surface [W/m²]
    /// - `emissivity`: surface longwave emissivity
    ///
    /// Intercepts whose temperature lookup is `NaN` are dropped together
    /// with their reflectance and emissivity and reported in
    /// `missing_intercepts`. `NaN` in the other two properties is not
    /// filtered and propagates into the totals.
    pub fn aggregate(
        &self,
        intercepts: &[Point],
        temperature: &ScalarOrField,
        reflect: &ScalarOrField,
        emissivity: &ScalarOrField,
    ) -> RadiationTotals {
        let temps = lookup(intercepts, temperature, self.lookup_radius);
        let reflects = lookup(intercepts, reflect, self.lookup_radius);
        let emissivities = lookup(intercepts, emissivity, self.lookup_radius);

        let keep: Vec<usize> = (0..temps.len()).filter(|&i| !temps[i].is_nan()).collect();
        let missing = temps.len() - keep.len();
        if missing > 0 {
            warn!(
                missing,
                total = temps.len(),
                "intercepts have no surface temperature, treated as sky"
            );
        }

        let pick = |values: &[f64]| -> Vec<f64> { keep.iter().map(|&i| values[i]).collect() };
        let (longwave, shortwave) = flux_from_values(
            &pick(&temps),
            &pick(&reflects),
            &pick(&emissivities),
            self.n_directions,
            self.sigma,
        );

        RadiationTotals {
            longwave_from_surfaces: longwave,
            shortwave_from_surfaces: shortwave,
            used_intercepts: keep.len(),
            missing_intercepts: missing,
        }
    }
}
