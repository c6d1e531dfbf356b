//! Stefan–Boltzmann combination of all radiation sources into MRT.

use serde::Serialize;

use crate::sim::solar::SolarParameters;

/// Longwave and shortwave flux reaching the pedestrian from each source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadiantFluxes {
    /// Full-hemisphere sky longwave, not yet scaled by the view factor [W/m²].
    pub sky_longwave: f64,
    /// Longwave emitted by visible surfaces [W/m²].
    pub surface_longwave: f64,
    /// Longwave from the implicit ground [W/m²].
    pub ground_longwave: f64,
    /// Shortwave reflected by visible surfaces [W/m²].
    pub surface_shortwave: f64,
}

/// MRT and the flux totals it was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MrtComponents {
    /// Mean radiant temperature [°C].
    pub mrt: f64,
    /// Total longwave flux [W/m²].
    pub longwave: f64,
    /// Total shortwave flux [W/m²].
    pub shortwave: f64,
}

/// Longwave from the implicit ground: `ε_g · σ · (GVF / 2) · T_g⁴`.
///
/// `ground_temperature` in Kelvin.
pub fn ground_longwave(
    ground_emissivity: f64,
    ground_view_factor: f64,
    ground_temperature: f64,
    sigma: f64,
) -> f64 {
    ground_emissivity * sigma * ground_view_factor / 2.0 * ground_temperature.powi(4)
}

/// Combines sky, surface, ground and solar flux into MRT.
///
/// Diffuse sky and sky longwave only come from the upper half of the
/// sphere and ground-reflected shortwave from the lower half, hence the
/// `/ 2` on each view factor term. The direct beam only counts when the
/// point is sunlit.
pub fn combine(
    fluxes: &RadiantFluxes,
    solar: &SolarParameters,
    sky_view_factor: f64,
    ground_view_factor: f64,
    pedestrian_albedo: f64,
    sunlit: bool,
    sigma: f64,
) -> MrtComponents {
    let beam = if sunlit { 1.0 } else { 0.0 };

    let shortwave = solar.diffuse_from_sky * sky_view_factor / 2.0
        + solar.diffuse_from_ground * ground_view_factor / 2.0
        + solar.direct_normal * solar.solar_view_factor * beam
        + fluxes.surface_shortwave;

    let longwave =
        fluxes.sky_longwave * sky_view_factor / 2.0 + fluxes.surface_longwave + fluxes.ground_longwave;

    let mrt_k = ((shortwave * (1.0 - pedestrian_albedo) + longwave) / sigma).powf(0.25);

    MrtComponents {
        mrt: mrt_k - 273.15,
        longwave,
        shortwave,
    }
}
