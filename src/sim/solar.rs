//! Sun position and the solar inputs of the mean radiant temperature model.

use serde::{Deserialize, Serialize};

use crate::Vector;

/// Solar position (azimuth and elevation angles).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolarPosition {
    /// Solar altitude angle in degrees (0 = horizon, 90 = zenith).
    pub altitude: f64,
    /// Solar azimuth angle in degrees from north, clockwise (0=N, 90=E, 180=S, 270=W).
    pub azimuth: f64,
}

impl SolarPosition {
    /// Calculates the solar position using the Spencer algorithm.
    ///
    /// - `latitude`: in degrees (positive north)
    /// - `day_of_year`: 1-365
    /// - `hour`: solar time in hours (0-24)
    pub fn calculate(latitude: f64, day_of_year: u16, hour: f64) -> Self {
        let lat = latitude.to_radians();

        // Day angle
        let gamma = 2.0 * std::f64::consts::PI * (day_of_year as f64 - 1.0) / 365.0;

        let declination = 0.006918 - 0.399912 * gamma.cos() + 0.070257 * gamma.sin()
            - 0.006758 * (2.0 * gamma).cos()
            + 0.000907 * (2.0 * gamma).sin()
            - 0.002697 * (3.0 * gamma).cos()
            + 0.00148 * (3.0 * gamma).sin();

        // 15 degrees per hour from solar noon
        let hour_angle = (hour - 12.0) * 15.0_f64.to_radians();

        let sin_alt =
            lat.sin() * declination.sin() + lat.cos() * declination.cos() * hour_angle.cos();
        let altitude = sin_alt.clamp(-1.0, 1.0).asin().to_degrees();

        let cos_azimuth = (declination.sin() * lat.cos()
            - declination.cos() * lat.sin() * hour_angle.cos())
            / altitude.to_radians().cos().max(1e-10);

        let mut azimuth = cos_azimuth.clamp(-1.0, 1.0).acos().to_degrees();
        if hour_angle > 0.0 {
            azimuth = 360.0 - azimuth;
        }

        Self { altitude, azimuth }
    }

    /// Returns true if the sun is above the horizon.
    pub fn is_above_horizon(&self) -> bool {
        self.altitude > 0.0
    }

    /// Unit vector pointing from the scene toward the sun.
    ///
    /// North = +Y, East = +X, up = +Z.
    pub fn to_direction(&self) -> Vector {
        let alt = self.altitude.to_radians();
        let azi = self.azimuth.to_radians();
        Vector::new(alt.cos() * azi.sin(), alt.cos() * azi.cos(), alt.sin())
    }
}

/// Fraction of a standing person's effective radiating area exposed to
/// the direct beam.
///
/// Huang et al. (formula 9), largely independent of gender and body size.
/// A sitting person is closer to 0.25.
pub fn solar_view_factor(altitude_deg: f64, azimuth_deg: f64) -> f64 {
    let alt = altitude_deg.to_radians();
    let azi = azimuth_deg.to_radians();
    (0.0355 * alt.sin()
        + 2.33 * alt.cos() * (0.0213 * azi.cos().powi(2) + 0.00919 * azi.sin().powi(2)).sqrt())
    .abs()
}

/// Solar inputs for one timestamp and location, shared by all pedestrian
/// points of that instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolarParameters {
    /// Unit vector toward the sun.
    pub solar_vector: Vector,
    /// Projected area factor of a standing person (see [`solar_view_factor`]).
    pub solar_view_factor: f64,
    /// Direct normal irradiance [W/m²].
    pub direct_normal: f64,
    /// Diffuse sky irradiance on a vertical plane [W/m²].
    pub diffuse_from_sky: f64,
    /// Ground-reflected irradiance on a vertical plane [W/m²].
    pub diffuse_from_ground: f64,
}

impl SolarParameters {
    /// Builds the solar inputs from the sun position and horizontal irradiance.
    ///
    /// - `dni`: direct normal irradiance [W/m²]
    /// - `dhi`: diffuse horizontal irradiance [W/m²]
    /// - `ghi`: global horizontal irradiance [W/m²]
    /// - `ground_albedo`: reflectance of the ground (asphalt ~0.18)
    ///
    /// Diffuse components are projected onto a vertical surface with the
    /// isotropic sky model. Below the horizon the direct beam is zeroed.
    pub fn from_irradiance(
        position: &SolarPosition,
        dni: f64,
        dhi: f64,
        ghi: f64,
        ground_albedo: f64,
    ) -> Self {
        let tilt = std::f64::consts::FRAC_PI_2;
        let direct_normal = if position.is_above_horizon() { dni } else { 0.0 };
        Self {
            solar_vector: position.to_direction(),
            solar_view_factor: solar_view_factor(position.altitude, position.azimuth),
            direct_normal,
            diffuse_from_sky: dhi * (1.0 + tilt.cos()) / 2.0,
            diffuse_from_ground: ghi * ground_albedo * (1.0 - tilt.cos()) / 2.0,
        }
    }
}
