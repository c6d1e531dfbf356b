//! Per-scenario inputs of the comfort models.
//!
//! Derived fields are `Option`s that start out empty and are filled in by
//! the stage that owns them (see the field docs), so a record can be
//! inspected after a run to see what each stage produced.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::Point;
use crate::sim::field::ScalarOrField;

/// Model constants of one scenario.
#[derive(Debug, Clone)]
pub struct ModelInputs {
    /// Relative humidity [%].
    pub relative_humidity: f64,
    /// Longwave emissivity of building surfaces.
    pub wall_emissivity: ScalarOrField,
    /// Longwave emissivity of the (implicit) ground.
    pub ground_emissivity: f64,
    /// Uniform ground surface temperature [K].
    pub ground_temperature: f64,
}

impl Default for ModelInputs {
    fn default() -> Self {
        Self {
            relative_humidity: 50.0,
            wall_emissivity: ScalarOrField::Scalar(0.9),
            ground_emissivity: 0.95,
            ground_temperature: 293.15,
        }
    }
}

/// Body and clothing parameters of a pedestrian.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PedestrianProperties {
    /// Body mass [kg].
    pub mass: f64,
    /// Body height [m].
    pub height: f64,
    /// Metabolic rate [met].
    pub metabolic_rate: f64,
    /// External mechanical work [W/m²].
    pub external_work: f64,
    /// Clothing insulation [clo].
    pub clothing_insulation: f64,
    /// Ratio of clothed to nude body surface area.
    pub clothing_area_factor: f64,
    /// Vapour permeation efficiency of the clothing (Woodcock index).
    pub clothing_permeability: f64,
    /// Longwave emissivity of skin and clothing.
    pub body_emissivity: f64,
    /// Effective radiating area over body surface area.
    pub effective_radiation_area_ratio: f64,
    /// Shortwave albedo of the body.
    pub body_albedo: f64,

    /// Mean skin temperature [°C], written by SET step 1.
    pub skin_temperature: Option<f64>,
    /// Clothing surface temperature [°C], written by SET step 3.
    pub clothing_temperature: Option<f64>,
    /// Lewis ratio [K/kPa], written by SET step 5.
    pub lewis_ratio: Option<f64>,
}

impl PedestrianProperties {
    /// A typical standing adult walking slowly in light summer clothing.
    pub fn standing_adult() -> Self {
        Self {
            mass: 70.0,
            height: 1.75,
            metabolic_rate: 2.0,
            external_work: 0.0,
            clothing_insulation: 0.5,
            clothing_area_factor: 1.15,
            clothing_permeability: 0.45,
            body_emissivity: 0.95,
            effective_radiation_area_ratio: 0.725,
            body_albedo: 0.3,
            skin_temperature: None,
            clothing_temperature: None,
            lewis_ratio: None,
        }
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Invalid pedestrian properties")
    }
}

impl Default for PedestrianProperties {
    fn default() -> Self {
        Self::standing_adult()
    }
}

/// Microclimate at one pedestrian location and time instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MicroclimateRecord {
    /// Air temperature [°C].
    pub air_temperature: f64,
    /// Relative humidity [%].
    pub relative_humidity: f64,
    /// Wind speed [m/s].
    pub wind_speed: f64,
    /// Mean radiant temperature [°C].
    pub mean_radiant_temperature: f64,

    /// Ambient water vapour pressure [kPa], written by SET step 2.
    pub vapor_pressure: Option<f64>,
    /// Dew point [°C], written by SET step 2.
    pub dew_point: Option<f64>,
    /// Saturation pressure at the dew point [kPa], written by SET step 2.
    pub dew_point_pressure: Option<f64>,
    /// Standard operative temperature [°C], written by SET step 9.
    pub standard_operative_temperature: Option<f64>,
    /// Standard operative pressure [kPa], written by SET step 9.
    pub standard_operative_pressure: Option<f64>,
    /// Standard effective temperature [°C], written by the root find.
    ///
    /// Stays `None` if the solve does not converge.
    pub set: Option<f64>,
}

impl MicroclimateRecord {
    pub fn new(
        air_temperature: f64,
        relative_humidity: f64,
        wind_speed: f64,
        mean_radiant_temperature: f64,
    ) -> Self {
        Self {
            air_temperature,
            relative_humidity,
            wind_speed,
            mean_radiant_temperature,
            vapor_pressure: None,
            dew_point: None,
            dew_point_pressure: None,
            standard_operative_temperature: None,
            standard_operative_pressure: None,
            set: None,
        }
    }

    /// Builds the record for `point` from spatially varying inputs.
    pub fn at_point(
        point: Point,
        air_temperature: &ScalarOrField,
        wind_speed: &ScalarOrField,
        relative_humidity: f64,
        mean_radiant_temperature: f64,
        radius: f64,
    ) -> Self {
        Self::new(
            air_temperature.value_near(point, radius),
            relative_humidity,
            wind_speed.value_near(point, radius),
            mean_radiant_temperature,
        )
    }

    /// Clears every derived field.
    pub fn reset_derived(&mut self) {
        *self = Self::new(
            self.air_temperature,
            self.relative_humidity,
            self.wind_speed,
            self.mean_radiant_temperature,
        );
    }
}
