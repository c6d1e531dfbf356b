//! Empirical longwave sky radiation.

/// Ambient vapour pressure used by the sky emissivity model [kPa].
///
/// Magnus-type saturation pressure scaled by relative humidity [%].
pub fn sky_vapor_pressure(air_temperature: f64, relative_humidity: f64) -> f64 {
    let ta = air_temperature;
    relative_humidity * 6.1121 * ((18.678 - ta / 234.4) * ta / (ta + 257.14)).exp() / 1000.0
}

/// Clear-sky emissivity from vapour pressure [kPa] and air temperature [°C].
///
/// Brutsaert-type form with the coefficient 1.24. The ratio uses the air
/// temperature in °C, so the result is only defined above 0 °C.
pub fn sky_emissivity(vapor_pressure: f64, air_temperature: f64) -> f64 {
    1.24 * (vapor_pressure / air_temperature).powf(1.0 / 7.0)
}

/// Downwelling longwave flux of a full sky hemisphere [W/m²].
///
/// - `air_temperature`: [°C]
/// - `relative_humidity`: [%]
/// - `sigma`: Stefan–Boltzmann constant
///
/// Scale by the sky view factor at the call site.
pub fn sky_longwave(air_temperature: f64, relative_humidity: f64, sigma: f64) -> f64 {
    let ta_k = air_temperature + 273.15;
    let vp = sky_vapor_pressure(air_temperature, relative_humidity);
    let emissivity = sky_emissivity(vp, air_temperature);
    sigma * emissivity * ta_k.powi(4) * (0.82 - 0.25 * 10f64.powf(-0.0945 * vp))
}
