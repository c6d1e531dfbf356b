//! Standard Effective Temperature (SET).
//!
//! The solver builds the heat transfer coefficients of a two-node body
//! model for the actual environment, then finds the temperature of a
//! standard environment (still air, 50 % RH at the same vapour-pressure
//! relation, MRT equal to air temperature) that yields the same skin heat
//! loss. That temperature is SET.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::sim::comfort::config::ComfortConfig;
use crate::sim::comfort::records::{MicroclimateRecord, PedestrianProperties};

/// Conversion from mmHg to kPa.
const MMHG_TO_KPA: f64 = 0.133322368;
/// Ambient vapour pressure keeps the shorter conversion factor.
const MMHG_TO_KPA_AMBIENT: f64 = 0.133322;
/// Reference pressure of the convective and evaporative corrections [kPa].
const REFERENCE_PRESSURE: f64 = 101.33;
/// Heat of one met per unit body area [W/m²].
const MET_TO_W: f64 = 58.2;

/// Saturation vapour pressure at `t` [°C] in kPa (Antoine-type fit).
pub fn saturation_pressure(t: f64) -> f64 {
    MMHG_TO_KPA * (20.386 - 5132.0 / (t + 273.15)).exp()
}

/// Ambient vapour pressure [kPa] from air temperature and relative humidity [%].
pub fn ambient_vapor_pressure(air_temperature: f64, relative_humidity: f64) -> f64 {
    relative_humidity / 100.0
        * MMHG_TO_KPA_AMBIENT
        * (20.386 - 5132.0 / (air_temperature + 273.15)).exp()
}

/// Dew point [°C] by the Magnus formula.
pub fn dew_point(air_temperature: f64, relative_humidity: f64) -> f64 {
    let gamma = (relative_humidity / 100.0).ln() + 17.625 * air_temperature / (243.04 + air_temperature);
    243.04 * gamma / (17.625 - gamma)
}

/// DuBois body surface area [m²].
pub fn dubois_area(mass: f64, height: f64) -> f64 {
    0.202 * mass.powf(0.425) * height.powf(0.725)
}

/// Operative temperature [°C], with the wind correction above `reference_wind_speed`.
pub fn operative_temperature(
    radiative: f64,
    convective: f64,
    mean_radiant_temperature: f64,
    air_temperature: f64,
    skin_temperature: f64,
    wind_speed: f64,
    reference_wind_speed: f64,
) -> f64 {
    if wind_speed <= reference_wind_speed {
        (radiative * mean_radiant_temperature + convective * air_temperature)
            / (radiative + convective)
    } else {
        let ratio = wind_speed / reference_wind_speed;
        (radiative * mean_radiant_temperature
            + convective * (air_temperature * ratio.sqrt() - skin_temperature * (ratio - 1.0).sqrt()))
            / (radiative + convective)
    }
}

/// Everything the SET residual depends on, for one environment and body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatTransferCoefficients {
    pub body_area: f64,
    /// Metabolic heat minus external work [W/m²].
    pub heat_production: f64,
    pub skin_temperature: f64,
    pub dew_point: f64,
    pub vapor_pressure: f64,
    pub skin_saturation_pressure: f64,
    pub dew_point_pressure: f64,
    /// Intrinsic clothing insulation [m²K/W].
    pub clothing_resistance: f64,
    pub clothing_temperature: f64,
    pub convective: f64,
    pub lewis_ratio: f64,
    pub evaporative: f64,
    pub standard_evaporative: f64,
    pub radiative: f64,
    pub sensible: f64,
    pub standard_sensible: f64,
    pub evaporative_total: f64,
    pub operative_temperature: f64,
    pub standard_operative_temperature: f64,
    pub standard_operative_pressure: f64,
}

/// Outcome of a converged SET solve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SetSolution {
    /// Standard effective temperature [°C].
    pub set: f64,
    pub iterations: usize,
    /// Residual at `set`.
    pub residual: f64,
}

#[derive(Debug, Clone)]
pub struct SetSolver {
    reference_wind_speed: f64,
    atmospheric_pressure: f64,
    clo_to_si: f64,
    sigma: f64,
    tolerance: f64,
    max_iterations: usize,
    initial_guess: f64,
}

impl SetSolver {
    pub fn new(config: &ComfortConfig) -> Self {
        Self {
            reference_wind_speed: config.reference_wind_speed,
            atmospheric_pressure: config.atmospheric_pressure,
            clo_to_si: config.clo_to_si,
            sigma: config.sigma,
            tolerance: config.root_tolerance,
            max_iterations: config.max_iterations,
            initial_guess: config.initial_guess,
        }
    }

    /// Heat transfer coefficients of `ped` in the environment `micro`.
    pub fn coefficients(
        &self,
        micro: &MicroclimateRecord,
        ped: &PedestrianProperties,
    ) -> HeatTransferCoefficients {
        let ta = micro.air_temperature;
        let rh = micro.relative_humidity;
        let ws = micro.wind_speed.abs();
        let mrt = micro.mean_radiant_temperature;
        let met = ped.metabolic_rate;
        let pt = self.atmospheric_pressure;

        // Skin temperature from metabolic heat
        let body_area = dubois_area(ped.mass, ped.height);
        let heat_production = met * MET_TO_W - ped.external_work;
        let efficiency = ped.external_work / met / MET_TO_W;
        let internal_heat = met * (1.0 - efficiency) * MET_TO_W;
        let tsk = 35.7 - 0.032 * internal_heat / body_area;

        // Moisture
        let tdp = dew_point(ta, rh);
        let vp = ambient_vapor_pressure(ta, rh);
        let pssk = saturation_pressure(tsk);
        let pdp = saturation_pressure(tdp);

        // Clothing surface temperature
        let icl = self.clo_to_si * ped.clothing_insulation;
        let m = met * MET_TO_W;
        let h = heat_production;
        let tcl = tsk
            - 0.0275 * h
            - icl
                * (h - 3.05 * (5.73 - 0.007 * h - vp)
                    - 0.42 * (h - 58.15)
                    - 0.0173 * m * (5.87 - vp)
                    - 0.0014 * m * (34.0 - ta));

        // Convection, natural vs forced
        let natural = 5.66 * (met - 0.85).powf(0.39);
        let forced = 8.6 * ws.powf(0.53);
        let hc = natural.max(forced) * ((vp + pt) / REFERENCE_PRESSURE).powf(0.55);

        let lr = 15.15 * (tcl + 273.2) / 273.2;
        let he = lr * hc;
        let hesp = he * (REFERENCE_PRESSURE / (vp + pt)).powf(0.45);

        let hr = 4.0
            * ped.body_emissivity
            * self.sigma
            * ped.effective_radiation_area_ratio
            * (273.15 + (tcl + mrt) / 2.0).powi(3);

        // Sensible path
        let fcl = ped.clothing_area_factor;
        let air_layer = 1.0 / ((hr + hc) * fcl);
        let hp = 1.0 / (air_layer + icl);
        let hsp = hp + hr;

        // Evaporative path
        let r_air = 1.0 / (lr * fcl * hc);
        let r_clothing = icl / (lr * ped.clothing_permeability);
        let hep = 1.0 / (r_air + r_clothing);

        let to = operative_temperature(hr, hc, mrt, ta, tsk, ws, self.reference_wind_speed);
        let tso = hp / hsp * to + (1.0 - hp / hsp) * tsk;
        let pso = hep / hesp * vp + (1.0 - hsp / hesp) * pssk;

        HeatTransferCoefficients {
            body_area,
            heat_production,
            skin_temperature: tsk,
            dew_point: tdp,
            vapor_pressure: vp,
            skin_saturation_pressure: pssk,
            dew_point_pressure: pdp,
            clothing_resistance: icl,
            clothing_temperature: tcl,
            convective: hc,
            lewis_ratio: lr,
            evaporative: he,
            standard_evaporative: hesp,
            radiative: hr,
            sensible: hp,
            standard_sensible: hsp,
            evaporative_total: hep,
            operative_temperature: to,
            standard_operative_temperature: tso,
            standard_operative_pressure: pso,
        }
    }

    /// SET residual at candidate temperature `st`; zero at the solution.
    pub fn residual(coeffs: &HeatTransferCoefficients, relative_humidity: f64, st: f64) -> f64 {
        let c = coeffs;
        c.standard_operative_temperature - st
            + 0.088 * (c.standard_evaporative + c.convective) / c.sensible
                * (c.standard_operative_pressure
                    - relative_humidity / 100.0 * saturation_pressure(st))
    }

    /// Solves SET without touching the records.
    pub fn solve(
        &self,
        micro: &MicroclimateRecord,
        ped: &PedestrianProperties,
    ) -> Option<SetSolution> {
        let coeffs = self.coefficients(micro, ped);
        self.solve_with(&coeffs, micro.relative_humidity)
    }

    fn solve_with(
        &self,
        coeffs: &HeatTransferCoefficients,
        relative_humidity: f64,
    ) -> Option<SetSolution> {
        let f = |st: f64| Self::residual(coeffs, relative_humidity, st);
        let x0 = self.initial_guess;
        secant(f, x0, x0 + 1.0, self.tolerance, self.max_iterations)
    }

    /// Solves SET and writes every intermediate into the records.
    ///
    /// Returns `None` (and leaves `micro.set` empty) if the root find does
    /// not converge. Derived fields are recomputed from the inputs on every
    /// call, so solving twice gives the same result.
    pub fn solve_set(
        &self,
        micro: &mut MicroclimateRecord,
        ped: &mut PedestrianProperties,
    ) -> Option<f64> {
        micro.reset_derived();
        let coeffs = self.coefficients(micro, ped);
        Self::write_derived(&coeffs, micro, ped);

        let solution = self.solve_with(&coeffs, micro.relative_humidity);
        match solution {
            Some(s) => {
                debug!(set = s.set, iterations = s.iterations, "SET converged");
                micro.set = Some(s.set);
            }
            None => {
                warn!(
                    air_temperature = micro.air_temperature,
                    relative_humidity = micro.relative_humidity,
                    wind_speed = micro.wind_speed,
                    mrt = micro.mean_radiant_temperature,
                    "SET root find did not converge"
                );
                micro.set = None;
            }
        }
        micro.set
    }

    /// Solves SET for every record in parallel. The shared pedestrian is not
    /// modified; per-record intermediates are still written.
    pub fn solve_many(
        &self,
        records: &mut [MicroclimateRecord],
        ped: &PedestrianProperties,
    ) -> Vec<Option<f64>> {
        records
            .par_iter_mut()
            .map(|micro| {
                let mut ped = ped.clone();
                self.solve_set(micro, &mut ped)
            })
            .collect()
    }

    fn write_derived(
        coeffs: &HeatTransferCoefficients,
        micro: &mut MicroclimateRecord,
        ped: &mut PedestrianProperties,
    ) {
        ped.skin_temperature = Some(coeffs.skin_temperature);
        ped.clothing_temperature = Some(coeffs.clothing_temperature);
        ped.lewis_ratio = Some(coeffs.lewis_ratio);

        micro.vapor_pressure = Some(coeffs.vapor_pressure);
        micro.dew_point = Some(coeffs.dew_point);
        micro.dew_point_pressure = Some(coeffs.dew_point_pressure);
        micro.standard_operative_temperature = Some(coeffs.standard_operative_temperature);
        micro.standard_operative_pressure = Some(coeffs.standard_operative_pressure);
    }
}

/// Secant root finder. Converged when `|f(x)| <= tol`.
fn secant<F>(f: F, mut x0: f64, mut x1: f64, tol: f64, max_iter: usize) -> Option<SetSolution>
where
    F: Fn(f64) -> f64,
{
    let mut f0 = f(x0);
    let mut f1 = f(x1);
    for iteration in 0..=max_iter {
        if !f1.is_finite() {
            return None;
        }
        if f1.abs() <= tol {
            return Some(SetSolution {
                set: x1,
                iterations: iteration,
                residual: f1,
            });
        }
        if iteration == max_iter {
            break;
        }
        let slope = f1 - f0;
        if slope == 0.0 {
            return None;
        }
        let x2 = x1 - f1 * (x1 - x0) / slope;
        x0 = x1;
        f0 = f1;
        x1 = x2;
        f1 = f(x1);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solver() -> SetSolver {
        SetSolver::new(&ComfortConfig::default())
    }

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_body_area_and_skin() {
        let micro = MicroclimateRecord::new(30.0, 60.0, 1.0, 45.0);
        let c = solver().coefficients(&micro, &PedestrianProperties::default());
        assert!(close(c.body_area, 1.843829, 1e-6));
        assert!(close(c.skin_temperature, 33.67986, 1e-5));
        assert!(close(c.vapor_pressure, 2.537738, 1e-6));
        assert!(close(c.dew_point, 21.39001, 1e-5));
        assert!(close(c.clothing_temperature, 24.48643, 1e-5));
        assert!(close(c.convective, 8.717569, 1e-6));
        assert!(close(c.radiative, 4.559372, 1e-6));
    }

    #[test]
    fn test_reference_values() {
        let s = solver();
        let ped = PedestrianProperties::default();
        let cases = [
            (30.0, 60.0, 1.0, 45.0, 26.54564),
            (20.0, 50.0, 0.5, 25.0, 16.55539),
            (40.0, 20.0, 0.3, 60.0, 42.02528),
        ];
        for (ta, rh, ws, mrt, expected) in cases {
            let sol = s.solve(&MicroclimateRecord::new(ta, rh, ws, mrt), &ped);
            let Some(sol) = sol else {
                panic!("no SET for ta={ta}");
            };
            assert!(close(sol.set, expected, 1e-4), "ta={ta}: {}", sol.set);
            assert!(sol.residual.abs() <= 1e-9);
        }
    }

    #[test]
    fn test_wind_threshold() {
        let s = solver();
        let ped = PedestrianProperties::default();
        let calm = s.coefficients(&MicroclimateRecord::new(30.0, 60.0, 0.079, 45.0), &ped);
        let windy = s.coefficients(&MicroclimateRecord::new(30.0, 60.0, 0.081, 45.0), &ped);
        assert!(close(calm.operative_temperature, 36.44091, 1e-4));
        assert!(close(windy.operative_temperature, 34.39893, 1e-4));

        let set_calm = s.solve(&MicroclimateRecord::new(30.0, 60.0, 0.079, 45.0), &ped);
        let set_windy = s.solve(&MicroclimateRecord::new(30.0, 60.0, 0.081, 45.0), &ped);
        assert!(close(set_calm.map(|x| x.set).unwrap_or(f64::NAN), 38.20913, 1e-4));
        assert!(close(set_windy.map(|x| x.set).unwrap_or(f64::NAN), 37.30131, 1e-4));
    }

    #[test]
    fn test_residual_vapour_term_uses_sensible_conductance() {
        let micro = MicroclimateRecord::new(30.0, 60.0, 1.0, 45.0);
        let c = solver().coefficients(&micro, &PedestrianProperties::default());
        let st = 25.0;
        let vapour = c.standard_operative_pressure - 0.6 * saturation_pressure(st);
        let weight_hp = 0.088 * (c.standard_evaporative + c.convective) / c.sensible;
        let weight_hsp = 0.088 * (c.standard_evaporative + c.convective) / c.standard_sensible;

        let r = SetSolver::residual(&c, 60.0, st);
        assert!(close(r, c.standard_operative_temperature - st + weight_hp * vapour, 1e-12));
        assert!(!close(r, c.standard_operative_temperature - st + weight_hsp * vapour, 1e-3));

        // Weighting by hsp instead would give ~24.05 here
        let set = solver().solve(&micro, &PedestrianProperties::default());
        assert!(close(set.map_or(f64::NAN, |s| s.set), 26.54564, 1e-4));
    }

    #[test]
    fn test_operative_temperature_at_threshold() {
        // Exactly at the reference speed the calm branch applies
        let to = operative_temperature(4.0, 6.0, 40.0, 30.0, 34.0, 0.08, 0.08);
        assert!(close(to, 34.0, 1e-12));
    }

    #[test]
    fn test_solve_set_fills_records() {
        let s = solver();
        let mut micro = MicroclimateRecord::new(30.0, 60.0, 1.0, 45.0);
        let mut ped = PedestrianProperties::default();
        let set = s.solve_set(&mut micro, &mut ped);
        assert!(set.is_some());
        assert_eq!(micro.set, set);
        assert!(ped.skin_temperature.is_some());
        assert!(ped.clothing_temperature.is_some());
        assert!(ped.lewis_ratio.is_some());
        assert!(micro.vapor_pressure.is_some());
        assert!(micro.dew_point_pressure.is_some());
        assert!(micro.standard_operative_temperature.is_some());
        assert!(micro.standard_operative_pressure.is_some());
    }

    #[test]
    fn test_solve_set_idempotent() {
        let s = solver();
        let mut micro = MicroclimateRecord::new(25.0, 40.0, 2.0, 35.0);
        let mut ped = PedestrianProperties::default();
        let first = s.solve_set(&mut micro, &mut ped);
        let snapshot = (micro.clone(), ped.clone());
        let second = s.solve_set(&mut micro, &mut ped);
        assert_eq!(first, second);
        assert_eq!(snapshot, (micro, ped));
    }

    #[test]
    fn test_negative_wind_uses_magnitude() {
        let s = solver();
        let ped = PedestrianProperties::default();
        let a = s.solve(&MicroclimateRecord::new(20.0, 50.0, -0.5, 25.0), &ped);
        let b = s.solve(&MicroclimateRecord::new(20.0, 50.0, 0.5, 25.0), &ped);
        assert_eq!(a, b);
    }

    #[test]
    fn test_non_convergence_returns_none() {
        let config = ComfortConfig {
            max_iterations: 0,
            ..ComfortConfig::default()
        };
        let s = SetSolver::new(&config);
        let mut micro = MicroclimateRecord::new(30.0, 60.0, 1.0, 45.0);
        // Left over from an earlier run
        micro.set = Some(26.5);
        let mut ped = PedestrianProperties::default();
        assert!(s.solve_set(&mut micro, &mut ped).is_none());
        assert!(micro.set.is_none());
        // Intermediates are still available
        assert!(micro.vapor_pressure.is_some());
    }

    #[test]
    fn test_solve_many_matches_single() {
        let s = solver();
        let ped = PedestrianProperties::default();
        let mut records = vec![
            MicroclimateRecord::new(30.0, 60.0, 1.0, 45.0),
            MicroclimateRecord::new(20.0, 50.0, 0.5, 25.0),
        ];
        let sets = s.solve_many(&mut records, &ped);
        assert_eq!(sets.len(), 2);
        for (rec, set) in records.iter().zip(&sets) {
            let single = s.solve(rec, &ped).map(|x| x.set);
            assert_eq!(*set, single);
            assert_eq!(rec.set, *set);
        }
    }

    #[test]
    fn test_secant_simple_root() {
        let sol = secant(|x| x * x - 2.0, 1.0, 2.0, 1e-12, 50);
        let Some(sol) = sol else {
            panic!("secant failed");
        };
        assert!(close(sol.set, 2.0_f64.sqrt(), 1e-9));
    }
}
