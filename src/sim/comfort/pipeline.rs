//! Full MRT computation at pedestrian points, and SET on top of it.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::Point;
use crate::sim::comfort::aggregate::SurfaceRadiationAggregator;
use crate::sim::comfort::config::ComfortConfig;
use crate::sim::comfort::mrt::{RadiantFluxes, combine, ground_longwave};
use crate::sim::comfort::records::{MicroclimateRecord, ModelInputs, PedestrianProperties};
use crate::sim::comfort::set::SetSolver;
use crate::sim::comfort::shadow::is_sunlit;
use crate::sim::comfort::sky::sky_longwave;
use crate::sim::comfort::view_factor::ViewFactorSampler;
use crate::sim::engine::Intersect;
use crate::sim::field::{ScalarOrField, SpatialField};
use crate::sim::solar::SolarParameters;

/// Inputs shared by all pedestrian points of one time instant.
#[derive(Debug, Clone)]
pub struct MrtScenario {
    /// Air temperature [°C].
    pub air_temperature: ScalarOrField,
    /// Building surface temperature [K].
    pub surface_temperature: ScalarOrField,
    /// Shortwave reflected by building surfaces [W/m²].
    pub reflected_shortwave: ScalarOrField,
    pub solar: SolarParameters,
    pub model: ModelInputs,
}

/// MRT at one point with the terms it was built from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MrtResult {
    pub point: Point,
    /// Mean radiant temperature [°C].
    pub mrt: f64,
    /// Total longwave flux [W/m²].
    pub longwave: f64,
    /// Total shortwave flux [W/m²].
    pub shortwave: f64,
    /// Sky view factor, including intercepts without surface data.
    ///
    /// Those intercepts may come from the lower hemisphere, so the value
    /// can exceed 1 when surface data is missing.
    pub sky_view_factor: f64,
    pub ground_view_factor: f64,
    /// Sky longwave reaching the point, `E_sky · SVF / 2` [W/m²].
    pub sky_longwave: f64,
    pub surface_longwave: f64,
    pub surface_shortwave: f64,
    pub sunlit: bool,
    /// Intercepts dropped for lack of surface temperature.
    pub missing_intercepts: usize,
}

/// MRT and SET at one point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComfortPoint {
    pub mrt: MrtResult,
    pub microclimate: MicroclimateRecord,
}

/// Computes MRT at pedestrian points of a scene.
#[derive(Debug, Clone)]
pub struct MrtPipeline {
    config: ComfortConfig,
    sampler: ViewFactorSampler,
    aggregator: SurfaceRadiationAggregator,
}

impl MrtPipeline {
    pub fn new(config: &ComfortConfig) -> Self {
        Self {
            config: config.clone(),
            sampler: ViewFactorSampler::new(config.n_directions),
            aggregator: SurfaceRadiationAggregator::new(config),
        }
    }

    pub fn config(&self) -> &ComfortConfig {
        &self.config
    }

    /// MRT at a single point.
    pub fn compute_mrt<S: Intersect + ?Sized>(
        &self,
        point: Point,
        scene: &S,
        scenario: &MrtScenario,
        pedestrian: &PedestrianProperties,
    ) -> MrtResult {
        let sigma = self.config.sigma;
        let n_dir = self.sampler.n_directions();

        let mut view = self.sampler.sample(point, scene);
        let totals = self.aggregator.aggregate(
            &view.intercepts,
            &scenario.surface_temperature,
            &scenario.reflected_shortwave,
            &scenario.model.wall_emissivity,
        );
        view.reclassify_as_sky(totals.missing_intercepts, n_dir);

        let rh = scenario.model.relative_humidity;
        let e_sky = scenario.air_temperature.mean_of_near(
            point,
            self.config.air_lookup_radius,
            |ta| sky_longwave(ta, rh, sigma),
        );

        let e_ground = ground_longwave(
            scenario.model.ground_emissivity,
            view.ground_view_factor,
            scenario.model.ground_temperature,
            sigma,
        );

        let sunlit = is_sunlit(point, scene, scenario.solar.solar_vector);

        let fluxes = RadiantFluxes {
            sky_longwave: e_sky,
            surface_longwave: totals.longwave_from_surfaces,
            ground_longwave: e_ground,
            surface_shortwave: totals.shortwave_from_surfaces,
        };
        let components = combine(
            &fluxes,
            &scenario.solar,
            view.sky_view_factor,
            view.ground_view_factor,
            pedestrian.body_albedo,
            sunlit,
            sigma,
        );

        debug!(
            x = point.x,
            y = point.y,
            z = point.z,
            mrt = components.mrt,
            svf = view.sky_view_factor,
            gvf = view.ground_view_factor,
            sunlit,
            "MRT computed"
        );

        MrtResult {
            point,
            mrt: components.mrt,
            longwave: components.longwave,
            shortwave: components.shortwave,
            sky_view_factor: view.sky_view_factor,
            ground_view_factor: view.ground_view_factor,
            sky_longwave: e_sky * view.sky_view_factor / 2.0,
            surface_longwave: totals.longwave_from_surfaces,
            surface_shortwave: totals.shortwave_from_surfaces,
            sunlit,
            missing_intercepts: totals.missing_intercepts,
        }
    }

    /// MRT at many points, in parallel. Results keep the input order.
    #[instrument(level = "debug", skip_all, fields(points = points.len()))]
    pub fn compute_mrt_batch<S: Intersect + ?Sized>(
        &self,
        points: &[Point],
        scene: &S,
        scenario: &MrtScenario,
        pedestrian: &PedestrianProperties,
    ) -> Vec<MrtResult> {
        points
            .par_iter()
            .map(|&p| self.compute_mrt(p, scene, scenario, pedestrian))
            .collect()
    }

    /// MRT map as a spatial field.
    pub fn mrt_field<S: Intersect + ?Sized>(
        &self,
        points: &[Point],
        scene: &S,
        scenario: &MrtScenario,
        pedestrian: &PedestrianProperties,
    ) -> SpatialField {
        let mut field = SpatialField::new();
        for res in self.compute_mrt_batch(points, scene, scenario, pedestrian) {
            field.push(res.point, res.mrt);
        }
        field
    }

    /// MRT followed by SET at every point.
    ///
    /// Air temperature and wind speed are looked up near each point with
    /// `air_lookup_radius`. Points whose SET solve fails keep `set = None`.
    #[instrument(level = "debug", skip_all, fields(points = points.len()))]
    pub fn comfort_at_points<S: Intersect + ?Sized>(
        &self,
        points: &[Point],
        scene: &S,
        scenario: &MrtScenario,
        wind_speed: &ScalarOrField,
        pedestrian: &PedestrianProperties,
    ) -> Vec<ComfortPoint> {
        let solver = SetSolver::new(&self.config);
        let radius = self.config.air_lookup_radius;

        points
            .par_iter()
            .map(|&p| {
                let mrt = self.compute_mrt(p, scene, scenario, pedestrian);
                let mut microclimate = MicroclimateRecord::at_point(
                    p,
                    &scenario.air_temperature,
                    wind_speed,
                    scenario.model.relative_humidity,
                    mrt.mrt,
                    radius,
                );
                let mut ped = pedestrian.clone();
                solver.solve_set(&mut microclimate, &mut ped);
                ComfortPoint { mrt, microclimate }
            })
            .collect()
    }
}
