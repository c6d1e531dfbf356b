//! Pedestrian thermal comfort: mean radiant temperature and SET.
//!
//! MRT is built from hemispherical ray sampling around each pedestrian
//! point. Rays that escape count toward the sky (upper half) or the ground
//! (lower half) view factor; rays that hit a surface pick up that surface's
//! temperature and reflected shortwave. SET is then solved per point from
//! MRT and the local microclimate.

pub mod aggregate;
pub mod config;
pub mod mrt;
pub mod pipeline;
pub mod records;
pub mod set;
pub mod shadow;
pub mod sky;
pub mod view_factor;

pub use aggregate::{RadiationTotals, SurfaceRadiationAggregator};
pub use config::{ComfortConfig, SIGMA};
pub use mrt::{MrtComponents, RadiantFluxes, combine, ground_longwave};
pub use pipeline::{ComfortPoint, MrtPipeline, MrtResult, MrtScenario};
pub use records::{MicroclimateRecord, ModelInputs, PedestrianProperties};
pub use set::{HeatTransferCoefficients, SetSolution, SetSolver};
pub use shadow::{is_sunlit, shadow_field};
pub use sky::sky_longwave;
pub use view_factor::{DirectionSet, ViewFactorResult, ViewFactorSampler};
