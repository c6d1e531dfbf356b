use anyhow::{Context, Result};
use outdoor_comfort::geom::block::box_polygons;
use outdoor_comfort::sim::comfort::{
    ComfortConfig, ModelInputs, MrtPipeline, MrtScenario, PedestrianProperties,
};
use outdoor_comfort::sim::solar::{SolarParameters, SolarPosition};
use outdoor_comfort::{FlatScene, Point, ScalarOrField};
use tracing_subscriber::EnvFilter;

/// MRT and SET across an east-west street canyon on a summer afternoon.
///
/// Usage: `outdoor-comfort [config.json]`
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config: {path}"))?;
            ComfortConfig::from_json(&content)?
        }
        None => ComfortConfig::default(),
    };

    // Two 12 m blocks with a 10 m street between them
    let mut polygons = box_polygons("north", 10.0, 100.0, 12.0, Point::new(-15.0, -50.0, 0.0))?;
    polygons.extend(box_polygons("south", 10.0, 100.0, 12.0, Point::new(5.0, -50.0, 0.0))?);
    let scene = FlatScene::new(polygons);

    let position = SolarPosition::calculate(45.0, 196, 14.0);
    let scenario = MrtScenario {
        air_temperature: ScalarOrField::Scalar(28.0),
        surface_temperature: ScalarOrField::Scalar(305.0),
        reflected_shortwave: ScalarOrField::Scalar(40.0),
        solar: SolarParameters::from_irradiance(&position, 750.0, 120.0, 700.0, 0.18),
        model: ModelInputs {
            relative_humidity: 45.0,
            ground_temperature: 310.0,
            ..ModelInputs::default()
        },
    };
    let pedestrian = PedestrianProperties::standing_adult();
    let wind = ScalarOrField::Scalar(1.2);

    let points: Vec<Point> = (-4..=4).map(|i| Point::new(i as f64, 0.0, 1.5)).collect();

    let pipeline = MrtPipeline::new(&config);
    let results = pipeline.comfort_at_points(&points, &scene, &scenario, &wind, &pedestrian);

    println!(
        "Sun altitude {:.1} deg, azimuth {:.1} deg",
        position.altitude, position.azimuth
    );
    println!("{:>6} {:>6} {:>6} {:>8} {:>8}", "x", "svf", "sun", "mrt", "set");
    for r in &results {
        let set = r
            .microclimate
            .set
            .map_or_else(|| "-".to_string(), |s| format!("{s:.2}"));
        println!(
            "{:>6.1} {:>6.3} {:>6} {:>8.2} {:>8}",
            r.mrt.point.x, r.mrt.sky_view_factor, r.mrt.sunlit, r.mrt.mrt, set
        );
    }
    Ok(())
}
