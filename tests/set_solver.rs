use outdoor_comfort::sim::comfort::set::saturation_pressure;
use outdoor_comfort::sim::comfort::{
    ComfortConfig, MicroclimateRecord, PedestrianProperties, SetSolver,
};
use proptest::prelude::*;

fn solver() -> SetSolver {
    SetSolver::new(&ComfortConfig::default())
}

#[test]
fn hot_sunny_street_is_warmer_than_shade() {
    let s = solver();
    let ped = PedestrianProperties::default();
    let sun = s.solve(&MicroclimateRecord::new(30.0, 50.0, 1.0, 60.0), &ped);
    let shade = s.solve(&MicroclimateRecord::new(30.0, 50.0, 1.0, 32.0), &ped);
    match (sun, shade) {
        (Some(sun), Some(shade)) => assert!(sun.set > shade.set),
        other => panic!("solve failed: {other:?}"),
    }
}

#[test]
fn wind_cools() {
    let s = solver();
    let ped = PedestrianProperties::default();
    let calm = s.solve(&MicroclimateRecord::new(30.0, 50.0, 0.5, 40.0), &ped);
    let breezy = s.solve(&MicroclimateRecord::new(30.0, 50.0, 3.0, 40.0), &ped);
    match (calm, breezy) {
        (Some(calm), Some(breezy)) => assert!(breezy.set < calm.set),
        other => panic!("solve failed: {other:?}"),
    }
}

#[test]
fn records_are_enriched_in_place() {
    let s = solver();
    let mut records: Vec<MicroclimateRecord> = (0..10)
        .map(|i| MicroclimateRecord::new(20.0 + i as f64, 50.0, 1.0, 30.0 + i as f64))
        .collect();
    let sets = s.solve_many(&mut records, &PedestrianProperties::default());
    for (rec, set) in records.iter().zip(sets) {
        assert!(set.is_some());
        assert_eq!(rec.set, set);
        assert!(rec.vapor_pressure.is_some());
    }
    // Warmer environments give a higher SET
    let sets: Vec<f64> = records.iter().filter_map(|r| r.set).collect();
    assert!(sets.windows(2).all(|w| w[1] > w[0]));
}

#[test]
fn config_tolerance_is_honored() {
    let config = ComfortConfig {
        root_tolerance: 1e-3,
        ..ComfortConfig::default()
    };
    let sol = SetSolver::new(&config)
        .solve(&MicroclimateRecord::new(25.0, 50.0, 1.0, 30.0), &PedestrianProperties::default());
    let Some(sol) = sol else {
        panic!("solve failed");
    };
    assert!(sol.residual.abs() <= 1e-3);
}

#[test]
fn saturation_pressure_increases() {
    assert!(saturation_pressure(30.0) > saturation_pressure(20.0));
    // ~2.37 kPa at 20 °C
    assert!((saturation_pressure(20.0) - 2.37).abs() < 0.01);
}

proptest! {
    #[test]
    fn converged_solution_has_small_residual(
        ta in 5.0f64..40.0,
        rh in 20.0f64..90.0,
        ws in 0.0f64..5.0,
        dmrt in -5.0f64..30.0,
    ) {
        let s = solver();
        let micro = MicroclimateRecord::new(ta, rh, ws, ta + dmrt);
        if let Some(sol) = s.solve(&micro, &PedestrianProperties::default()) {
            prop_assert!(sol.residual.abs() <= 1e-9);
            prop_assert!(sol.set.is_finite());
        }
    }
}
