//! Shared test fixtures for integration tests.

use solar_proposal::estimator::{ConsumptionInput, SystemSpec, TariffInput};

/// 10 kWp system at 4.5 HSP.
pub fn commercial_system() -> SystemSpec {
    SystemSpec::new(10.0, 4.5)
}

/// 0.95/kWh, 20 public lighting fee, three-phase, Fio B 0.30/kWh.
pub fn commercial_tariff() -> TariffInput {
    TariffInput {
        kwh_price: Some(0.95),
        public_lighting_fee: Some(20.0),
        grid_type: "three_phase".to_string(),
        fio_b_price: 0.30,
    }
}

/// 500 kWh/month consumption entered directly.
pub fn commercial_consumption() -> ConsumptionInput {
    ConsumptionInput::Kwh {
        avg_consumption_kwh: Some(500.0),
    }
}

/// Monthly production for [`commercial_system`] under the southern profile.
pub const COMMERCIAL_MONTHLY_KWH: [f64; 12] = [
    1227.6, 1108.8, 1116.0, 1080.0, 1004.4, 918.0, 948.6, 1004.4, 1080.0, 1227.6, 1242.0, 1283.4,
];

/// Absolute-tolerance float comparison.
pub fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {expected}, got {actual} (tol {tol})"
    );
}

/// Unique path under the system temp dir for one test's output file.
pub fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("solar-proposal-{}-{name}", std::process::id()))
}
