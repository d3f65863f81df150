//! Mock TLE data for testing purposes.

use crate::tle::parser::extract_tle_block;
use crate::tle::types::TleSet;

pub const MOCK_LINE1: &str =
    "1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992";
pub const MOCK_LINE2: &str =
    "2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008";

pub const MOCK_TLE_DATA: &str = r#"
ISS (ZARYA)
1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992
2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008
"#;

pub fn mock_iss_tle() -> TleSet {
    extract_tle_block(MOCK_TLE_DATA, 25544).expect("mock TLE parses")
}

/// Fresh directory path under the system temp dir, unique per test and run
pub fn unique_temp_dir(test_name: &str) -> std::path::PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    std::env::temp_dir().join(format!(
        "iss-tracker-{}-{}-{}",
        test_name,
        std::process::id(),
        nanos
    ))
}
