//! Configuration loading and installation

use std::io::Write;

use vessel::{BoundaryConfig, ConfigError, VesselConfig};

#[test]
fn file_values_are_loaded() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[boundary]\nsilence_caught_panics = true").unwrap();

    let config = VesselConfig::load_from(file.path()).unwrap();
    assert_eq!(
        config.boundary,
        BoundaryConfig {
            silence_caught_panics: true,
            log_caught_panics: true,
        }
    );
}

#[test]
fn malformed_files_report_their_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[boundary\n").unwrap();

    let err = VesselConfig::load_from(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("failed to parse config"));
}

#[test]
fn first_installation_wins() {
    let quiet = VesselConfig {
        boundary: BoundaryConfig {
            silence_caught_panics: true,
            log_caught_panics: true,
        },
    };
    vessel::init_with(quiet.clone());
    vessel::init_with(VesselConfig::default());

    assert_eq!(vessel::current_config(), &quiet);

    // Caught panics still degrade with the quiet hook installed.
    assert!(vessel::present(1).map(|_| -> i32 { panic!("quiet") }).is_absent());
}
