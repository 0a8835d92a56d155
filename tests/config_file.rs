use guided_scrambling::config::GsConfig;
use guided_scrambling::error::ConfigError;
use guided_scrambling::selection::SelectionMethod;
use num_complex::Complex64;
use std::path::PathBuf;

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("gs-{}-{}", std::process::id(), name));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn loads_session_from_json() {
    let path = temp_file(
        "session.json",
        r#"{
            "field_size": 4,
            "codeword_length": 12,
            "augmenting_length": 3,
            "continuous": true,
            "scrambler": [1, 0, 0, 0, 1, 2],
            "selection_method": "MSW2",
            "constellation": [[1, 0], [0, 1], [0, -1], [-1, 0]],
            "starting_rds": [0, 0],
            "threads": 2
        }"#,
    );
    let config = GsConfig::from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let session = config.validate().unwrap();
    assert_eq!(session.method, SelectionMethod::Msw2);
    assert_eq!(session.threads, 2);
    assert_eq!(session.starting_rds, Complex64::new(0.0, 0.0));
    assert_eq!(session.constellation[2], Complex64::new(0.0, -1.0));
    assert_eq!(&*session.scrambler, &[1, 0, 0, 0, 1, 2]);
}

#[test]
fn reports_unreadable_and_malformed_files() {
    let missing = std::env::temp_dir().join("gs-does-not-exist.json");
    assert!(matches!(GsConfig::from_file(&missing), Err(ConfigError::Io(_))));

    let path = temp_file("broken.json", "{ \"field_size\": ");
    let result = GsConfig::from_file(&path);
    std::fs::remove_file(&path).unwrap();
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}
