use lendsim::{simulate, Error, SimulationConfig};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file should be creatable");
    file.write_all(contents.as_bytes()).expect("temp file should be writable");
    file
}

#[test]
fn loads_and_runs_a_multi_title_file() {
    let file = write_config(
        r#"
num_copies = 2
titles = ["Dune", "Emma", "Ulysses"]
loan_duration = 7
return_probability = 0.9
sim_time = 120
max_queue_size = 4
random_seed = 2024

[inter_arrival]
low = 1
high = 3
"#,
    );

    let config = SimulationConfig::load(file.path()).unwrap();
    assert_eq!(3, config.titles.len());
    assert_eq!(2024, config.random_seed);

    let report = simulate(&config).unwrap();
    assert_eq!(3, report.titles.len());
    assert_eq!(120, report.horizon);
    assert_eq!(7, report.loan_duration);
    for title in &report.titles {
        assert!(title.on_loan <= 2);
        assert!(title.still_waiting <= 4);
    }
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = SimulationConfig::load(dir.path().join("absent.toml"));
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn malformed_file_is_a_parse_error() {
    let file = write_config("num_copies = \"three\"\n");
    assert!(matches!(SimulationConfig::load(file.path()), Err(Error::Parse(_))));
}

#[test]
fn negative_values_are_rejected_at_setup() {
    let file = write_config("max_queue_size = -2\n");
    let error = SimulationConfig::load(file.path()).unwrap_err();
    assert!(matches!(error, Error::InvalidConfiguration(_)));
    assert!(error.to_string().contains("max_queue_size"));
}

#[test]
fn report_serializes_to_json() {
    let report = simulate(&SimulationConfig {
        sim_time: 30,
        ..SimulationConfig::default()
    })
    .unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(30, json["horizon"]);
    assert_eq!("Server 1", json["titles"][0]["title"]);
    let regime = json["titles"][0]["metrics"]["steady_state"]["regime"].as_str().unwrap();
    assert!(regime == "stable" || regime == "unbounded");
}
