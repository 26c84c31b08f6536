use clap::Parser;
use unicycle::{run, Cli};

fn cli(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("unicycle").chain(args.iter().copied())).unwrap()
}

#[test]
fn short_headless_run_reports_every_episode() {
    let summaries = run(&cli(&["--headless", "-n", "2", "-m", "5", "--time-step", "0.01"])).unwrap();
    assert_eq!(summaries.len(), 2);
    for summary in &summaries {
        assert!(summary.steps <= 5);
        assert!(summary.total_reward.abs() <= 5.0);
    }
}

#[test]
fn random_policy_with_seed_is_repeatable() {
    let args = [
        "--headless", "-n", "1", "-m", "20", "--time-step", "0.01", "--policy", "random", "--seed", "4",
    ];
    let a = run(&cli(&args)).unwrap();
    let b = run(&cli(&args)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn tilted_start_from_config_file_falls() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("tilted.json");
    std::fs::write(&config, r#"{"start_orientation": [0.3, 0.0, 0.0], "time_step": 0.01}"#).unwrap();

    let summaries = run(&cli(&[
        "--headless",
        "-n",
        "1",
        "-m",
        "1000",
        "--config",
        config.to_str().unwrap(),
    ]))
    .unwrap();
    assert!(summaries[0].fell);
    assert!(summaries[0].steps < 1000);
}

#[test]
fn recording_is_exported() {
    let dir = tempfile::tempdir().unwrap();
    let gif = dir.path().join("run.gif");
    run(&cli(&[
        "--headless",
        "-n",
        "1",
        "-m",
        "3",
        "--record",
        gif.to_str().unwrap(),
    ]))
    .unwrap();
    assert!(std::fs::read(&gif).unwrap().starts_with(b"GIF89a"));
}

#[test]
fn recording_enabled_in_config_file_is_exported() {
    let dir = tempfile::tempdir().unwrap();
    let gif = dir.path().join("from-config.gif");
    let config = dir.path().join("record.json");
    std::fs::write(
        &config,
        format!(
            r#"{{"record": true, "record_path": {:?}, "camera_width": 8, "camera_height": 8}}"#,
            gif.to_str().unwrap()
        ),
    )
    .unwrap();

    run(&cli(&[
        "--headless",
        "-n",
        "1",
        "-m",
        "3",
        "--config",
        config.to_str().unwrap(),
    ]))
    .unwrap();
    assert!(std::fs::read(&gif).unwrap().starts_with(b"GIF89a"));
}

#[test]
fn debug_sliders_drive_the_robot() {
    run(&cli(&[
        "--headless", "--debug", "--wheel", "-0.5", "--human", "0.2", "-n", "1", "-m", "3",
    ]))
    .unwrap();
}

#[test]
fn bad_config_file_is_reported() {
    let err = run(&cli(&["--headless", "--config", "no/such/file.json"])).unwrap_err();
    assert!(format!("{err:#}").contains("configuration"), "{err:#}");
}
