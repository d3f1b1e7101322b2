use std::{fs, process::Command};

fn grid_skirmish() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_grid-skirmish"));
    let _ = command.env("RUST_LOG", "warn");
    command
}

#[test]
fn short_run_prints_banner_and_final_frame() {
    let output = grid_skirmish()
        .args(["--ticks", "5", "--wanderers", "3", "--fire", "--ascii"])
        .output()
        .expect("failed to launch grid-skirmish");

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8(output.stdout).expect("utf8 stdout");
    assert!(stdout.starts_with("Welcome to Grid Skirmish.\n"), "{stdout}");
    assert!(stdout.contains("tick 5\n"), "{stdout}");
    assert!(stdout.contains('@'), "{stdout}");
}

#[test]
fn layout_file_replaces_generated_grid() {
    let dir = std::env::temp_dir().join(format!("grid-skirmish-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("temp dir");
    let layout = dir.join("arena.txt");
    fs::write(&layout, "; tiny arena\n....\n..##\n").expect("layout file");

    let output = grid_skirmish()
        .arg("--layout")
        .arg(&layout)
        .args(["--ticks", "1", "--wanderers", "0", "--ascii"])
        .output()
        .expect("failed to launch grid-skirmish");
    let _ = fs::remove_dir_all(&dir);

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8(output.stdout).expect("utf8 stdout");
    assert!(stdout.ends_with("tick 1\n@...\n..##\n"), "{stdout}");
}

#[test]
fn unreadable_config_is_reported() {
    let output = grid_skirmish()
        .args(["--config", "/definitely/not/here.toml", "--ticks", "1"])
        .output()
        .expect("failed to launch grid-skirmish");

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).expect("utf8 stderr");
    assert!(stderr.contains("failed to read config"), "{stderr}");
}

#[test]
fn help_describes_the_runner() {
    let output = grid_skirmish()
        .arg("--help")
        .output()
        .expect("failed to launch grid-skirmish");

    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8(output.stdout).expect("utf8 stdout");
    assert!(
        stdout.starts_with("Headless runner for the Grid Skirmish simulation."),
        "{stdout}"
    );
}
