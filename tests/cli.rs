use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn imgmark_cmd(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("imgmark").expect("binary exists");
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("ANNOTATED")
        .env_remove("GRID_SIZE");
    cmd
}

fn write_sample_png(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("sample.png");
    let image = image::RgbaImage::from_pixel(32, 24, image::Rgba([10, 20, 30, 255]));
    image.save(&path).unwrap();
    path
}

#[test]
fn help_prints_usage() {
    let temp = TempDir::new().unwrap();
    imgmark_cmd(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Annotate an image with rectangles, arrows and numbered bullets",
        ))
        .stdout(predicate::str::contains("--no-copy"));
}

#[test]
fn version_includes_build_hash() {
    let temp = TempDir::new().unwrap();
    imgmark_cmd(&temp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("imgmark "));
}

#[test]
fn image_argument_is_required() {
    let temp = TempDir::new().unwrap();
    imgmark_cmd(&temp)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "required arguments were not provided",
        ));
}

#[test]
fn missing_image_fails_before_opening_window() {
    let temp = TempDir::new().unwrap();
    imgmark_cmd(&temp)
        .env("WAYLAND_DISPLAY", "wayland-test-nonexistent")
        .arg(temp.path().join("missing.png"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load image"));
}

#[test]
fn requires_wayland_env() {
    let temp = TempDir::new().unwrap();
    let image = write_sample_png(&temp);
    imgmark_cmd(&temp)
        .env_remove("WAYLAND_DISPLAY")
        .arg(&image)
        .assert()
        .failure()
        .stderr(predicate::str::contains("WAYLAND_DISPLAY not set"));
}

#[test]
fn broken_config_falls_back_to_defaults() {
    let temp = TempDir::new().unwrap();
    let config_dir = temp.path().join("imgmark");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), "[drawing\ngrid_size = ").unwrap();
    let image = write_sample_png(&temp);

    // Startup gets past configuration and stops at the display check
    imgmark_cmd(&temp)
        .env_remove("WAYLAND_DISPLAY")
        .args(["--grid-size", "4"])
        .arg(&image)
        .assert()
        .failure()
        .stderr(predicate::str::contains("WAYLAND_DISPLAY not set"));
}

#[test]
fn rejects_non_numeric_grid_size() {
    let temp = TempDir::new().unwrap();
    let image = write_sample_png(&temp);
    imgmark_cmd(&temp)
        .args(["--grid-size", "fine"])
        .arg(&image)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'fine'"));
}
