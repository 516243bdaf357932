use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn renders_a_png() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("set.png");
    Command::cargo_bin("mandel")
        .unwrap()
        .args(&["-o", out.to_str().unwrap(), "-s", "32x24", "-i", "200", "-a", "1"])
        .assert()
        .success();
    let bytes = std::fs::read(&out).unwrap();
    assert_eq!(&bytes[1..4], b"PNG");
}

#[test]
fn multi_threaded_render_with_magnification() {
    // The CLI refuses more threads than there are cores.
    let threads = num_cpus::get().min(2).to_string();
    let dir = tempdir().unwrap();
    let out = dir.path().join("zoom.png");
    Command::cargo_bin("mandel")
        .unwrap()
        .args(&[
            "-o",
            out.to_str().unwrap(),
            "-s",
            "16x16",
            "-c",
            "-0.743643887,0.131825904",
            "-m",
            "100",
            "-t",
            &threads,
            "-a",
            "2",
            "-d",
        ])
        .assert()
        .success();
    assert!(out.exists());
}

#[test]
fn degenerate_size_is_refused() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("line.png");
    Command::cargo_bin("mandel")
        .unwrap()
        .args(&["-o", out.to_str().unwrap(), "-s", "1x100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 2x2"));
    assert!(!out.exists());
}

#[test]
fn bad_size_fails_validation() {
    Command::cargo_bin("mandel")
        .unwrap()
        .args(&["-o", "never.png", "-s", "huge"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not parse output image size"));
}
