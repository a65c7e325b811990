// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn mandelscope() -> Command {
    Command::cargo_bin("mandelscope").unwrap()
}

fn frames_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn dry_run_prints_the_schedule() {
    mandelscope()
        .args(&["--dry-run", "--size", "300x200", "--iterations", "100", "--speed", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("schedule [6, 12, 25, 50, 100]"))
        .stdout(predicate::str::contains("canvas 300x200"))
        .stdout(predicate::str::contains("real [-2.25, 0.75]"));
}

#[test]
fn dry_run_honours_explicit_bounds() {
    mandelscope()
        .args(&["--dry-run", "--leftlower", "-2,-1", "--rightupper", "1,1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("real [-2, 1]"))
        .stdout(predicate::str::contains("imaginary [-1, 1]"));
}

#[test]
fn renders_every_frame_of_the_schedule() {
    let dir = tempfile::tempdir().unwrap();
    mandelscope()
        .args(&["--size", "60x40", "--iterations", "40", "--speed", "2"])
        .args(&["--interval", "1", "--threads", "1", "--prefix", "t", "--output"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("wrote 3 frames"));

    assert_eq!(
        frames_in(dir.path()),
        vec![
            "t-s001-f000-i10.png",
            "t-s001-f001-i20.png",
            "t-s001-f002-i40.png"
        ]
    );
    let last = image::open(dir.path().join("t-s001-f002-i40.png")).unwrap().to_rgb8();
    assert_eq!(last.dimensions(), (60, 40));
}

#[test]
fn identical_runs_produce_identical_frames() {
    let render = || {
        let dir = tempfile::tempdir().unwrap();
        mandelscope()
            .args(&["--size", "300x200", "--origin", "-0.75,0", "--zoom", "1"])
            .args(&["--iterations", "100", "--speed", "2", "--interval", "1"])
            .args(&["--threads", "1", "--output"])
            .arg(dir.path())
            .assert()
            .success();
        fs::read(dir.path().join("mandel-s001-f004-i100.png")).unwrap()
    };
    assert_eq!(render(), render());
}

#[test]
fn speeds_that_would_hang_are_refused() {
    mandelscope()
        .args(&["--dry-run", "--speed", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Render speed must be greater than 1"));
}

#[test]
fn zero_zoom_is_refused() {
    mandelscope()
        .args(&["--dry-run", "--zoom", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Zoom must be greater than 0"));
}

#[test]
fn zooms_past_the_limit_name_the_range() {
    mandelscope()
        .args(&["--dry-run", "--zoom", "1e16"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Zoom must be greater than 0 and at most 1e15"));
}

#[test]
fn canvas_sizes_are_bounded() {
    for size in &["18446744073709551615x18446744073709551615", "6000000000x4000000000"] {
        mandelscope()
            .args(&["--dry-run", "--size", size])
            .assert()
            .failure()
            .stderr(predicate::str::contains("each at most 65535"))
            .stderr(predicate::str::contains("panicked").not());
    }
    mandelscope()
        .args(&["--dry-run", "--size", "65535x65535", "--downscale", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("canvas 16383x10922"));
}

#[test]
fn interactive_limits_match_the_command_line() {
    let dir = tempfile::tempdir().unwrap();
    mandelscope()
        .args(&["--interactive", "--size", "30x20", "--interval", "1", "--threads", "1"])
        .arg("--output")
        .arg(dir.path())
        .write_stdin("iterations 2000000\nzoom 1e16\nzoom 1e15\nin 5\nshow\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "error: Iteration count must be between 1 and 1000000",
        ))
        .stdout(predicate::str::contains(
            "error: Zoom must be greater than 0 and at most 1e15",
        ))
        .stdout(predicate::str::contains("schedule [6, 12, 25, 50, 100]"))
        .stdout(predicate::str::contains("zoom 1000000000000000\n"))
        .stdout(predicate::str::contains("zoom 5000000000000000").not());
}

#[test]
fn inverted_bounds_are_a_render_failure() {
    mandelscope()
        .args(&["--dry-run", "--leftlower", "1,1", "--rightupper", "-2,-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Render failure: invalid complex plane"));
}

#[test]
fn interactive_commands_recompute_the_schedule_and_pan() {
    let dir = tempfile::tempdir().unwrap();
    mandelscope()
        .args(&["--interactive", "--size", "30x20", "--interval", "1", "--threads", "1"])
        .arg("--output")
        .arg(dir.path())
        .write_stdin("iterations 1000\nspeed 10\nleft 25\nin 2\nbogus\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("schedule [7, 15, 31, 62, 125, 250, 500, 1000]"))
        .stdout(predicate::str::contains("schedule [10, 100, 1000]"))
        .stdout(predicate::str::contains("origin -1.5,0.0 zoom 1"))
        .stdout(predicate::str::contains("zoom 2"))
        .stdout(predicate::str::contains("error: Unknown command 'bogus'"))
        .stdout(predicate::str::contains("wrote 0 frames"));
}

#[test]
fn interactive_render_runs_to_completion_on_end_of_input() {
    let dir = tempfile::tempdir().unwrap();
    mandelscope()
        .args(&["--interactive", "--size", "30x20", "--interval", "1", "--threads", "1"])
        .args(&["--iterations", "20", "--output"])
        .arg(dir.path())
        .write_stdin("render\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("rendering"))
        .stdout(predicate::str::contains("wrote 2 frames"));
    assert_eq!(frames_in(dir.path()).len(), 2);
}
