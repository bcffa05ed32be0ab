use std::{fs, path::Path};

use assert_cmd::Command;

const HEADER: &str =
    "timestamp,experiment,name,size,amount,warmup,duration,amount_avg,no_warmup_avg";

fn write_run(dir: &Path, stem: &str, rows: &[(&str, &str, u64, f64)]) {
    let mut body = format!("{HEADER}\n");
    for (experiment, name, size, value) in rows {
        body.push_str(&format!("1700000000,{experiment},{name},{size},100,3,1,1,{value}\n"));
    }
    fs::write(dir.join(format!("{stem}.csv")), body).unwrap();
}

fn write_config(dir: &Path, files: &[(&str, &str)]) -> std::path::PathBuf {
    let mut yaml = format!(
        "name: cli test\nroot_path: {}\noutput_filename: chart.png\ndpi: 20\nfile_names:\n",
        dir.display()
    );
    for (file, label) in files {
        yaml.push_str(&format!("  - file: {file}\n    label: {label}\n"));
    }
    let path = dir.join("config.yaml");
    fs::write(&path, yaml).unwrap();
    path
}

fn complete_run(dir: &Path, stem: &str, factor: f64) {
    let mut rows = Vec::new();
    for size in [10, 100] {
        let base = size as f64;
        rows.push(("e1", "io", size, base));
        rows.push(("e1", "native opt", size, base * 2.0));
        rows.push(("e1", "impl_a (fast)", size, base * factor));
    }
    write_run(dir, stem, &rows);
}

fn perf_report(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_perf-report"));
    cmd.current_dir(dir);
    cmd
}

#[test]
fn test_cli_exits_with_success_on_help() {
    let dir = tempfile::tempdir().unwrap();
    perf_report(dir.path()).arg("--help").assert().success();
}

#[test]
fn test_print_lists_bars_per_panel() {
    let dir = tempfile::tempdir().unwrap();
    complete_run(dir.path(), "experiment_results", 3.0);
    complete_run(dir.path(), "experiment_results_usedonly", 4.0);
    complete_run(dir.path(), "experiment_results_usedonly_opt", 5.0);
    let config = write_config(
        dir.path(),
        &[
            ("experiment_results", "all_func"),
            ("experiment_results_usedonly", "usedonly_func"),
            ("experiment_results_usedonly_opt", "usedonly_func_size_opt"),
        ],
    );

    let output = perf_report(dir.path())
        .args(["print", "-c"])
        .arg(&config)
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("2 panels, 5 bars each"));
    assert!(stdout.contains("usedonly_func_size_opt: impl_a"));
    assert!(!stdout.contains("(fast)"));
}

#[test]
fn test_print_json_model() {
    let dir = tempfile::tempdir().unwrap();
    complete_run(dir.path(), "a", 3.0);
    complete_run(dir.path(), "b", 4.0);
    let config = write_config(dir.path(), &[("a", "A"), ("b", "B")]);

    let output = perf_report(dir.path())
        .args(["print", "--json", "-c"])
        .arg(&config)
        .output()
        .unwrap();
    assert!(output.status.success());
    let model: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let panels = model["panels"].as_array().unwrap();
    assert_eq!(panels.len(), 2);
    for panel in panels {
        assert_eq!(panel["bars"].as_array().unwrap().len(), 2 + 2);
    }
    assert_eq!(model["y_scale"], "Log");
    assert!(model["y_range"][0].as_f64().unwrap() < 10.0);
}

#[test]
fn test_plot_fails_on_missing_file_without_output() {
    let dir = tempfile::tempdir().unwrap();
    complete_run(dir.path(), "a", 3.0);
    let config = write_config(dir.path(), &[("a", "A"), ("missing", "M")]);

    perf_report(dir.path())
        .args(["plot", "-c"])
        .arg(&config)
        .assert()
        .failure();
    assert!(!dir.path().join("chart.png").exists());
}

#[test]
fn test_plot_fails_on_missing_baseline_size() {
    let dir = tempfile::tempdir().unwrap();
    write_run(
        dir.path(),
        "a",
        &[
            ("e1", "io", 10, 5.0),
            ("e1", "native opt", 10, 2.0),
            ("e1", "native opt", 100, 20.0),
            ("e1", "impl_a", 100, 30.0),
        ],
    );
    let config = write_config(dir.path(), &[("a", "A")]);

    let output = perf_report(dir.path())
        .args(["plot", "-c"])
        .arg(&config)
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No rows for file 'a', name 'io', size 100"));
    assert!(!dir.path().join("chart.png").exists());
}

#[test]
fn test_root_override() {
    let dir = tempfile::tempdir().unwrap();
    let data = dir.path().join("data");
    fs::create_dir(&data).unwrap();
    complete_run(&data, "a", 3.0);
    let config = write_config(dir.path(), &[("a", "A")]);

    perf_report(dir.path())
        .args(["print", "-c"])
        .arg(&config)
        .assert()
        .failure();
    perf_report(dir.path())
        .args(["print", "-c"])
        .arg(&config)
        .arg("--root")
        .arg(&data)
        .assert()
        .success();
}
