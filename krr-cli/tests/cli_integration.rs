use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// `krr` with an isolated home and working directory, so no user
/// defaults file is picked up
fn krr(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("krr").unwrap();
    cmd.env("HOME", home.path())
        .env_remove("RUST_LOG")
        .env_remove("KRR_FORMATTER")
        .env_remove("KRR_MAX_WORKERS")
        .env_remove("KRR_CPU_MIN_VALUE")
        .env_remove("KRR_MEMORY_MIN_VALUE")
        .env_remove("KRR_PROMETHEUS_URL")
        .current_dir(home.path());
    cmd
}

#[test]
fn test_version_subcommand() {
    let home = TempDir::new().unwrap();
    krr(&home)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_lists_strategies() {
    let home = TempDir::new().unwrap();
    krr(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Strategies"))
        .stdout(predicate::str::contains("simple"))
        .stdout(predicate::str::contains("simple-limit"))
        .stdout(predicate::str::contains("version"));
}

#[test]
fn test_strategy_help_groups_options() {
    let home = TempDir::new().unwrap();
    krr(&home)
        .args(["simple", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Run KRR using the `simple` strategy"))
        .stdout(predicate::str::contains("Kubernetes Settings"))
        .stdout(predicate::str::contains("Prometheus EKS Settings"))
        .stdout(predicate::str::contains("Strategy Settings"))
        .stdout(predicate::str::contains("--cpu_percentile"))
        .stdout(predicate::str::contains("--formatter"))
        .stdout(predicate::str::contains("--openshift").not());
}

#[test]
fn test_plan_output_is_yaml() {
    let home = TempDir::new().unwrap();
    krr(&home)
        .args(["simple", "-q", "-n", "Default", "-r", "deployment"])
        .assert()
        .success()
        .stdout(predicate::str::contains("strategy: simple"))
        .stdout(predicate::str::contains("- default"))
        .stdout(predicate::str::contains("- Deployment"));
}

#[test]
fn test_plan_output_is_json_for_json_formatter() {
    let home = TempDir::new().unwrap();
    let output = krr(&home)
        .args(["simple-limit", "-q", "-f", "json", "--logtostderr"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["strategy"], "simple-limit");
    assert_eq!(value["other_args"]["cpu_limit"], 96.0);
}

#[test]
fn test_invalid_configuration_exits_zero() {
    let home = TempDir::new().unwrap();
    krr(&home)
        .args(["simple", "--cpu-min", "-5", "--logtostderr"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("cpu_min_value"));
}

#[test]
fn test_unknown_option_exits_one() {
    let home = TempDir::new().unwrap();
    krr(&home)
        .args(["simple", "--bogus"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--bogus"));
}

#[test]
fn test_defaults_file_changes_option_defaults() {
    let home = TempDir::new().unwrap();
    std::fs::create_dir_all(home.path().join(".krr")).unwrap();
    std::fs::write(
        home.path().join(".krr").join("krr.toml"),
        "formatter = \"json\"\ncpu_min_value = 25\n",
    )
    .unwrap();

    let output = krr(&home).args(["simple", "-q"]).output().unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["format"], "json");
    assert_eq!(value["cpu_min_value"], 25);
}

#[test]
fn test_env_overrides_defaults() {
    let home = TempDir::new().unwrap();
    let output = krr(&home)
        .env("KRR_MAX_WORKERS", "3")
        .args(["simple", "-q", "-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["max_workers"], 3);
}
