//! End-to-end tests for the `manifold` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo;
use predicates::prelude::*;
use tempfile::TempDir;

/// A `manifold` command isolated from the user's config and environment.
fn manifold(dir: &Path) -> Command {
    let config = dir.join("manifold-test.toml");
    if !config.exists() {
        fs::write(&config, "").unwrap();
    }

    let mut cmd = cargo::cargo_bin_cmd!("manifold");
    cmd.current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("MANIFOLD_DATABASE_PASSWORD")
        .env_remove("MANIFOLD_FRAGMENTS_DIR")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(&config);
    cmd
}

fn create_wallet(dir: &Path, extra: &[&str]) {
    manifold(dir)
        .args(["new", "payments", "wallet", "--yes", "--database-password", "hunter2"])
        .args(extra)
        .assert()
        .success();
}

#[test]
fn test_help_flag() {
    let temp = TempDir::new().unwrap();
    manifold(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Manifold turns one service configuration"))
        .stdout(predicate::str::contains("generate"));
}

#[test]
fn test_version_flag() {
    let temp = TempDir::new().unwrap();
    manifold(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_new_command_help() {
    let temp = TempDir::new().unwrap();
    manifold(temp.path())
        .args(["new", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--site"))
        .stdout(predicate::str::contains("--cron"))
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn test_new_project_success() {
    let temp = TempDir::new().unwrap();
    create_wallet(temp.path(), &["--web", "-s", "spilnu", "-s", "lyckost"]);

    let project = temp.path().join("wallet");
    for file in [
        "service-config.json",
        "docker/create-database.sql",
        "project/.env.local",
        "project/.env.spilnu-stage",
        "project/.env.lyckost-production",
        "docker-compose.yml",
        "docker-compose.base.stage.yml",
        "docker-compose.spilnu.production.yml",
        ".gitlab-ci.yml",
        "app",
        "README.md",
    ] {
        assert!(project.join(file).is_file(), "missing {file}");
    }
    assert!(!project.join("docker-compose.support.yml").exists());

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(project.join("service-config.json")).unwrap())
            .unwrap();
    assert_eq!(saved["project"]["name"], "wallet");
    assert_eq!(saved["project"]["namespace"], "payments");

    let env = fs::read_to_string(project.join("project/.env.spilnu-stage")).unwrap();
    assert!(env.contains("DB_PASSWORD=hunter2"));
}

#[cfg(unix)]
#[test]
fn test_app_script_is_executable() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    create_wallet(temp.path(), &[]);

    let mode = fs::metadata(temp.path().join("wallet/app"))
        .unwrap()
        .permissions()
        .mode();
    assert_eq!(mode & 0o111, 0o111);
}

#[test]
fn test_new_with_local_support_writes_overlay() {
    let temp = TempDir::new().unwrap();
    create_wallet(temp.path(), &["--database", "--redis"]);
    assert!(temp.path().join("wallet/docker-compose.support.yml").is_file());
}

#[test]
fn test_new_project_dry_run() {
    let temp = TempDir::new().unwrap();
    manifold(temp.path())
        .args(["new", "payments", "wallet", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run"))
        .stdout(predicate::str::contains(".gitlab-ci.yml"))
        .stdout(predicate::str::contains("app (executable)"));

    assert!(!temp.path().join("wallet").exists());
}

#[test]
fn test_new_project_already_exists() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("wallet")).unwrap();

    manifold(temp.path())
        .args(["new", "payments", "wallet", "--yes"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"))
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn test_new_force_writes_into_existing_directory() {
    let temp = TempDir::new().unwrap();
    fs::create_dir(temp.path().join("wallet")).unwrap();
    create_wallet(temp.path(), &["--force"]);
    assert!(temp.path().join("wallet/.gitlab-ci.yml").is_file());
}

#[test]
fn test_generate_restores_artifacts() {
    let temp = TempDir::new().unwrap();
    create_wallet(temp.path(), &["--cron"]);
    let project = temp.path().join("wallet");
    let original_ci = fs::read_to_string(project.join(".gitlab-ci.yml")).unwrap();
    fs::remove_file(project.join(".gitlab-ci.yml")).unwrap();

    manifold(temp.path())
        .args(["generate", "wallet", "--database-password", "hunter2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Regenerated"));

    assert_eq!(
        fs::read_to_string(project.join(".gitlab-ci.yml")).unwrap(),
        original_ci
    );
}

#[test]
fn test_generate_reads_password_from_environment() {
    let temp = TempDir::new().unwrap();
    create_wallet(temp.path(), &[]);

    manifold(temp.path())
        .env("MANIFOLD_DATABASE_PASSWORD", "from-env")
        .args(["generate", "wallet"])
        .assert()
        .success();

    let env = fs::read_to_string(temp.path().join("wallet/project/.env.local")).unwrap();
    assert!(env.contains("DB_PASSWORD=from-env"));
}

#[test]
fn test_generate_dry_run_lists_paths() {
    let temp = TempDir::new().unwrap();
    create_wallet(temp.path(), &[]);

    manifold(temp.path())
        .args(["generate", "wallet", "--dry-run", "--database-password", "x"])
        .assert()
        .success()
        .stdout(predicate::str::contains("docker-compose.yml"));
}

#[test]
fn test_list_sites() {
    let temp = TempDir::new().unwrap();
    manifold(temp.path())
        .args(["list", "sites"])
        .assert()
        .success()
        .stdout(predicate::str::contains("spilnu.dk"))
        .stdout(predicate::str::contains("lyckost.se"));
}

#[test]
fn test_list_sites_json() {
    let temp = TempDir::new().unwrap();
    let out = manifold(temp.path())
        .args(["list", "sites", "--format", "json"])
        .output()
        .unwrap();
    assert!(out.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(rows[0]["name"], "spilnu");
    assert_eq!(rows[0]["detail"], "spilnu.dk");
}

#[test]
fn test_list_fragments() {
    let temp = TempDir::new().unwrap();
    manifold(temp.path())
        .args(["list", "fragments", "--format", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("compose/local.base.yml"));
}

#[test]
fn test_list_artifacts_of_project() {
    let temp = TempDir::new().unwrap();
    create_wallet(temp.path(), &[]);

    manifold(temp.path())
        .args(["list", "artifacts", "wallet", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("path,bytes\nservice-config.json,"));
}

#[test]
fn test_update_flow() {
    let temp = TempDir::new().unwrap();
    create_wallet(temp.path(), &[]);
    let updates = temp.path().join("updates");
    for name in ["1.0", "1.1", "notes"] {
        fs::create_dir_all(updates.join(name)).unwrap();
    }

    manifold(temp.path())
        .args(["update", "wallet", "--check", "--updates-dir"])
        .arg(&updates)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 pending update(s)"))
        .stdout(predicate::str::contains("1.1"))
        .stdout(predicate::str::contains("notes").not());

    manifold(temp.path())
        .args(["update", "wallet", "--yes", "--updates-dir"])
        .arg(&updates)
        .assert()
        .success()
        .stdout(predicate::str::contains("Applied 2 update(s)"));

    let project = temp.path().join("wallet");
    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(project.join("service-config.json")).unwrap())
            .unwrap();
    assert_eq!(saved["updates"], serde_json::json!(["1.0", "1.1"]));

    let backups = fs::read_dir(&project)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().ends_with(".bak"))
        .count();
    assert_eq!(backups, 1);

    manifold(temp.path())
        .args(["update", "wallet", "--check", "--updates-dir"])
        .arg(&updates)
        .assert()
        .success()
        .stdout(predicate::str::contains("up to date"));
}

#[test]
fn test_update_prompt_defaults_to_no() {
    let temp = TempDir::new().unwrap();
    create_wallet(temp.path(), &[]);
    let updates = temp.path().join("updates");
    fs::create_dir_all(updates.join("1.0")).unwrap();

    manifold(temp.path())
        .args(["update", "wallet", "--updates-dir"])
        .arg(&updates)
        .write_stdin("\n")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("[y/N]"))
        .stderr(predicate::str::contains("cancelled"));

    let project = temp.path().join("wallet");
    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(project.join("service-config.json")).unwrap())
            .unwrap();
    assert_eq!(saved["updates"], serde_json::json!([]));
}

#[test]
fn test_config_get() {
    let temp = TempDir::new().unwrap();
    manifold(temp.path())
        .args(["config", "get", "defaults.service_type"])
        .assert()
        .success()
        .stdout(predicate::str::contains("defaults.service_type = api"));
}

#[test]
fn test_config_file_changes_defaults() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("manifold-test.toml"),
        "[defaults]\nservice_type = \"web\"\nsites = [\"lyckost\"]\n",
    )
    .unwrap();
    create_wallet(temp.path(), &[]);

    let project = temp.path().join("wallet");
    assert!(project.join("project/.env.lyckost-stage").is_file());
    assert!(!project.join("project/.env.spilnu-stage").exists());
}

#[test]
fn test_init_local_writes_toml() {
    let temp = TempDir::new().unwrap();
    manifold(temp.path())
        .args(["init", "--local"])
        .assert()
        .success();

    let text = fs::read_to_string(temp.path().join(".manifold.toml")).unwrap();
    assert!(text.contains("[defaults]"));
}

#[test]
fn test_quiet_flag() {
    let temp = TempDir::new().unwrap();
    manifold(temp.path())
        .args(["-q", "new", "payments", "wallet", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_shell_completions() {
    let temp = TempDir::new().unwrap();
    manifold(temp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("complete"));
}
