use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn vorschau_cmd() -> Command {
    Command::cargo_bin("vorschau").unwrap()
}

/// Helper to scaffold a minimal Vite project
fn write_vite_project(dir: &Path) {
    fs::write(
        dir.join("package.json"),
        r#"{
  "name": "acme-shop",
  "scripts": { "build": "vite build" },
  "devDependencies": { "vite": "^5.0.0" }
}"#,
    )
    .unwrap();
    fs::write(
        dir.join("vite.config.js"),
        "export default {\n  plugins: [],\n};\n",
    )
    .unwrap();
}

fn write_config(dir: &Path) {
    fs::write(
        dir.join("vorschau.toml"),
        "[previews]\nrepo_url = \"https://git.example.com/acme/shop-previews.git\"\n",
    )
    .unwrap();
}

// --- detect command ---

#[test]
fn test_detect_vite_project() {
    let tmp = TempDir::new().unwrap();
    write_vite_project(tmp.path());

    vorschau_cmd()
        .arg("detect")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Framework:        Vite"))
        .stdout(predicate::str::contains("Output directory: dist"));
}

#[test]
fn test_detect_prefers_next_over_vite() {
    let tmp = TempDir::new().unwrap();
    write_vite_project(tmp.path());
    fs::write(tmp.path().join("next.config.js"), "module.exports = {};\n").unwrap();

    vorschau_cmd()
        .arg("detect")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Next.js"))
        .stdout(predicate::str::contains("Output directory: .next"));
}

#[test]
fn test_detect_react_cra() {
    let tmp = TempDir::new().unwrap();
    fs::write(
        tmp.path().join("package.json"),
        r#"{ "dependencies": { "react-scripts": "5.0.1" } }"#,
    )
    .unwrap();

    vorschau_cmd()
        .arg("detect")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Create React App"))
        .stdout(predicate::str::contains("Output directory: build"));
}

#[test]
fn test_detect_generic_fallback() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("package.json"), "{}").unwrap();

    vorschau_cmd()
        .arg("detect")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("generic"))
        .stdout(predicate::str::contains("Output directory: dist"));
}

#[test]
fn test_detect_json_output() {
    let tmp = TempDir::new().unwrap();
    write_vite_project(tmp.path());
    fs::write(tmp.path().join("next.config.js"), "module.exports = {};\n").unwrap();

    let output = vorschau_cmd()
        .args(["detect", "--json"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["framework"], "next");
    assert_eq!(parsed["output_dir"], ".next");
    assert_eq!(parsed["config_file"], "next.config.js");
}

#[test]
fn test_detect_missing_manifest() {
    let tmp = TempDir::new().unwrap();

    vorschau_cmd()
        .arg("detect")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("package.json"));
}

#[test]
fn test_detect_with_path_argument() {
    let tmp = TempDir::new().unwrap();
    let project = tmp.path().join("web");
    fs::create_dir(&project).unwrap();
    write_vite_project(&project);

    vorschau_cmd()
        .args(["detect", project.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Vite"));
}

// --- init command ---

#[test]
fn test_init_creates_config() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("package.json"), r#"{ "name": "acme-shop" }"#).unwrap();

    vorschau_cmd()
        .args([
            "init",
            "--repo-url",
            "https://git.example.com/acme/shop-previews.git",
            "--yes",
        ])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Created vorschau.toml"));

    let config = fs::read_to_string(tmp.path().join("vorschau.toml")).unwrap();
    assert!(config.contains("repo_url = \"https://git.example.com/acme/shop-previews.git\""));
    assert!(config.contains("name = \"acme-shop\""));
    assert!(config.contains("branch_prefix = \"previews/\""));
    // No hosting details were given, so no [hosting] section
    assert!(!config.contains("[hosting]"));
}

#[test]
fn test_init_with_hosting_flags() {
    let tmp = TempDir::new().unwrap();

    vorschau_cmd()
        .args([
            "init",
            "--repo-url",
            "https://git.example.com/acme/shop-previews.git",
            "--api-url",
            "https://git.example.com",
            "--yes",
        ])
        .current_dir(tmp.path())
        .assert()
        .success();

    let config = fs::read_to_string(tmp.path().join("vorschau.toml")).unwrap();
    assert!(config.contains("[hosting]"));
    // Owner and repo fall back to the segments of the repo URL
    assert!(config.contains("owner = \"acme\""));
    assert!(config.contains("repo = \"shop-previews\""));
}

#[test]
fn test_init_refuses_existing_config() {
    let tmp = TempDir::new().unwrap();
    write_config(tmp.path());

    vorschau_cmd()
        .args([
            "init",
            "--repo-url",
            "https://git.example.com/acme/other.git",
            "--yes",
        ])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_init_yes_requires_repo_url() {
    let tmp = TempDir::new().unwrap();

    vorschau_cmd()
        .args(["init", "--yes"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--repo-url"));
}

// --- deploy command ---

#[test]
fn test_deploy_dry_run_shows_plan() {
    let tmp = TempDir::new().unwrap();
    write_vite_project(tmp.path());
    write_config(tmp.path());
    let original = fs::read_to_string(tmp.path().join("vite.config.js")).unwrap();

    vorschau_cmd()
        .args(["deploy", "--dry-run", "--branch", "previews/manual-check"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Deployment plan"))
        .stdout(predicate::str::contains("previews/manual-check"))
        .stdout(predicate::str::contains("/shop-previews"))
        .stdout(predicate::str::contains("Dry run complete"));

    // A dry run never touches config files
    let after = fs::read_to_string(tmp.path().join("vite.config.js")).unwrap();
    assert_eq!(original, after);
}

#[test]
fn test_deploy_requires_config() {
    let tmp = TempDir::new().unwrap();
    write_vite_project(tmp.path());

    vorschau_cmd()
        .args(["deploy", "--dry-run"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

// --- list and prune commands ---

#[test]
fn test_list_requires_hosting_section() {
    let tmp = TempDir::new().unwrap();
    write_config(tmp.path());

    vorschau_cmd()
        .arg("list")
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("[hosting]"));
}

#[test]
fn test_prune_requires_hosting_section() {
    let tmp = TempDir::new().unwrap();
    write_config(tmp.path());

    vorschau_cmd()
        .args(["prune", "--dry-run"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("[hosting]"));
}

// --- global flags ---

#[test]
fn test_dir_flag_changes_working_directory() {
    let tmp = TempDir::new().unwrap();
    let project = tmp.path().join("web");
    fs::create_dir(&project).unwrap();
    write_vite_project(&project);

    vorschau_cmd()
        .args(["-C", project.to_str().unwrap(), "detect"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Vite"));
}
