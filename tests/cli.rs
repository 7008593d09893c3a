use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use contact_book::config::load_config;
use contact_book::store::open_store;
use contact_book::{ContactGroup, Gender, NewContact};
use tempfile::TempDir;

fn contacts_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_contacts"))
}

fn setup_test_env() -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let config_content = format!(
        r#"[db]
path = "{}/data/contacts.sqlite"

[storage]
backend = "sqlite"

[server]
bind = "127.0.0.1:0"
"#,
        root.display()
    );

    let config_path = config_dir.join("contacts.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_contacts(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = contacts_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run contacts binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Insert contacts through the library so the CLI has something to read.
async fn seed(config_path: &Path) {
    let cfg = load_config(config_path).unwrap();
    let store = open_store(&cfg).await.unwrap();
    store
        .create(NewContact::new(
            "Sara",
            "Ahmadi",
            "09120000001",
            ContactGroup::Doctors,
            Gender::Female,
        ))
        .await
        .unwrap();
    store
        .create(NewContact {
            email: Some("reza@example.com".into()),
            ..NewContact::new(
                "Reza",
                "Karimi",
                "09120000002",
                ContactGroup::Friends,
                Gender::Male,
            )
        })
        .await
        .unwrap();
}

#[test]
fn test_init_creates_database() {
    let (tmp, config_path) = setup_test_env();

    let (stdout, stderr, success) = run_contacts(&config_path, &["init"]);
    assert!(success, "init failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("initialized"));
    assert!(tmp.path().join("data/contacts.sqlite").exists());
}

#[test]
fn test_init_idempotent() {
    let (_tmp, config_path) = setup_test_env();

    let (_, _, success1) = run_contacts(&config_path, &["init"]);
    assert!(success1, "First init failed");

    let (_, _, success2) = run_contacts(&config_path, &["init"]);
    assert!(success2, "Second init failed (not idempotent)");
}

#[test]
fn test_list_empty() {
    let (_tmp, config_path) = setup_test_env();

    run_contacts(&config_path, &["init"]);
    let (stdout, stderr, success) = run_contacts(&config_path, &["list"]);
    assert!(success, "list failed: {}", stderr);
    assert!(stdout.contains("No contacts."));
}

#[tokio::test]
async fn test_list_filters_and_get_shows_details() {
    let (_tmp, config_path) = setup_test_env();
    run_contacts(&config_path, &["init"]);
    seed(&config_path).await;

    let (stdout, _, success) = run_contacts(&config_path, &["list"]);
    assert!(success);
    assert!(stdout.contains("Sara Ahmadi"));
    assert!(stdout.contains("Reza Karimi"));
    assert!(stdout.contains("2 contact(s)"));
    assert!(stdout.find("Ahmadi").unwrap() < stdout.find("Karimi").unwrap());

    let (stdout, _, _) = run_contacts(&config_path, &["list", "--sort-by", "lastName", "--desc"]);
    assert!(stdout.find("Karimi").unwrap() < stdout.find("Ahmadi").unwrap());

    let (stdout, _, _) = run_contacts(&config_path, &["list", "--group", "friends"]);
    assert!(stdout.contains("Reza Karimi"));
    assert!(!stdout.contains("Sara"));

    let (stdout, _, _) = run_contacts(&config_path, &["list", "--search", "AHM"]);
    assert!(stdout.contains("Sara Ahmadi"));
    assert!(stdout.contains("1 contact(s)"));

    let (stdout, stderr, success) = run_contacts(&config_path, &["get", "2"]);
    assert!(success, "get failed: {}", stderr);
    assert!(stdout.contains("name:         Reza Karimi"));
    assert!(stdout.contains("email:        reza@example.com"));
}

#[test]
fn test_list_rejects_unknown_group() {
    let (_tmp, config_path) = setup_test_env();
    run_contacts(&config_path, &["init"]);

    let (_, stderr, success) = run_contacts(&config_path, &["list", "--group", "enemies"]);
    assert!(!success);
    assert!(stderr.contains("invalid group"));
}

#[test]
fn test_get_missing_fails() {
    let (_tmp, config_path) = setup_test_env();
    run_contacts(&config_path, &["init"]);

    let (_, stderr, success) = run_contacts(&config_path, &["get", "42"]);
    assert!(!success);
    assert!(stderr.contains("contact not found: 42"));
}

#[tokio::test]
async fn test_delete_then_delete_again_fails() {
    let (_tmp, config_path) = setup_test_env();
    run_contacts(&config_path, &["init"]);
    seed(&config_path).await;

    let (stdout, stderr, success) = run_contacts(&config_path, &["delete", "1"]);
    assert!(success, "delete failed: {}", stderr);
    assert!(stdout.contains("Deleted contact 1."));

    let (_, _, success) = run_contacts(&config_path, &["delete", "1"]);
    assert!(!success);

    let (stdout, _, _) = run_contacts(&config_path, &["list"]);
    assert!(!stdout.contains("Sara"));
    assert!(stdout.contains("1 contact(s)"));
}

#[test]
fn test_missing_config_fails() {
    let tmp = TempDir::new().unwrap();
    let (_, _, success) = run_contacts(&tmp.path().join("nope.toml"), &["list"]);
    assert!(!success);
}
