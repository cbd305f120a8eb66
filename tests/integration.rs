//! End-to-end tests: the `contacts` binary against a temporary database, and
//! a live HTTP server on a free port.

use std::path::{Path, PathBuf};
use std::process::Command;

use contact_manager::config::{Config, DbConfig, ServerConfig};
use contact_manager::server::run_server;
use serde_json::{json, Value};
use tempfile::TempDir;

fn contacts_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("contacts");
    path
}

fn run_contacts(data_dir: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = contacts_binary();
    let output = Command::new(&binary)
        .current_dir(data_dir)
        .env("DB_URI", data_dir.join("data"))
        .env("DB_NAME", "contacts")
        .env("COLLECTION_NAME", "contacts")
        .env("RUST_LOG", "warn")
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run contacts binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

fn add_args<'a>(name: &'a str, email: &'a str) -> Vec<&'a str> {
    vec![
        "add",
        "--name",
        name,
        "--email",
        email,
        "--phone",
        "555-0100",
        "--address",
        "1 Main St",
    ]
}

#[test]
fn test_init_creates_database() {
    let tmp = TempDir::new().unwrap();
    let (stdout, stderr, success) = run_contacts(tmp.path(), &["init"]);
    assert!(success, "init failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("initialized"));
    assert!(tmp.path().join("data/contacts.sqlite").exists());
}

#[test]
fn test_init_idempotent() {
    let tmp = TempDir::new().unwrap();
    let (_, _, first) = run_contacts(tmp.path(), &["init"]);
    assert!(first, "First init failed");
    let (_, _, second) = run_contacts(tmp.path(), &["init"]);
    assert!(second, "Second init failed (not idempotent)");
}

#[test]
fn test_missing_config_fails() {
    let tmp = TempDir::new().unwrap();
    let output = Command::new(contacts_binary())
        .current_dir(tmp.path())
        .env_remove("DB_URI")
        .env_remove("DB_NAME")
        .env_remove("COLLECTION_NAME")
        .arg("list")
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("DB_URI"), "stderr: {}", stderr);
}

#[test]
fn test_cli_crud_and_search() {
    let tmp = TempDir::new().unwrap();
    run_contacts(tmp.path(), &["init"]);

    let (stdout, stderr, success) = run_contacts(tmp.path(), &add_args("John Doe", "john@example.com"));
    assert!(success, "add failed: {}", stderr);
    let john: Value = serde_json::from_str(&stdout).unwrap();
    let id = john["id"].as_str().unwrap().to_string();

    run_contacts(tmp.path(), &add_args("Jane", "jane@example.org"));

    let (stdout, _, success) = run_contacts(tmp.path(), &["list"]);
    assert!(success);
    let all: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (stdout, _, success) = run_contacts(tmp.path(), &["get", &id]);
    assert!(success);
    let fetched: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(fetched, john);

    let (stdout, _, _) = run_contacts(tmp.path(), &["search", "JOHN"]);
    let found: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(found, json!([john]));

    let (stdout, _, success) = run_contacts(tmp.path(), &["delete", &id]);
    assert!(success);
    assert!(stdout.contains("deleted"));

    let (_, stderr, success) = run_contacts(tmp.path(), &["get", &id]);
    assert!(!success);
    assert!(stderr.contains("Contact not found"));
}

#[test]
fn test_cli_add_invalid_email_fails() {
    let tmp = TempDir::new().unwrap();
    let (_, stderr, success) = run_contacts(tmp.path(), &add_args("John", "not-an-email"));
    assert!(!success);
    assert!(stderr.contains("email"), "stderr: {}", stderr);

    let (stdout, _, _) = run_contacts(tmp.path(), &["list"]);
    let all: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(all, json!([]));
}

#[test]
fn test_cli_update_reports_unchanged() {
    let tmp = TempDir::new().unwrap();
    let (stdout, _, _) = run_contacts(tmp.path(), &add_args("John Doe", "john@example.com"));
    let john: Value = serde_json::from_str(&stdout).unwrap();
    let id = john["id"].as_str().unwrap();

    let mut args = vec!["update", id];
    args.extend(add_args("John Doe", "john@example.com").into_iter().skip(1));
    let (stdout, stderr, success) = run_contacts(tmp.path(), &args);
    assert!(success);
    assert!(stderr.contains("No changes made"));
    let unchanged: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(unchanged, john);

    let mut args = vec!["update", id];
    args.extend(add_args("Johnny", "john@example.com").into_iter().skip(1));
    let (stdout, _, success) = run_contacts(tmp.path(), &args);
    assert!(success);
    let updated: Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(updated["name"], "Johnny");
    assert_eq!(updated["id"], id);
}

// ─── Live server ────────────────────────────────────────────────────

fn find_free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

fn test_config(tmp: &TempDir, port: u16) -> Config {
    Config {
        db: DbConfig {
            uri: tmp.path().join("data"),
            name: "contacts".to_string(),
            collection: "contacts".to_string(),
        },
        server: ServerConfig {
            bind: format!("127.0.0.1:{}", port),
            strict_status: false,
        },
    }
}

async fn wait_for_server(port: u16) {
    let client = reqwest::Client::new();
    let url = format!("http://127.0.0.1:{}/health", port);
    for _ in 0..50 {
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        if let Ok(resp) = client.get(&url).send().await {
            if resp.status().is_success() {
                return;
            }
        }
    }
    panic!("Server did not become ready within 5 seconds");
}

#[tokio::test]
async fn test_live_server_round_trip() {
    let tmp = TempDir::new().unwrap();
    let port = find_free_port();
    let cfg = test_config(&tmp, port);

    let server = tokio::spawn(async move { run_server(&cfg).await });
    wait_for_server(port).await;

    let client = reqwest::Client::new();
    let base = format!("http://127.0.0.1:{}", port);

    let created: Value = client
        .post(format!("{}/contacts", base))
        .json(&json!({
            "name": "John Doe",
            "email": "john@example.com",
            "phone": "555-0100",
            "address": "1 Main St"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = created["id"].as_str().unwrap();

    let fetched: Value = client
        .get(format!("{}/contacts/{}", base, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(fetched, created);

    let found: Value = client
        .get(format!("{}/contacts/search/JOHN", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(found, json!([created]));

    let missing: Value = client
        .get(format!("{}/contacts/xyz", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(missing, json!({"error": "Contact not found"}));

    server.abort();
}
