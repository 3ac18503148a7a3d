use super::{load_settings_from, normalize_database_url, prepare_database_url, Settings};

use std::{
    collections::HashMap,
    env, fs,
    path::Path,
    time::{SystemTime, UNIX_EPOCH},
};

fn temp_root(prefix: &str) -> std::path::PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    env::temp_dir().join(format!("{prefix}_{suffix}"))
}

#[test]
fn defaults_apply_without_file_or_env() {
    let settings = load_settings_from(Path::new("/nonexistent/server.toml"), |_| None);
    let defaults = Settings::default();
    assert_eq!(settings.server_bind, defaults.server_bind);
    assert_eq!(settings.database_url, "sqlite://./data/events.db");
    assert_eq!(settings.server_bind, "127.0.0.1:3000");
}

#[test]
fn env_overrides_file_values() {
    let root = temp_root("event_table_server_config");
    fs::create_dir_all(&root).expect("temp root");
    let path = root.join("server.toml");
    fs::write(
        &path,
        "bind_addr = \"0.0.0.0:4000\"\ndatabase_url = \"sqlite://file.db\"\nmax_body_bytes = 1024\n",
    )
    .expect("write settings");

    let vars = HashMap::from([("APP__DATABASE_URL", "sqlite::memory:")]);
    let settings = load_settings_from(&path, |key| vars.get(key).map(|v| v.to_string()));

    assert_eq!(settings.server_bind, "0.0.0.0:4000");
    assert_eq!(settings.database_url, "sqlite::memory:");
    assert_eq!(settings.max_body_bytes, 1024);

    fs::remove_dir_all(root).expect("cleanup");
}

#[test]
fn unparsable_numeric_env_is_ignored() {
    let settings = load_settings_from(Path::new("/nonexistent/server.toml"), |key| {
        (key == "APP__MAX_BODY_BYTES").then(|| "lots".to_string())
    });
    assert_eq!(settings.max_body_bytes, Settings::default().max_body_bytes);
}

#[test]
fn normalizes_plain_file_path_to_sqlite_url() {
    assert_eq!(
        normalize_database_url("./data/test.db"),
        "sqlite://./data/test.db"
    );
}

#[test]
fn keeps_memory_and_prefixed_urls() {
    assert_eq!(normalize_database_url("sqlite::memory:"), "sqlite::memory:");
    assert_eq!(
        normalize_database_url("  sqlite://events.db "),
        "sqlite://events.db"
    );
}

#[test]
fn empty_url_falls_back_to_default() {
    assert_eq!(normalize_database_url("   "), Settings::default().database_url);
}

#[test]
fn creates_parent_dir_for_sqlite_url() {
    let root = temp_root("event_table_server_test");
    let db_path = root.join("data").join("test.db");

    prepare_database_url(db_path.to_string_lossy().as_ref()).expect("prepare db url");
    assert!(root.join("data").exists());

    fs::remove_dir_all(root).expect("cleanup");
}

#[tokio::test]
async fn prepared_database_url_creates_openable_sqlite_file() {
    let root = temp_root("event_table_server_open_test");
    let db_path = root.join("nested").join("events.db");

    let prepared = prepare_database_url(db_path.to_string_lossy().as_ref()).expect("prepare");
    let storage = storage::Storage::new(&prepared).await.expect("open sqlite");
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should be created: {}",
        db_path.display()
    );

    fs::remove_dir_all(root).expect("cleanup");
}
