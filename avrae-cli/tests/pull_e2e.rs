//! End-to-end pull runs against the fixture server.

mod common;

use std::fs;

use predicates::prelude::*;
use tempfile::TempDir;

use common::{collection_body, gvars_body, serve, sync_cmd, Route};

fn seed_configs(repo: &TempDir) {
    fs::write(
        repo.path().join("collections.json"),
        r#"{"5fa19a98": "API Collection Test"}"#,
    )
    .expect("collections config");
    fs::write(
        repo.path().join("gvars.json"),
        r#"{"abc123": "gvars/spell-list.gvar"}"#,
    )
    .expect("gvars config");
}

fn fetch_routes() -> Vec<Route> {
    vec![
        Route::json("GET", "/workshop/collection/5fa19a98/full", collection_body()),
        Route::json("GET", "/customizations/gvars", gvars_body("gvar content")),
    ]
}

#[test]
fn pull_materializes_the_tracked_tree() {
    let repo = TempDir::new().expect("repo");
    seed_configs(&repo);
    let (base_url, received, handle) = serve(fetch_routes(), 2);

    sync_cmd()
        .env("AVRAE_TOKEN", "secret-token")
        .args(["pull", "--api-base", &base_url])
        .arg("--base-path")
        .arg(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("written"));
    handle.join().expect("server");

    let dir = repo.path().join("API Collection Test");
    assert_eq!(
        fs::read_to_string(dir.join("test-alias/test-alias.alias")).expect("read"),
        "alias code"
    );
    assert_eq!(
        fs::read_to_string(dir.join("test-alias/test-subalias/test-subalias.alias"))
            .expect("read"),
        "sub code"
    );
    assert_eq!(
        fs::read_to_string(dir.join("test-alias/test-subalias/test-subalias.md")).expect("read"),
        "sub docs"
    );
    assert_eq!(
        fs::read_to_string(dir.join("snippets/test123.snippet")).expect("read"),
        "snippet code"
    );
    assert_eq!(
        fs::read_to_string(repo.path().join("gvars/spell-list.gvar")).expect("read"),
        "gvar content"
    );

    // Token flows through to every request.
    let log = received.lock().expect("lock");
    assert!(log
        .iter()
        .all(|r| r.authorization.as_deref() == Some("secret-token")));
}

#[test]
fn second_pull_is_a_no_op() {
    let repo = TempDir::new().expect("repo");
    seed_configs(&repo);

    let (base_url, _received, handle) = serve(fetch_routes(), 2);
    sync_cmd()
        .env("AVRAE_TOKEN", "t")
        .args(["pull", "--api-base", &base_url])
        .arg("--base-path")
        .arg(repo.path())
        .assert()
        .success();
    handle.join().expect("server");

    let (base_url, _received, handle) = serve(fetch_routes(), 2);
    sync_cmd()
        .env("AVRAE_TOKEN", "t")
        .args(["pull", "--api-base", &base_url])
        .arg("--base-path")
        .arg(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("(0 written"));
    handle.join().expect("server");
}

#[test]
fn dry_run_pull_reports_but_writes_nothing() {
    let repo = TempDir::new().expect("repo");
    seed_configs(&repo);
    let (base_url, _received, handle) = serve(fetch_routes(), 2);

    sync_cmd()
        .env("AVRAE_TOKEN", "t")
        .args(["pull", "--dry-run", "--api-base", &base_url])
        .arg("--base-path")
        .arg(repo.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("[dry-run]"));
    handle.join().expect("server");

    assert!(!repo.path().join("API Collection Test").exists());
    assert!(!repo.path().join("gvars").exists());
}

#[test]
fn config_paths_come_from_the_environment() {
    let repo = TempDir::new().expect("repo");
    fs::write(
        repo.path().join("my-collections.json"),
        r#"{"5fa19a98": "API Collection Test"}"#,
    )
    .expect("collections config");
    fs::write(repo.path().join("my-gvars.json"), "{}").expect("gvars config");
    let (base_url, _received, handle) = serve(
        vec![Route::json(
            "GET",
            "/workshop/collection/5fa19a98/full",
            collection_body(),
        )],
        1,
    );

    sync_cmd()
        .env("AVRAE_TOKEN", "t")
        .env("COLLECTIONS_CONFIG", "my-collections.json")
        .env("GVARS_CONFIG", "my-gvars.json")
        .env("GITHUB_WORKSPACE", repo.path())
        .args(["pull", "--api-base", &base_url])
        .assert()
        .success();
    handle.join().expect("server");

    assert!(repo
        .path()
        .join("API Collection Test/test-alias/test-alias.alias")
        .exists());
}
