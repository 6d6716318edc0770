#![allow(dead_code)]

use assert_cmd::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

pub const NAMESPACE: &str = "txn";
pub const TOKEN: &str = "integration-token";

/// Stand-in for the mounted service-account directory.
pub struct ServiceAccount {
    dir: TempDir,
}

impl ServiceAccount {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        fs::write(dir.path().join("token"), format!("{}\n", TOKEN)).expect("token file");
        fs::write(dir.path().join("namespace"), NAMESPACE).expect("namespace file");
        ServiceAccount { dir }
    }

    pub fn without_token() -> Self {
        let account = Self::new();
        fs::remove_file(account.dir.path().join("token")).expect("remove token");
        account
    }
}

pub fn queryapi(api_server: &str, account: &ServiceAccount) -> Command {
    let mut cmd = Command::cargo_bin("queryapi").expect("binary exists");
    cmd.env_remove("RUST_LOG")
        .env("KUBE_API_SERVER", api_server)
        .env("KUBE_TOKEN_FILE", account.dir.path().join("token"))
        .env("KUBE_NAMESPACE_FILE", account.dir.path().join("namespace"))
        .env("KUBE_CA_FILE", account.dir.path().join("ca.crt"));
    cmd
}

pub fn querydb() -> Command {
    let mut cmd = Command::cargo_bin("querydb").expect("binary exists");
    cmd.env_remove("RUST_LOG")
        .args(["-d", "txn", "-u", "txn", "-s", "secret"]);
    cmd
}

pub const PODS: &str = r#"{
    "kind": "PodList",
    "items": [
        { "metadata": { "name": "eap-0" }, "status": { "phase": "Running" } },
        { "metadata": { "name": "eap-1" }, "status": { "phase": "Succeeded" } },
        { "metadata": { "name": "eap-2" }, "status": { "phase": "Pending" } }
    ]
}"#;
