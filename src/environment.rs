use std::path::PathBuf;
use tracing::debug;

pub const DEFAULT_API_SERVER: &str = "https://openshift.default.svc";
pub const DEFAULT_TOKEN_FILE: &str = "/var/run/secrets/kubernetes.io/serviceaccount/token";
pub const DEFAULT_NAMESPACE_FILE: &str = "/var/run/secrets/kubernetes.io/serviceaccount/namespace";
pub const DEFAULT_CA_FILE: &str = "/var/run/secrets/kubernetes.io/serviceaccount/ca.crt";

/// Where the API server lives and where its service-account secrets are mounted.
#[derive(Debug, Clone)]
pub struct Environment {
    pub kube_api_server: String,
    pub token_file: PathBuf,
    pub namespace_file: PathBuf,
    pub ca_file: PathBuf,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            kube_api_server: var_or("KUBE_API_SERVER", DEFAULT_API_SERVER),
            token_file: var_or("KUBE_TOKEN_FILE", DEFAULT_TOKEN_FILE).into(),
            namespace_file: var_or("KUBE_NAMESPACE_FILE", DEFAULT_NAMESPACE_FILE).into(),
            ca_file: var_or("KUBE_CA_FILE", DEFAULT_CA_FILE).into(),
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

fn var_or(name: &str, default: &str) -> String {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => {
            debug!("{} loaded from environment: {}", name, value);
            value
        }
        _ => {
            debug!("{} not set, defaulting to {}", name, default);
            default.to_string()
        }
    }
}
