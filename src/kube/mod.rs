pub mod error;
pub mod tools;
pub mod types;

pub use error::KubeAgentError;
pub use tools::{ConfigMapTool, PodsTool, RemoveOutcome};

use crate::environment::Environment;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::path::Path;
use tracing::*;

pub const MERGE_PATCH: &str = "application/merge-patch+json";
pub const JSON_PATCH: &str = "application/json-patch+json";

/// Thin client over the orchestration platform's REST API.
///
/// Holds the bearer token and namespace read from the mounted service
/// account, and a `reqwest::Client` trusting the mounted CA when present.
#[derive(Clone)]
pub struct KubeAgent {
    kube_api_server: reqwest::Url,
    token: String,
    namespace: String,
    client: reqwest::Client,
}

impl KubeAgent {
    pub fn new(
        kube_api_server: String,
        token: String,
        namespace: String,
        certificate: Option<reqwest::Certificate>,
    ) -> Result<Self, KubeAgentError> {
        let builder = reqwest::Client::builder();
        let builder = match certificate {
            Some(cert) => builder.add_root_certificate(cert),
            None => builder,
        };
        let client = builder.build()?;

        let kube_api_server = reqwest::Url::parse(&kube_api_server).map_err(|e| {
            error!("Invalid API server URL {}: {}", kube_api_server, e);
            KubeAgentError::InvalidUrl(kube_api_server.clone())
        })?;
        if kube_api_server.cannot_be_a_base() {
            return Err(KubeAgentError::InvalidUrl(kube_api_server.to_string()));
        }

        Ok(KubeAgent {
            kube_api_server,
            token,
            namespace,
            client,
        })
    }

    /// Builds an agent from the mounted service-account files named by `env`.
    pub fn from_environment(env: &Environment) -> Result<Self, KubeAgentError> {
        let token = read_trimmed(&env.token_file)?;
        let namespace = read_trimmed(&env.namespace_file)?;

        let certificate = if env.ca_file.exists() {
            let pem = std::fs::read(&env.ca_file).map_err(|source| KubeAgentError::Io {
                path: env.ca_file.display().to_string(),
                source,
            })?;
            let cert = reqwest::Certificate::from_pem(&pem).map_err(|e| {
                error!("Invalid CA certificate at {}: {}", env.ca_file.display(), e);
                KubeAgentError::InvalidCertificate(env.ca_file.display().to_string())
            })?;
            Some(cert)
        } else if env.kube_api_server.starts_with("http://") {
            debug!(
                "CA file {} not found, plain http API server needs none",
                env.ca_file.display()
            );
            None
        } else {
            error!("Cannot read CA certificate file {}", env.ca_file.display());
            return Err(KubeAgentError::Io {
                path: env.ca_file.display().to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "CA file not found"),
            });
        };

        debug!(
            "Using API server {} in namespace {}",
            env.kube_api_server, namespace
        );

        KubeAgent::new(env.kube_api_server.clone(), token, namespace, certificate)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Appends `segments` to the API server URL, percent-encoding each one
    /// so a name can never address another path.
    fn url(&self, segments: &[&str]) -> reqwest::Url {
        let mut url = self.kube_api_server.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub async fn make_request(&self, segments: &[&str]) -> Result<String, KubeAgentError> {
        let url = self.url(segments);
        debug!("query for: \"{}\"", url);

        let request = self
            .client
            .get(url.clone())
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json");

        Self::read_response(request.send().await, &url).await.map_err(|e| {
            error!("Cannot query API for \"{}\"", url);
            e
        })
    }

    pub async fn make_patch(
        &self,
        segments: &[&str],
        content_type: &str,
        body: String,
    ) -> Result<String, KubeAgentError> {
        let url = self.url(segments);
        debug!("patch for: \"{}\" ({})", url, content_type);

        let request = self
            .client
            .patch(url.clone())
            .bearer_auth(&self.token)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, content_type)
            .body(body);

        Self::read_response(request.send().await, &url).await.map_err(|e| {
            error!("Cannot call PATCH to API for \"{}\"", url);
            e
        })
    }

    async fn read_response(
        sent: Result<reqwest::Response, reqwest::Error>,
        url: &reqwest::Url,
    ) -> Result<String, KubeAgentError> {
        let resp = match sent {
            Ok(resp) => resp,
            Err(err) => {
                error!("Error sending request to {}: {}", url, err);
                return Err(KubeAgentError::from(err));
            }
        };

        if let Some(err) = resp.error_for_status_ref().err() {
            error!("API server answered {} with an error: {}", url, err);
            match resp.text().await {
                Ok(body) => debug!("the returned value is {}", body),
                Err(e) => debug!("error body could not be read: {}", e),
            }
            return Err(KubeAgentError::from(err));
        }

        match resp.text().await {
            Ok(body) => Ok(body),
            Err(err) => {
                error!("Error reading response body: {}", err);
                Err(KubeAgentError::from(err))
            }
        }
    }
}

fn read_trimmed(path: &Path) -> Result<String, KubeAgentError> {
    std::fs::read_to_string(path)
        .map(|content| content.trim().to_string())
        .map_err(|source| {
            error!("Cannot read file {}: {}", path.display(), source);
            KubeAgentError::Io {
                path: path.display().to_string(),
                source,
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env_with(dir: &tempfile::TempDir, api: &str) -> Environment {
        Environment {
            kube_api_server: api.to_string(),
            token_file: dir.path().join("token"),
            namespace_file: dir.path().join("namespace"),
            ca_file: dir.path().join("ca.crt"),
        }
    }

    fn write(dir: &tempfile::TempDir, name: &str, content: &str) {
        let mut file = std::fs::File::create(dir.path().join(name)).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    #[test]
    fn from_environment_trims_mounted_files() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir, "token", "secret-token\n");
        write(&dir, "namespace", "  txn-ns \n");

        let agent = KubeAgent::from_environment(&env_with(&dir, "http://localhost:1/")).unwrap();
        assert_eq!(agent.token, "secret-token");
        assert_eq!(agent.namespace(), "txn-ns");
        assert_eq!(
            agent.url(&["api", "v1"]).as_str(),
            "http://localhost:1/api/v1"
        );
    }

    #[test]
    fn from_environment_fails_without_token() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir, "namespace", "txn-ns");

        let Err(err) = KubeAgent::from_environment(&env_with(&dir, "http://localhost:1")) else {
            panic!("token file is missing");
        };
        assert!(matches!(err, KubeAgentError::Io { .. }));
    }

    #[test]
    fn https_server_requires_ca_file() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir, "token", "t");
        write(&dir, "namespace", "ns");

        let Err(err) = KubeAgent::from_environment(&env_with(&dir, "https://openshift.default.svc"))
        else {
            panic!("CA file is missing");
        };
        assert!(matches!(err, KubeAgentError::Io { ref path, .. } if path.ends_with("ca.crt")));
    }

    #[test]
    fn url_segments_are_percent_encoded() {
        let agent = KubeAgent::new(
            "http://localhost:1".to_string(),
            "t".to_string(),
            "ns".to_string(),
            None,
        )
        .unwrap();

        let url = agent.url(&["api", "v1", "namespaces", "ns", "configmaps", "../secrets/db"]);
        assert_eq!(
            url.path(),
            "/api/v1/namespaces/ns/configmaps/..%2Fsecrets%2Fdb"
        );

        let url = agent.url(&["api", "v1", "namespaces", "ns", "pods", "eap-0?x#y", "log"]);
        assert!(url.query().is_none());
        assert!(url.fragment().is_none());
        assert!(url.path().ends_with("/log"));
    }

    #[test]
    fn invalid_api_server_is_rejected() {
        let result = KubeAgent::new(
            "not a url".to_string(),
            "t".to_string(),
            "ns".to_string(),
            None,
        );
        assert!(matches!(result, Err(KubeAgentError::InvalidUrl(_))));
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn error_response_body_is_logged_at_debug() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/namespaces/ns/pods")
            .with_status(403)
            .with_body(r#"{"kind":"Status","message":"pods is forbidden"}"#)
            .create_async()
            .await;

        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let agent = KubeAgent::new(server.url(), "t".to_string(), "ns".to_string(), None).unwrap();
        assert!(agent.make_request(&["api", "v1", "namespaces", "ns", "pods"]).await.is_err());

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("pods is forbidden"));
    }
}
