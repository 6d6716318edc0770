use std::fmt;

#[derive(Debug)]
pub enum KubeAgentError {
    HttpError(reqwest::Error),
    JsonParseError(serde_json::Error),
    Io {
        path: String,
        source: std::io::Error,
    },
    InvalidCertificate(String),
    InvalidUrl(String),
    /// The remove patch failed while the key is still present in the config map.
    RemoveFailed {
        key: String,
        source: Box<KubeAgentError>,
    },
}

impl fmt::Display for KubeAgentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KubeAgentError::HttpError(err) => write!(f, "HTTP request error: {}", err),
            KubeAgentError::JsonParseError(err) => write!(f, "JSON parsing error: {}", err),
            KubeAgentError::Io { path, source } => {
                write!(f, "cannot read file {}: {}", path, source)
            }
            KubeAgentError::InvalidCertificate(path) => {
                write!(f, "invalid CA certificate at {}", path)
            }
            KubeAgentError::InvalidUrl(url) => write!(f, "invalid API server URL {}", url),
            KubeAgentError::RemoveFailed { key, .. } => {
                write!(f, "failed to remove key {} from config map", key)
            }
        }
    }
}

impl std::error::Error for KubeAgentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            KubeAgentError::HttpError(err) => Some(err),
            KubeAgentError::JsonParseError(err) => Some(err),
            KubeAgentError::Io { source, .. } => Some(source),
            KubeAgentError::InvalidCertificate(_) | KubeAgentError::InvalidUrl(_) => None,
            KubeAgentError::RemoveFailed { source, .. } => Some(source.as_ref()),
        }
    }
}

impl From<reqwest::Error> for KubeAgentError {
    fn from(err: reqwest::Error) -> Self {
        KubeAgentError::HttpError(err)
    }
}

impl From<serde_json::Error> for KubeAgentError {
    fn from(err: serde_json::Error) -> Self {
        KubeAgentError::JsonParseError(err)
    }
}
