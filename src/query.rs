//! Request dispatch for the `queryapi` tool.

use crate::kube::{ConfigMapTool, KubeAgent, KubeAgentError, PodsTool, RemoveOutcome};
use crate::output::QueryResult;
use clap::ValueEnum;
use std::fmt;
use tracing::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum QueryType {
    /// List of pods
    Pods,
    /// List of pods in phase Pending, Running or Unknown
    #[value(name = "pods_living")]
    PodsLiving,
    /// Log of a pod
    Log,
    /// Keys of a config map
    #[value(name = "cm_keys")]
    CmKeys,
    /// Store a key into a config map
    #[value(name = "cm_store")]
    CmStore,
    /// Remove a key from a config map
    #[value(name = "cm_remove")]
    CmRemove,
}

/// A query with its positional arguments checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryRequest {
    Pods,
    PodsLiving,
    Log {
        pod: String,
    },
    ConfigMapKeys {
        config_map: String,
    },
    ConfigMapStore {
        config_map: String,
        key: String,
        value: String,
    },
    ConfigMapRemove {
        config_map: String,
        key: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentError(pub &'static str);

impl fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl std::error::Error for ArgumentError {}

impl QueryRequest {
    pub fn from_args(query: QueryType, args: &[String]) -> Result<Self, ArgumentError> {
        let request = match query {
            QueryType::Pods => QueryRequest::Pods,
            QueryType::PodsLiving => QueryRequest::PodsLiving,
            QueryType::Log => {
                let [pod] = required::<1>(
                    args,
                    "query of type \"log\" requires one argument to be an existing pod name",
                )?;
                QueryRequest::Log {
                    pod: object_name(pod)?,
                }
            }
            QueryType::CmKeys => {
                let [config_map] = required::<1>(
                    args,
                    "query of type \"cm_keys\" requires one argument to be an existing config map",
                )?;
                QueryRequest::ConfigMapKeys {
                    config_map: object_name(config_map)?,
                }
            }
            QueryType::CmStore => {
                let [config_map, key] = required::<2>(
                    args,
                    "query of type \"cm_store\" requires two arguments [an existing config map, key to store] and an optional value",
                )?;
                let value = args
                    .get(2)
                    .filter(|value| !value.is_empty())
                    .cloned()
                    .unwrap_or_else(|| key.clone());
                QueryRequest::ConfigMapStore {
                    config_map: object_name(config_map)?,
                    key,
                    value,
                }
            }
            QueryType::CmRemove => {
                let [config_map, key] = required::<2>(
                    args,
                    "query of type \"cm_remove\" requires two arguments [an existing config map, key to remove]",
                )?;
                QueryRequest::ConfigMapRemove {
                    config_map: object_name(config_map)?,
                    key,
                }
            }
        };
        Ok(request)
    }

    pub async fn run(&self, kube_agent: KubeAgent) -> Result<QueryResult, KubeAgentError> {
        match self {
            QueryRequest::Pods => Ok(QueryResult::List(
                PodsTool::new(kube_agent).list_pods().await?,
            )),
            QueryRequest::PodsLiving => Ok(QueryResult::List(
                PodsTool::new(kube_agent).list_living_pods().await?,
            )),
            QueryRequest::Log { pod } => Ok(QueryResult::Text(
                PodsTool::new(kube_agent).fetch_log(pod).await?,
            )),
            QueryRequest::ConfigMapKeys { config_map } => Ok(QueryResult::List(
                ConfigMapTool::new(kube_agent)
                    .config_map_keys(config_map)
                    .await?,
            )),
            QueryRequest::ConfigMapStore {
                config_map,
                key,
                value,
            } => {
                ConfigMapTool::new(kube_agent)
                    .store_entry(config_map, key, value)
                    .await?;
                info!("Stored {} into config map {}", key, config_map);
                Ok(QueryResult::Nothing)
            }
            QueryRequest::ConfigMapRemove { config_map, key } => {
                let outcome = ConfigMapTool::new(kube_agent)
                    .remove_entry(config_map, key)
                    .await?;
                match outcome {
                    RemoveOutcome::Removed => {
                        info!("Removed {} from config map {}", key, config_map)
                    }
                    RemoveOutcome::AlreadyAbsent => {
                        info!("{} was not present in config map {}", key, config_map)
                    }
                }
                Ok(QueryResult::Nothing)
            }
        }
    }
}

const MAX_OBJECT_NAME_LEN: usize = 253;

/// Accepts pod and config map names in RFC 1123 subdomain form: lowercase
/// alphanumerics, '-' and '.', starting and ending with an alphanumeric.
fn object_name(name: String) -> Result<String, ArgumentError> {
    let bytes = name.as_bytes();
    let alnum = |b: &u8| b.is_ascii_lowercase() || b.is_ascii_digit();
    let valid = name.len() <= MAX_OBJECT_NAME_LEN
        && bytes.first().is_some_and(alnum)
        && bytes.last().is_some_and(alnum)
        && bytes.iter().all(|b| alnum(b) || *b == b'-' || *b == b'.');

    if valid {
        Ok(name)
    } else {
        Err(ArgumentError(
            "pod and config map names must be lowercase RFC 1123 subdomains",
        ))
    }
}

/// The first `N` arguments, each non-empty.
fn required<const N: usize>(
    args: &[String],
    message: &'static str,
) -> Result<[String; N], ArgumentError> {
    let mut values: [String; N] = std::array::from_fn(|_| String::new());
    for (index, slot) in values.iter_mut().enumerate() {
        match args.get(index) {
            Some(arg) if !arg.is_empty() => *slot = arg.clone(),
            _ => return Err(ArgumentError(message)),
        }
    }
    Ok(values)
}
