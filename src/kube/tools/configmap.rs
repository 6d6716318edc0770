use crate::kube::error::KubeAgentError;
use crate::kube::types::{ConfigMap, ConfigMapPatch, JsonPatchOp};
use crate::kube::{KubeAgent, JSON_PATCH, MERGE_PATCH};
use std::collections::BTreeMap;
use tracing::*;

/// Result of removing a key from a config map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    /// The patch was rejected but a follow-up read shows the key is not there.
    AlreadyAbsent,
}

pub struct ConfigMapTool {
    kube_agent: KubeAgent,
}

impl ConfigMapTool {
    pub fn new(kube_agent: KubeAgent) -> Self {
        ConfigMapTool { kube_agent }
    }

    fn path<'a>(&'a self, config_map: &'a str) -> [&'a str; 6] {
        [
            "api",
            "v1",
            "namespaces",
            self.kube_agent.namespace(),
            "configmaps",
            config_map,
        ]
    }

    pub async fn config_map_data(
        &self,
        config_map: &str,
    ) -> Result<BTreeMap<String, String>, KubeAgentError> {
        let response = self.kube_agent.make_request(&self.path(config_map)).await?;
        debug!(
            "querying the config map {} at namespace {} got output {}",
            config_map,
            self.kube_agent.namespace(),
            response
        );

        let parsed: ConfigMap = serde_json::from_str(&response).map_err(|e| {
            error!("Error parsing JSON response: {}", e);
            KubeAgentError::from(e)
        })?;

        Ok(parsed.data)
    }

    /// Keys of the config map data, sorted.
    pub async fn config_map_keys(&self, config_map: &str) -> Result<Vec<String>, KubeAgentError> {
        Ok(self.config_map_data(config_map).await?.into_keys().collect())
    }

    pub async fn store_entry(
        &self,
        config_map: &str,
        key: &str,
        value: &str,
    ) -> Result<(), KubeAgentError> {
        let body = serde_json::to_string(&ConfigMapPatch::store(config_map, key, value))?;
        let response = self
            .kube_agent
            .make_patch(&self.path(config_map), MERGE_PATCH, body)
            .await?;

        debug!(
            "on storing config map {} of value {} the returned value is {}",
            config_map, key, response
        );
        Ok(())
    }

    /// Removes `key` from the config map.
    ///
    /// A rejected patch is tolerated only when the config map can still be
    /// read and no longer holds the key.
    pub async fn remove_entry(
        &self,
        config_map: &str,
        key: &str,
    ) -> Result<RemoveOutcome, KubeAgentError> {
        let body = serde_json::to_string(&[JsonPatchOp::remove_data_key(key)])?;
        let patch_error = match self
            .kube_agent
            .make_patch(&self.path(config_map), JSON_PATCH, body)
            .await
        {
            Ok(response) => {
                debug!(
                    "on removing config map {} of value {} the returned value is {}",
                    config_map, key, response
                );
                return Ok(RemoveOutcome::Removed);
            }
            Err(err) => err,
        };

        let data = self.config_map_data(config_map).await?;
        if data.contains_key(key) {
            error!(
                "key {} is still present in config map {} after failed removal",
                key, config_map
            );
            return Err(KubeAgentError::RemoveFailed {
                key: key.to_string(),
                source: Box::new(patch_error),
            });
        }

        debug!(
            "on removing config map {} the value {} did not exist, the data content is {:?}",
            config_map, key, data
        );
        Ok(RemoveOutcome::AlreadyAbsent)
    }
}
