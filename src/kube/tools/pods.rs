use crate::kube::error::KubeAgentError;
use crate::kube::types::PodListResponse;
use crate::kube::KubeAgent;
use tracing::*;

pub struct PodsTool {
    kube_agent: KubeAgent,
}

impl PodsTool {
    pub fn new(kube_agent: KubeAgent) -> Self {
        PodsTool { kube_agent }
    }

    async fn pod_list(&self) -> Result<PodListResponse, KubeAgentError> {
        let response = self
            .kube_agent
            .make_request(&["api", "v1", "namespaces", self.kube_agent.namespace(), "pods"])
            .await?;

        let pod_list: PodListResponse = serde_json::from_str(&response).map_err(|e| {
            error!("Error parsing JSON response: {}", e);
            KubeAgentError::from(e)
        })?;

        for pod in &pod_list.items {
            debug!(
                "query pod {} of status {}",
                pod.metadata.name,
                pod.phase().unwrap_or("<none>")
            );
        }

        Ok(pod_list)
    }

    /// Names of all pods in the namespace, in API order.
    pub async fn list_pods(&self) -> Result<Vec<String>, KubeAgentError> {
        Ok(self.pod_list().await?.names())
    }

    /// Names of pods whose phase is Pending, Running or Unknown.
    pub async fn list_living_pods(&self) -> Result<Vec<String>, KubeAgentError> {
        Ok(self.pod_list().await?.living_names())
    }

    pub async fn fetch_log(&self, pod_name: &str) -> Result<String, KubeAgentError> {
        self.kube_agent
            .make_request(&[
                "api",
                "v1",
                "namespaces",
                self.kube_agent.namespace(),
                "pods",
                pod_name,
                "log",
            ])
            .await
    }
}
