use serde::{Deserialize, Serialize};

/// Phases of a pod that is not yet terminated.
pub const LIVING_PHASES: [&str; 3] = ["Pending", "Running", "Unknown"];

#[derive(Debug, Serialize, Deserialize)]
pub struct PodMetadata {
    pub name: String,
    pub namespace: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PodStatus {
    pub phase: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Pod {
    pub metadata: PodMetadata,
    pub status: Option<PodStatus>,
}

impl Pod {
    pub fn phase(&self) -> Option<&str> {
        self.status.as_ref().and_then(|s| s.phase.as_deref())
    }

    pub fn is_living(&self) -> bool {
        self.phase()
            .map(|phase| LIVING_PHASES.contains(&phase))
            .unwrap_or(false)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PodListResponse {
    #[serde(default)]
    pub items: Vec<Pod>,
}

impl PodListResponse {
    pub fn names(&self) -> Vec<String> {
        self.items
            .iter()
            .map(|pod| pod.metadata.name.clone())
            .collect()
    }

    pub fn living_names(&self) -> Vec<String> {
        self.items
            .iter()
            .filter(|pod| pod.is_living())
            .map(|pod| pod.metadata.name.clone())
            .collect()
    }
}
