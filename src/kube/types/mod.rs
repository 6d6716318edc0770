pub mod configmap;
pub mod pod;

pub use configmap::{ConfigMap, ConfigMapPatch, JsonPatchOp};
pub use pod::{Pod, PodListResponse, LIVING_PHASES};
