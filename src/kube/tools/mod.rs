pub mod configmap;
pub mod pods;

pub use configmap::{ConfigMapTool, RemoveOutcome};
pub use pods::PodsTool;
