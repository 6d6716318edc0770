use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigMapMetadata {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ConfigMap {
    /// Absent on the wire when the config map holds no entries.
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

/// Merge-patch body adding or replacing entries of a config map.
#[derive(Debug, Serialize)]
pub struct ConfigMapPatch {
    pub kind: &'static str,
    #[serde(rename = "apiVersion")]
    pub api_version: &'static str,
    pub metadata: ConfigMapMetadata,
    pub data: BTreeMap<String, String>,
}

impl ConfigMapPatch {
    pub fn store(name: &str, key: &str, value: &str) -> Self {
        ConfigMapPatch {
            kind: "ConfigMap",
            api_version: "v1",
            metadata: ConfigMapMetadata {
                name: name.to_string(),
            },
            data: BTreeMap::from([(key.to_string(), value.to_string())]),
        }
    }
}

/// A single JSON-patch operation.
#[derive(Debug, Serialize)]
pub struct JsonPatchOp {
    pub op: &'static str,
    pub path: String,
}

impl JsonPatchOp {
    pub fn remove_data_key(key: &str) -> Self {
        JsonPatchOp {
            op: "remove",
            path: format!("/data/{}", escape_pointer_token(key)),
        }
    }
}

// RFC 6901: '~' must be escaped before '/'.
fn escape_pointer_token(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}
