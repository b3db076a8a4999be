use serde::{Deserialize, Serialize};

/// Response of the OpenAI-compatible `GET models` endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelResponse {
    #[serde(rename = "object")]
    pub object_type: String,
    pub data: Vec<ModelData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelData {
    pub id: String,
    #[serde(rename = "object")]
    pub object_type: String,
    pub owned_by: String,
    #[serde(default)]
    pub permissions: Vec<serde_json::Value>,
}
