use serde::{Deserialize, Serialize};

/// A single catalog entry. Immutable once it is part of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, alias = "testType", skip_serializing_if = "Option::is_none")]
    pub test_type: Option<String>,
    pub embedding: Vec<f32>,
}
