use serde::{Deserialize, Serialize};

/// Body of `POST /recommend`.
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendRequest {
    /// Job description, hiring query, or job-posting URL.
    pub query: String,
    /// Overrides the configured default. Zero or negative is rejected.
    #[serde(default)]
    pub top_k: Option<i64>,
    #[serde(default)]
    pub include_scores: bool,
}

#[cfg(test)]
impl RecommendRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            top_k: None,
            include_scores: false,
        }
    }
}

/// External shape of a single recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationView {
    pub assessment_name: String,
    pub assessment_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_type: Option<String>,
    /// Cosine similarity; only populated when the caller asked for scores.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub recommendations: Vec<RecommendationView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let req: RecommendRequest = serde_json::from_str(r#"{"query": "accountant"}"#).unwrap();
        assert_eq!(req.query, "accountant");
        assert!(req.top_k.is_none());
        assert!(!req.include_scores);
    }

    #[test]
    fn test_request_accepts_negative_top_k_for_validation_downstream() {
        let req: RecommendRequest =
            serde_json::from_str(r#"{"query": "x", "top_k": -3}"#).unwrap();
        assert_eq!(req.top_k, Some(-3));
    }

    #[test]
    fn test_view_serializes_only_populated_fields() {
        let view = RecommendationView {
            assessment_name: "Verify G+".to_string(),
            assessment_url: "https://example.com/verify".to_string(),
            category: None,
            test_type: Some("Ability & Aptitude".to_string()),
            score: None,
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["assessment_name"], "Verify G+");
        assert_eq!(json["test_type"], "Ability & Aptitude");
        assert!(json.get("category").is_none());
        assert!(json.get("score").is_none());
    }
}
