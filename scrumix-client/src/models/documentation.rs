use super::{require_text, Validate};
use crate::error::Error;
use getset::Getters;
use serde::{Deserialize, Serialize};

pub const MAX_SEARCH_RESULTS: u32 = 50;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SearchType {
    Semantic,
    Keyword,
    /// Keyword and semantic scores fused by the backend
    #[default]
    Hybrid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub search_type: SearchType,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity_threshold: Option<f32>,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            search_type: SearchType::default(),
            limit: 10,
            project_id: None,
            similarity_threshold: None,
        }
    }
}

impl Validate for SearchRequest {
    fn validate(&self) -> Result<(), Error> {
        require_text("query", &self.query, 500)?;
        if self.limit == 0 || self.limit > MAX_SEARCH_RESULTS {
            return Err(Error::validation(format!(
                "limit must be between 1 and {}",
                MAX_SEARCH_RESULTS
            )));
        }
        if let Some(threshold) = self.similarity_threshold {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(Error::validation("similarity_threshold must be between 0 and 1"));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[get = "pub"]
pub struct DocumentationHit {
    #[serde(alias = "docId", alias = "doc_id")]
    id: i64,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, alias = "docType")]
    doc_type: Option<String>,
    #[serde(default, alias = "similarityScore", alias = "score")]
    similarity_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
#[get = "pub"]
pub struct SearchResults {
    #[serde(default)]
    results: Vec<DocumentationHit>,
    #[serde(default, alias = "totalResults", alias = "total")]
    total_results: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_search_request_validation() {
        assert!(SearchRequest::new("sprint planning").validate().is_ok());
        assert!(SearchRequest::new("").validate().is_err());

        let mut request = SearchRequest::new("velocity");
        request.limit = 51;
        assert!(request.validate().is_err());

        request.limit = 5;
        request.similarity_threshold = Some(1.5);
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_search_type_serialization() {
        let body = serde_json::to_value(SearchRequest::new("q")).unwrap();
        assert_eq!(body, json!({"query": "q", "search_type": "hybrid", "limit": 10}));
    }

    #[test]
    fn test_hit_aliases() {
        let raw = json!({"docId": 3, "title": "API guide", "similarityScore": 0.82});
        let hit: DocumentationHit = serde_json::from_value(raw).unwrap();
        assert_eq!(*hit.id(), 3);
        assert_eq!(*hit.similarity_score(), Some(0.82));
    }
}
