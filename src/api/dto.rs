use serde::Serialize;

use crate::github::{Category, Discussion, PageInfo};

/// Body of a successful discussion listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionListResponse {
    pub discussions: Vec<Discussion>,
    pub page_info: PageInfo,
    /// Length of this page, not a repository-wide total
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_info: Option<Category>,
    /// Explains an empty listing when the category does not exist
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DiscussionListResponse {
    /// Valid empty state returned when the configured category is missing.
    pub fn category_missing(slug: &str) -> Self {
        Self {
            discussions: Vec::new(),
            page_info: PageInfo::default(),
            total: 0,
            category_info: None,
            error: Some(format!("Category \"{slug}\" not found in repository")),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DiscussionResponse {
    pub discussion: Discussion,
}

/// JSON envelope for every failure.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}
