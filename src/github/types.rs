use serde::{Deserialize, Serialize};

/// The repository and category this service exposes.
#[derive(Debug, Clone)]
pub struct RepoTarget {
    pub owner: String,
    pub repo: String,
    /// Only discussions in the category with this slug are ever returned
    pub category_slug: String,
}

/// A GitHub Discussions thread as returned by the GraphQL API.
/// Serialized back out with the upstream field names, so callers see the
/// same shape GitHub produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discussion {
    pub id: String,
    /// Repository-scoped sequential number
    pub number: u64,
    pub title: String,
    pub body: String,
    #[serde(rename = "bodyHTML")]
    pub body_html: String,
    pub url: String,
    /// ISO 8601, passed through untouched
    pub created_at: String,
    pub updated_at: String,
    /// None when the author's account has been deleted
    pub author: Option<Author>,
    pub category: Option<Category>,
    pub labels: LabelConnection,
    pub reactions: TotalCount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reaction_groups: Option<Vec<ReactionGroup>>,
    #[serde(default)]
    pub upvote_count: u64,
    pub comments: TotalCount,
}

impl Discussion {
    /// Whether this discussion belongs to the category with the given slug.
    pub fn in_category(&self, slug: &str) -> bool {
        self.category.as_ref().is_some_and(|c| c.slug == slug)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub login: String,
    pub avatar_url: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub id: String,
    pub name: String,
    /// Hex color without the leading '#'
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LabelConnection {
    #[serde(default)]
    pub nodes: Vec<Label>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalCount {
    pub total_count: u64,
}

/// Reactions of one kind (THUMBS_UP, HEART, ...) and how many users left them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionGroup {
    pub content: String,
    pub users: TotalCount,
}

/// Cursor information for caller-driven pagination.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

/// One page of discussions in a category.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionPage {
    pub nodes: Vec<Discussion>,
    pub page_info: PageInfo,
}
