pub mod queries;
pub mod types;

#[cfg(test)]
pub mod mock;

pub use types::{Category, Discussion, DiscussionPage, PageInfo, RepoTarget};

use async_trait::async_trait;
use reqwest::header::USER_AGENT;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{debug, error, instrument, warn};

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("GitHub API request failed: {0}")]
    ApiRequest(#[from] reqwest::Error),

    #[error("GitHub API responded with status: {0}")]
    Status(u16),

    #[error("GraphQL errors: {0}")]
    GraphQl(String),

    #[error("Invalid response structure from GitHub API ({detail}). Response: {raw}")]
    Shape { detail: String, raw: String },
}

/// A GraphQL endpoint that answers `{query, variables}` with a JSON body.
///
/// Implementations return the full response body (including any `errors`
/// array); interpreting it is left to the typed operations in this module.
#[async_trait]
pub trait GraphQlClient: Send + Sync {
    async fn run_query(&self, query: &str, variables: Value) -> Result<Value, GithubError>;
}

/// GraphQL client talking to GitHub over HTTPS with a bearer token.
pub struct HttpGraphQlClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
    user_agent: String,
}

impl HttpGraphQlClient {
    pub fn new(api_url: impl Into<String>, token: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.into(),
            token: token.into(),
            user_agent: user_agent.into(),
        }
    }
}

#[async_trait]
impl GraphQlClient for HttpGraphQlClient {
    #[instrument(skip_all, fields(url = %self.api_url))]
    async fn run_query(&self, query: &str, variables: Value) -> Result<Value, GithubError> {
        debug!("posting GraphQL query");
        let response = self
            .http
            .post(&self.api_url)
            .header(USER_AGENT, &self.user_agent)
            .bearer_auth(&self.token)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "GitHub API returned non-success status");
            return Err(GithubError::Status(status.as_u16()));
        }

        let body = response.json::<Value>().await?;
        debug!("received GraphQL response");
        Ok(body)
    }
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct Nodes<T> {
    #[serde(default)]
    nodes: Vec<T>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CategoriesRepository {
    discussion_categories: Option<Nodes<Category>>,
}

#[derive(Deserialize)]
struct DiscussionsRepository {
    discussions: Option<DiscussionPage>,
}

#[derive(Deserialize)]
struct DiscussionRepository {
    discussion: Option<Discussion>,
}

/// Fail with the joined messages if the response carries GraphQL errors.
fn check_errors(body: &Value) -> Result<(), GithubError> {
    let Some(errors) = body.get("errors").and_then(Value::as_array) else {
        return Ok(());
    };
    if errors.is_empty() {
        return Ok(());
    }

    let messages = errors
        .iter()
        .map(|e| match e.get("message").and_then(Value::as_str) {
            Some(message) => message.to_string(),
            None => e.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ");
    error!(errors = %messages, "GitHub returned GraphQL errors");
    Err(GithubError::GraphQl(messages))
}

/// Decode `data.repository` into `T`. A null or missing repository yields None.
fn repository_data<T: DeserializeOwned>(body: &Value) -> Result<Option<T>, GithubError> {
    check_errors(body)?;

    let Some(repository) = body.pointer("/data/repository").filter(|v| !v.is_null()) else {
        return Ok(None);
    };
    T::deserialize(repository).map(Some).map_err(|e| shape_error(e.to_string(), body))
}

fn shape_error(detail: impl Into<String>, body: &Value) -> GithubError {
    let detail = detail.into();
    let raw = body.to_string();
    error!(%detail, response = %raw, "unexpected response structure from GitHub API");
    GithubError::Shape { detail, raw }
}

/// Fetch the first page of discussion categories in the target repository.
#[instrument(skip(client), fields(owner = %target.owner, repo = %target.repo))]
pub async fn fetch_categories(
    client: &dyn GraphQlClient,
    target: &RepoTarget,
) -> Result<Vec<Category>, GithubError> {
    let variables = json!({
        "owner": target.owner,
        "name": target.repo,
        "first": queries::CATEGORY_SCAN_LIMIT,
    });
    let body = client.run_query(queries::CATEGORIES_QUERY, variables).await?;

    let categories = repository_data::<CategoriesRepository>(&body)?
        .and_then(|repo| repo.discussion_categories)
        .map(|c| c.nodes)
        .unwrap_or_default();
    debug!(count = categories.len(), "fetched discussion categories");
    Ok(categories)
}

/// Resolve the target's category slug to a category. Only the first
/// `queries::CATEGORY_SCAN_LIMIT` categories are considered.
pub async fn find_category(
    client: &dyn GraphQlClient,
    target: &RepoTarget,
) -> Result<Option<Category>, GithubError> {
    let categories = fetch_categories(client, target).await?;
    Ok(categories
        .into_iter()
        .find(|c| c.slug == target.category_slug))
}

/// Fetch one page of discussions in a category, newest first.
#[instrument(skip(client, target), fields(repo = %target.repo))]
pub async fn fetch_discussions(
    client: &dyn GraphQlClient,
    target: &RepoTarget,
    category_id: &str,
    first: u32,
    after: Option<&str>,
) -> Result<DiscussionPage, GithubError> {
    let variables = json!({
        "owner": target.owner,
        "name": target.repo,
        "categoryId": category_id,
        "first": first,
        "after": after,
        "labelCount": queries::LABELS_PER_DISCUSSION,
    });
    let query = queries::with_discussion_fields(queries::DISCUSSIONS_QUERY);
    let body = client.run_query(&query, variables).await?;

    let page = repository_data::<DiscussionsRepository>(&body)?
        .and_then(|repo| repo.discussions)
        .ok_or_else(|| shape_error("missing data.repository.discussions", &body))?;
    debug!(
        count = page.nodes.len(),
        has_next_page = page.page_info.has_next_page,
        "fetched discussions page"
    );
    Ok(page)
}

/// Fetch a single discussion by its repository-scoped number.
/// Category filtering is left to the caller.
#[instrument(skip(client, target), fields(repo = %target.repo))]
pub async fn fetch_discussion_by_number(
    client: &dyn GraphQlClient,
    target: &RepoTarget,
    number: i32,
) -> Result<Option<Discussion>, GithubError> {
    let variables = json!({
        "owner": target.owner,
        "name": target.repo,
        "number": number,
        "labelCount": queries::LABELS_PER_DISCUSSION,
    });
    let query = queries::with_discussion_fields(queries::DISCUSSION_BY_NUMBER_QUERY);
    let body = client.run_query(&query, variables).await?;

    let discussion = repository_data::<DiscussionRepository>(&body)?.and_then(|repo| repo.discussion);
    debug!(found = discussion.is_some(), "fetched discussion by number");
    Ok(discussion)
}

#[cfg(test)]
mod tests {
    use super::mock::{discussion_json, MockGraphQlClient};
    use super::*;

    fn target() -> RepoTarget {
        RepoTarget {
            owner: "Kilo-Org".to_string(),
            repo: "kilocode".to_string(),
            category_slug: "built-with-kilo".to_string(),
        }
    }

    fn categories_body() -> Value {
        json!({ "data": { "repository": { "discussionCategories": { "nodes": [
            { "id": "DIC_general", "name": "General", "slug": "general" },
            { "id": "DIC_kilo", "name": "Built with Kilo", "slug": "built-with-kilo" }
        ] } } } })
    }

    #[test]
    fn test_check_errors_joins_messages() {
        let body = json!({ "errors": [{ "message": "first" }, { "message": "second" }] });
        match check_errors(&body) {
            Err(GithubError::GraphQl(msg)) => assert_eq!(msg, "first, second"),
            other => panic!("expected GraphQl error, got {other:?}"),
        }
    }

    #[test]
    fn test_check_errors_ignores_empty_array() {
        assert!(check_errors(&json!({ "errors": [], "data": null })).is_ok());
        assert!(check_errors(&json!({ "data": {} })).is_ok());
    }

    #[tokio::test]
    async fn test_find_category_matches_slug() {
        let client = MockGraphQlClient::new(vec![Ok(categories_body())]);
        let category = find_category(&client, &target()).await.unwrap().unwrap();
        assert_eq!(category.id, "DIC_kilo");

        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1["owner"], "Kilo-Org");
        assert_eq!(calls[0].1["name"], "kilocode");
    }

    #[test]
    fn test_category_nodes_default_to_empty() {
        let repo: CategoriesRepository =
            serde_json::from_value(json!({ "discussionCategories": {} })).unwrap();
        assert!(repo.discussion_categories.unwrap().nodes.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_categories_sends_scan_limit() {
        let client = MockGraphQlClient::new(vec![Ok(categories_body())]);
        let categories = fetch_categories(&client, &target()).await.unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(client.calls()[0].1["first"], 25);
    }

    #[tokio::test]
    async fn test_find_category_absent() {
        let body = json!({ "data": { "repository": { "discussionCategories": { "nodes": [
            { "id": "DIC_general", "name": "General", "slug": "general" }
        ] } } } });
        let client = MockGraphQlClient::new(vec![Ok(body)]);
        assert!(find_category(&client, &target()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fetch_discussions_sends_variables() {
        let body = json!({ "data": { "repository": { "discussions": {
            "nodes": [discussion_json("D_1", 1, "built-with-kilo")],
            "pageInfo": { "hasNextPage": true, "endCursor": "Y3Vyc29y" }
        } } } });
        let client = MockGraphQlClient::new(vec![Ok(body)]);

        let page = fetch_discussions(&client, &target(), "DIC_kilo", 5, Some("abc"))
            .await
            .unwrap();
        assert_eq!(page.nodes.len(), 1);
        assert!(page.page_info.has_next_page);
        assert_eq!(page.page_info.end_cursor.as_deref(), Some("Y3Vyc29y"));

        let (query, variables) = &client.calls()[0];
        assert!(query.contains("orderBy: {field: CREATED_AT, direction: DESC}"));
        assert_eq!(variables["categoryId"], "DIC_kilo");
        assert_eq!(variables["first"], 5);
        assert_eq!(variables["after"], "abc");
        assert_eq!(variables["labelCount"], 10);
    }

    #[tokio::test]
    async fn test_fetch_discussions_missing_shape_includes_raw() {
        let client = MockGraphQlClient::new(vec![Ok(json!({ "data": { "repository": null } }))]);
        match fetch_discussions(&client, &target(), "DIC_kilo", 10, None).await {
            Err(GithubError::Shape { raw, .. }) => assert!(raw.contains("repository")),
            other => panic!("expected shape error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_discussions_malformed_node_is_shape_error() {
        let body = json!({ "data": { "repository": { "discussions": {
            "nodes": [{ "id": "D_1" }],
            "pageInfo": { "hasNextPage": false, "endCursor": null }
        } } } });
        let client = MockGraphQlClient::new(vec![Ok(body)]);
        let result = fetch_discussions(&client, &target(), "DIC_kilo", 10, None).await;
        assert!(matches!(result, Err(GithubError::Shape { .. })));
    }

    #[tokio::test]
    async fn test_fetch_discussion_by_number_null() {
        let body = json!({ "data": { "repository": { "discussion": null } } });
        let client = MockGraphQlClient::new(vec![Ok(body)]);
        let found = fetch_discussion_by_number(&client, &target(), 99).await.unwrap();
        assert!(found.is_none());
        assert_eq!(client.calls()[0].1["number"], 99);
        assert_eq!(client.calls()[0].1["labelCount"], 10);
    }

    #[tokio::test]
    async fn test_upstream_error_propagates() {
        let client = MockGraphQlClient::new(vec![Err(GithubError::Status(502))]);
        let result = fetch_categories(&client, &target()).await;
        assert!(matches!(result, Err(GithubError::Status(502))));
    }
}
