//! In-memory GraphQL client for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{GithubError, GraphQlClient};

/// Replays canned responses in order and records every call.
pub struct MockGraphQlClient {
    responses: Mutex<VecDeque<Result<Value, GithubError>>>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl MockGraphQlClient {
    pub fn new(responses: Vec<Result<Value, GithubError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queries and variables received so far.
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GraphQlClient for MockGraphQlClient {
    async fn run_query(&self, query: &str, variables: Value) -> Result<Value, GithubError> {
        self.calls.lock().unwrap().push((query.to_string(), variables));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected upstream call")
    }
}

/// A complete discussion node as GitHub would return it.
pub fn discussion_json(id: &str, number: u64, category_slug: &str) -> Value {
    json!({
        "id": id,
        "number": number,
        "title": format!("Discussion {number}"),
        "body": "Made with Kilo",
        "bodyHTML": "<p>Made with Kilo</p>",
        "url": format!("https://github.com/Kilo-Org/kilocode/discussions/{number}"),
        "createdAt": "2025-06-01T12:00:00Z",
        "updatedAt": "2025-06-02T12:00:00Z",
        "author": {
            "login": "octocat",
            "avatarUrl": "https://avatars.githubusercontent.com/u/583231",
            "url": "https://github.com/octocat"
        },
        "category": { "id": format!("DIC_{category_slug}"), "name": category_slug, "slug": category_slug },
        "labels": { "nodes": [{ "id": "LA_1", "name": "showcase", "color": "0e8a16" }] },
        "reactions": { "totalCount": 4 },
        "reactionGroups": [{ "content": "THUMBS_UP", "users": { "totalCount": 4 } }],
        "upvoteCount": 2,
        "comments": { "totalCount": 1 }
    })
}
