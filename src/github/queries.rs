//! GraphQL documents sent to the GitHub API.

/// Number of categories scanned when resolving a slug.
pub const CATEGORY_SCAN_LIMIT: u32 = 25;

/// Number of labels fetched per discussion.
pub const LABELS_PER_DISCUSSION: u32 = 10;

pub const CATEGORIES_QUERY: &str = r#"
  query GetCategoryId($owner: String!, $name: String!, $first: Int!) {
    repository(owner: $owner, name: $name) {
      discussionCategories(first: $first) {
        nodes {
          id
          name
          slug
        }
      }
    }
  }
"#;

pub const DISCUSSIONS_QUERY: &str = r#"
  query GetDiscussions($owner: String!, $name: String!, $categoryId: ID, $first: Int!, $after: String, $labelCount: Int!) {
    repository(owner: $owner, name: $name) {
      discussions(first: $first, after: $after, categoryId: $categoryId, orderBy: {field: CREATED_AT, direction: DESC}) {
        nodes {
          ...DiscussionFields
        }
        pageInfo {
          hasNextPage
          endCursor
        }
      }
    }
  }
"#;

pub const DISCUSSION_BY_NUMBER_QUERY: &str = r#"
  query GetDiscussionByNumber($owner: String!, $name: String!, $number: Int!, $labelCount: Int!) {
    repository(owner: $owner, name: $name) {
      discussion(number: $number) {
        ...DiscussionFields
      }
    }
  }
"#;

/// Field set shared by both discussion queries. Operations using it must
/// declare `$labelCount`.
pub const DISCUSSION_FIELDS_FRAGMENT: &str = r#"
  fragment DiscussionFields on Discussion {
    id
    number
    title
    body
    bodyHTML
    url
    createdAt
    updatedAt
    author {
      login
      avatarUrl
      url
    }
    category {
      id
      name
      slug
    }
    labels(first: $labelCount) {
      nodes {
        id
        name
        color
      }
    }
    reactions {
      totalCount
    }
    reactionGroups {
      content
      users {
        totalCount
      }
    }
    upvoteCount
    comments {
      totalCount
    }
  }
"#;

/// Append the shared fragment to a discussion query document.
pub fn with_discussion_fields(query: &str) -> String {
    format!("{query}{DISCUSSION_FIELDS_FRAGMENT}")
}
