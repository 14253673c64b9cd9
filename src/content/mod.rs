//! Read-only access to the artist's categories and projects.

pub mod catalog;
pub mod gallery;
pub mod graphql;
pub mod model;

pub use graphql::{GraphQlClient, HttpTransport, Transport};
pub use model::{Category, FeaturedImage, Project, ProjectInfo};

pub type ContentResult<T> = Result<T, ContentError>;

#[derive(thiserror::Error, Debug)]
pub enum ContentError {
    /// The request never produced a JSON response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with GraphQL errors.
    #[error("graphql error: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    /// The response did not have the expected shape.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("response carried neither data nor errors")]
    MissingData,
}

/// The four queries the portfolio needs. An unknown project slug is
/// `Ok(None)`, never an error.
pub trait ContentSource {
    fn categories(&self) -> ContentResult<Vec<Category>>;
    fn projects(&self) -> ContentResult<Vec<Project>>;
    fn projects_in_category(&self, slug: &str) -> ContentResult<Vec<Project>>;
    fn project(&self, slug: &str) -> ContentResult<Option<Project>>;
}

/// Outcome of a fetch as presented to the user. Failures are logged once
/// here and never retried.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadState<T> {
    Ready(T),
    NotFound,
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn from_result(what: &str, result: ContentResult<T>) -> Self {
        match result {
            Ok(v) => Self::Ready(v),
            Err(err) => {
                tracing::error!(%err, "failed to load {what}");
                Self::Failed(format!("Failed to load {what}"))
            }
        }
    }

    pub fn from_lookup(what: &str, result: ContentResult<Option<T>>) -> Self {
        match LoadState::from_result(what, result) {
            LoadState::Ready(Some(v)) => Self::Ready(v),
            LoadState::Ready(None) | LoadState::NotFound => Self::NotFound,
            LoadState::Failed(msg) => Self::Failed(msg),
        }
    }
}
