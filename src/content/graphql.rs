//! GraphQL client for the CMS over a pluggable [`Transport`].

use super::model::{Category, Project, connection};
use super::{ContentError, ContentResult, ContentSource};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://smldms.xyz/graphql";

macro_rules! project_fields {
    () => {
        "title slug content \
         featuredImage { node { sourceUrl altText } } \
         infosProjet { platform annee technologies lienProjet autrelien couleurPrincipale } \
         categoriesProjet { nodes { name slug } }"
    };
}

pub const CATEGORIES_QUERY: &str =
    "query GetAllCategories { categoriesProjet { nodes { name slug } } }";

pub const PROJECTS_QUERY: &str = concat!(
    "query GetAllProjects { projets(first: 100) { nodes { ",
    project_fields!(),
    " } } }"
);

pub const PROJECTS_BY_CATEGORY_QUERY: &str = concat!(
    "query GetProjectsByCategory($slug: [String]!) { projets(where: { taxQuery: { taxArray: [",
    "{ taxonomy: CATEGORIEPROJET, field: SLUG, terms: $slug }",
    "] } }, first: 100) { nodes { ",
    project_fields!(),
    " } } }"
);

pub const PROJECT_BY_SLUG_QUERY: &str = concat!(
    "query GetProjectBySlug($slug: ID!) { projet(id: $slug, idType: SLUG) { ",
    project_fields!(),
    " } }"
);

/// Sends one GraphQL request body and returns the raw JSON response.
pub trait Transport {
    fn execute(&self, body: &Value) -> ContentResult<Value>;
}

pub struct HttpTransport {
    endpoint: String,
    agent: ureq::Agent,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }
}

impl Transport for HttpTransport {
    fn execute(&self, body: &Value) -> ContentResult<Value> {
        let resp = self
            .agent
            .post(&self.endpoint)
            .set("Accept", "application/json")
            .send_json(body)
            .map_err(|err| match err {
                ureq::Error::Status(code, _) => {
                    ContentError::Transport(format!("{} answered HTTP {code}", self.endpoint))
                }
                other => ContentError::Transport(other.to_string()),
            })?;
        resp.into_json::<Value>()
            .map_err(|err| ContentError::Transport(format!("read response body: {err}")))
    }
}

#[derive(Deserialize)]
struct Envelope<D> {
    data: Option<D>,
    errors: Option<Vec<GraphQlMessage>>,
}

#[derive(Deserialize)]
struct GraphQlMessage {
    message: String,
}

#[derive(Deserialize)]
struct CategoriesData {
    #[serde(rename = "categoriesProjet", default, deserialize_with = "connection")]
    categories: Vec<Category>,
}

#[derive(Deserialize)]
struct ProjectsData {
    #[serde(default, deserialize_with = "connection")]
    projets: Vec<Project>,
}

#[derive(Deserialize)]
struct ProjectData {
    projet: Option<Project>,
}

pub struct GraphQlClient<T> {
    transport: T,
}

impl<T: Transport> GraphQlClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Runs `query` and decodes its `data`. A non-empty `errors` list wins
    /// over any partial data.
    pub fn query<D: DeserializeOwned>(&self, name: &str, query: &str, variables: Value) -> ContentResult<D> {
        tracing::debug!(query = name, "graphql request");
        let raw = self.transport.execute(&json!({
            "query": query,
            "variables": variables,
        }))?;
        let envelope: Envelope<D> = serde_json::from_value(raw)?;
        if let Some(errors) = envelope.errors.filter(|e| !e.is_empty()) {
            return Err(ContentError::GraphQl(
                errors.into_iter().map(|e| e.message).collect(),
            ));
        }
        envelope.data.ok_or(ContentError::MissingData)
    }
}

impl<T: Transport> ContentSource for GraphQlClient<T> {
    fn categories(&self) -> ContentResult<Vec<Category>> {
        let data: CategoriesData = self.query("GetAllCategories", CATEGORIES_QUERY, json!({}))?;
        Ok(data.categories)
    }

    fn projects(&self) -> ContentResult<Vec<Project>> {
        let data: ProjectsData = self.query("GetAllProjects", PROJECTS_QUERY, json!({}))?;
        Ok(data.projets)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    fn projects_in_category(&self, slug: &str) -> ContentResult<Vec<Project>> {
        let data: ProjectsData = self.query(
            "GetProjectsByCategory",
            PROJECTS_BY_CATEGORY_QUERY,
            json!({ "slug": [slug] }),
        )?;
        Ok(data.projets)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    fn project(&self, slug: &str) -> ContentResult<Option<Project>> {
        let data: ProjectData =
            self.query("GetProjectBySlug", PROJECT_BY_SLUG_QUERY, json!({ "slug": slug }))?;
        Ok(data.projet)
    }
}
