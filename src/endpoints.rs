//! Entity endpoints: random, single, list and group_by requests.

use crate::client::OpenAlexClient;
use crate::entity::Entity;
use crate::error::{OpenAlexError, Result};
use crate::ids::resolve_path;
use crate::paging::Pages;
use crate::query::{GroupQuery, ListQuery};
use serde_json::Value;

/// Requests against one entity kind, borrowing the client.
///
/// Obtained from [`OpenAlexClient::works`], [`OpenAlexClient::authors`], etc.
#[derive(Debug, Clone, Copy)]
pub struct Endpoint<'a> {
    client: &'a OpenAlexClient,
    entity: Entity,
}

impl OpenAlexClient {
    pub fn endpoint(&self, entity: Entity) -> Endpoint<'_> {
        Endpoint {
            client: self,
            entity,
        }
    }

    pub fn works(&self) -> Endpoint<'_> {
        self.endpoint(Entity::Work)
    }

    pub fn authors(&self) -> Endpoint<'_> {
        self.endpoint(Entity::Author)
    }

    pub fn institutions(&self) -> Endpoint<'_> {
        self.endpoint(Entity::Institution)
    }

    pub fn venues(&self) -> Endpoint<'_> {
        self.endpoint(Entity::Venue)
    }

    pub fn concepts(&self) -> Endpoint<'_> {
        self.endpoint(Entity::Concept)
    }

    /// Page through the works behind another entity's `works_api_url`.
    ///
    /// The URL's query parameters are sent as-is; `per_page` and `pages` behave
    /// as in [`Endpoint::list`].
    pub fn works_by_api_url(
        &self,
        works_api_url: &str,
        per_page: Option<i32>,
        pages: &[i64],
    ) -> Result<Pages> {
        let url = url::Url::parse(works_api_url)
            .map_err(|e| OpenAlexError::InvalidApiUrl(format!("{}: {}", works_api_url, e)))?;

        if url.path().trim_matches('/') != Entity::Work.name() {
            return Err(OpenAlexError::InvalidApiUrl(format!(
                "{} does not point at the works list",
                works_api_url
            )));
        }

        let params = url
            .query_pairs()
            .filter(|(k, _)| !matches!(&**k, "page" | "per_page" | "cursor"))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        Ok(Pages::new(
            self.clone(),
            Entity::Work.name(),
            params,
            per_page,
            pages,
        ))
    }
}

impl<'a> Endpoint<'a> {
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Fetch one random entity.
    pub async fn random(&self) -> Result<Value> {
        let path = format!("{}/random", self.entity);
        self.client.get(&path, &[]).await
    }

    /// Fetch one entity by ID.
    ///
    /// `id_type` is a namespace such as `doi`, `orcid` or `mag`; it can be left
    /// out for native OpenAlex IDs and URLs.
    pub async fn single(&self, id_value: &str, id_type: Option<&str>) -> Result<Value> {
        let path = resolve_path(self.entity, id_value, id_type)?;
        self.client.get(&path, &[]).await
    }

    /// Page through a filtered, sorted list.
    ///
    /// Validation happens here; no request is sent until the first
    /// [`Pages::next`].
    pub fn list(&self, query: &ListQuery) -> Result<Pages> {
        let params = query.params(self.entity)?;
        Ok(Pages::new(
            self.client.clone(),
            self.entity.name(),
            params,
            query.per_page,
            &query.pages,
        ))
    }

    /// Group entities into facets. One request; all buckets come back together.
    pub async fn groups(&self, query: &GroupQuery) -> Result<Value> {
        let params = query.params(self.entity)?;
        let params: Vec<(&str, &str)> = params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        self.client.get(self.entity.name(), &params).await
    }
}
