//! Validated OpenAlex query parameters.
//!
//! The free functions check `filter`, `sort` and `group_by` against an
//! entity's schema and serialize them to their wire form. [`ListQuery`] and
//! [`GroupQuery`] collect caller input in insertion order and run those checks
//! before any request is made.
//!
//! # Example
//!
//! ```
//! use openalex_client::{Entity, ListQuery};
//!
//! let query = ListQuery::new()
//!     .filter("publication_year", "2020")
//!     .filter("is_oa", "true")
//!     .sort("cited_by_count", "desc")
//!     .per_page(50);
//! let params = query.params(Entity::Work).unwrap();
//! assert_eq!(params[0], ("filter".to_string(), "publication_year:2020,is_oa:true".to_string()));
//! ```

use crate::entity::{Entity, SORT_DIRECTIONS};
use crate::error::{OpenAlexError, Result};

/// Filter keys carrying this suffix are full-text searches.
const SEARCH_FILTER_SUFFIX: &str = ".search";

/// Sort key that only makes sense for text searches.
const RELEVANCE_SCORE: &str = "relevance_score";

fn to_owned_list(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

fn join_pairs<K: AsRef<str>, V: AsRef<str>>(pairs: &[(K, V)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}:{}", k.as_ref(), v.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Build the `filter` parameter, e.g. `is_oa:true,publication_year:2020`.
///
/// Returns `None` for no filters. Fails with [`OpenAlexError::InvalidAttribute`]
/// on the first key the entity does not accept.
pub fn build_filter<K: AsRef<str>, V: AsRef<str>>(
    entity: Entity,
    filters: &[(K, V)],
) -> Result<Option<String>> {
    if filters.is_empty() {
        return Ok(None);
    }

    let valid = entity.filter_attributes();
    if let Some((key, _)) = filters.iter().find(|(k, _)| !valid.contains(&k.as_ref())) {
        return Err(OpenAlexError::InvalidAttribute {
            param: "filter",
            key: key.as_ref().to_string(),
            valid: to_owned_list(valid),
        });
    }

    Ok(Some(join_pairs(filters)))
}

/// A request is a text search when an explicit search string is given or any
/// filter key ends in `.search`.
pub fn is_search_context<K: AsRef<str>, V>(filters: &[(K, V)], search: Option<&str>) -> bool {
    search.is_some_and(|s| !s.is_empty())
        || filters
            .iter()
            .any(|(k, _)| k.as_ref().ends_with(SEARCH_FILTER_SUFFIX))
}

/// Build the `sort` parameter, e.g. `cited_by_count:desc`.
///
/// `relevance_score` is rejected with [`OpenAlexError::InvalidSortContext`]
/// unless `search_context` holds; that check runs before key validation.
/// Keys are checked against the group sort keys when `group_context` is set.
pub fn build_sort<K: AsRef<str>, V: AsRef<str>>(
    entity: Entity,
    sort: &[(K, V)],
    search_context: bool,
    group_context: bool,
) -> Result<Option<String>> {
    if sort.is_empty() {
        return Ok(None);
    }

    if !search_context && sort.iter().any(|(k, _)| k.as_ref() == RELEVANCE_SCORE) {
        return Err(OpenAlexError::InvalidSortContext);
    }

    let sortable = entity.sortable_attributes(group_context);
    for (key, value) in sort {
        let (key, value) = (key.as_ref(), value.as_ref());
        if !sortable.contains(&key) {
            return Err(OpenAlexError::InvalidAttribute {
                param: "sort",
                key: key.to_string(),
                valid: to_owned_list(sortable),
            });
        }
        if !SORT_DIRECTIONS.contains(&value) {
            return Err(OpenAlexError::InvalidSortValue {
                key: key.to_string(),
                value: value.to_string(),
                valid: to_owned_list(SORT_DIRECTIONS),
            });
        }
    }

    Ok(Some(join_pairs(sort)))
}

/// Validate the `group_by` parameter; returned unchanged on success.
pub fn build_group_by(entity: Entity, group_by: &str) -> Result<String> {
    if group_by.is_empty() {
        return Err(OpenAlexError::EmptyInput {
            argument: "group_by",
        });
    }

    let schema = entity.schema();
    if schema.is_groupable(group_by) {
        Ok(group_by.to_string())
    } else {
        Err(OpenAlexError::InvalidAttribute {
            param: "group_by",
            key: group_by.to_string(),
            valid: schema.groupable_attributes().map(String::from).collect(),
        })
    }
}

/// Shared `filter` / `search` / `sort` assembly for list and group requests.
fn base_params(
    entity: Entity,
    filters: &[(String, String)],
    search: Option<&str>,
    sort: &[(String, String)],
    group_context: bool,
) -> Result<Vec<(String, String)>> {
    let mut params = Vec::new();

    if let Some(filter) = build_filter(entity, filters)? {
        params.push(("filter".to_string(), filter));
    }
    if let Some(search) = search.filter(|s| !s.is_empty()) {
        params.push(("search".to_string(), search.to_string()));
    }
    let search_context = is_search_context(filters, search);
    if let Some(sort) = build_sort(entity, sort, search_context, group_context)? {
        params.push(("sort".to_string(), sort));
    }

    Ok(params)
}

/// Parameters for a list request.
///
/// Without explicit pages the list is walked with cursor paging until the API
/// reports no further cursor. With pages, exactly those (in range) are fetched.
#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub(crate) filters: Vec<(String, String)>,
    pub(crate) search: Option<String>,
    pub(crate) sort: Vec<(String, String)>,
    pub(crate) per_page: Option<i32>,
    pub(crate) pages: Vec<i64>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter, e.g. `("publication_year", "2020")`.
    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((key.into(), value.into()));
        self
    }

    /// Full-text search across the entity's searchable fields.
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    /// Add a sort key with direction `asc` or `desc`.
    pub fn sort(mut self, key: impl Into<String>, direction: impl Into<String>) -> Self {
        self.sort.push((key.into(), direction.into()));
        self
    }

    /// Results per page. Out-of-range values are normalized, not rejected.
    pub fn per_page(mut self, per_page: i32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Request a specific page (switches to basic paging).
    pub fn page(mut self, page: i64) -> Self {
        self.pages.push(page);
        self
    }

    pub fn pages(mut self, pages: impl IntoIterator<Item = i64>) -> Self {
        self.pages.extend(pages);
        self
    }

    /// Validate and serialize everything except paging parameters.
    pub fn params(&self, entity: Entity) -> Result<Vec<(String, String)>> {
        base_params(
            entity,
            &self.filters,
            self.search.as_deref(),
            &self.sort,
            false,
        )
    }
}

/// Parameters for a group_by request.
#[derive(Debug, Clone, Default)]
pub struct GroupQuery {
    pub(crate) group_by: String,
    pub(crate) filters: Vec<(String, String)>,
    pub(crate) search: Option<String>,
    pub(crate) sort: Vec<(String, String)>,
}

impl GroupQuery {
    pub fn new(group_by: impl Into<String>) -> Self {
        Self {
            group_by: group_by.into(),
            ..Self::default()
        }
    }

    pub fn filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((key.into(), value.into()));
        self
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    /// Sort groups by `count` or `key`.
    pub fn sort(mut self, key: impl Into<String>, direction: impl Into<String>) -> Self {
        self.sort.push((key.into(), direction.into()));
        self
    }

    /// Validate and serialize all parameters, `group_by` first.
    pub fn params(&self, entity: Entity) -> Result<Vec<(String, String)>> {
        let group_by = build_group_by(entity, &self.group_by)?;
        let mut params = vec![("group_by".to_string(), group_by)];
        params.extend(base_params(
            entity,
            &self.filters,
            self.search.as_deref(),
            &self.sort,
            true,
        )?);
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::SORTABLE_ATTRIBUTES_FOR_GROUPS;

    const NONE: &[(&str, &str)] = &[];

    #[test]
    fn test_build_filter_empty_gives_none() {
        for entity in Entity::ALL {
            assert_eq!(build_filter(entity, NONE).unwrap(), None);
        }
    }

    #[test]
    fn test_build_filter_preserves_order() {
        let filters = [
            ("display_name.search", "test"),
            ("has_issn", "test"),
            ("publisher", "test"),
        ];
        assert_eq!(
            build_filter(Entity::Venue, &filters).unwrap().as_deref(),
            Some("display_name.search:test,has_issn:test,publisher:test")
        );
    }

    #[test]
    fn test_build_filter_unknown_key() {
        for entity in Entity::ALL {
            let err = build_filter(entity, &[("hallo", "test")]).unwrap_err();
            match err {
                OpenAlexError::InvalidAttribute { param, key, valid } => {
                    assert_eq!(param, "filter");
                    assert_eq!(key, "hallo");
                    assert_eq!(valid.len(), entity.filter_attributes().len());
                }
                other => panic!("unexpected error: {:?}", other),
            }
        }
    }

    #[test]
    fn test_build_filter_rejects_mixed_keys() {
        let filters = [("is_oa", "true"), ("hallo", "x")];
        assert!(build_filter(Entity::Work, &filters).is_err());
    }

    #[test]
    fn test_build_sort_empty_gives_none() {
        assert_eq!(build_sort(Entity::Work, NONE, false, false).unwrap(), None);
        assert_eq!(build_sort(Entity::Work, NONE, false, true).unwrap(), None);
    }

    #[test]
    fn test_build_sort_all_valid_list_combos() {
        for entity in Entity::ALL {
            for key in entity.sortable_attributes(false) {
                if *key == "relevance_score" {
                    continue;
                }
                for dir in SORT_DIRECTIONS {
                    let sort = build_sort(entity, &[(*key, *dir)], false, false).unwrap();
                    assert_eq!(sort, Some(format!("{}:{}", key, dir)));
                }
            }
        }
    }

    #[test]
    fn test_build_sort_all_valid_group_combos() {
        for key in SORTABLE_ATTRIBUTES_FOR_GROUPS {
            for dir in SORT_DIRECTIONS {
                let sort = build_sort(Entity::Venue, &[(*key, *dir)], false, true).unwrap();
                assert_eq!(sort, Some(format!("{}:{}", key, dir)));
            }
        }
    }

    #[test]
    fn test_build_sort_multiple_keys_in_order() {
        let sort = [("display_name", "asc"), ("works_count", "desc")];
        assert_eq!(
            build_sort(Entity::Venue, &sort, false, false).unwrap().as_deref(),
            Some("display_name:asc,works_count:desc")
        );
        let sort = [("count", "asc"), ("key", "desc")];
        assert_eq!(
            build_sort(Entity::Venue, &sort, false, true).unwrap().as_deref(),
            Some("count:asc,key:desc")
        );
    }

    #[test]
    fn test_build_sort_relevance_requires_search() {
        let sort = [("relevance_score", "desc")];
        assert!(matches!(
            build_sort(Entity::Work, &sort, false, false),
            Err(OpenAlexError::InvalidSortContext)
        ));

        let filters = [("display_name.search", "x")];
        let ctx = is_search_context(&filters, None);
        assert_eq!(
            build_sort(Entity::Work, &sort, ctx, false).unwrap().as_deref(),
            Some("relevance_score:desc")
        );
    }

    #[test]
    fn test_search_context_rules() {
        assert!(!is_search_context(NONE, None));
        assert!(!is_search_context(NONE, Some("")));
        assert!(is_search_context(NONE, Some("dna")));
        assert!(!is_search_context(&[("cited_by_count", ">0")], None));
        assert!(is_search_context(&[("title.search", "dna")], None));
    }

    #[test]
    fn test_build_sort_relevance_not_a_group_key() {
        let sort = [("relevance_score", "desc")];
        assert!(matches!(
            build_sort(Entity::Work, &sort, true, true),
            Err(OpenAlexError::InvalidAttribute { param: "sort", .. })
        ));
    }

    #[test]
    fn test_build_sort_invalid_key() {
        let sort = [("hallo", "test"), ("key", "desc")];
        assert!(matches!(
            build_sort(Entity::Venue, &sort, false, true),
            Err(OpenAlexError::InvalidAttribute { param: "sort", .. })
        ));
        assert!(matches!(
            build_sort(Entity::Work, &[("key", "asc")], false, false),
            Err(OpenAlexError::InvalidAttribute { .. })
        ));
    }

    #[test]
    fn test_build_sort_invalid_direction() {
        let err = build_sort(Entity::Work, &[("display_name", "xyz")], false, false).unwrap_err();
        match err {
            OpenAlexError::InvalidSortValue { key, value, valid } => {
                assert_eq!(key, "display_name");
                assert_eq!(value, "xyz");
                assert_eq!(valid, vec!["asc", "desc"]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_build_group_by() {
        assert!(matches!(
            build_group_by(Entity::Venue, ""),
            Err(OpenAlexError::EmptyInput { argument: "group_by" })
        ));
        assert!(matches!(
            build_group_by(Entity::Venue, "hallo"),
            Err(OpenAlexError::InvalidAttribute { param: "group_by", .. })
        ));
        assert!(matches!(
            build_group_by(Entity::Venue, "cited_by_count"),
            Err(OpenAlexError::InvalidAttribute { .. })
        ));
        // valid for works, not a venue filter
        assert!(build_group_by(Entity::Venue, "doi").is_err());
        assert_eq!(build_group_by(Entity::Venue, "has_issn").unwrap(), "has_issn");
    }

    #[test]
    fn test_list_query_params() {
        let params = ListQuery::new()
            .filter("title.search", "dna")
            .search("double helix")
            .sort("relevance_score", "desc")
            .params(Entity::Work)
            .unwrap();
        assert_eq!(
            params,
            vec![
                ("filter".to_string(), "title.search:dna".to_string()),
                ("search".to_string(), "double helix".to_string()),
                ("sort".to_string(), "relevance_score:desc".to_string()),
            ]
        );
    }

    #[test]
    fn test_list_query_explicit_search_enables_relevance() {
        let params = ListQuery::new()
            .search("graphene")
            .sort("relevance_score", "asc")
            .params(Entity::Work)
            .unwrap();
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_list_query_empty_search_omitted() {
        let params = ListQuery::new().search("").params(Entity::Author).unwrap();
        assert!(params.is_empty());
        assert!(ListQuery::new()
            .search("")
            .sort("relevance_score", "desc")
            .params(Entity::Author)
            .is_err());
    }

    #[test]
    fn test_group_query_params() {
        let params = GroupQuery::new("type")
            .filter("country_code", "de")
            .sort("key", "asc")
            .sort("count", "desc")
            .params(Entity::Institution)
            .unwrap();
        assert_eq!(
            params,
            vec![
                ("group_by".to_string(), "type".to_string()),
                ("filter".to_string(), "country_code:de".to_string()),
                ("sort".to_string(), "key:asc,count:desc".to_string()),
            ]
        );
    }

    #[test]
    fn test_group_query_rejects_list_sort_keys() {
        assert!(GroupQuery::new("has_ror")
            .sort("display_name", "asc")
            .params(Entity::Institution)
            .is_err());
    }
}
