//! Path resolution for single-entity lookups.

use crate::entity::Entity;
use crate::error::{OpenAlexError, Result};

/// How a caller-supplied ID is addressed on the API.
#[derive(Debug, Clone, PartialEq, Eq)]
enum IdForm<'a> {
    /// `<namespace>:<value>`, e.g. `doi:10.7717/peerj.4375`.
    Namespaced(&'a str),
    /// Native OpenAlex ID (`W2741809807`) or a resolvable URL.
    Bare,
}

/// Resolve the request path for one entity, e.g. `works/doi:10.7717/peerj.4375`.
///
/// An explicit `id_type` always wins over the bare-value check. Without one,
/// the value must be a native ID (first letter of the entity name, any case)
/// or start with `http`.
pub fn resolve_path(entity: Entity, id_value: &str, id_type: Option<&str>) -> Result<String> {
    if id_value.is_empty() {
        return Err(OpenAlexError::EmptyInput {
            argument: "id_value",
        });
    }

    match classify(entity, id_value, id_type)? {
        IdForm::Namespaced(namespace) => Ok(format!("{}/{}:{}", entity, namespace, id_value)),
        IdForm::Bare => Ok(format!("{}/{}", entity, id_value)),
    }
}

fn classify<'a>(entity: Entity, id_value: &str, id_type: Option<&'a str>) -> Result<IdForm<'a>> {
    match id_type.filter(|t| !t.is_empty()) {
        Some(id_type) if entity.id_namespaces().contains(&id_type) => {
            Ok(IdForm::Namespaced(id_type))
        }
        Some(id_type) => Err(OpenAlexError::InvalidIdType {
            id_type: id_type.to_string(),
            valid: entity.id_namespaces().iter().map(|s| s.to_string()).collect(),
        }),
        None if is_bare_id(entity, id_value) => Ok(IdForm::Bare),
        None => Err(OpenAlexError::InvalidIdValue(id_value.to_string())),
    }
}

fn is_bare_id(entity: Entity, id_value: &str) -> bool {
    let lower = id_value.to_lowercase();
    lower.starts_with(entity.id_prefix()) || lower.starts_with("http")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespaced_doi() {
        assert_eq!(
            resolve_path(Entity::Work, "10.7717/peerj.4375", Some("doi")).unwrap(),
            "works/doi:10.7717/peerj.4375"
        );
    }

    #[test]
    fn test_url_without_type() {
        assert_eq!(
            resolve_path(Entity::Work, "https://doi.org/10.7717/peerj.4375", None).unwrap(),
            "works/https://doi.org/10.7717/peerj.4375"
        );
        assert_eq!(
            resolve_path(Entity::Author, "https://orcid.org/0000-0003-1613-5981", None).unwrap(),
            "authors/https://orcid.org/0000-0003-1613-5981"
        );
    }

    #[test]
    fn test_native_ids_case_insensitive() {
        assert_eq!(
            resolve_path(Entity::Author, "A1969205032", None).unwrap(),
            "authors/A1969205032"
        );
        assert_eq!(
            resolve_path(Entity::Concept, "c71924100", None).unwrap(),
            "concepts/c71924100"
        );
    }

    #[test]
    fn test_invalid_bare_value() {
        assert!(matches!(
            resolve_path(Entity::Work, "xyz", None),
            Err(OpenAlexError::InvalidIdValue(v)) if v == "xyz"
        ));
        // author ID against the works endpoint
        assert!(resolve_path(Entity::Work, "A1969205032", None).is_err());
    }

    #[test]
    fn test_empty_value() {
        assert!(matches!(
            resolve_path(Entity::Venue, "", Some("issn")),
            Err(OpenAlexError::EmptyInput { argument: "id_value" })
        ));
    }

    #[test]
    fn test_unknown_id_type() {
        match resolve_path(Entity::Work, "Q11190", Some("wikidata")).unwrap_err() {
            OpenAlexError::InvalidIdType { id_type, valid } => {
                assert_eq!(id_type, "wikidata");
                assert_eq!(valid, vec!["openalex", "doi", "pmid", "mag"]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_id_type_takes_priority_over_bare_check() {
        // would pass as a native work ID, but the namespace is wrong
        assert!(matches!(
            resolve_path(Entity::Work, "W2741809807", Some("orcid")),
            Err(OpenAlexError::InvalidIdType { .. })
        ));
        assert_eq!(
            resolve_path(Entity::Work, "W2741809807", Some("openalex")).unwrap(),
            "works/openalex:W2741809807"
        );
    }

    #[test]
    fn test_empty_id_type_treated_as_absent() {
        assert_eq!(
            resolve_path(Entity::Institution, "I27837315", Some("")).unwrap(),
            "institutions/I27837315"
        );
    }
}
