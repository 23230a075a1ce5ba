//! Entity schema registry.
//!
//! One constant [`EntitySchema`] per [`Entity`]: the ID namespaces, filter keys
//! and sort keys the OpenAlex API accepts for that entity.

use crate::error::OpenAlexError;

/// Keys accepted by `sort` on list requests, for every entity.
pub const SORTABLE_ATTRIBUTES: &[&str] = &[
    "cited_by_count",
    "display_name",
    "publication_date",
    "relevance_score",
    "works_count",
];

/// Keys accepted by `sort` on group_by requests.
pub const SORTABLE_ATTRIBUTES_FOR_GROUPS: &[&str] = &["count", "key"];

/// Accepted sort directions.
pub const SORT_DIRECTIONS: &[&str] = &["asc", "desc"];

/// Filter key suffixes that cannot be grouped on (dates and counts).
const NON_GROUPABLE_SUFFIXES: &[&str] = &["_date", "_count"];

/// The entity kinds exposed by OpenAlex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Work,
    Author,
    Institution,
    Venue,
    Concept,
}

impl Entity {
    /// All entity kinds, in a stable order.
    pub const ALL: [Entity; 5] = [
        Entity::Work,
        Entity::Author,
        Entity::Institution,
        Entity::Venue,
        Entity::Concept,
    ];

    /// The constant schema for this entity.
    pub fn schema(self) -> &'static EntitySchema {
        match self {
            Self::Work => &WORKS,
            Self::Author => &AUTHORS,
            Self::Institution => &INSTITUTIONS,
            Self::Venue => &VENUES,
            Self::Concept => &CONCEPTS,
        }
    }

    /// API path segment, e.g. `works`.
    pub fn name(self) -> &'static str {
        self.schema().name
    }

    /// Lowercase first letter of native OpenAlex IDs (`w` for `W2741809807`).
    pub fn id_prefix(self) -> char {
        self.schema().id_prefix()
    }

    pub fn filter_attributes(self) -> &'static [&'static str] {
        self.schema().filter_attributes
    }

    pub fn id_namespaces(self) -> &'static [&'static str] {
        self.schema().id_namespaces
    }

    pub fn sortable_attributes(self, group_context: bool) -> &'static [&'static str] {
        self.schema().sortable_attributes(group_context)
    }

    pub fn groupable_attributes(self) -> Vec<&'static str> {
        self.schema().groupable_attributes().collect()
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Entity {
    type Err = OpenAlexError;

    /// Accepts the path segment or its singular form, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Entity::ALL
            .into_iter()
            .find(|e| {
                let name = e.name();
                lower == name || Some(lower.as_str()) == name.strip_suffix('s')
            })
            .ok_or_else(|| OpenAlexError::UnknownEntity(s.to_string()))
    }
}

/// What the API accepts for one entity kind.
#[derive(Debug)]
pub struct EntitySchema {
    /// Path segment; its first letter is the native ID prefix.
    pub name: &'static str,
    /// Namespaces usable as `<namespace>:<value>` in single lookups.
    pub id_namespaces: &'static [&'static str],
    /// Keys accepted in the `filter` parameter.
    pub filter_attributes: &'static [&'static str],
    /// Keys accepted in the `sort` parameter of list requests.
    pub sortable_attributes: &'static [&'static str],
}

impl EntitySchema {
    pub fn id_prefix(&self) -> char {
        self.name
            .chars()
            .next()
            .map(|c| c.to_ascii_lowercase())
            .unwrap_or_default()
    }

    pub fn sortable_attributes(&self, group_context: bool) -> &'static [&'static str] {
        if group_context {
            SORTABLE_ATTRIBUTES_FOR_GROUPS
        } else {
            self.sortable_attributes
        }
    }

    /// Filter keys minus those ending in `_date` or `_count`.
    pub fn groupable_attributes(&self) -> impl Iterator<Item = &'static str> {
        let attrs: &'static [&'static str] = self.filter_attributes;
        attrs
            .iter()
            .copied()
            .filter(|attr| !NON_GROUPABLE_SUFFIXES.iter().any(|s| attr.ends_with(s)))
    }

    pub fn is_groupable(&self, attr: &str) -> bool {
        self.groupable_attributes().any(|a| a == attr)
    }
}

pub static WORKS: EntitySchema = EntitySchema {
    name: "works",
    id_namespaces: &["openalex", "doi", "pmid", "mag"],
    filter_attributes: &[
        "alternate_host_venues.id",
        "alternate_host_venues.license",
        "alternate_host_venues.version",
        "author.id",
        "author.orcid",
        "authorships.author.id",
        "authorships.author.orcid",
        "authorships.institutions.country_code",
        "authorships.institutions.id",
        "authorships.institutions.ror",
        "authorships.institutions.type",
        "cited_by",
        "cited_by_count",
        "cites",
        "concept.id",
        "concepts.id",
        "concepts.wikidata",
        "display_name",
        "display_name.search",
        "doi",
        "from_created_date",
        "from_publication_date",
        "from_updated_date",
        "has_doi",
        "host_venue.id",
        "host_venue.issn",
        "host_venue.publisher",
        "institution.id",
        "institutions.country_code",
        "institutions.id",
        "institutions.ror",
        "institutions.type",
        "is_oa",
        "is_paratext",
        "is_retracted",
        "journal.id",
        "oa_status",
        "openalex_id",
        "open_access.is_oa",
        "open_access.oa_status",
        "publication_date",
        "publication_year",
        "raw_affiliation_string.search",
        "referenced_works",
        "related_to",
        "title.search",
        "to_publication_date",
        "type",
    ],
    sortable_attributes: SORTABLE_ATTRIBUTES,
};

pub static AUTHORS: EntitySchema = EntitySchema {
    name: "authors",
    id_namespaces: &["openalex", "orcid", "mag"],
    filter_attributes: &[
        "cited_by_count",
        "display_name",
        "display_name.search",
        "from_created_date",
        "from_updated_date",
        "has_orcid",
        "last_known_institution.country_code",
        "last_known_institution.id",
        "last_known_institution.ror",
        "last_known_institution.type",
        "openalex_id",
        "orcid",
        "works_count",
        "x_concepts.id",
    ],
    sortable_attributes: SORTABLE_ATTRIBUTES,
};

pub static INSTITUTIONS: EntitySchema = EntitySchema {
    name: "institutions",
    id_namespaces: &["openalex", "ror", "mag"],
    filter_attributes: &[
        "cited_by_count",
        "country_code",
        "display_name",
        "display_name.search",
        "from_created_date",
        "from_updated_date",
        "has_ror",
        "openalex_id",
        "ror",
        "type",
        "works_count",
        "x_concepts.id",
    ],
    sortable_attributes: SORTABLE_ATTRIBUTES,
};

pub static VENUES: EntitySchema = EntitySchema {
    name: "venues",
    id_namespaces: &["openalex", "issn", "issn_l", "mag"],
    filter_attributes: &[
        "cited_by_count",
        "display_name",
        "display_name.search",
        "from_created_date",
        "from_updated_date",
        "has_issn",
        "issn",
        "is_in_doaj",
        "is_oa",
        "openalex_id",
        "publisher",
        "works_count",
        "x_concepts.id",
    ],
    sortable_attributes: SORTABLE_ATTRIBUTES,
};

pub static CONCEPTS: EntitySchema = EntitySchema {
    name: "concepts",
    id_namespaces: &["openalex", "wikidata", "mag"],
    filter_attributes: &[
        "ancestors.id",
        "cited_by_count",
        "display_name",
        "display_name.search",
        "from_created_date",
        "from_updated_date",
        "has_wikidata",
        "level",
        "openalex_id",
        "wikidata_id",
        "works_count",
    ],
    sortable_attributes: SORTABLE_ATTRIBUTES,
};
