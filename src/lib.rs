//! # openalex-client
//!
//! A Rust client for the [OpenAlex](https://openalex.org) API.
//!
//! Provides:
//! - **Library**: async access to works, authors, institutions, venues and
//!   concepts: random and single lookups, filtered/sorted lists, group_by facets
//! - **Validation**: filter, sort and group_by keys are checked against each
//!   entity's schema before a request is sent
//! - **Paging**: basic (page number) and cursor paging as a lazy page sequence
//! - **CLI**: `openalex` binary (feature `cli`)
//!
//! ## Quick Start
//!
//! ```no_run
//! # async fn example() -> openalex_client::error::Result<()> {
//! use openalex_client::{ListQuery, OpenAlexClient};
//!
//! // An email gets requests into the polite pool
//! let client = OpenAlexClient::with_email("me@example.org");
//!
//! let work = client.works().single("https://doi.org/10.7717/peerj.4375", None).await?;
//! println!("{}", work["display_name"]);
//!
//! let query = ListQuery::new()
//!     .filter("publication_year", "2020")
//!     .sort("cited_by_count", "desc")
//!     .per_page(100);
//! let mut pages = client.works().list(&query)?;
//! while let Some(page) = pages.next().await {
//!     for result in page?["results"].as_array().into_iter().flatten() {
//!         println!("{}", result["display_name"]);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod endpoints;
pub mod entity;
pub mod error;
pub mod ids;
pub mod paging;
pub mod query;
pub mod rate_limit;
pub mod types;

// Re-export key types at the crate root.
pub use client::OpenAlexClient;
pub use endpoints::Endpoint;
pub use entity::{Entity, EntitySchema};
pub use error::OpenAlexError;
pub use paging::{Pages, Paging};
pub use query::{GroupQuery, ListQuery};
pub use types::*;
