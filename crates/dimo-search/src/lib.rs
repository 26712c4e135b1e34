//! Nearby-store search for DIMO.
//!
//! Filters a catalog snapshot to the stores within a radius of the user,
//! ranks their brands (personalized ranking service first, catalog
//! popularity as the fallback), and merges distance and rank into a final
//! order whose first results span as many distinct brands as possible.

pub mod diversity;
pub mod error;
pub mod filter;
pub mod geo;
pub mod pipeline;
pub mod ranker;
pub mod snapshot;
pub mod sources;
pub mod types;

pub use diversity::{diversify, DIVERSITY_WIDTH};
pub use error::{SearchError, SourceError};
pub use filter::{filter_catalog, FilterOutcome};
pub use geo::distance_km;
pub use pipeline::SearchEngine;
pub use ranker::{rank_brands, BrandRankMap, RankOutcome};
pub use snapshot::{CatalogSnapshot, SharedCatalog};
pub use sources::{BrandDirectory, DisabledRanker, PersonalizedRanker, StoreCatalog};
pub use types::{RankingSource, ScoredCandidate, SearchRequest, SearchResult};
