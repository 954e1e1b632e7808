//! Data path from raw backend payloads to displayable results.
//!
//! - `normalize`: Raw JSON records to canonical models
//! - `query`: Facets to backend requests, per query mode
//! - `rank`: Sort policy and badge tiers
//! - `present`: Sequential ranks and podium layout

pub mod normalize;
pub mod present;
pub mod query;
pub mod rank;

pub use normalize::Normalizer;
pub use present::{PodiumPosition, Ranked, card_line, podium, with_ranks};
pub use query::{ApiRequest, Facet, QueryMode, SearchQuery, SortOrder, build};
pub use rank::{BadgeTier, newest_first, order};
