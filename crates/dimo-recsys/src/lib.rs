//! Client for the personalized brand-ranking (recommender) service.
//!
//! The service takes a user id and a set of brand ids and answers with the
//! same brands in the order that user is most likely to prefer them.

pub mod client;
pub mod error;
mod ranker;
pub mod types;

pub use client::RecsysClient;
pub use error::RecsysError;
pub use types::{RankBrandsRequest, RankBrandsResponse};
