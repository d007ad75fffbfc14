//! Core of the cabinet / substitute-doctor marketplace: the profile review workflow that
//! gates marketplace features, and the geographic radius normalization used by job search.

pub mod config;
pub mod error;
pub mod geo;
pub mod profiles;
pub mod search;
pub mod telemetry;
