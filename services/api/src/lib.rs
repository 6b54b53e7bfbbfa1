//! Cliphub read-model composition core
//!
//! This crate assembles the denormalized views a media-sharing frontend
//! reads: video feeds with owner summaries, channel profiles with
//! subscriber counts, playlist details with aggregated video stats, and
//! paginated comment feeds. Views are produced by fixed, hand-composed
//! pipelines: a match/sort/window pass against the store followed by typed
//! join stages that attach owners, related-row counts, and viewer-specific
//! flags.
//!
//! Transport, credential handling, media storage, and process bootstrap are
//! the host's concern. The host wires a [`store::Store`] (any backend
//! implementing [`store::Collection`] per entity) into the services in
//! [`services`] and maps [`error::ApiError`] onto its responses.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod store;
pub mod validation;
pub mod views;
