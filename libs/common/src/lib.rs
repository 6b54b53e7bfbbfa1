//! Common library for the Cliphub read-model core
//!
//! This crate provides shared functionality used across the Cliphub
//! services: opaque entity identifiers, the shared store error type,
//! the pagination envelope, and pagination configuration.

pub mod config;
pub mod error;
pub mod id;
pub mod page;
