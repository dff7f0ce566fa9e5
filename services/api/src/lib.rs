//! services/api/src/lib.rs
//!
//! HTTP shell around the reference request core: configuration, request store
//! adapters and the REST handlers.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
