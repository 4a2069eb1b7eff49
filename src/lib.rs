//! Google Ads Backend API Library
//!
//! This library provides an HTTP facade that validates responsive search ad
//! payloads and creates them, paused, in Google Ads.
//!
//! # Modules
//!
//! - `api`: API definitions.
//! - `core`: Core business logic.
//! - `integrations`: External service integrations.
//! - `ad_models`: Request, operation and result models.
//! - `config`: Configuration management.
//! - `docs`: Static documentation page.
//! - `errors`: Error handling types.
//! - `google_ads_client`: Google Ads REST client.
//! - `handlers`: HTTP request handlers.
//! - `routes`: Router and middleware.
//! - `validation`: Payload validation.

pub mod api;
pub mod core;
pub mod integrations;

// Re-export primary modules for shared use in tests and the binary
pub mod ad_models;
pub mod config;
pub mod docs;
pub mod errors;
pub mod google_ads_client;
pub mod handlers;
pub mod routes;
pub mod validation;
