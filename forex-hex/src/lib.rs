//! # Forex Hex
//!
//! Application service layer and HTTP adapter for the ForexCalc service.
//!
//! ## Architecture
//!
//! - `service/` - Application service (snapshot cache, conversion orchestration)
//! - `inbound/` - HTTP adapter (Axum server)
//!
//! The service is generic over `S: FeedSource`, so the upstream client can be
//! swapped for an in-memory source in tests.

pub mod inbound;
mod openapi;
pub mod service;


pub use openapi::ApiDoc;
pub use service::RateService;
