//! Port traits (interfaces for adapters).
//!
//! The application layer depends on these traits, not on concrete HTTP clients.

mod feed;

pub use feed::{FeedSource, FetchError};
