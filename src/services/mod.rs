// src/services/mod.rs

//! Core services: gateway authentication, page fetching, item extraction.

pub mod extractor;
pub mod fetcher;
pub mod gateway;

pub use extractor::extract_items;
pub use fetcher::PageFetcher;
pub use gateway::{AuthState, Credentials, Session};
