pub mod core;
pub mod fetch;
pub mod html;
pub mod server;
pub mod spider;
pub mod store;

// --- Primary core exports ---
pub use crate::core::config::Config;
pub use crate::core::error::QuarryError;
pub use crate::fetch::{Fetcher, HttpFetcher};
pub use crate::spider::CrawlEngine;
pub use crate::store::SearchIndex;
