//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: visited, downloaded and failed URLs for one crawl
//! - `HostGate`: per-host bound on in-flight downloads, shared by every crawl
//!   a crawler runs

mod crawl_state;
mod host_gate;

pub use crawl_state::CrawlState;
pub use host_gate::{HostGate, HostPermit};
