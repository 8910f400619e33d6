//! Version-aware mapping cache and resolver
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Handler   │────▶│   Refresh   │────▶│    Meta     │
//! │  (lookup)   │     │(coordinator)│     │(latest build│
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │              │         │
//!        ▼              ▼         ▼
//! ┌─────────────┐ ┌──────────┐ ┌─────────────┐
//! │    Query    │ │  Store   │ │   Fetcher   │
//! │(kind/scheme)│ │(.dataver)│ │ (v2 → v1)   │
//! └─────────────┘ └──────────┘ └─────────────┘
//!        ▲              │
//!        └──── Cache ◀──┘
//! ```
//!
//! # Modules
//!
//! - [`cache`]: TTL cache of parsed mapping sets
//! - [`descriptor`]: mapping build descriptor and maven URL derivation
//! - [`error`]: error taxonomy (transport, persistence, no such version)
//! - [`fetcher`]: artifact download with format fallback
//! - [`handler`]: suffix and exact lookups
//! - [`meta`]: metadata service client
//! - [`query`]: kind/scheme/match-mode filtering
//! - [`refresh`]: download-if-needed coordinator
//! - [`store`]: persisted version records and artifact directories

pub mod cache;
pub mod descriptor;
pub mod error;
pub mod fetcher;
pub mod handler;
pub mod meta;
pub mod query;
pub mod refresh;
pub mod store;
