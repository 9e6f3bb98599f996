//! # Catalog
//!
//! A multi-tenant service catalog API: tenants organize cloud service
//! offerings from a topology source into portfolios. Usable both as a
//! standalone binary and as a library.
//!
//! ## Library Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use catalog::server::{AppState, create_router};
//! use catalog::store::{SqliteStore, Store};
//! use catalog::topology::HttpTopology;
//!
//! let store = SqliteStore::new("./data/catalog.db").unwrap();
//! store.initialize().unwrap();
//!
//! let state = Arc::new(AppState::new(
//!     Arc::new(store),
//!     Arc::new(HttpTopology::new("http://topology:8080/api/topological-inventory/v1.0")),
//! ));
//! let router = create_router(state);
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Builds the `catalog` binary. Disable with `default-features = false`.

pub mod auth;
pub mod config;
pub mod error;
pub mod server;
pub mod store;
pub mod topology;
pub mod types;
