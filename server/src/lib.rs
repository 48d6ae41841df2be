//! HTTP façade for the minesweeper engine: sessions, their games, and JSON routes.

pub use config::*;
pub use error::*;
pub use ids::*;
pub use router::*;
pub use service::*;
pub use store::*;

mod config;
mod error;
mod ids;
mod router;
mod service;
mod store;

#[cfg(target_arch = "wasm32")]
mod worker_entry;
