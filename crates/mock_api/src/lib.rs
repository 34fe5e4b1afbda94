//! In-memory implementation of the audition and signal-bank endpoints.
//!
//! Used as the integration-test server for the front-end components and as a
//! local stand-in API. Nothing is persisted.

pub mod error;
pub mod handlers;
pub mod repository;
pub mod router;
pub mod server;

pub use error::{ApiError, Result};
pub use repository::{InMemoryRepository, MockConfig, SignalRepository, StatsBaseline};
pub use router::{create_router, AppState};
pub use server::{run_server, spawn_ephemeral};
