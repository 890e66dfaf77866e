// This module re-exports important pieces for convenience,
// so we can "use crate::config::*" easily.
pub mod environment;
pub mod error;
pub mod loader;
pub mod logging;
pub mod schema;
pub mod server;

pub use environment::*;
pub use error::*;
pub use loader::*;
pub use logging::*;
pub use schema::*;
pub use server::*;
