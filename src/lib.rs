//! Library exports for brewenv, shared between the binary and tests.

pub mod cli;
pub mod config;
pub mod routes;
pub mod startup;
pub mod state;
pub mod utils;
