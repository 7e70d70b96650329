//! HTTP API for the recipe proxy.

pub mod error;
pub mod middleware;
pub mod recipes;
pub mod routes;
pub mod status;

pub use routes::*;
