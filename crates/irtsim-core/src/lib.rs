//! irtsim-core: IRT response model, synthetic data generation and adaptive
//! test simulation.
//!
//! The core is pure and synchronous. Every stochastic call takes a
//! caller-owned random generator, and all output leaves through the sink
//! traits in [`traits`].

pub mod adaptive;
pub mod config;
pub mod curves;
pub mod error;
pub mod generator;
pub mod model;
pub mod probability;
pub mod statistics;
pub mod traits;

pub use error::{IrtError, Result};
