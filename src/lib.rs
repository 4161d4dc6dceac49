//! flightgraph - synthetic flight-passenger data, graph loading and flight
//! statistics
//!
//! This crate provides:
//! - A random passenger-trip CSV generator
//! - Declarative CSV-to-graph load schemas
//! - An idempotent MERGE-based loader over a pluggable graph store (Neo4j or
//!   in-memory)
//! - An HTTP document service storing flights and serving monthly travel
//!   statistics (MongoDB or in-memory)

pub mod config;
pub mod generator;
pub mod graph_catalog;
pub mod graph_store;
pub mod loader;
pub mod record;
pub mod server;
