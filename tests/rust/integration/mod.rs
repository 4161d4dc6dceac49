//! Integration tests - components wired together over the in-memory stores.
//!
//! These tests run the loader and the HTTP router end to end without Neo4j or
//! MongoDB.

mod document_service_tests;
mod loader_tests;
