//! Unit tests - public API checks that need no graph or document database.

mod generator_file_tests;
mod schema_file_tests;
