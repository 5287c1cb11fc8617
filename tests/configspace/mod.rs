//! Integration tests for configuration-space building

mod build_tests;
