//! Integration tests for file conversion through the converter

mod converter_tests;
