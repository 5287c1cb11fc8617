//! Integration tests for the dialect readers and writers

// Tests for the SMAC-style reader
mod smac_tests;

// Tests for the ParamILS and IRACE writers
mod export_tests;
