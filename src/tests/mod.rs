//! In-crate test suite.
//!
//! - `common`: shared fixtures and synthetic retrieval strategies
//! - `unit`: scenario tests for the load pipeline and parser
//! - `property`: proptest invariants for the parser and validator

mod property;
mod unit;
