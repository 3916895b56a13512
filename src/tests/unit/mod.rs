//! Unit/scenario tests
//!
//! - `resolver_tests`: strategy ordering, timeouts and fallback
//! - `pipeline_tests`: cache check, fetch, parse and merge cycles
//! - `parser_scenarios`: line classification cases on realistic input

mod parser_scenarios;
