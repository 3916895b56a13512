//! Property-based tests for the rulebook pipeline
//!
//! Uses proptest to check invariants over generated rulebook text rather
//! than fixed documents.
//!
//! ## Test Modules
//!
//! - `parser_props`: Rule parser invariants
//!   - Ids are unique and names non-empty for any line soup
//!   - Re-serialized entries parse back to themselves
//!   - Wrapped lines never create extra paragraphs
//!   - Nothing after the last keyword section leaks into an entry
//!
//! - `validator_props`: Content validator invariants
//!   - HTML markers are always rejected
//!   - Text below the floor is always rejected
//!   - Long plain text is always accepted
//!
//! ## Configuration
//!
//! By default, proptest runs 256 cases per property. This can be configured
//! via the `PROPTEST_CASES` environment variable:
//!
//! ```sh
//! PROPTEST_CASES=1000 cargo test property --release
//! ```

mod parser_props;
mod validator_props;
