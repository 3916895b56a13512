pub mod logging;

// Rulebook fetch / cache / parse pipeline
pub mod rulebook;
