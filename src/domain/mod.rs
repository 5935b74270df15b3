// Price, news and aligned record types
pub mod types;

// Sentiment scoring interface
pub mod sentiment;

// Correlation outcome
pub mod correlation;

// Domain-specific error types
pub mod errors;
