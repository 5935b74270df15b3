pub mod alignment;
pub mod charts;
pub mod correlation;
pub mod indicators;
pub mod news_statistics;
pub mod pipeline;
pub mod sentiment_scoring;
