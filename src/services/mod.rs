pub mod aggregator;
pub mod categorizer;
pub mod fetcher;
pub mod sources;
