/// CSV writers for dashboard series.
pub mod export;
