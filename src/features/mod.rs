pub mod aggregator;
pub mod assembly;
pub mod statistics;

pub use aggregator::{AggregationMode, LocalFeatureAggregator};
pub use assembly::FeatureAssembler;
pub use statistics::{Statistic, StatisticSet};
