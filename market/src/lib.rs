pub mod book;
pub mod chart;
pub mod cost;
pub mod error;
pub mod feed;
pub mod latency;
pub mod pipeline;
pub mod rolling_window;
pub mod time;
pub mod types;

pub use cost::{CostMetrics, compute_cost_metrics};
pub use error::ImpactError;
