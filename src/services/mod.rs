//! Service layer for billtrack.

pub mod database;
pub mod metrics;
pub mod payment;

pub use database::Database;
pub use metrics::{get_metrics, init_metrics};
