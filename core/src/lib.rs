pub mod dashboard;
pub mod db;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod models;
pub mod recommend;
pub mod series;
pub mod store;

pub use error::{Error, Result};
