pub mod error;
pub mod quantity;
pub mod ingredient_aggregator;
pub mod categorizer;
pub mod grocery_list;
pub mod list_loader;
pub mod config;
pub mod cli;

pub use error::{AggregationError, Result};
