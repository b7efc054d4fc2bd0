use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AggregationError {
    #[error("quantities must be non-negative and finite (got {value})")]
    InvalidQuantity { value: f64 },

    #[error("scaling factor must be non-negative and finite (got {factor})")]
    InvalidFactor { factor: f64 },

    #[error("cannot add quantities with different units: '{left}' and '{right}'")]
    UnitMismatch { left: String, right: String },

    #[error("ingredient lines '{left}' and '{right}' cannot be merged")]
    MergeIncompatible { left: String, right: String },

    #[error("ingredient line {position} ('{ingredient_id}') has no source recipe")]
    MissingSourceAttribution {
        ingredient_id: String,
        position: usize,
    },

    #[error("unreadable quantity: '{text}'")]
    UnparsableQuantity { text: String },
}

pub type Result<T> = std::result::Result<T, AggregationError>;
