//! Scalar quantity arithmetic.
//!
//! A [`Quantity`] is a non-negative, finite amount paired with an opaque unit
//! token. Units are compared byte for byte and never converted: `"cup"`,
//! `"cups"` and `"Cup"` are three different units.
//!
//! Public results are rounded to two decimal places, half away from zero.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::error::{AggregationError, Result};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Quantity {
    pub value: f64,
    pub unit: String,
}

impl Quantity {
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self { value, unit: unit.into() }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.is_empty() {
            write!(f, "{}", format_amount(self.value))
        } else {
            write!(f, "{} {}", format_amount(self.value), self.unit)
        }
    }
}

/// True iff the value is finite and `>= 0`.
pub fn is_valid_quantity(q: &Quantity) -> bool {
    is_valid_value(q.value)
}

pub(crate) fn is_valid_value(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

pub(crate) fn ensure_valid_value(value: f64) -> Result<()> {
    if is_valid_value(value) {
        Ok(())
    } else {
        Err(AggregationError::InvalidQuantity { value })
    }
}

/// Rounds to two decimal places, half away from zero.
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn ensure_same_unit(left: &str, right: &str) -> Result<()> {
    if left == right {
        Ok(())
    } else {
        Err(AggregationError::UnitMismatch {
            left: left.to_string(),
            right: right.to_string(),
        })
    }
}

/// Validated, unrounded sum of two same-unit quantities.
///
/// Both values are checked before the units, so a negative quantity is
/// reported as `InvalidQuantity` even when the units also differ.
pub fn checked_sum(q1: &Quantity, q2: &Quantity) -> Result<Quantity> {
    ensure_valid_value(q1.value)?;
    ensure_valid_value(q2.value)?;
    ensure_same_unit(&q1.unit, &q2.unit)?;

    let value = q1.value + q2.value;
    ensure_valid_value(value)?;
    Ok(Quantity::new(value, q1.unit.clone()))
}

/// Adds two quantities sharing a unit; the result is rounded to hundredths.
pub fn add_quantities(q1: &Quantity, q2: &Quantity) -> Result<Quantity> {
    let sum = checked_sum(q1, q2)?;
    Ok(Quantity::new(round_to_hundredths(sum.value), sum.unit))
}

/// Scales a quantity by a non-negative factor; the result is rounded to hundredths.
pub fn multiply_quantity(q: &Quantity, factor: f64) -> Result<Quantity> {
    ensure_valid_value(q.value)?;
    if !factor.is_finite() || factor < 0.0 {
        return Err(AggregationError::InvalidFactor { factor });
    }

    let value = q.value * factor;
    ensure_valid_value(value)?;
    Ok(Quantity::new(round_to_hundredths(value), q.unit.clone()))
}

/// Orders two quantities of the same unit by value.
///
/// `Ordering::Less as i8` is `-1`, so callers needing the numeric
/// three-way result can cast. Differing units fail with `UnitMismatch`.
pub fn compare_quantities(q1: &Quantity, q2: &Quantity) -> Result<Ordering> {
    ensure_valid_value(q1.value)?;
    ensure_valid_value(q2.value)?;
    ensure_same_unit(&q1.unit, &q2.unit)?;

    // Both values are finite here, so partial_cmp always answers.
    Ok(q1.value.partial_cmp(&q2.value).unwrap_or(Ordering::Equal))
}

/// Formats an amount with at most two decimals and no trailing zeros.
pub fn format_amount(value: f64) -> String {
    let formatted = format!("{:.2}", round_to_hundredths(value));
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Reads a recipe-style quantity string into a number.
///
/// Accepts integers, decimals (`.` or `,`), simple fractions (`1/2`), mixed
/// numbers (`1 1/2`) and ranges (`1-2`, `2 to 3`). A range yields its larger
/// end. Blank text means "unquantified" and reads as `0`.
pub fn parse_quantity_text(text: &str) -> Result<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }

    let value = if let Some((low, high)) = split_range(trimmed) {
        let low = parse_single_amount(low, text)?;
        let high = parse_single_amount(high, text)?;
        ensure_valid_value(low)?;
        ensure_valid_value(high)?;
        low.max(high)
    } else {
        parse_single_amount(trimmed, text)?
    };

    ensure_valid_value(value)?;
    Ok(value)
}

fn split_range(text: &str) -> Option<(&str, &str)> {
    if let Some((low, high)) = text.split_once(" to ") {
        return Some((low, high));
    }
    // A leading '-' is a sign, not a range separator.
    let (dash, _) = text.char_indices().skip(1).find(|(_, c)| *c == '-')?;
    Some((&text[..dash], &text[dash + 1..]))
}

fn parse_single_amount(part: &str, original: &str) -> Result<f64> {
    let unparsable = || AggregationError::UnparsableQuantity {
        text: original.to_string(),
    };

    let pieces: Vec<&str> = part.split_whitespace().collect();
    match pieces.as_slice() {
        [single] => parse_number_or_fraction(single).ok_or_else(unparsable),
        [whole, fraction] if fraction.contains('/') => {
            let whole = parse_number(whole).ok_or_else(unparsable)?;
            let fraction = parse_fraction(fraction).ok_or_else(unparsable)?;
            Ok(whole + fraction)
        }
        _ => Err(unparsable()),
    }
}

fn parse_number_or_fraction(piece: &str) -> Option<f64> {
    if piece.contains('/') {
        parse_fraction(piece)
    } else {
        parse_number(piece)
    }
}

fn parse_number(piece: &str) -> Option<f64> {
    let value = piece.replace(',', ".").parse::<f64>().ok()?;
    value.is_finite().then_some(value)
}

fn parse_fraction(piece: &str) -> Option<f64> {
    let (numerator, denominator) = piece.split_once('/')?;
    let numerator = parse_number(numerator.trim())?;
    let denominator = parse_number(denominator.trim())?;
    if denominator == 0.0 {
        return None;
    }
    Some(numerator / denominator)
}
