//! Folds recipe ingredient lines into a consolidated shopping list.
//!
//! Two lines combine only when their merge key `(ingredient_id, unit,
//! prep_state)` is identical. Groups keep the position of their first
//! occurrence; later lines only add to the running total.

use serde::{Deserialize, Serialize};

use crate::error::{AggregationError, Result};
use crate::quantity::{add_quantities, checked_sum, ensure_valid_value, round_to_hundredths, Quantity};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct IngredientLine {
    pub ingredient_id: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(default)]
    pub prep_state: Option<String>,
    #[serde(default)]
    pub source_recipe_id: Option<String>,
}

impl IngredientLine {
    pub fn new(ingredient_id: impl Into<String>, quantity: f64, unit: impl Into<String>) -> Self {
        Self {
            ingredient_id: ingredient_id.into(),
            quantity,
            unit: unit.into(),
            prep_state: None,
            source_recipe_id: None,
        }
    }

    pub fn with_prep_state(mut self, prep_state: impl Into<String>) -> Self {
        let prep_state = prep_state.into();
        self.prep_state = (!prep_state.is_empty()).then_some(prep_state);
        self
    }

    pub fn from_recipe(mut self, recipe_id: impl Into<String>) -> Self {
        self.source_recipe_id = Some(recipe_id.into());
        self
    }

    pub fn merge_key(&self) -> MergeKey<'_> {
        MergeKey {
            ingredient_id: &self.ingredient_id,
            unit: &self.unit,
            // An empty descriptor is the same as no descriptor.
            prep_state: self.prep_state.as_deref().filter(|s| !s.is_empty()),
        }
    }

    fn as_quantity(&self) -> Quantity {
        Quantity::new(self.quantity, self.unit.clone())
    }
}

/// Borrowed equivalence key of an [`IngredientLine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MergeKey<'a> {
    pub ingredient_id: &'a str,
    pub unit: &'a str,
    pub prep_state: Option<&'a str>,
}

/// One recipe's share of an aggregated group.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SourceContribution {
    pub recipe_id: String,
    pub quantity: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AggregatedIngredient {
    pub ingredient_id: String,
    pub unit: String,
    pub prep_state: Option<String>,
    /// Always equal to `total_quantity`; kept for API compatibility.
    pub quantity: f64,
    pub total_quantity: f64,
    pub sources: Vec<SourceContribution>,
}

impl AggregatedIngredient {
    /// The group as a single unattributed line.
    pub fn to_line(&self) -> IngredientLine {
        IngredientLine {
            ingredient_id: self.ingredient_id.clone(),
            quantity: self.total_quantity,
            unit: self.unit.clone(),
            prep_state: self.prep_state.clone(),
            source_recipe_id: None,
        }
    }
}

pub fn should_merge(a: &IngredientLine, b: &IngredientLine) -> bool {
    a.merge_key() == b.merge_key()
}

/// Combines two mergeable lines into one, summing (and rounding) quantities.
///
/// The source recipe survives only when both lines name the same one, which
/// keeps the operation commutative.
pub fn merge_ingredients(a: &IngredientLine, b: &IngredientLine) -> Result<IngredientLine> {
    if !should_merge(a, b) {
        return Err(AggregationError::MergeIncompatible {
            left: a.ingredient_id.clone(),
            right: b.ingredient_id.clone(),
        });
    }

    let sum = add_quantities(&a.as_quantity(), &b.as_quantity())?;
    let source_recipe_id = if a.source_recipe_id == b.source_recipe_id {
        a.source_recipe_id.clone()
    } else {
        None
    };

    Ok(IngredientLine {
        ingredient_id: a.ingredient_id.clone(),
        quantity: sum.value,
        unit: sum.unit,
        prep_state: a.merge_key().prep_state.map(str::to_string),
        source_recipe_id,
    })
}

struct Group<'a> {
    first: &'a IngredientLine,
    total: Quantity,
    shared_source: Option<&'a str>,
    sources: Vec<SourceContribution>,
}

/// Single pass over `lines`, grouping by merge key in first-occurrence order.
///
/// Totals stay unrounded here; callers round once per group.
fn fold_groups(lines: &[IngredientLine], track_sources: bool) -> Result<Vec<Group<'_>>> {
    let mut groups: Vec<Group<'_>> = Vec::new();

    for (position, line) in lines.iter().enumerate() {
        ensure_valid_value(line.quantity)?;

        let contribution = if track_sources {
            // A blank recipe id attributes nothing.
            let recipe_id = line
                .source_recipe_id
                .as_deref()
                .filter(|id| !id.trim().is_empty())
                .map(str::to_string)
                .ok_or_else(|| AggregationError::MissingSourceAttribution {
                    ingredient_id: line.ingredient_id.clone(),
                    position,
                })?;
            Some(SourceContribution { recipe_id, quantity: line.quantity })
        } else {
            None
        };

        let key = line.merge_key();
        let group = match groups.iter().position(|g| g.first.merge_key() == key) {
            Some(index) => {
                let group = &mut groups[index];
                group.total = checked_sum(&group.total, &line.as_quantity())?;
                if group.shared_source != line.source_recipe_id.as_deref() {
                    group.shared_source = None;
                }
                group
            }
            None => {
                groups.push(Group {
                    first: line,
                    total: line.as_quantity(),
                    shared_source: line.source_recipe_id.as_deref(),
                    sources: Vec::new(),
                });
                let last = groups.len() - 1;
                &mut groups[last]
            }
        };

        group.sources.extend(contribution);
    }

    Ok(groups)
}

/// Consolidates lines without traceability.
pub fn aggregate_ingredients(lines: &[IngredientLine]) -> Result<Vec<IngredientLine>> {
    let groups = fold_groups(lines, false)?;

    Ok(groups
        .into_iter()
        .map(|group| IngredientLine {
            ingredient_id: group.first.ingredient_id.clone(),
            quantity: round_to_hundredths(group.total.value),
            unit: group.total.unit,
            prep_state: group.first.merge_key().prep_state.map(str::to_string),
            source_recipe_id: group.shared_source.map(str::to_string),
        })
        .collect())
}

/// Consolidates lines and records which recipe contributed what.
///
/// Every line must carry a `source_recipe_id`; the first line without one
/// fails the whole call with `MissingSourceAttribution`.
pub fn aggregate_with_sources(lines: &[IngredientLine]) -> Result<Vec<AggregatedIngredient>> {
    let groups = fold_groups(lines, true)?;

    Ok(groups
        .into_iter()
        .map(|group| {
            let total = round_to_hundredths(group.total.value);
            AggregatedIngredient {
                ingredient_id: group.first.ingredient_id.clone(),
                unit: group.total.unit,
                prep_state: group.first.merge_key().prep_state.map(str::to_string),
                quantity: total,
                total_quantity: total,
                sources: group.sources,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_merge_requires_full_key() {
        let diced = IngredientLine::new("onion", 1.0, "whole").with_prep_state("diced");
        let chopped = IngredientLine::new("onion", 1.0, "whole").with_prep_state("chopped");
        let plain = IngredientLine::new("onion", 2.0, "whole");
        let cups = IngredientLine::new("onion", 1.0, "cup").with_prep_state("diced");

        assert!(should_merge(&diced, &diced.clone()));
        assert!(!should_merge(&diced, &chopped));
        assert!(!should_merge(&diced, &plain));
        assert!(!should_merge(&diced, &cups));
        assert!(should_merge(&plain, &IngredientLine::new("onion", 5.0, "whole")));
    }

    #[test]
    fn test_empty_prep_state_is_absent() {
        let mut blank = IngredientLine::new("salt", 1.0, "tsp");
        blank.prep_state = Some(String::new());
        let absent = IngredientLine::new("salt", 1.0, "tsp");

        assert!(should_merge(&blank, &absent));
        assert_eq!(IngredientLine::new("salt", 1.0, "tsp").with_prep_state("").prep_state, None);

        let merged = merge_ingredients(&blank, &absent).unwrap();
        assert_eq!(merged.prep_state, None);
    }

    #[test]
    fn test_merge_ingredients_sums() {
        let a = IngredientLine::new("rice", 1.0, "cup").from_recipe("A");
        let b = IngredientLine::new("rice", 0.5, "cup").from_recipe("B");

        let merged = merge_ingredients(&a, &b).unwrap();
        assert_eq!(merged.ingredient_id, "rice");
        assert_eq!(merged.unit, "cup");
        assert!((merged.quantity - 1.5).abs() < 0.005);
        assert_eq!(merged.source_recipe_id, None);

        let same_recipe = merge_ingredients(&a, &a.clone()).unwrap();
        assert_eq!(same_recipe.source_recipe_id.as_deref(), Some("A"));
    }

    #[test]
    fn test_merge_ingredients_refuses_incompatible() {
        let rice = IngredientLine::new("rice", 1.0, "cup");
        let beans = IngredientLine::new("beans", 1.0, "cup");
        let rice_grams = IngredientLine::new("rice", 100.0, "g");

        assert_eq!(
            merge_ingredients(&rice, &beans),
            Err(AggregationError::MergeIncompatible {
                left: "rice".to_string(),
                right: "beans".to_string(),
            })
        );
        assert!(matches!(
            merge_ingredients(&rice, &rice_grams),
            Err(AggregationError::MergeIncompatible { .. })
        ));
    }

    #[test]
    fn test_aggregate_keeps_first_occurrence_order() {
        let lines = vec![
            IngredientLine::new("garlic", 2.0, "clove"),
            IngredientLine::new("rice", 1.0, "cup"),
            IngredientLine::new("garlic", 3.0, "clove").with_prep_state("minced"),
            IngredientLine::new("rice", 2.0, "cup"),
            IngredientLine::new("garlic", 1.0, "clove"),
        ];

        let result = aggregate_ingredients(&lines).unwrap();
        let summary: Vec<(&str, f64, Option<&str>)> = result
            .iter()
            .map(|l| (l.ingredient_id.as_str(), l.quantity, l.prep_state.as_deref()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("garlic", 3.0, None),
                ("rice", 3.0, None),
                ("garlic", 3.0, Some("minced")),
            ]
        );
    }

    #[test]
    fn test_aggregate_rejects_negative_line() {
        let lines = vec![
            IngredientLine::new("rice", 1.0, "cup"),
            IngredientLine::new("beans", -2.0, "cup"),
        ];
        assert_eq!(
            aggregate_ingredients(&lines),
            Err(AggregationError::InvalidQuantity { value: -2.0 })
        );
    }

    #[test]
    fn test_aggregate_keeps_shared_source_only() {
        let lines = vec![
            IngredientLine::new("rice", 1.0, "cup").from_recipe("A"),
            IngredientLine::new("rice", 1.0, "cup").from_recipe("A"),
            IngredientLine::new("beans", 1.0, "cup").from_recipe("A"),
            IngredientLine::new("beans", 1.0, "cup").from_recipe("B"),
        ];
        let result = aggregate_ingredients(&lines).unwrap();
        assert_eq!(result[0].source_recipe_id.as_deref(), Some("A"));
        assert_eq!(result[1].source_recipe_id, None);
    }

    #[test]
    fn test_aggregate_rounds_once_per_group() {
        let lines: Vec<IngredientLine> = (0..3)
            .map(|_| IngredientLine::new("stock", 0.333, "l"))
            .collect();
        let result = aggregate_ingredients(&lines).unwrap();
        assert_eq!(result[0].quantity, 1.0);
    }

    #[test]
    fn test_aggregate_with_sources_records_original_quantities() {
        let lines = vec![
            IngredientLine::new("flour", 0.333, "cup").from_recipe("bread"),
            IngredientLine::new("flour", 2.0, "cup").from_recipe("cake"),
        ];
        let result = aggregate_with_sources(&lines).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].quantity, result[0].total_quantity);
        assert!((result[0].total_quantity - 2.33).abs() < 1e-9);
        assert_eq!(result[0].sources[0].quantity, 0.333);
        assert_eq!(result[0].sources[1].recipe_id, "cake");
    }

    #[test]
    fn test_aggregate_with_sources_rejects_blank_recipe_id() {
        for blank in ["", "   "] {
            let lines = vec![IngredientLine::new("rice", 1.0, "cup").from_recipe(blank)];
            assert_eq!(
                aggregate_with_sources(&lines),
                Err(AggregationError::MissingSourceAttribution {
                    ingredient_id: "rice".to_string(),
                    position: 0,
                })
            );
        }
    }

    #[test]
    fn test_aggregate_with_sources_requires_attribution() {
        let lines = vec![
            IngredientLine::new("flour", 1.0, "cup").from_recipe("bread"),
            IngredientLine::new("sugar", 1.0, "cup"),
        ];
        assert_eq!(
            aggregate_with_sources(&lines),
            Err(AggregationError::MissingSourceAttribution {
                ingredient_id: "sugar".to_string(),
                position: 1,
            })
        );
    }
}
