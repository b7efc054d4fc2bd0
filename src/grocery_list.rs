//! Turns a set of recipes into a categorized grocery list.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::categorizer::{categorize, display_order, GroceryCategory};
use crate::error::Result;
use crate::ingredient_aggregator::{aggregate_with_sources, AggregatedIngredient, IngredientLine};
use crate::quantity::format_amount;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RecipeIngredient {
    pub ingredient_id: String,
    #[serde(default)]
    pub name: String,
    pub quantity: f64,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub prep_state: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RecipeIngredients {
    pub recipe_id: String,
    #[serde(default, alias = "recipe_title")]
    pub title: String,
    pub ingredients: Vec<RecipeIngredient>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GroceryItem {
    pub name: String,
    pub category: GroceryCategory,
    #[serde(flatten)]
    pub ingredient: AggregatedIngredient,
}

impl fmt::Display for GroceryItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ingredient = &self.ingredient;
        if ingredient.total_quantity > 0.0 {
            write!(f, "{} ", format_amount(ingredient.total_quantity))?;
            if !ingredient.unit.is_empty() {
                write!(f, "{} ", ingredient.unit)?;
            }
        }
        write!(f, "{}", self.name)?;
        if let Some(prep) = &ingredient.prep_state {
            write!(f, " ({})", prep)?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct GroceryList {
    pub items: Vec<GroceryItem>,
}

impl GroceryList {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items grouped per aisle, aisles in display order, empty aisles omitted.
    pub fn by_category(&self) -> Vec<(GroceryCategory, Vec<&GroceryItem>)> {
        display_order()
            .filter_map(|category| {
                let items: Vec<&GroceryItem> =
                    self.items.iter().filter(|item| item.category == category).collect();
                (!items.is_empty()).then_some((category, items))
            })
            .collect()
    }

    /// Plain-text rendering, one aisle heading per non-empty category.
    pub fn render_text(&self, with_sources: bool, titles: &HashMap<String, String>) -> String {
        let mut out = String::new();
        for (category, items) in self.by_category() {
            out.push_str(&format!("{}\n", category));
            for item in items {
                out.push_str(&format!("  - {}\n", item));
                if with_sources {
                    for source in &item.ingredient.sources {
                        let title = titles
                            .get(&source.recipe_id)
                            .map(String::as_str)
                            .unwrap_or(source.recipe_id.as_str());
                        out.push_str(&format!("      {} from {}\n", format_amount(source.quantity), title));
                    }
                }
            }
        }
        out
    }
}

/// Flattens recipes, in order, into lines attributed to their recipe.
pub fn collect_lines(recipes: &[RecipeIngredients]) -> Vec<IngredientLine> {
    recipes
        .iter()
        .flat_map(|recipe| {
            recipe.ingredients.iter().map(move |ingredient| {
                let line = IngredientLine::new(
                    ingredient.ingredient_id.clone(),
                    ingredient.quantity,
                    ingredient.unit.clone(),
                )
                .from_recipe(recipe.recipe_id.clone());
                match &ingredient.prep_state {
                    Some(prep) => line.with_prep_state(prep.clone()),
                    None => line,
                }
            })
        })
        .collect()
}

/// Maps recipe ids to titles, falling back to the id for untitled recipes.
pub fn recipe_titles(recipes: &[RecipeIngredients]) -> HashMap<String, String> {
    recipes
        .iter()
        .map(|recipe| {
            let title = if recipe.title.is_empty() { &recipe.recipe_id } else { &recipe.title };
            (recipe.recipe_id.clone(), title.clone())
        })
        .collect()
}

pub fn build_grocery_list(recipes: &[RecipeIngredients]) -> Result<GroceryList> {
    let lines = collect_lines(recipes);
    let aggregated = aggregate_with_sources(&lines)?;

    let mut names: HashMap<&str, &str> = HashMap::new();
    for ingredient in recipes.iter().flat_map(|r| r.ingredients.iter()) {
        if !ingredient.name.is_empty() {
            names.entry(ingredient.ingredient_id.as_str()).or_insert(ingredient.name.as_str());
        }
    }

    let items = aggregated
        .into_iter()
        .map(|ingredient| {
            let name = names
                .get(ingredient.ingredient_id.as_str())
                .copied()
                .unwrap_or(ingredient.ingredient_id.as_str())
                .to_string();
            GroceryItem {
                category: categorize(&name),
                name,
                ingredient,
            }
        })
        .collect();

    Ok(GroceryList { items })
}
