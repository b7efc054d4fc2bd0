use anyhow::{Context, Result};
use csv::ReaderBuilder;
use std::path::Path;
use tracing::{debug, warn};

use crate::grocery_list::{RecipeIngredient, RecipeIngredients};
use crate::quantity::parse_quantity_text;

// Expected column headers
const RECIPE_ID_COL: &str = "recipe_id";
const RECIPE_TITLE_COL: &str = "recipe_title";
const INGREDIENT_ID_COL: &str = "ingredient_id";
const NAME_COL: &str = "name";
const QUANTITY_COL: &str = "quantity";
const UNIT_COL: &str = "unit";
const PREP_STATE_COL: &str = "prep_state";

fn optional_text(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

/// Reads recipe ingredient rows from CSV text, grouped by recipe in
/// first-appearance order.
pub fn parse_recipes_csv(content: &str) -> Result<Vec<RecipeIngredients>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = rdr.headers()?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| anyhow::anyhow!("Column '{}' not found", name))
    };

    let recipe_idx = column(RECIPE_ID_COL)?;
    let ingredient_idx = column(INGREDIENT_ID_COL)?;
    let quantity_idx = column(QUANTITY_COL)?;
    let unit_idx = column(UNIT_COL)?;
    // Optional columns
    let title_idx = column(RECIPE_TITLE_COL).ok();
    let name_idx = column(NAME_COL).ok();
    let prep_idx = column(PREP_STATE_COL).ok();

    let mut recipes: Vec<RecipeIngredients> = Vec::new();
    for (row_index, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read record at row index {}", row_index))?;

        let ingredient_id = record.get(ingredient_idx).unwrap_or_default().to_string();
        if ingredient_id.is_empty() {
            warn!(row_index, "skipping row without an ingredient_id");
            continue;
        }

        let recipe_id = record
            .get(recipe_idx)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow::anyhow!("Missing recipe_id at row {}", row_index))?
            .to_string();

        let quantity_text = record.get(quantity_idx).unwrap_or_default();
        let quantity = parse_quantity_text(quantity_text)
            .with_context(|| format!("Bad quantity for '{}' at row {}", ingredient_id, row_index))?;

        let ingredient = RecipeIngredient {
            name: optional_text(name_idx.and_then(|i| record.get(i))).unwrap_or_else(|| ingredient_id.clone()),
            ingredient_id,
            quantity,
            unit: record.get(unit_idx).unwrap_or_default().to_string(),
            prep_state: optional_text(prep_idx.and_then(|i| record.get(i))),
        };

        match recipes.iter_mut().find(|r| r.recipe_id == recipe_id) {
            Some(recipe) => recipe.ingredients.push(ingredient),
            None => {
                let title = optional_text(title_idx.and_then(|i| record.get(i))).unwrap_or_default();
                debug!(%recipe_id, %title, "new recipe");
                recipes.push(RecipeIngredients {
                    recipe_id,
                    title,
                    ingredients: vec![ingredient],
                });
            }
        }
    }

    if recipes.is_empty() {
        return Err(anyhow::anyhow!("No ingredient rows found"));
    }

    Ok(recipes)
}

pub fn parse_recipes_json(content: &str) -> Result<Vec<RecipeIngredients>> {
    let recipes: Vec<RecipeIngredients> =
        serde_json::from_str(content).context("Failed to parse recipes JSON")?;
    if recipes.is_empty() {
        return Err(anyhow::anyhow!("No recipes found in JSON input"));
    }
    Ok(recipes)
}

pub async fn load_recipes(path: &Path, format: InputFormat) -> Result<Vec<RecipeIngredients>> {
    if !path.exists() {
        return Err(anyhow::anyhow!("Recipe file not found at: {:?}", path));
    }

    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read recipe file at {:?}", path))?;

    let parsed = match format {
        InputFormat::Csv => parse_recipes_csv(&content),
        InputFormat::Json => parse_recipes_json(&content),
    };
    parsed.with_context(|| format!("Invalid recipe file {:?}", path))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum InputFormat {
    Csv,
    Json,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "csv" => Some(InputFormat::Csv),
            "json" => Some(InputFormat::Json),
            _ => None,
        }
    }
}
