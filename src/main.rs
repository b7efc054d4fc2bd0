use anyhow::{Context, Result};
use grocery_merge::cli::parse_args;
use grocery_merge::config::{AppConfig, OutputFormat};
use grocery_merge::grocery_list::{build_grocery_list, recipe_titles, GroceryList};
use grocery_merge::list_loader::load_recipes;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// `RUST_LOG`-style directives when given and valid, `info` otherwise.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn render(list: &GroceryList, config: &AppConfig, titles: &std::collections::HashMap<String, String>) -> Result<String> {
    match config.output {
        OutputFormat::Text => Ok(list.render_text(config.with_sources, titles)),
        OutputFormat::Json => {
            if config.with_sources {
                serde_json::to_string_pretty(list).context("Failed to serialize grocery list")
            } else {
                // Same shape, minus the per-recipe breakdown.
                let mut trimmed = list.clone();
                for item in &mut trimmed.items {
                    item.ingredient.sources.clear();
                }
                serde_json::to_string_pretty(&trimmed).context("Failed to serialize grocery list")
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok(); // Load .env before reading GROCERY_* settings

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let cli_args = parse_args();
    let config = AppConfig::from_env(&cli_args)?;
    debug!(?config, "resolved configuration");

    let recipes = load_recipes(&config.input, config.input_format)
        .await
        .with_context(|| format!("Failed to load recipes from '{}'", config.input.display()))?;
    let line_count: usize = recipes.iter().map(|r| r.ingredients.len()).sum();
    info!(recipes = recipes.len(), lines = line_count, "loaded recipe ingredients");

    for recipe in &recipes {
        debug!(recipe_id = %recipe.recipe_id, lines = recipe.ingredients.len(), "recipe");
    }

    let list = build_grocery_list(&recipes).context("Failed to aggregate ingredients")?;
    info!(items = list.len(), merged = line_count - list.len(), "grocery list ready");

    let titles = recipe_titles(&recipes);
    println!("{}", render(&list, &config, &titles)?);

    Ok(())
}
