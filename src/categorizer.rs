use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GroceryCategory {
    Produce,
    MeatSeafood,
    DairyEggs,
    Bakery,
    Pantry,
    SpicesSeasonings,
    Frozen,
    Beverages,
    Other,
}

impl GroceryCategory {
    pub fn label(self) -> &'static str {
        match self {
            GroceryCategory::Produce => "Produce",
            GroceryCategory::MeatSeafood => "Meat & Seafood",
            GroceryCategory::DairyEggs => "Dairy & Eggs",
            GroceryCategory::Bakery => "Bakery",
            GroceryCategory::Pantry => "Pantry",
            GroceryCategory::SpicesSeasonings => "Spices & Seasonings",
            GroceryCategory::Frozen => "Frozen",
            GroceryCategory::Beverages => "Beverages",
            GroceryCategory::Other => "Other",
        }
    }
}

impl fmt::Display for GroceryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// Checked top to bottom; the first hit wins. "frozen peas" must land in
// Frozen before "pea" matches Produce, and "bell pepper" in Produce before
// "pepper" matches Spices. Keywords match whole words, plurals included.
pub const CATEGORY_KEYWORDS: &[(GroceryCategory, &[&str])] = &[
    (GroceryCategory::Frozen, &["frozen", "ice cream"]),
    (
        GroceryCategory::Beverages,
        &[
            "juice", "coffee", "tea bag", "soda", "sparkling water", "ginger ale", "wine", "beer",
        ],
    ),
    (GroceryCategory::Produce, &["bell pepper", "chili pepper", "sweet pepper"]),
    (
        GroceryCategory::SpicesSeasonings,
        &[
            "salt", "pepper", "cumin", "paprika", "oregano", "cinnamon", "nutmeg", "chili powder",
            "curry", "turmeric", "thyme", "bay leaf", "vanilla",
        ],
    ),
    (
        GroceryCategory::Pantry,
        &[
            "peanut butter", "rice", "pasta", "flour", "sugar", "oil", "vinegar", "stock", "broth",
            "beans", "lentil", "oats", "honey", "sauce", "canned", "noodle",
        ],
    ),
    (
        GroceryCategory::DairyEggs,
        &["milk", "butter", "cheese", "yogurt", "cream", "egg"],
    ),
    (
        GroceryCategory::MeatSeafood,
        &[
            "chicken", "beef", "pork", "lamb", "turkey", "bacon", "ham", "sausage", "salmon",
            "tuna", "shrimp", "fish",
        ],
    ),
    (
        GroceryCategory::Bakery,
        &["bread", "bun", "tortilla", "bagel", "baguette", "pita"],
    ),
    (
        GroceryCategory::Produce,
        &[
            "onion", "garlic", "tomato", "potato", "carrot", "celery", "lettuce", "spinach",
            "apple", "banana", "lemon", "lime", "pea", "herb", "cilantro", "parsley", "basil",
            "ginger", "mushroom", "zucchini", "eggplant",
        ],
    ),
];

fn words(name: &str) -> Vec<String> {
    name.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

fn word_matches(word: &str, keyword: &str) -> bool {
    word == keyword
        || word
            .strip_prefix(keyword)
            .is_some_and(|rest| rest == "s" || rest == "es")
}

/// True when the keyword's words appear as a consecutive run in `words`.
fn contains_keyword(words: &[String], keyword: &str) -> bool {
    let keyword_words: Vec<&str> = keyword.split_whitespace().collect();
    !keyword_words.is_empty()
        && words.windows(keyword_words.len()).any(|window| {
            window
                .iter()
                .zip(&keyword_words)
                .all(|(word, keyword)| word_matches(word, keyword))
        })
}

/// Assigns a shopping aisle to a display name by keyword lookup.
pub fn categorize(name: &str) -> GroceryCategory {
    let words = words(name);
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| contains_keyword(&words, k)))
        .map(|(category, _)| *category)
        .unwrap_or(GroceryCategory::Other)
}

/// Categories in the order a shopping list is printed.
pub fn display_order() -> impl Iterator<Item = GroceryCategory> {
    [
        GroceryCategory::Produce,
        GroceryCategory::MeatSeafood,
        GroceryCategory::DairyEggs,
        GroceryCategory::Bakery,
        GroceryCategory::Pantry,
        GroceryCategory::SpicesSeasonings,
        GroceryCategory::Frozen,
        GroceryCategory::Beverages,
        GroceryCategory::Other,
    ]
    .into_iter()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorize_basic() {
        assert_eq!(categorize("Yellow Onion"), GroceryCategory::Produce);
        assert_eq!(categorize("chicken thighs"), GroceryCategory::MeatSeafood);
        assert_eq!(categorize("Greek yogurt"), GroceryCategory::DairyEggs);
        assert_eq!(categorize("basmati rice"), GroceryCategory::Pantry);
        assert_eq!(categorize("smoked paprika"), GroceryCategory::SpicesSeasonings);
        assert_eq!(categorize("dragon fruit"), GroceryCategory::Other);
    }

    #[test]
    fn test_categorize_declared_order_wins() {
        assert_eq!(categorize("frozen peas"), GroceryCategory::Frozen);
        assert_eq!(categorize("peanut butter"), GroceryCategory::Pantry);
        assert_eq!(categorize("chicken stock"), GroceryCategory::Pantry);
        assert_eq!(categorize("orange juice"), GroceryCategory::Beverages);
    }

    #[test]
    fn test_categorize_matches_whole_words() {
        assert_eq!(categorize("unsalted butter"), GroceryCategory::DairyEggs);
        assert_eq!(categorize("eggplant"), GroceryCategory::Produce);
        assert_eq!(categorize("red bell pepper"), GroceryCategory::Produce);
        assert_eq!(categorize("ginger ale"), GroceryCategory::Beverages);
        assert_eq!(categorize("boiled ham"), GroceryCategory::MeatSeafood);
        assert_eq!(categorize("black pepper"), GroceryCategory::SpicesSeasonings);
        assert_eq!(categorize("vanilla ice-cream"), GroceryCategory::Frozen);
    }

    #[test]
    fn test_categorize_accepts_plurals() {
        assert_eq!(categorize("Roma tomatoes"), GroceryCategory::Produce);
        assert_eq!(categorize("large eggs"), GroceryCategory::DairyEggs);
        assert_eq!(categorize("onions"), GroceryCategory::Produce);
        assert_eq!(categorize("peanuts"), GroceryCategory::Other);
    }

    #[test]
    fn test_display_order_covers_every_category() {
        let order: Vec<GroceryCategory> = display_order().collect();
        assert_eq!(order.len(), 9);
        for (category, _) in CATEGORY_KEYWORDS {
            assert!(order.contains(category));
        }
        assert_eq!(order.last(), Some(&GroceryCategory::Other));
    }
}
