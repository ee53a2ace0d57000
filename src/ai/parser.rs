// ABOUTME: Strict parser turning AI-returned recipe HTML into a structured draft
// ABOUTME: h1 becomes the title, first ul the ingredients, first ol the steps
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder

use crate::errors::AppError;
use crate::models::Ingredient;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Regex patterns for the three structural elements the prompt requests
/// Stored as Option to handle compilation failures gracefully (should never fail for static patterns)
static TITLE_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?is)<h1[^>]*>(.*?)</h1>").ok());

static INGREDIENT_LIST_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?is)<ul[^>]*>(.*?)</ul>").ok());

static INSTRUCTION_LIST_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?is)<ol[^>]*>(.*?)</ol>").ok());

static LIST_ITEM_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?is)<li[^>]*>(.*?)</li>").ok());

static TAG_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"<[^>]+>").ok());

/// Splits an ingredient line into a leading quantity and the rest
/// Matches: "2 cups flour", "1/2 tsp salt", "1 1/2 cups sugar", "3 eggs"
static QUANTITY_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\s*((?:\d+\s+\d+/\d+)|(?:\d+/\d+)|(?:\d+(?:\.\d+)?))\s+(.+)$").ok());

/// Units the splitter recognizes as the second token of an ingredient line
const KNOWN_UNITS: &[&str] = &[
    "cup", "cups", "tbsp", "tablespoon", "tablespoons", "tsp", "teaspoon", "teaspoons", "g",
    "gram", "grams", "kg", "ml", "l", "liter", "liters", "oz", "ounce", "ounces", "lb", "lbs",
    "pound", "pounds", "pinch", "clove", "cloves", "slice", "slices", "can", "cans", "piece",
    "pieces", "bunch", "stick", "sticks",
];

/// A parsed recipe draft, returned to the client for confirmation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeDraft {
    /// Recipe title from the `<h1>` element
    pub title: String,
    /// Structured ingredients from the first `<ul>`
    pub ingredients: Vec<Ingredient>,
    /// Instruction steps from the first `<ol>`
    pub instructions: Vec<String>,
}

fn pattern(p: &'static LazyLock<Option<Regex>>) -> Result<&'static Regex, AppError> {
    p.as_ref()
        .ok_or_else(|| AppError::internal("Recipe parser pattern failed to compile"))
}

/// Strip markup and decode entities from an HTML fragment
fn text_content(fragment: &str) -> Result<String, AppError> {
    let stripped = pattern(&TAG_PATTERN)?.replace_all(fragment, " ");
    let decoded = html_escape::decode_html_entities(stripped.as_ref());
    Ok(decoded.split_whitespace().collect::<Vec<_>>().join(" "))
}

/// Parse a quantity token, converting fractions to decimals ("1/2" -> 0.5)
fn parse_quantity(token: &str) -> Option<f64> {
    let token = token.trim();
    if let Some((whole, frac)) = token.split_once(' ') {
        return Some(parse_quantity(whole)? + parse_quantity(frac)?);
    }
    if let Some((num, den)) = token.split_once('/') {
        let num: f64 = num.trim().parse().ok()?;
        let den: f64 = den.trim().parse().ok()?;
        if den == 0.0 {
            return None;
        }
        return Some(num / den);
    }
    token.parse().ok()
}

/// Split one ingredient line into name, quantity, and unit
///
/// Lines with no leading quantity keep the whole text as the name with
/// quantity 1 and unit "piece"; an unrecognized second token is treated
/// as part of the name, not a unit.
fn parse_ingredient_line(line: &str) -> Result<Ingredient, AppError> {
    let quantity_re = pattern(&QUANTITY_PATTERN)?;

    let Some(captures) = quantity_re.captures(line) else {
        return Ok(Ingredient {
            name: line.to_string(),
            quantity: 1.0,
            unit: "piece".into(),
        });
    };

    let quantity = captures
        .get(1)
        .and_then(|m| parse_quantity(m.as_str()))
        .unwrap_or(1.0);
    let rest = captures.get(2).map_or("", |m| m.as_str()).trim();

    let (unit, name) = match rest.split_once(' ') {
        Some((first, tail)) if KNOWN_UNITS.contains(&first.to_lowercase().as_str()) => {
            (first.to_lowercase(), tail.trim().to_string())
        }
        _ => ("piece".into(), rest.to_string()),
    };

    if name.is_empty() {
        return Ok(Ingredient {
            name: rest.to_string(),
            quantity,
            unit: "piece".into(),
        });
    }

    Ok(Ingredient {
        name,
        quantity,
        unit,
    })
}

/// Extract the items of the first matching list element
fn list_items(
    html: &str,
    list_pattern: &'static LazyLock<Option<Regex>>,
) -> Result<Vec<String>, AppError> {
    let Some(list) = pattern(list_pattern)?.captures(html) else {
        return Ok(Vec::new());
    };
    let body = list.get(1).map_or("", |m| m.as_str());

    let item_re = pattern(&LIST_ITEM_PATTERN)?;
    let mut items = Vec::new();
    for captures in item_re.captures_iter(body) {
        let text = text_content(captures.get(1).map_or("", |m| m.as_str()))?;
        if !text.is_empty() {
            items.push(text);
        }
    }
    Ok(items)
}

/// Parse AI-returned recipe HTML into a structured draft
///
/// # Errors
///
/// Returns `MalformedAiResponse` when the HTML has no `<h1>` title, no
/// ingredient `<ul>`, or no instruction `<ol>`
pub fn parse_recipe_html(html: &str) -> Result<RecipeDraft, AppError> {
    let title = pattern(&TITLE_PATTERN)?
        .captures(html)
        .map(|c| text_content(c.get(1).map_or("", |m| m.as_str())))
        .transpose()?
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::malformed_ai_response("AI response has no recipe title"))?;

    let ingredient_lines = list_items(html, &INGREDIENT_LIST_PATTERN)?;
    if ingredient_lines.is_empty() {
        return Err(AppError::malformed_ai_response(
            "AI response has no ingredient list",
        ));
    }
    let ingredients = ingredient_lines
        .iter()
        .map(|line| parse_ingredient_line(line))
        .collect::<Result<Vec<_>, _>>()?;

    let instructions = list_items(html, &INSTRUCTION_LIST_PATTERN)?;
    if instructions.is_empty() {
        return Err(AppError::malformed_ai_response(
            "AI response has no instruction list",
        ));
    }

    Ok(RecipeDraft {
        title,
        ingredients,
        instructions,
    })
}
