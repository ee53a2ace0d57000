// ABOUTME: Prompt construction for the AI recipe generation endpoint
// ABOUTME: Requests a fixed HTML shape the parser knows how to read
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Larder

/// System prompt pinning the response format
pub const SYSTEM_PROMPT: &str = "You are a professional chef assistant. \
You answer with exactly one recipe formatted as HTML: \
an <h1> element with the recipe title, \
a <ul> element where each <li> is one ingredient written as \
'quantity unit ingredient name' (for example '2 cups flour'), \
and an <ol> element where each <li> is one instruction step. \
Do not include any other markup or commentary.";

/// Build the user prompt from the request's free-text instructions and
/// optional pantry-selected ingredient names
#[must_use]
pub fn build_user_prompt(instructions: &str, ingredients: &[String]) -> String {
    let mut prompt = format!("Generate a recipe for: {instructions}");
    if !ingredients.is_empty() {
        prompt.push_str("\nPrefer using these ingredients I have on hand: ");
        prompt.push_str(&ingredients.join(", "));
    }
    prompt
}
