//! Prompt templates for the suggestion assistant.
//!
//! Templates are stored in `templates/prompts/` and use Jinja2 syntax.
//!
//! ```ignore
//! let prompt = render_categorize_prompt(&labels, &schema, "Spilled solvent in bay 3")?;
//! ```

pub mod engine;

pub use engine::{render_template, TemplateError};

use minijinja::Value;
use std::collections::HashMap;

/// Render the categorization prompt for one suggestion.
///
/// `categories` are the allowed labels listed to the model verbatim.
pub fn render_categorize_prompt(
    categories: &[&str],
    json_schema: &str,
    suggestion_text: &str,
) -> Result<String, TemplateError> {
    let mut ctx: HashMap<&str, Value> = HashMap::new();
    ctx.insert("categories", Value::from_serialize(categories));
    ctx.insert("json_schema", Value::from(json_schema));
    ctx.insert("suggestion_text", Value::from(suggestion_text));

    render_template("suggestions/categorize.jinja", &ctx)
}

pub fn render_summarize_prompt(
    json_schema: &str,
    suggestion_text: &str,
) -> Result<String, TemplateError> {
    let mut ctx: HashMap<&str, Value> = HashMap::new();
    ctx.insert("json_schema", Value::from(json_schema));
    ctx.insert("suggestion_text", Value::from(suggestion_text));

    render_template("suggestions/summarize.jinja", &ctx)
}
