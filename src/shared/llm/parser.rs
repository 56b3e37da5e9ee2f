use lazy_static::lazy_static;
use regex::Regex;

use super::LlmResponse;

lazy_static! {
    /// Trailing commas before } or ]
    static ref TRAILING_COMMA_RE: Regex = Regex::new(r",(\s*[}\]])").unwrap();

    /// JavaScript-style string concatenation ("a" + "b")
    static ref JS_STRING_CONCAT_RE: Regex = Regex::new(r#""\s*\+\s*""#).unwrap();

    /// Fenced code block, optionally tagged with a language
    static ref FENCED_BLOCK_RE: Regex = Regex::new(r"(?s)```[a-zA-Z]*\s*\n?(.*?)```").unwrap();
}

/// Locate the JSON object inside a model reply.
///
/// Fenced blocks win over bare text. Otherwise the span from the first `{`
/// to the last `}` is taken.
fn extract_json(text: &str) -> Result<&str, String> {
    if let Some(block) = FENCED_BLOCK_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|body| body.starts_with('{'))
    {
        return Ok(block);
    }

    let start = text
        .find('{')
        .ok_or_else(|| "No JSON object found in response".to_string())?;
    let end = text
        .rfind('}')
        .ok_or_else(|| "Incomplete JSON object in response".to_string())?;

    if start < end {
        Ok(&text[start..=end])
    } else {
        Err("Invalid JSON boundaries in response".to_string())
    }
}

/// Cheap textual repairs for the most common model mistakes
fn apply_quick_fixes(json_str: &str) -> String {
    let merged = JS_STRING_CONCAT_RE.replace_all(json_str, "");
    TRAILING_COMMA_RE.replace_all(&merged, "$1").into_owned()
}

/// Structural repair through `llm_json`, isolated from panics in the repairer
fn deep_repair(json_str: &str) -> Option<String> {
    let options = llm_json::RepairOptions::default();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        llm_json::repair_json(json_str, &options)
    }));

    match result {
        Ok(Ok(repaired)) => Some(repaired),
        Ok(Err(e)) => {
            tracing::debug!("JSON repair failed: {:?}", e);
            None
        }
        Err(_) => {
            tracing::warn!("JSON repair panicked");
            None
        }
    }
}

fn try_parse<T>(text: &str) -> Result<T, String>
where
    T: LlmResponse,
{
    let json_str = extract_json(text)?;

    if let Ok(parsed) = serde_json::from_str::<T>(json_str) {
        return Ok(parsed);
    }

    let fixed = apply_quick_fixes(json_str);
    if let Ok(parsed) = serde_json::from_str::<T>(&fixed) {
        tracing::debug!("Model output parsed after quick fixes");
        return Ok(parsed);
    }

    if let Some(repaired) = deep_repair(json_str) {
        if let Ok(parsed) = serde_json::from_str::<T>(&repaired) {
            tracing::debug!("Model output parsed after llm_json repair");
            return Ok(parsed);
        }
    }

    Err(format!(
        "Failed to parse model output: {}",
        json_str.chars().take(200).collect::<String>()
    ))
}

/// Parse a model reply into `T`, or return `T::default()` marked as a fallback.
///
/// Never fails: callers inspect `is_success()` to decide how to degrade.
pub fn parse_with_fallback<T>(text: &str) -> T
where
    T: LlmResponse,
{
    match try_parse::<T>(text) {
        Ok(parsed) => parsed,
        Err(error_msg) => {
            tracing::warn!("LLM response parsing failed, using fallback: {}", error_msg);
            let mut fallback = T::default();
            fallback.mark_as_fallback(error_msg);
            fallback
        }
    }
}
