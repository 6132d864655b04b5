//! Parse LLM output into sub-query candidates

use crate::error::PlannerError;
use pelorus_domain::{Priority, SubQuery};
use serde_json::Value;
use tracing::warn;

/// Parse the model's JSON response into sub-queries
///
/// Tolerates markdown code fences around the JSON. Malformed array
/// elements are skipped individually; the call errors only when no valid
/// sub-query can be recovered at all.
pub fn parse_plan_response(response: &str) -> Result<Vec<SubQuery>, PlannerError> {
    let json_str = extract_json(response)?;

    let json: Value = serde_json::from_str(&json_str)
        .map_err(|e| PlannerError::InvalidFormat(format!("JSON parse error: {}", e)))?;

    let items = json
        .as_array()
        .ok_or_else(|| PlannerError::InvalidFormat("Expected JSON array".to_string()))?;

    let mut sub_queries = Vec::new();
    for (idx, item) in items.iter().enumerate() {
        match parse_sub_query_json(item) {
            Ok(sub_query) => sub_queries.push(sub_query),
            Err(e) => {
                warn!("Failed to parse sub-query {}: {}", idx, e);
            }
        }
    }

    if sub_queries.is_empty() {
        return Err(PlannerError::EmptyPlan);
    }

    Ok(sub_queries)
}

/// Extract JSON from response, handling markdown code blocks
fn extract_json(response: &str) -> Result<String, PlannerError> {
    let trimmed = response.trim();

    if trimmed.starts_with("```") {
        let lines: Vec<&str> = trimmed.lines().collect();
        if lines.len() < 2 {
            return Err(PlannerError::InvalidFormat("Empty code block".to_string()));
        }

        // Skip first line (```json or ```) and last line (```)
        let json_lines = &lines[1..lines.len().saturating_sub(1)];
        Ok(json_lines.join("\n"))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Parse a single sub-query from JSON
fn parse_sub_query_json(json: &Value) -> Result<SubQuery, String> {
    let obj = json
        .as_object()
        .ok_or_else(|| "Sub-query is not a JSON object".to_string())?;

    let text = obj
        .get("text")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "Missing or empty 'text'".to_string())?
        .to_string();

    let purpose = obj
        .get("purpose")
        .and_then(|v| v.as_str())
        .unwrap_or("unspecified")
        .to_string();

    let priority = obj
        .get("priority")
        .and_then(|v| v.as_str())
        .and_then(Priority::parse)
        .ok_or_else(|| "Missing or invalid 'priority'".to_string())?;

    Ok(SubQuery::new(text, purpose, priority))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_json() {
        let response = r#"[
            {"text": "Ever Given IMO number", "purpose": "identifier lookup", "priority": "high"},
            {"text": "Ever Given owner", "purpose": "ownership", "priority": "medium"}
        ]"#;

        let plan = parse_plan_response(response).unwrap();
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].text, "Ever Given IMO number");
        assert_eq!(plan[0].priority, Priority::High);
        assert_eq!(plan[1].priority, Priority::Medium);
    }

    #[test]
    fn test_parse_json_with_markdown_wrapper() {
        let response = r#"```json
[
    {"text": "vessel registry search", "purpose": "registry", "priority": "high"}
]
```"#;

        let plan = parse_plan_response(response).unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].text, "vessel registry search");
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = parse_plan_response("This is not JSON");
        assert!(matches!(result, Err(PlannerError::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_json_not_array() {
        let result = parse_plan_response(r#"{"text": "q"}"#);
        assert!(matches!(result, Err(PlannerError::InvalidFormat(_))));
    }

    #[test]
    fn test_parse_partial_success() {
        let response = r#"[
            {"text": "good query", "purpose": "p", "priority": "high"},
            {"text": "", "purpose": "empty text", "priority": "high"},
            {"text": "missing priority"},
            {"text": "another good one", "purpose": "p", "priority": "low"}
        ]"#;

        let plan = parse_plan_response(response).unwrap();
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].text, "good query");
        assert_eq!(plan[1].text, "another good one");
    }

    #[test]
    fn test_all_elements_malformed_is_empty_plan() {
        let response = r#"[{"text": ""}, {"priority": "high"}]"#;
        assert!(matches!(
            parse_plan_response(response),
            Err(PlannerError::EmptyPlan)
        ));
    }

    #[test]
    fn test_empty_array_is_empty_plan() {
        assert!(matches!(
            parse_plan_response("[]"),
            Err(PlannerError::EmptyPlan)
        ));
    }

    #[test]
    fn test_missing_purpose_defaults() {
        let response = r#"[{"text": "q", "priority": "low"}]"#;
        let plan = parse_plan_response(response).unwrap();
        assert_eq!(plan[0].purpose, "unspecified");
    }
}
