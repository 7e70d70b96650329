//! Context-rich JSON decoding for Spoonacular response bodies.

use anyhow::Result;

/// Decode `body` as `T`, reporting the serde path, the type mismatch and a
/// short excerpt around the failing column when decoding fails.
pub fn parse_json_with_context<T: serde::de::DeserializeOwned>(body: &str) -> Result<T> {
    let jd = &mut serde_json::Deserializer::from_str(body);
    let err = match serde_path_to_error::deserialize(jd) {
        Ok(value) => return Ok(value),
        Err(err) => err,
    };

    let inner = err.inner();
    let (line, column) = (inner.line(), inner.column());
    let path = err.path().to_string();

    let msg = inner.to_string();
    let loc = format!(" at line {line} column {column}");
    let msg = msg.strip_suffix(&loc).unwrap_or(&msg);

    let mut out = String::new();
    if !path.is_empty() && path != "." {
        out.push_str(&format!("at path '{path}': "));
    }
    out.push_str(&format!(
        "{} (line {line} col {column})\n{}",
        describe_mismatch(msg),
        excerpt(body, line, column, 24)
    ));

    Err(anyhow::anyhow!(out))
}

/// Turn "invalid type: X, expected Y" into "expected Y, got X".
fn describe_mismatch(msg: &str) -> String {
    if let Some(rest) = msg.strip_prefix("invalid type: ")
        && let Some((actual, expected)) = rest.split_once(", expected ")
    {
        return format!("expected {}, got {}", expected.trim(), actual);
    }
    msg.to_string()
}

/// Slice of the offending line centred on `column`, with a caret underneath.
fn excerpt(body: &str, line: usize, column: usize, width: usize) -> String {
    let target: Vec<char> = body
        .lines()
        .nth(line.saturating_sub(1))
        .unwrap_or("")
        .chars()
        .collect();
    if target.is_empty() {
        return "(empty line)".to_string();
    }

    let at = column.saturating_sub(1).min(target.len() - 1);
    let start = at.saturating_sub(width / 2);
    let end = (at + width / 2).min(target.len());
    let slice: String = target[start..end].iter().collect();

    format!("...{slice}...\n   {}^", " ".repeat(at - start))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn describe_mismatch_reorders_invalid_type() {
        assert_eq!(
            describe_mismatch("invalid type: null, expected u32"),
            "expected u32, got null"
        );
        assert_eq!(describe_mismatch("expected value"), "expected value");
    }

    #[test]
    fn reports_path_of_bad_field() {
        #[derive(Debug, Deserialize)]
        struct Batch {
            #[allow(dead_code)]
            recipes: Vec<Item>,
        }

        #[derive(Debug, Deserialize)]
        struct Item {
            #[allow(dead_code)]
            id: u64,
        }

        let json = r#"{
            "recipes": [
                { "id": 716429 },
                { "id": "not-a-number" }
            ]
        }"#;

        let err = parse_json_with_context::<Batch>(json)
            .unwrap_err()
            .to_string();
        assert!(err.contains("recipes[1].id"), "{err}");
        assert!(err.contains("expected") && err.contains("got"), "{err}");
    }

    #[test]
    fn excerpt_handles_multibyte_lines() {
        let json = r#"{"title": "Crème brûlée", "id": true}"#;
        let err = parse_json_with_context::<std::collections::HashMap<String, String>>(json)
            .unwrap_err()
            .to_string();
        assert!(err.contains('^'));
    }
}
