//! Defensive parsers for model output.
//!
//! Models are asked for fenced code blocks; anything outside the fence is
//! commentary and is discarded. A missing fence or malformed JSON is an
//! ordinary, recoverable condition here.

use profile_store::SectionTitle;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no fenced ```{0} block in model output")]
    MissingFence(&'static str),
    #[error("invalid JSON in fenced block: {0}")]
    Json(#[from] serde_json::Error),
    #[error("fenced JSON missing key `{0}`")]
    MissingKey(&'static str),
}

/// Extracts the body of the first ```` ```{lang} ```` fenced block.
pub fn extract_fenced<'a>(text: &'a str, lang: &'static str) -> Result<&'a str, ParseError> {
    let open = format!("```{lang}");
    let start = text
        .find(&open)
        .ok_or(ParseError::MissingFence(lang))?
        + open.len();
    let rest = &text[start..];
    let end = rest.find("```").ok_or(ParseError::MissingFence(lang))?;
    Ok(rest[..end].trim())
}

/// Parses the relevance-judgement response: a fenced JSON object of shape
/// `{"relevant_fields": {field_name: reason, ...}}`.
pub fn parse_relevant_fields(text: &str) -> Result<BTreeMap<String, String>, ParseError> {
    let body = extract_fenced(text, "json")?;
    let value: serde_json::Value = serde_json::from_str(body)?;
    let fields = value
        .get("relevant_fields")
        .and_then(|v| v.as_object())
        .ok_or(ParseError::MissingKey("relevant_fields"))?;

    let mut out = BTreeMap::new();
    for (name, reason) in fields {
        let reason = match reason {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        out.insert(name.clone(), reason);
    }
    Ok(out)
}

/// Parses a comma-separated list of section titles. Tokens that do not
/// exactly match a canonical title are silently dropped; duplicates are
/// collapsed, first occurrence wins.
pub fn parse_title_list(text: &str) -> Vec<SectionTitle> {
    let mut seen = Vec::new();
    for token in text.split(',') {
        if let Some(title) = SectionTitle::parse(token.trim()) {
            if !seen.contains(&title) {
                seen.push(title);
            }
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_fenced_json() {
        let text = "Sure, here you go:\n```json\n{\"a\": 1}\n```\nHope this helps.";
        assert_eq!(extract_fenced(text, "json").unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn missing_fence_is_an_error() {
        assert!(matches!(
            extract_fenced("no fence here", "markdown"),
            Err(ParseError::MissingFence("markdown"))
        ));
    }

    #[test]
    fn unterminated_fence_is_an_error() {
        assert!(extract_fenced("```json\n{\"a\": 1}", "json").is_err());
    }

    #[test]
    fn parses_relevant_fields() {
        let text = r#"```json
{"relevant_fields": {"grant_amount": "question asks about funding", "name": "identifies the track"}}
```"#;
        let fields = parse_relevant_fields(text).unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(
            fields.get("grant_amount").map(String::as_str),
            Some("question asks about funding")
        );
    }

    #[test]
    fn relevant_fields_requires_the_key() {
        let text = "```json\n{\"fields\": {}}\n```";
        assert!(matches!(
            parse_relevant_fields(text),
            Err(ParseError::MissingKey("relevant_fields"))
        ));
    }

    #[test]
    fn title_list_drops_unknown_tokens() {
        let titles =
            parse_title_list("The Solution, Flux Capacitors, Team and Leadership, The Solution");
        assert_eq!(
            titles,
            vec![SectionTitle::Solution, SectionTitle::TeamLeadership]
        );
    }

    #[test]
    fn empty_response_yields_no_titles() {
        assert!(parse_title_list("").is_empty());
    }
}
