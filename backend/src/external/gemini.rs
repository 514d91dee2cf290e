//! Gemini generative AI client
//!
//! Sends a single text prompt to the generative language API and returns the
//! free-text completion. Responses are prose-wrapped, so callers pull the
//! embedded JSON out with [`extract_json_object`].

use serde::Deserialize;
use serde_json::json;

use crate::error::SourceError;

/// Client for the Gemini text-completion endpoint
#[derive(Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_endpoint: String,
    model: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(api_endpoint: String, model: String, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_endpoint,
            model,
            api_key,
        }
    }

    /// Generate a completion for a prompt.
    ///
    /// Two transports are attempted in sequence before the call counts as
    /// failed: the v1beta generateContent route, then the stable v1 route.
    pub async fn generate(&self, prompt: &str) -> Result<String, SourceError> {
        match self.generate_via(prompt, "v1beta").await {
            Ok(text) => Ok(text),
            Err(first_err) => {
                tracing::warn!("Gemini v1beta call failed ({}), retrying on v1", first_err);
                self.generate_via(prompt, "v1").await
            }
        }
    }

    async fn generate_via(&self, prompt: &str, api_version: &str) -> Result<String, SourceError> {
        let url = format!(
            "{}/{}/models/{}:generateContent?key={}",
            self.api_endpoint, api_version, self.model, self.api_key
        );

        let body = json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }]
        });

        let response = self.client.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(SourceError::Unavailable(format!(
                "Gemini API returned {}",
                status
            )));
        }

        let data: GenerateResponse = response.json().await?;
        data.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| SourceError::Malformed("empty Gemini completion".to_string()))
    }
}

/// Extract the first balanced `{...}` substring from free text.
///
/// The model wraps its JSON in prose and markdown fences; downstream behavior
/// depends on tolerating that, so this stays deliberately lenient: fences are
/// stripped, then a brace-depth scan (string- and escape-aware) finds the
/// first complete object.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Strip markdown code fences the model sometimes wraps JSON in
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_plain_object() {
        let text = r#"{"probability": 0.8, "verdict": "Rain"}"#;
        assert_eq!(extract_json_object(text), Some(text));
    }

    #[test]
    fn test_extracts_object_wrapped_in_prose() {
        let text = "Sure, here is the forecast:\n{\"probability\": 0.35}\nLet me know.";
        assert_eq!(extract_json_object(text), Some("{\"probability\": 0.35}"));
    }

    #[test]
    fn test_extracts_nested_object() {
        let text = r#"result: {"a": {"b": 1}, "c": 2} trailing"#;
        assert_eq!(extract_json_object(text), Some(r#"{"a": {"b": 1}, "c": 2}"#));
    }

    #[test]
    fn test_braces_inside_strings_ignored() {
        let text = r#"{"reasoning": "monsoon {active}", "p": 0.9}"#;
        assert_eq!(extract_json_object(text), Some(text));
    }

    #[test]
    fn test_no_object_found() {
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object("{ unterminated"), None);
    }

    #[test]
    fn test_strip_code_fences() {
        let text = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(text), "{\"a\": 1}");
    }
}
