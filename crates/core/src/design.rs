//! Generated jewelry designs.

use serde::{Deserialize, Serialize};

/// Request body for the generation function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DesignRequest {
    pub prompt: String,
}

impl DesignRequest {
    /// Build a request from raw textarea input.
    ///
    /// Returns `None` for a blank prompt, which must never reach the
    /// function.
    #[must_use]
    pub fn from_prompt(prompt: &str) -> Option<Self> {
        let trimmed = prompt.trim();
        (!trimmed.is_empty()).then(|| Self {
            prompt: trimmed.to_owned(),
        })
    }
}

/// Response body from the generation function. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignResponse {
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// A displayable design. Lives only in the visitor's session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignArtifact {
    pub image_url: String,
    pub description: String,
}

/// What a response means for the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesignOutcome {
    Created(DesignArtifact),
    /// The service reported a problem; shown verbatim.
    Rejected(String),
    /// No image and no service error.
    Malformed,
}

impl DesignResponse {
    /// Interpret the response. A service error wins over an image; a
    /// missing description falls back to `prompt` as typed.
    #[must_use]
    pub fn into_outcome(self, prompt: &str) -> DesignOutcome {
        if let Some(error) = self.error.filter(|e| !e.is_empty()) {
            return DesignOutcome::Rejected(error);
        }
        match self.image_url.filter(|url| !url.is_empty()) {
            Some(image_url) => DesignOutcome::Created(DesignArtifact {
                image_url,
                description: self
                    .description
                    .filter(|d| !d.is_empty())
                    .unwrap_or_else(|| prompt.to_owned()),
            }),
            None => DesignOutcome::Malformed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> DesignResponse {
        serde_json::from_str(json).expect("deserialize")
    }

    #[test]
    fn test_blank_prompt_builds_no_request() {
        assert_eq!(DesignRequest::from_prompt(""), None);
        assert_eq!(DesignRequest::from_prompt(" \n\t "), None);
        assert_eq!(
            DesignRequest::from_prompt("  rose gold sunset  "),
            Some(DesignRequest {
                prompt: "rose gold sunset".to_owned()
            })
        );
    }

    #[test]
    fn test_image_with_description() {
        let outcome = parse(r#"{"imageUrl":"data:image/png;base64,AAA","description":"A halo ring"}"#)
            .into_outcome("ring");
        assert_eq!(
            outcome,
            DesignOutcome::Created(DesignArtifact {
                image_url: "data:image/png;base64,AAA".to_owned(),
                description: "A halo ring".to_owned(),
            })
        );
    }

    #[test]
    fn test_description_falls_back_to_prompt() {
        let outcome = parse(r#"{"imageUrl":"https://img.test/1.png"}"#).into_outcome(" ocean pendant ");
        let DesignOutcome::Created(artifact) = outcome else {
            panic!("expected a design");
        };
        assert_eq!(artifact.description, " ocean pendant ");
    }

    #[test]
    fn test_service_error_wins() {
        let outcome = parse(r#"{"error":"Rate limits exceeded, please try again later.","imageUrl":"x"}"#)
            .into_outcome("ring");
        assert_eq!(
            outcome,
            DesignOutcome::Rejected("Rate limits exceeded, please try again later.".to_owned())
        );
    }

    #[test]
    fn test_missing_image_is_malformed() {
        assert_eq!(parse("{}").into_outcome("ring"), DesignOutcome::Malformed);
        assert_eq!(
            parse(r#"{"imageUrl":"","description":"d"}"#).into_outcome("ring"),
            DesignOutcome::Malformed
        );
    }
}
