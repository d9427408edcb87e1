//! Extraction client: wraps a transcript in the extraction prompt and hands
//! it to the configured backend.

use tracing::debug;

use crate::adapters::{BackendError, ExtractionBackend};

/// Build the single-turn extraction prompt for a transcript.
///
/// The transcript is embedded verbatim.
pub fn build_prompt(transcript: &str) -> String {
    format!(
        r#"You are an assistant that extracts structured information from meeting transcripts.

Transcript:
{transcript}

Return ONLY valid JSON in this exact format, no explanation, no text outside JSON:

{{
  "participants": [],
  "decisions": [],
  "action_items": [
    {{"owner": "", "task": "", "deadline": ""}}
  ]
}}
"#
    )
}

/// Sends transcripts to an extraction backend
pub struct ExtractionClient {
    backend: Box<dyn ExtractionBackend>,
}

impl ExtractionClient {
    pub fn new(backend: Box<dyn ExtractionBackend>) -> Self {
        Self { backend }
    }

    /// Name of the underlying backend
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Ask the backend to extract fields from `transcript`; returns the raw reply
    pub async fn extract(&self, transcript: &str) -> Result<String, BackendError> {
        let prompt = build_prompt(transcript);
        debug!(
            backend = self.backend.name(),
            prompt_bytes = prompt.len(),
            "Sending extraction prompt"
        );
        self.backend.complete(&prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Echo;

    #[async_trait]
    impl ExtractionBackend for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        async fn complete(&self, prompt: &str) -> Result<String, BackendError> {
            Ok(prompt.to_string())
        }
    }

    #[test]
    fn test_prompt_embeds_transcript_and_shape() {
        let prompt = build_prompt("Alice: {braces} stay\nBob: ok");

        assert!(prompt.contains("Alice: {braces} stay\nBob: ok"));
        assert!(prompt.contains(r#""participants": []"#));
        assert!(prompt.contains(r#""decisions": []"#));
        assert!(prompt.contains(r#"{"owner": "", "task": "", "deadline": ""}"#));
        assert!(prompt.contains("no text outside JSON"));
    }

    #[tokio::test]
    async fn test_extract_returns_backend_reply_unmodified() {
        let client = ExtractionClient::new(Box::new(Echo));
        assert_eq!(client.backend_name(), "echo");

        let reply = client.extract("transcript body").await.unwrap();
        assert_eq!(reply, build_prompt("transcript body"));
    }
}
