use std::sync::Arc;
use tracing::{error, info};

use crate::backend::{CompletionBackend, OpenRouterBackend};
use crate::config::{AnalysisConfig, require_credential};
use crate::error::{AppealError, Result};
use crate::intake::{EvidenceDocument, encode};
use crate::model::AnalysisResult;
use crate::prompt::AnalysisRequest;
use crate::response::parse_analysis;

/// Runs the single-request analysis pipeline:
/// credential → encode → request → submit → strip fence → parse → validate.
#[derive(Clone)]
pub struct AnalysisClient {
    backend: Arc<dyn CompletionBackend>,
    api_key: Option<String>,
}

impl AnalysisClient {
    pub fn new(backend: Arc<dyn CompletionBackend>, api_key: Option<String>) -> Self {
        Self { backend, api_key }
    }

    /// Client backed by OpenRouter, configured from the process environment.
    pub fn from_env() -> Self {
        let config = AnalysisConfig::from_env();
        Self::from_config(&config)
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(
            Arc::new(OpenRouterBackend::new(config)),
            config.api_key.clone(),
        )
    }

    pub async fn analyze(&self, document: &EvidenceDocument) -> Result<AnalysisResult> {
        let api_key = require_credential(self.api_key.as_deref())?;

        let payload = encode(document)?;
        info!(
            document = %document.name,
            bytes = document.bytes.len(),
            "Evidence accepted, building analysis request"
        );

        let request = AnalysisRequest::new(payload);

        let completion = self
            .backend
            .complete(api_key, &request)
            .await
            .map_err(|e| AppealError::Transport(format!("{:#}", e)))?;

        match parse_analysis(&completion) {
            Ok(result) => {
                info!(
                    document = %document.name,
                    status = result.status(),
                    "Analysis completed"
                );
                Ok(result)
            }
            Err(e) => {
                error!(
                    document = %document.name,
                    error = %e,
                    raw_response = %completion,
                    "Failed to parse analysis response"
                );
                Err(e.into())
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedBackend;
    use super::*;
    use crate::error::{ConfigError, FormatError, ValidationError};
    use crate::intake::PDF_MEDIA_TYPE;
    use crate::response::fixtures;

    fn pdf() -> EvidenceDocument {
        EvidenceDocument::new("booking.pdf", PDF_MEDIA_TYPE, b"%PDF-1.7 booking".to_vec())
    }

    fn client(backend: Arc<ScriptedBackend>) -> AnalysisClient {
        AnalysisClient::new(backend, Some("sk-or-test".to_string()))
    }

    #[tokio::test]
    async fn test_missing_credential_never_reaches_backend() {
        let backend = ScriptedBackend::replying(fixtures::ok_response().to_string());
        let client = AnalysisClient::new(backend.clone(), None);

        let err = client.analyze(&pdf()).await.unwrap_err();

        assert!(matches!(
            err,
            AppealError::Config(ConfigError::MissingCredential(ref var)) if var == "OPENROUTER_API_KEY"
        ));
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_non_pdf_never_reaches_backend() {
        let backend = ScriptedBackend::replying(fixtures::ok_response().to_string());
        let document = EvidenceDocument::new("notes.txt", "text/plain", b"hello".to_vec());

        let err = client(backend.clone()).analyze(&document).await.unwrap_err();

        assert!(matches!(
            err,
            AppealError::Validation(ValidationError::UnsupportedType(_))
        ));
        assert_eq!(err.user_message(), "Please upload a valid PDF file.");
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test]
    async fn test_success_round_trip() {
        let backend = ScriptedBackend::replying(fixtures::ok_response().to_string());

        let result = client(backend.clone()).analyze(&pdf()).await.unwrap();

        assert_eq!(result.status(), "ok");
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn test_fenced_reply() {
        let fenced = format!("```json\n{}\n```", fixtures::ok_response());
        let plain = client(ScriptedBackend::replying(fixtures::ok_response().to_string()))
            .analyze(&pdf())
            .await
            .unwrap();
        let stripped = client(ScriptedBackend::replying(fenced))
            .analyze(&pdf())
            .await
            .unwrap();
        assert_eq!(plain, stripped);
    }

    #[tokio::test]
    async fn test_model_reported_error_is_not_a_failure() {
        let backend = ScriptedBackend::replying(fixtures::missing_amount_response().to_string());

        let result = client(backend).analyze(&pdf()).await.unwrap();

        let AnalysisResult::Error(missing) = result else {
            panic!("expected error variant");
        };
        assert_eq!(missing.reason, "missing charged amount");
        assert_eq!(missing.requested_fields, vec!["amounts.charged"]);
    }

    #[tokio::test]
    async fn test_transport_fault() {
        let backend = ScriptedBackend::failing("connection reset by peer");

        let err = client(backend.clone()).analyze(&pdf()).await.unwrap_err();

        assert!(matches!(err, AppealError::Transport(_)));
        assert_eq!(err.user_message(), "An error occurred: connection reset by peer");
        assert_eq!(backend.calls(), 1);
    }

    struct UnreachableBackend;

    #[async_trait::async_trait]
    impl CompletionBackend for UnreachableBackend {
        async fn complete(&self, _api_key: &str, _request: &AnalysisRequest) -> anyhow::Result<String> {
            Err(anyhow::anyhow!("connection reset by peer")
                .context("error sending request for url (https://openrouter.ai/api/v1/chat/completions)"))
        }
    }

    #[tokio::test]
    async fn test_transport_fault_keeps_error_chain() {
        let client = AnalysisClient::new(Arc::new(UnreachableBackend), Some("sk-or-test".to_string()));

        let err = client.analyze(&pdf()).await.unwrap_err();

        let AppealError::Transport(ref message) = err else {
            panic!("expected transport error, got {:?}", err);
        };
        assert!(message.starts_with("error sending request"));
        assert!(message.ends_with(": connection reset by peer"));
    }

    #[tokio::test]
    async fn test_invalid_json_yields_no_result() {
        let backend = ScriptedBackend::replying("Sorry, I cannot help with that. {\"status\":");

        let result = client(backend).analyze(&pdf()).await;

        assert!(matches!(
            result,
            Err(AppealError::Format(FormatError::InvalidSchema(_)))
        ));
    }
}
