//! AI content requesters.
//!
//! Every request kind declares a cache-key payload, a prompt and an output
//! schema. [`AiService`] turns that into a guarded, cached, retried call to the
//! generative backend and validates what comes back.

pub mod gemini;
pub mod requests;

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use validator::Validate;

use crate::api::ApiError;
use crate::cache::{stable_key, Flight, FlightGuard, ResultCache};
use crate::retry::RetryPolicy;

pub use gemini::GeminiBackend;
pub use requests::{AdviceRequest, InsightRequest, PlanRequest, ReportRequest};

/// Single request/response completion API that returns schema-shaped JSON
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AiBackend: Send + Sync {
    async fn generate(&self, prompt: &str, schema: &Value) -> Result<Value, ApiError>;
}

/// One kind of generated content
pub trait GenerationRequest {
    type Output: Serialize + DeserializeOwned + Validate + Clone + Send + Sync;

    /// Request kind, also used as the cache-key prefix
    fn kind(&self) -> &'static str;

    /// The inputs that decide whether a cached result still applies
    fn key_payload(&self) -> Value;

    fn prompt(&self) -> String;

    fn schema(&self) -> Value;

    fn cache_key(&self) -> String {
        stable_key(self.kind(), &self.key_payload())
    }
}

/// Issues generation requests through the session cache and retry policy
#[derive(Clone)]
pub struct AiService {
    backend: Arc<dyn AiBackend>,
    cache: ResultCache,
    retry: RetryPolicy,
}

impl AiService {
    pub fn new(backend: Arc<dyn AiBackend>, cache: ResultCache, retry: RetryPolicy) -> Self {
        Self {
            backend,
            cache,
            retry,
        }
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Resolve a request through the caller's guard.
    ///
    /// Returns [`Flight::Skipped`] when the guard already has a fetch running.
    pub async fn request<R>(
        &self,
        request: &R,
        guard: &FlightGuard<R::Output>,
    ) -> Result<Flight<R::Output>, ApiError>
    where
        R: GenerationRequest + Sync,
    {
        let key = request.cache_key();
        tracing::debug!("Resolving {} request as {}", request.kind(), key);
        guard.run(&key, &self.cache, || self.fetch(request)).await
    }

    /// One-shot request for consumers without a long-lived guard
    pub async fn generate<R>(&self, request: &R) -> Result<R::Output, ApiError>
    where
        R: GenerationRequest + Sync,
    {
        let guard = FlightGuard::new();
        self.request(request, &guard)
            .await?
            .into_value()
            .ok_or_else(|| ApiError::Unknown(format!("{} request was skipped", request.kind())))
    }

    async fn fetch<R>(&self, request: &R) -> Result<R::Output, ApiError>
    where
        R: GenerationRequest + Sync,
    {
        let prompt = request.prompt();
        let schema = request.schema();

        let value = self
            .retry
            .execute(|| self.backend.generate(&prompt, &schema))
            .await?;

        let output: R::Output = serde_json::from_value(value).map_err(|e| {
            ApiError::ValidationFailure(format!(
                "{} response does not match its schema: {}",
                request.kind(),
                e
            ))
        })?;

        output
            .validate()
            .map_err(|e| ApiError::ValidationFailure(e.to_string()))?;

        tracing::info!("Generated {} content", request.kind());
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AiAdvice, UserProfile, WorkoutLog};
    use serde_json::json;

    fn advice_json() -> Value {
        json!({"summary": "Build consistency", "tips": ["Train three times a week"]})
    }

    fn service(backend: MockAiBackend) -> AiService {
        AiService::new(
            Arc::new(backend),
            ResultCache::in_memory(),
            RetryPolicy::immediate(2),
        )
    }

    fn profile() -> UserProfile {
        UserProfile::new("Sam", 30, 80.0, 180.0)
    }

    #[tokio::test]
    async fn test_fetch_then_cache_hit() {
        let mut backend = MockAiBackend::new();
        backend
            .expect_generate()
            .times(1)
            .returning(|_, _| Ok(advice_json()));
        let service = service(backend);

        let logs = vec![WorkoutLog::new("Run", 30, 250)];
        let profile = profile();
        let request = AdviceRequest::new(&profile, &logs);

        let first = service.request(&request, &FlightGuard::new()).await.unwrap();
        assert!(first.was_fetched());

        // a fresh consumer finds the result in the session cache
        let second = service.request(&request, &FlightGuard::new()).await.unwrap();
        assert!(matches!(second, Flight::Cached(AiAdvice { .. })));
    }

    #[tokio::test]
    async fn test_rate_limit_is_retried_then_surfaced() {
        let mut backend = MockAiBackend::new();
        backend
            .expect_generate()
            .times(2)
            .returning(|_, _| Err(ApiError::RateLimited("quota".to_string())));
        let service = service(backend);

        let profile = profile();
        let result = service.generate(&PlanRequest::new(&profile)).await;

        assert!(matches!(result, Err(ApiError::RateLimited(_))));
    }

    #[tokio::test]
    async fn test_schema_mismatch_is_validation_failure() {
        let mut backend = MockAiBackend::new();
        backend
            .expect_generate()
            .times(1)
            .returning(|_, _| Ok(json!({"summary": "missing tips"})));
        let service = service(backend);

        let profile = profile();
        let result = service.generate(&AdviceRequest::new(&profile, &[])).await;

        assert!(matches!(result, Err(ApiError::ValidationFailure(_))));
    }

    #[tokio::test]
    async fn test_out_of_range_score_is_validation_failure() {
        let mut backend = MockAiBackend::new();
        backend.expect_generate().times(1).returning(|_, _| {
            Ok(json!({
                "summary": "Great",
                "consistencyScore": 120,
                "intensityScore": 50,
                "progressScore": 50,
                "nextSteps": ["Rest"]
            }))
        });
        let service = service(backend);

        let profile = profile();
        let result = service.generate(&ReportRequest::new(&profile, &[])).await;

        assert!(matches!(result, Err(ApiError::ValidationFailure(_))));
        assert!(service.cache().get::<Value>(&ReportRequest::new(&profile, &[]).cache_key()).is_none());
    }

    #[tokio::test]
    async fn test_auth_error_not_retried() {
        let mut backend = MockAiBackend::new();
        backend
            .expect_generate()
            .times(1)
            .returning(|_, _| Err(ApiError::Unauthorized("API key invalid".to_string())));
        let service = service(backend);

        let result = service
            .generate(&InsightRequest::new("Squat", &[]))
            .await;

        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }
}
