use futures::{future::BoxFuture, FutureExt};
use reqwest::Client;

use crate::{
    classifier::fallback::{DetectionReport, DetectorError, LanguageDetector},
    config::CerebrasConfig,
};

use super::inference::{build_request, parse_response, CEREBRAS_API_URL};

/// Language detector backed by a chat-completions model.
#[derive(Clone)]
pub struct CerebrasDetector {
    http: Client,
    config: CerebrasConfig,
}

impl CerebrasDetector {
    pub fn new(http: Client, config: CerebrasConfig) -> Self {
        Self { http, config }
    }

    async fn detect(&self, sample: &str) -> Result<Option<DetectionReport>, DetectorError> {
        let api_key = self
            .config
            .api_key
            .as_ref()
            .ok_or(DetectorError::Unavailable)?;

        let request = build_request(self.config.model.clone(), sample);
        let response = self
            .http
            .post(CEREBRAS_API_URL)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|err| DetectorError::Request(err.to_string()))?;

        parse_response(response)
            .await
            .map_err(|err| DetectorError::Malformed(format!("{err:#}")))
    }
}

impl LanguageDetector for CerebrasDetector {
    fn detect_language<'a>(
        &'a self,
        sample: &'a str,
    ) -> BoxFuture<'a, Result<Option<DetectionReport>, DetectorError>> {
        self.detect(sample).boxed()
    }
}
