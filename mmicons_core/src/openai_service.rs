use log::{debug, warn};
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use serde_json::{json, Value};
use crate::app_name::AppName;
use crate::config::ServiceConfig;
use crate::icon_service::{icon_prompt, IconService};
use crate::remote_error::RemoteError;
use crate::screenshot::Screenshot;
use crate::theme::Theme;

const EXTRACTION_INSTRUCTIONS: &str = "You read phone home-screen screenshots. \
    List the name of every app icon visible on the screen. \
    Answer with the names only, separated by commas, without any other text.";
const EXTRACTION_REQUEST: &str = "Which apps are on this home screen?";
const RATE_LIMIT_CODE: &str = "rate_limit_exceeded";

pub struct OpenAIService {
    client: Client,
    config: ServiceConfig,
}

impl IconService for OpenAIService {
    fn extract_names(&self, screenshot: &Screenshot) -> Result<Vec<AppName>, RemoteError> {
        let data_uri = screenshot.to_data_uri()
            .map_err(|e| RemoteError::Network(format!("could not prepare screenshot: {}", e)))?;

        let request = json!({
            "model": self.config.vision_model,
            "messages": [
                {
                    "role": "system",
                    "content": EXTRACTION_INSTRUCTIONS,
                },
                {
                    "role": "user",
                    "content": [
                        { "type": "text", "text": EXTRACTION_REQUEST },
                        { "type": "image_url", "image_url": { "url": data_uri } },
                    ],
                },
            ],
            "max_tokens": self.config.max_tokens,
        });

        debug!("sending name extraction request to: {} ...", self.config.chat_endpoint);

        let response = self.client
            .post(&self.config.chat_endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .map_err(|err| RemoteError::Network(format!("could not send request: {}", err)))?;

        let status = response.status();
        let json: Value = response.json()
            .map_err(|err| RemoteError::Network(format!("could not read response: {}", err)))?;

        OpenAIService::parse_names_response(status, &json)
    }

    fn generate_icon(&self, name: &AppName, theme: &Theme) -> Result<Vec<u8>, RemoteError> {
        let request = json!({
            "model": self.config.image_model,
            "prompt": icon_prompt(name, theme),
            "n": 1,
            "size": self.config.image_size,
            "quality": self.config.image_quality,
        });

        debug!("sending icon generation request for '{}' to: {} ...", name, self.config.image_endpoint);

        let response = self.client
            .post(&self.config.image_endpoint)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .map_err(OpenAIService::transport_error)?;

        let status = response.status();
        let body = response.text()
            .map_err(OpenAIService::transport_error)?;

        let url = OpenAIService::parse_generation_response(status, &body)?;

        self.download(&url)
    }
}

impl OpenAIService {
    pub fn new(config: ServiceConfig) -> Result<OpenAIService, RemoteError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RemoteError::Unknown(format!("could not build HTTP client: {}", e)))?;

        Ok(OpenAIService { client, config })
    }

    fn transport_error(err: reqwest::Error) -> RemoteError {
        if err.is_builder() {
            RemoteError::Unknown(err.to_string())
        } else {
            RemoteError::Network(err.to_string())
        }
    }

    fn download(&self, url: &str) -> Result<Vec<u8>, RemoteError> {
        debug!("downloading generated icon from: {} ...", url);

        let response: Response = self.client
            .get(url)
            .send()
            .map_err(|err| RemoteError::ImageDownload(format!("could not send request: {}", err)))?
            .error_for_status()
            .map_err(|err| RemoteError::ImageDownload(format!("could not receive response: {}", err)))?;

        let bytes = response.bytes()
            .map_err(|err| RemoteError::ImageDownload(format!("could not read image: {}", err)))?;

        if bytes.is_empty() {
            return Err(RemoteError::NoData);
        }

        Ok(bytes.to_vec())
    }

    /// Any failure here is reported as a network error, whatever its origin.
    pub(crate) fn parse_names_response(status: StatusCode, json: &Value) -> Result<Vec<AppName>, RemoteError> {
        if let Some(error) = json.get("error").filter(|error| !error.is_null()) {
            return Err(RemoteError::Network(format!("api returned an error: {}", OpenAIService::error_message(error))));
        }

        if !status.is_success() {
            return Err(RemoteError::Network(format!("unexpected status: {}", status)));
        }

        let content = json.pointer("/choices/0/message/content")
            .and_then(|raw| raw.as_str())
            .ok_or_else(|| RemoteError::Network("could not find content in response".to_string()))?;

        debug!("extraction answer: {}", content);
        Ok(AppName::parse_list(content))
    }

    pub(crate) fn parse_generation_response(status: StatusCode, body: &str) -> Result<String, RemoteError> {
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(RemoteError::RateLimitExceeded);
        }

        let json: Value = match serde_json::from_str(body) {
            Ok(json) => json,
            Err(_) if !status.is_success() => return Err(RemoteError::Api(format!("unexpected status: {}", status))),
            Err(e) => return Err(RemoteError::Decoding(e.to_string())),
        };

        if let Some(error) = json.get("error").filter(|error| !error.is_null()) {
            if OpenAIService::is_rate_limit_error(error) {
                return Err(RemoteError::RateLimitExceeded);
            }

            let message = OpenAIService::error_message(error);
            warn!("image api reported an error: {}", message);
            return Err(RemoteError::Api(message));
        }

        if !status.is_success() {
            return Err(RemoteError::Api(format!("unexpected status: {}", status)));
        }

        json.pointer("/data/0/url")
            .and_then(|raw| raw.as_str())
            .filter(|url| !url.is_empty())
            .map(str::to_string)
            .ok_or(RemoteError::NoData)
    }

    fn is_rate_limit_error(error: &Value) -> bool {
        ["code", "type"].iter().any(|key| {
            error.get(*key).and_then(|raw| raw.as_str()) == Some(RATE_LIMIT_CODE)
        })
    }

    fn error_message(error: &Value) -> String {
        error.get("message")
            .and_then(|raw| raw.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string())
    }
}
