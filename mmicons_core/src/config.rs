use std::time::Duration;

pub const DEFAULT_CHAT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_IMAGE_ENDPOINT: &str = "https://api.openai.com/v1/images/generations";
pub const DEFAULT_VISION_MODEL: &str = "gpt-4o";
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";
pub const DEFAULT_MAX_TOKENS: u32 = 300;
pub const DEFAULT_IMAGE_SIZE: &str = "1024x1024";
pub const DEFAULT_IMAGE_QUALITY: &str = "standard";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Endpoints, models and credential used by [`crate::openai_service::OpenAIService`].
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub api_key: String,
    pub chat_endpoint: String,
    pub image_endpoint: String,
    pub vision_model: String,
    pub image_model: String,
    pub max_tokens: u32,
    pub image_size: String,
    pub image_quality: String,
    pub timeout: Duration,
}

impl ServiceConfig {
    pub fn new(api_key: impl Into<String>) -> ServiceConfig {
        ServiceConfig {
            api_key: api_key.into(),
            chat_endpoint: DEFAULT_CHAT_ENDPOINT.to_string(),
            image_endpoint: DEFAULT_IMAGE_ENDPOINT.to_string(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            image_size: DEFAULT_IMAGE_SIZE.to_string(),
            image_quality: DEFAULT_IMAGE_QUALITY.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_chat_endpoint(mut self, endpoint: impl Into<String>) -> ServiceConfig {
        self.chat_endpoint = endpoint.into();
        self
    }

    pub fn with_image_endpoint(mut self, endpoint: impl Into<String>) -> ServiceConfig {
        self.image_endpoint = endpoint.into();
        self
    }

    pub fn with_vision_model(mut self, model: impl Into<String>) -> ServiceConfig {
        self.vision_model = model.into();
        self
    }

    pub fn with_image_model(mut self, model: impl Into<String>) -> ServiceConfig {
        self.image_model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> ServiceConfig {
        self.timeout = timeout;
        self
    }
}
