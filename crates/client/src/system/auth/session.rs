use std::time::Duration;

use reqwest::{Client, RequestBuilder};

use crate::gateway::{GatewayError, GatewayResult};
use crate::shared::api_utils::{api_url, image_url};
use crate::shared::config::ApiConfig;

/// Сессия администратора: адрес API, токен и общий HTTP-клиент
///
/// Создаётся при запуске и передаётся шлюзам явно; выход из системы
/// означает удаление токена и новую сессию без него.
#[derive(Debug, Clone)]
pub struct Session {
    api: ApiConfig,
    token: Option<String>,
    http: Client,
}

impl Session {
    pub fn new(api: ApiConfig, token: Option<String>) -> GatewayResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(api.timeout_secs))
            .gzip(true)
            .build()
            .map_err(|e| GatewayError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api,
            token: token.filter(|t| !t.trim().is_empty()),
            http,
        })
    }

    /// Та же сессия с новым токеном (после входа)
    pub fn with_token(&self, token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            api: self.api.clone(),
            token: (!token.trim().is_empty()).then_some(token),
            http: self.http.clone(),
        }
    }

    pub fn api(&self) -> &ApiConfig {
        &self.api
    }

    pub fn http(&self) -> &Client {
        &self.http
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn url(&self, path: &str) -> String {
        api_url(&self.api.base_url, path)
    }

    pub fn image_url(&self, path: &str) -> String {
        image_url(&self.api.image_base_url, path)
    }

    /// Приложить bearer-токен; без токена запрос не отправляется
    pub fn authorize(&self, request: RequestBuilder) -> GatewayResult<RequestBuilder> {
        match &self.token {
            Some(token) => Ok(request.bearer_auth(token)),
            None => Err(GatewayError::Unauthorized(
                "Not logged in, run `catalog-admin login` first".to_string(),
            )),
        }
    }
}
