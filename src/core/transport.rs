use crate::core::ConfigProvider;
use crate::config::MAX_TIMEOUT_MS;
use crate::utils::error::{ClientError, Result, TransportError};
use crate::utils::validation::validate_range;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Shared HTTP transport: one `reqwest::Client` bound to a base URL.
///
/// Immutable after construction; cloning is cheap and shares the connection pool.
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
    base_url: Url,
}

impl Transport {
    /// Fails when either timeout is zero or above ten minutes.
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        validate_timeout("timeout_ms", config.default_timeout())?;
        validate_timeout("ask_timeout_ms", config.ask_timeout())?;

        let base_url = Url::parse(config.base_url()).map_err(|e| ClientError::ConfigError {
            message: format!("Invalid base URL '{}': {}", config.base_url(), e),
        })?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(default_headers)
            .timeout(config.default_timeout())
            .user_agent(format!("contratos-client/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::ConfigError {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        tracing::debug!(
            base_url = %base_url,
            timeout_ms = config.default_timeout().as_millis() as u64,
            "Created HTTP transport"
        );

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// GET `path` with the given query pairs and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let mut url = self.endpoint(path)?;
        if !query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
        }

        let body = self.execute(self.client.get(url)).await?;
        decode(&body)
    }

    /// POST `body` as JSON to `path`. `timeout` overrides the client default for this call.
    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        timeout: Option<Duration>,
    ) -> Result<T> {
        let url = self.endpoint(path)?;
        let mut request = self.client.post(url).json(body);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let body = self.execute(request).await?;
        decode(&body)
    }

    fn endpoint(&self, path: &str) -> std::result::Result<Url, TransportError> {
        let url = self.base_url.join(path).map_err(|e| TransportError::Setup {
            message: format!("invalid path '{}': {}", path, e),
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            scheme => Err(TransportError::Setup {
                message: format!("unsupported URL scheme: {}", scheme),
            }),
        }
    }

    async fn execute(
        &self,
        request: RequestBuilder,
    ) -> std::result::Result<Vec<u8>, TransportError> {
        let response = request.send().await.map_err(TransportError::from_reqwest)?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.map_err(TransportError::from_reqwest)?;
            return Err(TransportError::Response {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(TransportError::from_reqwest)?;
        Ok(bytes.to_vec())
    }
}

fn validate_timeout(field_name: &str, timeout: Duration) -> Result<()> {
    let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
    validate_range(field_name, millis, 1, MAX_TIMEOUT_MS)
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| ClientError::MalformedResponse {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    fn transport(base_url: &str) -> Transport {
        let config = ClientConfig {
            base_url: base_url.to_string(),
            ..ClientConfig::default()
        };
        Transport::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_joins_absolute_path() {
        let transport = transport("http://127.0.0.1:8000");
        let url = transport.endpoint("/contratos/busca").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/contratos/busca");
    }

    #[test]
    fn test_endpoint_rejects_non_http_scheme() {
        let transport = transport("file:///tmp/backend/");
        let err = transport.endpoint("/mcp/ask").unwrap_err();
        assert!(matches!(err, TransportError::Setup { .. }));
        assert!(err.to_string().contains("unsupported URL scheme: file"));
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let config = ClientConfig {
            base_url: "not a url".to_string(),
            ..ClientConfig::default()
        };
        let err = Transport::new(&config).unwrap_err();
        assert!(matches!(err, ClientError::ConfigError { .. }));
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let config = ClientConfig {
            timeout_ms: 0,
            ..ClientConfig::default()
        };
        let err = Transport::new(&config).unwrap_err();
        assert!(matches!(err, ClientError::InvalidConfigValueError { ref field, .. } if field == "timeout_ms"));

        let config = ClientConfig {
            ask_timeout_ms: 600_001,
            ..ClientConfig::default()
        };
        assert!(Transport::new(&config).is_err());
    }

    #[test]
    fn test_decode_reports_malformed_body() {
        let err = decode::<Vec<String>>(b"{\"unexpected\": true}").unwrap_err();
        assert!(matches!(err, ClientError::MalformedResponse { .. }));
    }
}
