//! HTTP client adapter for the banking backend.

use async_trait::async_trait;
use dompet_core::{Cif, DateRange};
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::net::IpAddr;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::wire::{
    Credentials, LoginResponse, LogoutResponse, RecommendationDetail, TransactionDetail,
    UserEnvelope,
};

pub const USER_ENDPOINT: &str = "/user";
pub const TRANSACTION_ENDPOINT: &str = "/detailTransaction";
pub const RECOMMENDATION_ENDPOINT: &str = "/detailRecommendation";
pub const LOGIN_ENDPOINT: &str = "/login";
pub const LOGOUT_ENDPOINT: &str = "/logout";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// The backend contract. Implemented over HTTP by [`HttpBankApi`]; tests swap
/// in fakes.
#[async_trait]
pub trait BankApi: Send + Sync {
    async fn user(&self, cif: &Cif) -> Result<UserEnvelope, FetchError>;

    async fn detail_transaction(
        &self,
        cif: &Cif,
        range: &DateRange,
    ) -> Result<TransactionDetail, FetchError>;

    async fn detail_recommendation(
        &self,
        cif: &Cif,
        range: &DateRange,
    ) -> Result<RecommendationDetail, FetchError>;

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, FetchError>;

    async fn logout(&self) -> Result<LogoutResponse, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Plain http to anything but loopback sends credentials in clear
    pub fn is_insecure(&self) -> bool {
        let Ok(url) = Url::parse(&self.base_url) else {
            return false;
        };
        if url.scheme() != "http" {
            return false;
        }
        let host = url.host_str().unwrap_or("");
        if host == "localhost" {
            return false;
        }
        match host.trim_start_matches('[').trim_end_matches(']').parse::<IpAddr>() {
            Ok(ip) => !ip.is_loopback(),
            Err(_) => true,
        }
    }
}

/// reqwest-backed [`BankApi`]
#[derive(Debug, Clone)]
pub struct HttpBankApi {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpBankApi {
    pub fn new(config: ApiConfig) -> Result<Self, FetchError> {
        if config.is_insecure() {
            warn!(
                base_url = %config.base_url,
                "backend uses plain http; credentials will be sent unencrypted"
            );
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FetchError::Network {
                endpoint: "client",
                message: e.to_string(),
            })?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        debug!(endpoint, "GET");
        let resp = self
            .client
            .get(self.url(endpoint))
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .query(query)
            .send()
            .await
            .map_err(|e| self.classify(endpoint, e))?;
        self.read_json(endpoint, resp).await
    }

    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        body: Option<&B>,
    ) -> Result<T, FetchError> {
        debug!(endpoint, "POST");
        let mut req = self
            .client
            .post(self.url(endpoint))
            .header(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().await.map_err(|e| self.classify(endpoint, e))?;
        self.read_json(endpoint, resp).await
    }

    async fn read_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        resp: reqwest::Response,
    ) -> Result<T, FetchError> {
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }
        let bytes = resp.bytes().await.map_err(|e| self.classify(endpoint, e))?;
        serde_json::from_slice(&bytes).map_err(|e| FetchError::Malformed {
            endpoint,
            reason: e.to_string(),
        })
    }

    fn classify(&self, endpoint: &'static str, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            FetchError::Timeout {
                endpoint,
                after: self.timeout,
            }
        } else {
            FetchError::Network {
                endpoint,
                message: err.to_string(),
            }
        }
    }
}

fn period_query(cif: &Cif, range: &DateRange) -> [(&'static str, String); 3] {
    [
        ("cif", cif.to_string()),
        ("start_date", range.start_param()),
        ("end_date", range.end_param()),
    ]
}

#[async_trait]
impl BankApi for HttpBankApi {
    async fn user(&self, cif: &Cif) -> Result<UserEnvelope, FetchError> {
        self.get_json(USER_ENDPOINT, &[("cif", cif.to_string())])
            .await
    }

    async fn detail_transaction(
        &self,
        cif: &Cif,
        range: &DateRange,
    ) -> Result<TransactionDetail, FetchError> {
        self.get_json(TRANSACTION_ENDPOINT, &period_query(cif, range))
            .await
    }

    async fn detail_recommendation(
        &self,
        cif: &Cif,
        range: &DateRange,
    ) -> Result<RecommendationDetail, FetchError> {
        self.get_json(RECOMMENDATION_ENDPOINT, &period_query(cif, range))
            .await
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, FetchError> {
        self.post_json(LOGIN_ENDPOINT, Some(credentials)).await
    }

    async fn logout(&self) -> Result<LogoutResponse, FetchError> {
        self.post_json::<(), _>(LOGOUT_ENDPOINT, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insecure_detection() {
        assert!(ApiConfig::new("http://10.63.110.70:5000").is_insecure());
        assert!(!ApiConfig::new("http://127.0.0.1:5000").is_insecure());
        assert!(!ApiConfig::new("http://localhost:5000/").is_insecure());
        assert!(!ApiConfig::new("https://bank.example.com").is_insecure());
    }

    #[test]
    fn test_insecure_detection_parses_host() {
        assert!(!ApiConfig::new("http://[::1]:5000").is_insecure());
        assert!(!ApiConfig::new("http://LOCALHOST:5000").is_insecure());
        assert!(!ApiConfig::new("http://127.0.0.2:5000").is_insecure());
        assert!(ApiConfig::new("HTTP://bank.example.com").is_insecure());
        assert!(ApiConfig::new("http://[2001:db8::1]:5000").is_insecure());
        assert!(ApiConfig::new("http://localhost.evil.example").is_insecure());
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let api = HttpBankApi::new(ApiConfig::new("http://localhost:5000/")).unwrap();
        assert_eq!(api.url(USER_ENDPOINT), "http://localhost:5000/user");
    }
}
