//! CurrencyScoop historical rates client.

use std::time::Duration;

use chrono::NaiveDate;
use serde_json::Value;
use tracing::debug;

use super::{RateProvider, Result};
use crate::error::RateLookupError;
use crate::models::config::ForexConfig;

/// HTTP client for the CurrencyScoop `historical` endpoint.
pub struct CurrencyScoop {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl CurrencyScoop {
    /// Build a client from the forex configuration.
    ///
    /// `api_key` overrides the key stored in the configuration.
    pub fn new(config: &ForexConfig, api_key: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("invex/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RateLookupError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.or_else(|| config.api_key.clone()),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/historical", self.base_url)
    }
}

impl RateProvider for CurrencyScoop {
    async fn rate(&self, base: &str, dest: &str, date: NaiveDate) -> Result<f64> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(RateLookupError::MissingApiKey)?;
        let date = date.format("%Y-%m-%d").to_string();

        debug!("Fetching {}/{} rate for {}", base, dest, date);

        let map_err = |e: reqwest::Error| {
            if e.is_timeout() {
                RateLookupError::Timeout {
                    base: base.to_string(),
                    dest: dest.to_string(),
                }
            } else {
                RateLookupError::Network(e.to_string())
            }
        };

        let resp = self
            .client
            .get(self.endpoint())
            .query(&[
                ("date", date.as_str()),
                ("base", base),
                ("symbols", dest),
                ("api_key", api_key),
            ])
            .send()
            .await
            .map_err(map_err)?;

        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(map_err)?;

        parse_rate_response(status, &body, base, dest, &date)
    }
}

/// Extract the `dest` rate from a CurrencyScoop reply.
///
/// The body looks like
/// `{"meta":{"code":200},"response":{"base":"USD","rates":{"CZK":23.5}}}`.
/// Integer rates such as `25` come back as `25.0`; the file shows them as `25,0`.
pub fn parse_rate_response(
    status: u16,
    body: &str,
    base: &str,
    dest: &str,
    date: &str,
) -> Result<f64> {
    if !(200..300).contains(&status) {
        return Err(RateLookupError::Status { status });
    }

    let json: Value =
        serde_json::from_str(body).map_err(|e| RateLookupError::Malformed(e.to_string()))?;

    if let Some(code) = json.pointer("/meta/code").and_then(Value::as_u64) {
        if !(200..300).contains(&code) {
            return Err(RateLookupError::Status {
                status: u16::try_from(code).unwrap_or(u16::MAX),
            });
        }
    }

    json.get("response")
        .and_then(|r| r.get("rates"))
        .and_then(|r| r.get(dest))
        .and_then(Value::as_f64)
        .ok_or_else(|| RateLookupError::MissingRate {
            base: base.to_string(),
            dest: dest.to_string(),
            date: date.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    const OK_BODY: &str = r#"{"meta":{"code":200,"disclaimer":"Usage subject to terms"},"response":{"date":"2023-01-15T18:23:41Z","base":"USD","rates":{"CZK":23.5}}}"#;

    #[test]
    fn test_parse_rate() {
        let rate = parse_rate_response(200, OK_BODY, "USD", "CZK", "2023-01-15").unwrap();
        assert_eq!(rate, 23.5);
    }

    #[test]
    fn test_integer_rate() {
        let body = r#"{"meta":{"code":200},"response":{"base":"EUR","rates":{"CZK":25}}}"#;
        let rate = parse_rate_response(200, body, "EUR", "CZK", "2023-01-15").unwrap();
        assert_eq!(rate, 25.0);
    }

    #[test]
    fn test_rate_limited() {
        let err = parse_rate_response(429, "Too Many Requests", "USD", "CZK", "2023-01-15")
            .unwrap_err();
        assert!(matches!(err, RateLookupError::Status { status: 429 }));
    }

    #[test]
    fn test_missing_destination() {
        let body = r#"{"meta":{"code":200},"response":{"base":"USD","rates":{"EUR":0.93}}}"#;
        let err = parse_rate_response(200, body, "USD", "CZK", "2023-01-15").unwrap_err();
        assert!(matches!(err, RateLookupError::MissingRate { ref dest, .. } if dest == "CZK"));
    }

    #[test]
    fn test_error_code_in_body() {
        let body = r#"{"meta":{"code":401,"error_type":"auth failed"},"response":[]}"#;
        let err = parse_rate_response(200, body, "USD", "CZK", "2023-01-15").unwrap_err();
        assert!(matches!(err, RateLookupError::Status { status: 401 }));
    }

    #[test]
    fn test_not_json() {
        let err = parse_rate_response(200, "<html>", "USD", "CZK", "2023-01-15").unwrap_err();
        assert!(matches!(err, RateLookupError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_request() {
        let config = ForexConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            api_key: None,
            ..ForexConfig::default()
        };
        let client = CurrencyScoop::new(&config, None).unwrap();
        let date = NaiveDate::from_ymd_opt(2023, 1, 15).unwrap();

        let err = client.rate("USD", "CZK", date).await.unwrap_err();
        assert!(matches!(err, RateLookupError::MissingApiKey));
    }

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
    }

    /// Accept one connection on a local port and answer it with `response`,
    /// or never answer when `response` is `None`. Yields the base URL and
    /// a handle resolving to the raw request head.
    async fn serve_once(response: Option<String>) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}/v1", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            match response {
                Some(response) => {
                    socket.write_all(response.as_bytes()).await.unwrap();
                    let _ = socket.shutdown().await;
                }
                None => tokio::time::sleep(Duration::from_secs(5)).await,
            }

            String::from_utf8_lossy(&request).into_owned()
        });

        (base_url, handle)
    }

    fn client(base_url: String, timeout_secs: u64) -> CurrencyScoop {
        let config = ForexConfig {
            base_url,
            api_key: Some("k".to_string()),
            timeout_secs,
            ..ForexConfig::default()
        };
        CurrencyScoop::new(&config, None).unwrap()
    }

    fn jan_15() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, 15).unwrap()
    }

    #[tokio::test]
    async fn test_rate_over_http() {
        let (base_url, server) = serve_once(Some(http_response("200 OK", OK_BODY))).await;

        let rate = client(base_url, 5).rate("USD", "CZK", jan_15()).await.unwrap();
        assert_eq!(rate, 23.5);

        let request = server.await.unwrap();
        let request_line = request.lines().next().unwrap();
        assert_eq!(
            request_line,
            "GET /v1/historical?date=2023-01-15&base=USD&symbols=CZK&api_key=k HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn test_http_429() {
        let (base_url, server) =
            serve_once(Some(http_response("429 Too Many Requests", "{}"))).await;

        let err = client(base_url, 5).rate("USD", "CZK", jan_15()).await.unwrap_err();
        assert!(matches!(err, RateLookupError::Status { status: 429 }));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_stalled_reply_times_out() {
        let (base_url, _server) = serve_once(None).await;

        let err = client(base_url, 1).rate("USD", "CZK", jan_15()).await.unwrap_err();
        assert!(
            matches!(err, RateLookupError::Timeout { ref base, ref dest } if base == "USD" && dest == "CZK"),
            "{:?}",
            err
        );
    }
}
