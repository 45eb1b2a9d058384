//! Shared utilities for talking to Ethereum JSON-RPC endpoints.

use std::time::{Duration, Instant};

use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;

use crate::chain::ClientError;

/// Create an HTTP client configured for JSON-RPC requests.
pub fn create_client(timeout: Duration) -> Result<reqwest::Client, ClientError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ClientError::Transport(format!("failed to create HTTP client: {}", e)))
}

/// Error object of a JSON-RPC response.
#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

/// Make a JSON-RPC call and deserialize the result.
///
/// Error objects returned by the node surface as [`ClientError::Rpc`] so that
/// callers can tell an execution revert apart from a transport failure.
pub async fn json_rpc_call<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    method: &str,
    params: Vec<Value>,
) -> Result<T, ClientError> {
    let response = client
        .post(url)
        .json(&serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1
        }))
        .send()
        .await
        .map_err(|e| ClientError::Transport(format!("failed to send {} request: {}", method, e)))?;

    let mut result: Value = response.json().await.map_err(|e| ClientError::Decode {
        method: method.to_string(),
        reason: e.to_string(),
    })?;

    if let Some(error) = result.get("error") {
        let error: RpcErrorObject =
            serde_json::from_value(error.clone()).unwrap_or(RpcErrorObject {
                code: 0,
                message: "unknown".to_string(),
            });
        return Err(ClientError::Rpc {
            code: error.code,
            message: error.message,
        });
    }

    let result_value = result
        .get_mut("result")
        .map(Value::take)
        .ok_or_else(|| ClientError::Decode {
            method: method.to_string(),
            reason: "no result in response".to_string(),
        })?;

    serde_json::from_value(result_value).map_err(|e| ClientError::Decode {
        method: method.to_string(),
        reason: e.to_string(),
    })
}

/// Parse a hex quantity (`0x`-prefixed) into a u64.
pub fn parse_quantity(method: &str, value: &str) -> Result<u64, ClientError> {
    u64::from_str_radix(value.trim_start_matches("0x"), 16).map_err(|e| ClientError::Decode {
        method: method.to_string(),
        reason: format!("invalid quantity {:?}: {}", value, e),
    })
}

/// Poll `check_fn` until it yields a value.
///
/// Transport errors are treated as transient and retried; any other error
/// is returned immediately.
pub async fn wait_until<T, F, Fut>(
    what: &str,
    timeout: Duration,
    poll_interval: Duration,
    check_fn: F,
) -> Result<T, ClientError>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<Option<T>, ClientError>>,
{
    let start = Instant::now();

    loop {
        match check_fn().await {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => {
                tracing::trace!(what = %what, "Not available yet, retrying...");
            }
            Err(ClientError::Transport(e)) => {
                tracing::trace!(error = %e, what = %what, "Poll failed, retrying...");
            }
            Err(e) => return Err(e),
        }

        if start.elapsed() > timeout {
            return Err(ClientError::Timeout {
                what: what.to_string(),
                secs: timeout.as_secs(),
            });
        }

        tokio::time::sleep(poll_interval).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("eth_chainId", "0x539").ok(), Some(1337));
        assert_eq!(parse_quantity("eth_chainId", "0x0").ok(), Some(0));
        assert!(parse_quantity("eth_chainId", "0xzz").is_err());
    }

    #[tokio::test]
    async fn test_wait_until_retries_transport_errors() {
        let attempts = AtomicUsize::new(0);

        let value = wait_until("value", Duration::from_secs(5), Duration::from_millis(1), || {
            let attempt = attempts.fetch_add(1, Ordering::SeqCst);
            async move {
                match attempt {
                    0 => Err(ClientError::Transport("connection reset".to_string())),
                    1 => Ok(None),
                    _ => Ok(Some(42u64)),
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(value, 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_wait_until_times_out() {
        let result: Result<u64, _> =
            wait_until("receipt", Duration::ZERO, Duration::from_millis(1), || async {
                Ok(None)
            })
            .await;

        assert!(matches!(result, Err(ClientError::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_wait_until_stops_on_rpc_error() {
        let result: Result<u64, _> =
            wait_until("receipt", Duration::from_secs(5), Duration::from_millis(1), || async {
                Err(ClientError::Rpc {
                    code: -32601,
                    message: "method not found".to_string(),
                })
            })
            .await;

        assert!(matches!(result, Err(ClientError::Rpc { code: -32601, .. })));
    }
}
