//! Minimal JSON-RPC client for `eth_sendRawTransaction`.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Error;

#[derive(Serialize)]
struct Request<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'static str,
    params: [&'a str; 1],
}

#[derive(Deserialize)]
struct Response {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

/// Post a signed transaction to `endpoint` and return its hash.
pub(super) async fn send_raw_transaction(
    http: &reqwest::Client,
    endpoint: &Url,
    raw_tx: &[u8],
) -> Result<String, Error> {
    let encoded = format!("0x{}", hex::encode(raw_tx));
    let request = Request {
        jsonrpc: "2.0",
        id: 1,
        method: "eth_sendRawTransaction",
        params: [encoded.as_str()],
    };

    let response = http
        .post(endpoint.clone())
        .json(&request)
        .send()
        .await
        .map_err(|e| Error::transport_with(format!("POST {endpoint}"), e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::Transport(format!(
            "{endpoint} responded with status {}",
            status.as_u16()
        )));
    }

    let body: Response = response
        .json()
        .await
        .map_err(|e| Error::transport_with(format!("invalid response from {endpoint}"), e))?;

    match body {
        Response {
            error: Some(error), ..
        } => Err(Error::Transport(format!(
            "{endpoint} rejected transaction ({}): {}",
            error.code, error.message
        ))),
        Response {
            result: Some(hash), ..
        } => Ok(hash),
        Response { .. } => Err(Error::Transport(format!(
            "{endpoint} returned neither result nor error"
        ))),
    }
}
