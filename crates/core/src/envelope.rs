//! Response envelope checks
//!
//! Every operation decodes the dispatcher's JSON into its response type and
//! then looks at `errcode`. The token-expired code clears the cached token
//! before the error is returned, so the next call starts with a refresh. The
//! current call is not retried.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;
use wxwork_domain::{Envelope, Result, WxWorkError};

use crate::ports::ApiDispatcher;

/// Serialize a request body for [`ApiDispatcher::send_json`].
pub fn encode_body<T: Serialize + ?Sized>(body: &T) -> Result<Value> {
    serde_json::to_value(body).map_err(|e| WxWorkError::Request(e.to_string()))
}

/// Decode a response body into its typed envelope.
pub fn decode<R: DeserializeOwned>(value: Value) -> Result<R> {
    serde_json::from_value(value).map_err(|e| WxWorkError::Parse(e.to_string()))
}

/// Decode `value` and reject non-zero `errcode`s.
///
/// `api` names the operation in the error message.
pub async fn decode_checked<R>(dispatcher: &dyn ApiDispatcher, api: &'static str, value: Value) -> Result<R>
where
    R: DeserializeOwned + Envelope,
{
    let resp: R = decode(value)?;
    check_status(dispatcher, api, &resp).await?;
    Ok(resp)
}

async fn check_status<R: Envelope>(
    dispatcher: &dyn ApiDispatcher,
    api: &'static str,
    resp: &R,
) -> Result<()> {
    let status = resp.status();
    if status.is_ok() {
        return Ok(());
    }

    if status.is_token_expired() {
        dispatcher.invalidate_token().await;
        warn!(api, errmsg = %status.errmsg, "access token rejected as expired, cleared cache");
    } else {
        warn!(api, errcode = status.errcode, errmsg = %status.errmsg, "api call rejected");
    }
    Err(WxWorkError::from_api_code(api, status.errcode, status.errmsg.clone()))
}
