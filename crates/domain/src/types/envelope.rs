//! Response envelopes
//!
//! Every endpoint answers with `errcode`/`errmsg` next to its payload fields.
//! Each response struct flattens an [`ApiStatus`] and implements [`Envelope`]
//! so the status can be checked generically before the payload is used.

use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::{CODE_ACCESS_TOKEN_EXPIRED, STATUS_OK};

/// `errcode` / `errmsg` pair carried by every response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiStatus {
    #[serde(default)]
    pub errcode: i64,
    #[serde(default)]
    pub errmsg: String,
}

impl ApiStatus {
    pub fn is_ok(&self) -> bool {
        self.errcode == STATUS_OK
    }

    pub fn is_token_expired(&self) -> bool {
        self.errcode == CODE_ACCESS_TOKEN_EXPIRED
    }
}

/// A decoded response that carries an [`ApiStatus`]
pub trait Envelope {
    fn status(&self) -> &ApiStatus;
}

macro_rules! impl_envelope {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Envelope for $ty {
                fn status(&self) -> &ApiStatus {
                    &self.status
                }
            }
        )+
    };
}

/// `GET /gettoken`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TokenResponse {
    #[serde(flatten)]
    pub status: ApiStatus,
    #[serde(default)]
    pub access_token: String,
    /// Lifetime in seconds
    #[serde(default)]
    pub expires_in: u64,
}

/// `POST /message/send`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MessageResponse {
    #[serde(flatten)]
    pub status: ApiStatus,
    #[serde(default)]
    pub invaliduser: String,
    #[serde(default)]
    pub invalidparty: String,
    #[serde(default)]
    pub invalidtag: String,
}

/// Endpoints whose body is nothing but the status
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StatusResponse {
    #[serde(flatten)]
    pub status: ApiStatus,
}

/// `POST /appchat/create`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreateGroupResponse {
    #[serde(flatten)]
    pub status: ApiStatus,
    #[serde(default)]
    pub chatid: String,
}

/// `GET /appchat/get`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GetGroupResponse {
    #[serde(flatten)]
    pub status: ApiStatus,
    #[serde(default)]
    pub chat_info: super::group::GroupChat,
}

/// `POST /media/upload`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UploadMediaResponse {
    #[serde(flatten)]
    pub status: ApiStatus,
    #[serde(default, rename = "type")]
    pub media_type: String,
    #[serde(default)]
    pub media_id: String,
    /// Unix seconds; sent as a decimal string, unparseable values become 0
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: i64,
}

/// `POST /media/uploadimg`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UploadImageResponse {
    #[serde(flatten)]
    pub status: ApiStatus,
    #[serde(default)]
    pub url: String,
}

impl_envelope!(
    TokenResponse,
    MessageResponse,
    StatusResponse,
    CreateGroupResponse,
    GetGroupResponse,
    UploadMediaResponse,
    UploadImageResponse,
);

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
        Other(serde_json::Value),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Number(n) => n,
        Raw::Text(s) => s.trim().parse().unwrap_or(0),
        Raw::Other(_) => 0,
    })
}
