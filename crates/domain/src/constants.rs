//! API constants
//!
//! Endpoint paths are relative to [`DEFAULT_API_BASE`] (or the base URL the
//! client was configured with).

pub const DEFAULT_API_BASE: &str = "https://qyapi.weixin.qq.com/cgi-bin";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

// Endpoints
pub const TOKEN_PATH: &str = "/gettoken";
pub const MESSAGE_SEND_PATH: &str = "/message/send";
pub const GROUP_MESSAGE_SEND_PATH: &str = "/appchat/send";
pub const GROUP_CREATE_PATH: &str = "/appchat/create";
pub const GROUP_UPDATE_PATH: &str = "/appchat/update";
pub const GROUP_GET_PATH: &str = "/appchat/get";
pub const UPLOAD_MEDIA_PATH: &str = "/media/upload";
pub const UPLOAD_IMAGE_PATH: &str = "/media/uploadimg";

// Envelope codes
pub const STATUS_OK: i64 = 0;
/// See https://work.weixin.qq.com/api/doc/90000/90139/90313
pub const CODE_ACCESS_TOKEN_EXPIRED: i64 = 42001;

// Query parameters and form fields fixed by the remote contract
pub const ACCESS_TOKEN_PARAM: &str = "access_token";
pub const CORP_ID_PARAM: &str = "corpid";
pub const CORP_SECRET_PARAM: &str = "corpsecret";
pub const CHAT_ID_PARAM: &str = "chatid";
pub const MEDIA_TYPE_PARAM: &str = "type";
pub const MEDIA_FORM_FIELD: &str = "media";

/// Joins user/party/tag id lists in message recipients
pub const RECIPIENT_SEPARATOR: &str = "|";
