//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use url::ParseError as UrlError;
use wxwork_domain::WxWorkError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub WxWorkError);

impl From<InfraError> for WxWorkError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<WxWorkError> for InfraError {
    fn from(value: WxWorkError) -> Self {
        InfraError(value)
    }
}

trait IntoWxWorkError {
    fn into_wxwork(self) -> WxWorkError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → WxWorkError */
/* -------------------------------------------------------------------------- */

impl IntoWxWorkError for HttpError {
    fn into_wxwork(self) -> WxWorkError {
        if self.is_timeout() {
            return WxWorkError::Timeout;
        }

        if self.is_builder() {
            return WxWorkError::Request(self.to_string());
        }

        if let Some(status) = self.status() {
            return WxWorkError::HttpStatus { status: status.as_u16() };
        }

        if self.is_decode() {
            return WxWorkError::Parse(self.to_string());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return WxWorkError::Network(format!("connection failure: {self}"));
        }

        WxWorkError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_wxwork())
    }
}

/* -------------------------------------------------------------------------- */
/* url::ParseError → WxWorkError */
/* -------------------------------------------------------------------------- */

impl IntoWxWorkError for UrlError {
    fn into_wxwork(self) -> WxWorkError {
        WxWorkError::Request(format!("invalid url: {self}"))
    }
}

impl From<UrlError> for InfraError {
    fn from(value: UrlError) -> Self {
        InfraError(value.into_wxwork())
    }
}
