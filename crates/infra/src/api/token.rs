//! Access token endpoint (`GET /gettoken`)
//!
//! See https://work.weixin.qq.com/api/doc/90000/90135/91039

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use tracing::{debug, instrument};
use url::Url;
use wxwork_common::{IssuedToken, TokenFetcher};
use wxwork_core::envelope::decode;
use wxwork_domain::constants::{CORP_ID_PARAM, CORP_SECRET_PARAM, TOKEN_PATH};
use wxwork_domain::{Credentials, Envelope, Result, TokenResponse, WxWorkConfig, WxWorkError};

use crate::errors::InfraError;
use crate::http::HttpClient;

/// Fetches access tokens for one set of credentials
pub struct TokenEndpoint {
    http: HttpClient,
    url: Url,
    credentials: Credentials,
}

impl TokenEndpoint {
    /// # Errors
    /// `Request` when the configured API base is not a valid URL.
    pub fn new(http: HttpClient, config: &WxWorkConfig) -> Result<Self> {
        let url = Url::parse(&config.endpoint(TOKEN_PATH)).map_err(InfraError::from)?;
        Ok(Self { http, url, credentials: config.credentials() })
    }

    pub fn corp_id(&self) -> &str {
        &self.credentials.corp_id
    }

    fn request_url(&self) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut()
            .append_pair(CORP_ID_PARAM, &self.credentials.corp_id)
            .append_pair(CORP_SECRET_PARAM, &self.credentials.corp_secret);
        url
    }
}

#[async_trait]
impl TokenFetcher for TokenEndpoint {
    type Error = WxWorkError;

    #[instrument(skip(self), fields(corp_id = %self.credentials.corp_id))]
    async fn fetch_token(&self) -> Result<IssuedToken> {
        let value = self.http.send_for_json(self.http.request(Method::GET, self.request_url())).await?;
        let resp: TokenResponse = decode(value)?;

        let status = resp.status();
        if !status.is_ok() {
            return Err(WxWorkError::from_api_code("token", status.errcode, status.errmsg.clone()));
        }
        if resp.access_token.is_empty() {
            return Err(WxWorkError::Parse("token response has no access_token".into()));
        }

        debug!(expires_in = resp.expires_in, "token endpoint issued access token");
        Ok(IssuedToken::new(resp.access_token, Duration::from_secs(resp.expires_in)))
    }
}
