use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder};
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;
use wxwork_common::{Clock, CredentialCache, SystemClock, TokenFetcher};
use wxwork_core::{ApiDispatcher, HttpMethod};
use wxwork_domain::constants::{ACCESS_TOKEN_PARAM, MEDIA_FORM_FIELD};
use wxwork_domain::{Result, WxWorkError};

use crate::errors::InfraError;
use crate::http::HttpClient;

fn to_reqwest(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
    }
}

/// [`ApiDispatcher`] over HTTP with a shared credential cache.
///
/// Every call first asks the cache for a token (refreshing it when needed),
/// then sends the request with `access_token` in the query string.
pub struct AuthenticatedDispatcher<F, C = SystemClock>
where
    F: TokenFetcher<Error = WxWorkError>,
    C: Clock,
{
    http: HttpClient,
    api_base: String,
    cache: Arc<CredentialCache<F, C>>,
}

impl<F, C> AuthenticatedDispatcher<F, C>
where
    F: TokenFetcher<Error = WxWorkError>,
    C: Clock,
{
    /// `api_base` may end with `/`; endpoint paths are appended to it.
    pub fn new(http: HttpClient, api_base: impl Into<String>, cache: Arc<CredentialCache<F, C>>) -> Self {
        let api_base = api_base.into().trim_end_matches('/').to_string();
        Self { http, api_base, cache }
    }

    /// The shared credential cache, for diagnostics and invalidation.
    pub fn cache(&self) -> &Arc<CredentialCache<F, C>> {
        &self.cache
    }

    /// Current token, refreshing first if needed.
    ///
    /// # Errors
    /// `RefreshFailed` wrapping the token endpoint's error.
    pub async fn access_token(&self) -> Result<String> {
        self.cache.ensure_token().await.map_err(WxWorkError::refresh_failed)
    }

    async fn authorized_url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        let token = self.access_token().await?;

        let mut url =
            Url::parse(&format!("{}{}", self.api_base, path)).map_err(InfraError::from)?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair(ACCESS_TOKEN_PARAM, &token);
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<Value> {
        self.http.send_for_json(builder).await
    }
}

#[async_trait]
impl<F, C> ApiDispatcher for AuthenticatedDispatcher<F, C>
where
    F: TokenFetcher<Error = WxWorkError>,
    C: Clock,
{
    #[instrument(skip(self, query, body), fields(%method))]
    async fn send_json(
        &self,
        method: HttpMethod,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value> {
        let url = self.authorized_url(path, query).await?;
        let mut builder =
            self.http.request(to_reqwest(method), url).header(CONTENT_TYPE, "application/json");

        if let Some(body) = body {
            let bytes = serde_json::to_vec(body)
                .map_err(|err| WxWorkError::Request(format!("encode body: {err}")))?;
            debug!(bytes = bytes.len(), "attaching JSON body");
            builder = builder.body(bytes);
        }

        self.execute(builder).await
    }

    #[instrument(skip(self, query, file_bytes), fields(%method, size = file_bytes.len()))]
    async fn send_multipart(
        &self,
        method: HttpMethod,
        path: &str,
        query: &[(&str, &str)],
        file_bytes: &[u8],
        file_name: &str,
    ) -> Result<Value> {
        let url = self.authorized_url(path, query).await?;

        let part = Part::bytes(file_bytes.to_vec())
            .file_name(file_name.to_string())
            .mime_str("application/octet-stream")
            .map_err(|err| WxWorkError::from(InfraError::from(err)))?;
        let form = Form::new().part(MEDIA_FORM_FIELD, part);

        self.execute(self.http.request(to_reqwest(method), url).multipart(form)).await
    }

    async fn invalidate_token(&self) {
        self.cache.invalidate().await;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};
    use wxwork_common::IssuedToken;

    use super::*;

    struct FixedToken;

    #[async_trait]
    impl TokenFetcher for FixedToken {
        type Error = WxWorkError;

        async fn fetch_token(&self) -> Result<IssuedToken> {
            Ok(IssuedToken::new("T", Duration::from_secs(7200)))
        }
    }

    struct Refused;

    #[async_trait]
    impl TokenFetcher for Refused {
        type Error = WxWorkError;

        async fn fetch_token(&self) -> Result<IssuedToken> {
            Err(WxWorkError::from_api_code("token", 40001, "invalid credential"))
        }
    }

    fn dispatcher<F: TokenFetcher<Error = WxWorkError>>(
        server: &MockServer,
        fetcher: F,
    ) -> AuthenticatedDispatcher<F> {
        AuthenticatedDispatcher::new(
            HttpClient::new().unwrap(),
            format!("{}/", server.uri()),
            Arc::new(CredentialCache::new(fetcher)),
        )
    }

    #[tokio::test]
    async fn token_and_extra_query_are_attached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/appchat/get"))
            .and(query_param("access_token", "T"))
            .and(query_param("chatid", "C1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"errcode": 0})))
            .expect(1)
            .mount(&server)
            .await;

        let value = dispatcher(&server, FixedToken)
            .send_json(HttpMethod::Get, "/appchat/get", &[("chatid", "C1")], None)
            .await
            .unwrap();

        assert_eq!(value, serde_json::json!({"errcode": 0}));
    }

    #[tokio::test]
    async fn json_body_is_posted_with_content_type() {
        let server = MockServer::start().await;
        let body = serde_json::json!({"chatid": "C1", "msgtype": "text", "text": {"content": "hi"}});
        Mock::given(method("POST"))
            .and(path("/appchat/send"))
            .and(header("content-type", "application/json"))
            .and(body_json(&body))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"errcode": 0})))
            .expect(1)
            .mount(&server)
            .await;

        dispatcher(&server, FixedToken)
            .send_json(HttpMethod::Post, "/appchat/send", &[], Some(&body))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn refresh_failure_is_wrapped_and_nothing_is_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = dispatcher(&server, Refused)
            .send_json(HttpMethod::Post, "/message/send", &[], Some(&serde_json::json!({})))
            .await
            .unwrap_err();

        assert!(matches!(err, WxWorkError::RefreshFailed(_)));
        assert_eq!(err.api_code(), Some(40001));
    }

    #[tokio::test]
    async fn invalidate_clears_cached_token() {
        let server = MockServer::start().await;
        let dispatcher = dispatcher(&server, FixedToken);

        dispatcher.access_token().await.unwrap();
        assert!(dispatcher.cache().token_state().await.has_token);

        dispatcher.invalidate_token().await;
        assert!(!dispatcher.cache().token_state().await.has_token);
    }
}
