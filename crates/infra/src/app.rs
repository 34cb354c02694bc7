//! Ready-to-use client for one WxWork application
//!
//! [`WxWorkApp`] wires config → [`HttpClient`] → [`TokenEndpoint`] →
//! `CredentialCache` → [`AuthenticatedDispatcher`] → services. It is
//! `Send + Sync`; share it behind an `Arc` across tasks.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use wxwork_common::{CredentialCache, TokenState};
use wxwork_core::{ApiDispatcher, GroupChatService, MediaService, MessageService};
use wxwork_domain::{
    CreateGroupOptions, GroupChat, MediaType, MessageContent, MessageReceipt, Recipients, Result,
    SendOptions, UpdateGroupOptions, UploadedMedia, WxWorkConfig,
};

use crate::api::{AuthenticatedDispatcher, TokenEndpoint};
use crate::config;
use crate::http::HttpClient;

type AppDispatcher = AuthenticatedDispatcher<TokenEndpoint>;

/// Client for one WxWork application: messages, group chats and media.
pub struct WxWorkApp {
    config: WxWorkConfig,
    dispatcher: Arc<AppDispatcher>,
    messages: MessageService,
    groups: GroupChatService,
    media: MediaService,
}

impl WxWorkApp {
    /// Build a client using the timeout from `config`.
    ///
    /// # Errors
    /// `Config` when validation fails, `Request` when the HTTP client or the
    /// token URL cannot be built.
    pub fn new(config: WxWorkConfig) -> Result<Self> {
        config.validate()?;
        let http = HttpClient::builder().timeout(config.timeout()).build()?;
        Self::with_http_client(config, http)
    }

    /// Build a client with an explicit per-request timeout.
    pub fn with_timeout(config: WxWorkConfig, timeout: Duration) -> Result<Self> {
        let http = HttpClient::builder().timeout(timeout).build()?;
        Self::with_http_client(config.with_timeout(timeout), http)
    }

    /// Build a client on a caller-supplied transport.
    pub fn with_http_client(config: WxWorkConfig, http: HttpClient) -> Result<Self> {
        config.validate()?;

        let endpoint = TokenEndpoint::new(http.clone(), &config)?;
        let cache = Arc::new(CredentialCache::new(endpoint));
        let dispatcher = Arc::new(AuthenticatedDispatcher::new(http, config.api_base.clone(), cache));
        let port: Arc<dyn ApiDispatcher> = dispatcher.clone();

        info!(
            corp_id = %config.corp_id,
            agent_id = %config.agent_id,
            api_base = %config.api_base,
            "wxwork client ready"
        );

        Ok(Self {
            messages: MessageService::new(Arc::clone(&port), config.agent_id.clone()),
            groups: GroupChatService::new(Arc::clone(&port)),
            media: MediaService::new(port),
            dispatcher,
            config,
        })
    }

    /// Load configuration (see [`config::load`]) and build a client.
    pub fn from_env() -> Result<Self> {
        Self::new(config::load()?)
    }

    /// Configuration the client was built with (secret included).
    pub fn config(&self) -> &WxWorkConfig {
        &self.config
    }

    pub fn messages(&self) -> &MessageService {
        &self.messages
    }

    pub fn groups(&self) -> &GroupChatService {
        &self.groups
    }

    pub fn media(&self) -> &MediaService {
        &self.media
    }

    /// See [`MessageService::send`].
    pub async fn send_message(
        &self,
        recipients: &Recipients,
        content: &MessageContent,
        options: SendOptions,
    ) -> Result<MessageReceipt> {
        self.messages.send(recipients, content, options).await
    }

    /// Plain text to the given users, default options.
    pub async fn send_text<I, S>(&self, users: I, content: impl Into<String>) -> Result<MessageReceipt>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.messages.send_text(users, content).await
    }

    /// See [`GroupChatService::send_message`].
    pub async fn send_group_message(
        &self,
        chat_id: &str,
        content: &MessageContent,
        safe: bool,
    ) -> Result<()> {
        self.groups.send_message(chat_id, content, safe).await
    }

    /// Create a group chat and return its id.
    pub async fn create_group_chat(
        &self,
        name: &str,
        owner: &str,
        users: &[String],
        options: &CreateGroupOptions,
    ) -> Result<String> {
        self.groups.create(name, owner, users, options).await
    }

    /// Rename, change owner, or add and remove members.
    pub async fn update_group_chat(&self, chat_id: &str, options: &UpdateGroupOptions) -> Result<()> {
        self.groups.update(chat_id, options).await
    }

    /// Fetch name, owner and members of a chat.
    pub async fn get_group_chat(&self, chat_id: &str) -> Result<GroupChat> {
        self.groups.get(chat_id).await
    }

    /// Upload a temporary media file (valid for three days).
    pub async fn upload_media(
        &self,
        bytes: &[u8],
        file_name: &str,
        media_type: MediaType,
    ) -> Result<UploadedMedia> {
        self.media.upload_media(bytes, file_name, media_type).await
    }

    /// Upload a permanent image and return its URL.
    pub async fn upload_image(&self, bytes: &[u8], file_name: &str) -> Result<String> {
        self.media.upload_image(bytes, file_name).await
    }

    /// Current access token, refreshing it first if needed.
    pub async fn access_token(&self) -> Result<String> {
        self.dispatcher.access_token().await
    }

    /// Cache snapshot; does not fetch a token.
    pub async fn token_state(&self) -> TokenState {
        self.dispatcher.cache().token_state().await
    }

    /// Drop the cached token; the next call fetches a new one.
    pub async fn invalidate_token(&self) {
        self.dispatcher.cache().invalidate().await;
    }
}
