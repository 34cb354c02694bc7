//! App message delivery (`message/send`)
//!
//! See https://work.weixin.qq.com/api/doc/90000/90135/90236

use std::sync::Arc;

use tracing::debug;
use wxwork_domain::constants::MESSAGE_SEND_PATH;
use wxwork_domain::{
    AppMessage, MessageContent, MessageReceipt, MessageResponse, Recipients, Result, SendOptions,
    WxWorkError,
};

use crate::envelope::{decode_checked, encode_body};
use crate::ports::{ApiDispatcher, HttpMethod};

/// Sends messages on behalf of one application
pub struct MessageService {
    dispatcher: Arc<dyn ApiDispatcher>,
    agent_id: String,
}

impl MessageService {
    /// Messages are sent as application `agent_id`.
    pub fn new(dispatcher: Arc<dyn ApiDispatcher>, agent_id: impl Into<String>) -> Self {
        Self { dispatcher, agent_id: agent_id.into() }
    }

    pub fn agent_id(&self) -> &str {
        &self.agent_id
    }

    /// Deliver `content` to `recipients`.
    ///
    /// Recipients the platform could not resolve are listed in the returned
    /// receipt; the call still succeeds.
    ///
    /// # Errors
    /// - `InvalidInput` when no recipient is given
    /// - `TokenExpired` when the platform rejected the token (the cache is
    ///   cleared first)
    /// - `Api` for any other non-zero `errcode`
    /// - transport and parse errors from the dispatcher
    pub async fn send(
        &self,
        recipients: &Recipients,
        content: &MessageContent,
        options: SendOptions,
    ) -> Result<MessageReceipt> {
        if recipients.is_empty() {
            return Err(WxWorkError::InvalidInput("message needs at least one recipient".into()));
        }

        let message = AppMessage::new(&self.agent_id, recipients, content, options);
        let body = encode_body(&message)?;
        debug!(msgtype = %content.kind(), users = recipients.users.len(), "sending app message");

        let value =
            self.dispatcher.send_json(HttpMethod::Post, MESSAGE_SEND_PATH, &[], Some(&body)).await?;
        let resp: MessageResponse = decode_checked(self.dispatcher.as_ref(), "message", value).await?;
        Ok(resp.into())
    }

    /// Plain text to the given users, no options.
    pub async fn send_text<I, S>(&self, users: I, content: impl Into<String>) -> Result<MessageReceipt>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.send(&Recipients::users(users), &MessageContent::text(content), SendOptions::default())
            .await
    }

    /// Markdown to the given users, no options.
    pub async fn send_markdown<I, S>(
        &self,
        users: I,
        content: impl Into<String>,
    ) -> Result<MessageReceipt>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.send(&Recipients::users(users), &MessageContent::markdown(content), SendOptions::default())
            .await
    }
}
