//! Group chats (`appchat/*`)
//!
//! See https://work.weixin.qq.com/api/doc/90000/90135/90244

use std::sync::Arc;

use tracing::{debug, info};
use wxwork_domain::constants::{
    CHAT_ID_PARAM, GROUP_CREATE_PATH, GROUP_GET_PATH, GROUP_MESSAGE_SEND_PATH, GROUP_UPDATE_PATH,
};
use wxwork_domain::{
    CreateGroupOptions, CreateGroupRequest, CreateGroupResponse, GetGroupResponse, GroupChat,
    GroupMessage, MessageContent, Result, StatusResponse, UpdateGroupOptions, UpdateGroupRequest,
    WxWorkError,
};

use crate::envelope::{decode_checked, encode_body};
use crate::ports::{ApiDispatcher, HttpMethod};

/// Group chat management and group messages
pub struct GroupChatService {
    dispatcher: Arc<dyn ApiDispatcher>,
}

fn require_chat_id(chat_id: &str) -> Result<()> {
    if chat_id.trim().is_empty() {
        return Err(WxWorkError::InvalidInput("chat id must not be empty".into()));
    }
    Ok(())
}

impl GroupChatService {
    pub fn new(dispatcher: Arc<dyn ApiDispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Create a group chat and return its id.
    ///
    /// When `options.chat_id` is set the platform uses it, otherwise it
    /// generates one.
    pub async fn create(
        &self,
        name: &str,
        owner: &str,
        users: &[String],
        options: &CreateGroupOptions,
    ) -> Result<String> {
        let body = encode_body(&CreateGroupRequest::new(name, owner, users, options))?;
        let value =
            self.dispatcher.send_json(HttpMethod::Post, GROUP_CREATE_PATH, &[], Some(&body)).await?;
        let resp: CreateGroupResponse =
            decode_checked(self.dispatcher.as_ref(), "create group", value).await?;

        info!(chat_id = %resp.chatid, members = users.len(), "group chat created");
        Ok(resp.chatid)
    }

    /// Apply `options` to an existing chat. Unset fields are not sent.
    pub async fn update(&self, chat_id: &str, options: &UpdateGroupOptions) -> Result<()> {
        require_chat_id(chat_id)?;
        let body = encode_body(&UpdateGroupRequest::new(chat_id, options))?;
        let value =
            self.dispatcher.send_json(HttpMethod::Post, GROUP_UPDATE_PATH, &[], Some(&body)).await?;
        decode_checked::<StatusResponse>(self.dispatcher.as_ref(), "update group", value).await?;

        debug!(chat_id, "group chat updated");
        Ok(())
    }

    /// Fetch a chat's name, owner and member list.
    pub async fn get(&self, chat_id: &str) -> Result<GroupChat> {
        require_chat_id(chat_id)?;
        let value = self
            .dispatcher
            .send_json(HttpMethod::Get, GROUP_GET_PATH, &[(CHAT_ID_PARAM, chat_id)], None)
            .await?;
        let resp: GetGroupResponse = decode_checked(self.dispatcher.as_ref(), "get group", value).await?;
        Ok(resp.chat_info)
    }

    /// Post `content` into a group chat.
    ///
    /// Only the `safe` flag applies to group messages.
    ///
    /// # Errors
    /// `InvalidInput` for message kinds group chats do not accept
    /// (mini program notices, task cards); nothing is sent in that case.
    pub async fn send_message(&self, chat_id: &str, content: &MessageContent, safe: bool) -> Result<()> {
        require_chat_id(chat_id)?;
        if !content.is_group_compatible() {
            return Err(WxWorkError::InvalidInput(format!(
                "{} messages cannot be sent to a group chat",
                content.kind()
            )));
        }

        let body = encode_body(&GroupMessage { chatid: chat_id, content, safe })?;
        debug!(chat_id, msgtype = %content.kind(), "sending group message");
        let value = self
            .dispatcher
            .send_json(HttpMethod::Post, GROUP_MESSAGE_SEND_PATH, &[], Some(&body))
            .await?;
        decode_checked::<StatusResponse>(self.dispatcher.as_ref(), "group message", value).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wxwork_domain::{TaskCardBody, TaskCardButton};

    use super::*;
    use crate::services::test_support::{RecordedBody, ScriptedDispatcher};

    fn service(dispatcher: &Arc<ScriptedDispatcher>) -> GroupChatService {
        GroupChatService::new(Arc::clone(dispatcher) as Arc<dyn ApiDispatcher>)
    }

    #[tokio::test]
    async fn create_returns_new_chat_id() {
        let dispatcher =
            Arc::new(ScriptedDispatcher::replying([Ok(json!({"errcode": 0, "chatid": "CHAT42"}))]));
        let users = vec!["a".to_string(), "b".to_string()];

        let chat_id = service(&dispatcher)
            .create("ops", "a", &users, &CreateGroupOptions { chat_id: Some("CHAT42".into()) })
            .await
            .unwrap();

        assert_eq!(chat_id, "CHAT42");
        let call = &dispatcher.calls()[0];
        assert_eq!(call.path, "/appchat/create");
        assert_eq!(
            call.body,
            RecordedBody::Json(json!({"name": "ops", "owner": "a", "userlist": ["a", "b"], "chatid": "CHAT42"}))
        );
    }

    #[tokio::test]
    async fn get_uses_query_and_no_body() {
        let dispatcher = Arc::new(ScriptedDispatcher::replying([Ok(json!({
            "errcode": 0, "errmsg": "ok",
            "chat_info": {"chatid": "C1", "name": "ops", "owner": "a", "userlist": ["a", "b"]}
        }))]));

        let chat = service(&dispatcher).get("C1").await.unwrap();

        assert_eq!(chat.owner, "a");
        assert_eq!(chat.userlist, vec!["a", "b"]);
        let call = &dispatcher.calls()[0];
        assert_eq!(call.method, HttpMethod::Get);
        assert_eq!(call.query, vec![("chatid".to_string(), "C1".to_string())]);
        assert_eq!(call.body, RecordedBody::None);
    }

    #[tokio::test]
    async fn update_reports_api_errors() {
        let dispatcher =
            Arc::new(ScriptedDispatcher::replying([Ok(json!({"errcode": 86003, "errmsg": "chat not found"}))]));

        let err = service(&dispatcher)
            .update("C404", &UpdateGroupOptions { name: Some("x".into()), ..Default::default() })
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "call wxwork app update group api error, 86003 chat not found");
    }

    #[tokio::test]
    async fn sentinel_on_group_send_invalidates() {
        let dispatcher =
            Arc::new(ScriptedDispatcher::replying([Ok(json!({"errcode": 42001, "errmsg": "expired"}))]));

        let err = service(&dispatcher)
            .send_message("C1", &MessageContent::text("hi"), false)
            .await
            .unwrap_err();

        assert!(err.is_token_expired());
        assert_eq!(dispatcher.invalidations(), 1);
    }

    #[tokio::test]
    async fn app_only_kinds_never_reach_the_network() {
        let dispatcher = Arc::new(ScriptedDispatcher::default());
        let card = MessageContent::task_card(TaskCardBody {
            task_id: "t".into(),
            title: "t".into(),
            description: "d".into(),
            url: "https://x".into(),
            btn: vec![TaskCardButton {
                key: "k".into(),
                name: "n".into(),
                replace_name: "r".into(),
                color: None,
                is_bold: false,
            }],
        });

        let err = service(&dispatcher).send_message("C1", &card, true).await.unwrap_err();

        assert_eq!(
            err,
            WxWorkError::InvalidInput("taskcard messages cannot be sent to a group chat".into())
        );
        assert!(dispatcher.calls().is_empty());
    }

    #[tokio::test]
    async fn blank_chat_id_is_rejected() {
        let dispatcher = Arc::new(ScriptedDispatcher::default());
        assert!(matches!(service(&dispatcher).get(" ").await, Err(WxWorkError::InvalidInput(_))));
        assert!(dispatcher.calls().is_empty());
    }
}
