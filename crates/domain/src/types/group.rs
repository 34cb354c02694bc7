//! Group chat (`appchat/*`) types

use serde::{Deserialize, Serialize};

/// Group chat as returned by `appchat/get`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupChat {
    #[serde(default)]
    pub chatid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub userlist: Vec<String>,
}

/// Optional settings for creating a group chat
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateGroupOptions {
    /// Caller-chosen chat id; the platform generates one when absent
    pub chat_id: Option<String>,
}

/// Changes to apply to an existing group chat; unset fields are left alone
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateGroupOptions {
    pub name: Option<String>,
    pub owner: Option<String>,
    pub add_user_list: Vec<String>,
    pub del_user_list: Vec<String>,
}

impl UpdateGroupOptions {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.owner.is_none()
            && self.add_user_list.is_empty()
            && self.del_user_list.is_empty()
    }
}

/// Request body of `POST /appchat/create`
#[derive(Debug, Serialize)]
pub struct CreateGroupRequest<'a> {
    pub name: &'a str,
    pub owner: &'a str,
    pub userlist: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chatid: Option<&'a str>,
}

impl<'a> CreateGroupRequest<'a> {
    pub fn new(
        name: &'a str,
        owner: &'a str,
        userlist: &'a [String],
        options: &'a CreateGroupOptions,
    ) -> Self {
        let chatid = options.chat_id.as_deref().filter(|id| !id.is_empty());
        Self { name, owner, userlist, chatid }
    }
}

/// Request body of `POST /appchat/update`
#[derive(Debug, Serialize)]
pub struct UpdateGroupRequest<'a> {
    pub chatid: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<&'a str>,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    pub add_user_list: &'a [String],
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    pub del_user_list: &'a [String],
}

impl<'a> UpdateGroupRequest<'a> {
    pub fn new(chat_id: &'a str, options: &'a UpdateGroupOptions) -> Self {
        Self {
            chatid: chat_id,
            name: options.name.as_deref(),
            owner: options.owner.as_deref(),
            add_user_list: &options.add_user_list,
            del_user_list: &options.del_user_list,
        }
    }
}
