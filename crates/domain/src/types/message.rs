//! Message payloads for `message/send` and `appchat/send`
//!
//! [`MessageContent`] is tagged by `msgtype` and nests the kind-specific body
//! under a key of the same name, which is exactly the remote wire layout:
//!
//! ```json
//! {"msgtype": "text", "text": {"content": "hello"}}
//! ```

use serde::{Deserialize, Serialize, Serializer};

use super::envelope::MessageResponse;
use crate::constants::RECIPIENT_SEPARATOR;
use crate::impl_wire_name_conversions;

/// Kind of a message, as spelled in `msgtype`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    Text,
    Markdown,
    Image,
    Voice,
    Video,
    File,
    TextCard,
    News,
    MpNews,
    MiniProgramNotice,
    TaskCard,
}

impl_wire_name_conversions!(MessageKind {
    Text => "text",
    Markdown => "markdown",
    Image => "image",
    Voice => "voice",
    Video => "video",
    File => "file",
    TextCard => "textcard",
    News => "news",
    MpNews => "mpnews",
    MiniProgramNotice => "miniprogram_notice",
    TaskCard => "taskcard",
});

impl MessageKind {
    /// Whether group chats accept this kind; notices and task cards are app-only
    pub const fn is_group_compatible(&self) -> bool {
        !matches!(self, Self::MiniProgramNotice | Self::TaskCard)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBody {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaBody {
    pub media_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoBody {
    pub media_id: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextCardBody {
    pub title: String,
    pub description: String,
    pub url: String,
    pub btntxt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub description: String,
    pub url: String,
    pub picurl: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsBody {
    pub articles: Vec<NewsArticle>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MpNewsArticle {
    pub title: String,
    pub thumb_media_id: String,
    pub author: String,
    pub content_source_url: String,
    pub content: String,
    pub digest: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MpNewsBody {
    pub articles: Vec<MpNewsArticle>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeItem {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MiniProgramNoticeBody {
    pub appid: String,
    pub page: String,
    pub title: String,
    pub description: String,
    pub emphasis_first_item: bool,
    pub content_item: Vec<NoticeItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCardButton {
    pub key: String,
    pub name: String,
    pub replace_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_bold: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCardBody {
    pub task_id: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub btn: Vec<TaskCardButton>,
}

/// Body of a message, one variant per `msgtype`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "msgtype")]
pub enum MessageContent {
    #[serde(rename = "text")]
    Text { text: TextBody },
    #[serde(rename = "markdown")]
    Markdown { markdown: TextBody },
    #[serde(rename = "image")]
    Image { image: MediaBody },
    #[serde(rename = "voice")]
    Voice { voice: MediaBody },
    #[serde(rename = "video")]
    Video { video: VideoBody },
    #[serde(rename = "file")]
    File { file: MediaBody },
    #[serde(rename = "textcard")]
    TextCard { textcard: TextCardBody },
    #[serde(rename = "news")]
    News { news: NewsBody },
    #[serde(rename = "mpnews")]
    MpNews { mpnews: MpNewsBody },
    #[serde(rename = "miniprogram_notice")]
    MiniProgramNotice { miniprogram_notice: MiniProgramNoticeBody },
    #[serde(rename = "taskcard")]
    TaskCard { taskcard: TaskCardBody },
}

impl MessageContent {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text { text: TextBody { content: content.into() } }
    }

    pub fn markdown(content: impl Into<String>) -> Self {
        Self::Markdown { markdown: TextBody { content: content.into() } }
    }

    pub fn image(media_id: impl Into<String>) -> Self {
        Self::Image { image: MediaBody { media_id: media_id.into() } }
    }

    pub fn voice(media_id: impl Into<String>) -> Self {
        Self::Voice { voice: MediaBody { media_id: media_id.into() } }
    }

    pub fn video(
        media_id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self::Video {
            video: VideoBody {
                media_id: media_id.into(),
                title: title.into(),
                description: description.into(),
            },
        }
    }

    pub fn file(media_id: impl Into<String>) -> Self {
        Self::File { file: MediaBody { media_id: media_id.into() } }
    }

    pub fn text_card(
        title: impl Into<String>,
        description: impl Into<String>,
        url: impl Into<String>,
        button_text: impl Into<String>,
    ) -> Self {
        Self::TextCard {
            textcard: TextCardBody {
                title: title.into(),
                description: description.into(),
                url: url.into(),
                btntxt: button_text.into(),
            },
        }
    }

    pub fn news(articles: Vec<NewsArticle>) -> Self {
        Self::News { news: NewsBody { articles } }
    }

    pub fn mp_news(articles: Vec<MpNewsArticle>) -> Self {
        Self::MpNews { mpnews: MpNewsBody { articles } }
    }

    pub fn miniprogram_notice(body: MiniProgramNoticeBody) -> Self {
        Self::MiniProgramNotice { miniprogram_notice: body }
    }

    pub fn task_card(body: TaskCardBody) -> Self {
        Self::TaskCard { taskcard: body }
    }

    /// The `msgtype` this content is sent as.
    pub const fn kind(&self) -> MessageKind {
        match self {
            Self::Text { .. } => MessageKind::Text,
            Self::Markdown { .. } => MessageKind::Markdown,
            Self::Image { .. } => MessageKind::Image,
            Self::Voice { .. } => MessageKind::Voice,
            Self::Video { .. } => MessageKind::Video,
            Self::File { .. } => MessageKind::File,
            Self::TextCard { .. } => MessageKind::TextCard,
            Self::News { .. } => MessageKind::News,
            Self::MpNews { .. } => MessageKind::MpNews,
            Self::MiniProgramNotice { .. } => MessageKind::MiniProgramNotice,
            Self::TaskCard { .. } => MessageKind::TaskCard,
        }
    }

    pub const fn is_group_compatible(&self) -> bool {
        self.kind().is_group_compatible()
    }
}

/// Who receives an app message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recipients {
    pub users: Vec<String>,
    pub parties: Vec<String>,
    pub tags: Vec<String>,
}

impl Recipients {
    pub fn users<I, S>(users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { users: users.into_iter().map(Into::into).collect(), ..Self::default() }
    }

    #[must_use]
    pub fn with_parties<I, S>(mut self, parties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parties = parties.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// True when no user, party or tag is addressed.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.parties.is_empty() && self.tags.is_empty()
    }
}

/// Optional delivery flags for `message/send`
///
/// Flags are written as `1` when set and left out otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SendOptions {
    #[serde(skip_serializing_if = "is_unset", serialize_with = "as_flag")]
    pub safe: bool,
    #[serde(skip_serializing_if = "is_unset", serialize_with = "as_flag")]
    pub enable_id_trans: bool,
    #[serde(skip_serializing_if = "is_unset", serialize_with = "as_flag")]
    pub enable_duplicate_check: bool,
    /// Seconds; only sent when positive
    #[serde(skip_serializing_if = "is_zero")]
    pub duplicate_check_interval: u32,
}

impl SendOptions {
    pub fn safe() -> Self {
        Self { safe: true, ..Self::default() }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_unset(flag: &bool) -> bool {
    !*flag
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(value: &u32) -> bool {
    *value == 0
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn as_flag<S: Serializer>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*flag))
}

/// Request body of `POST /message/send`
#[derive(Debug, Serialize)]
pub struct AppMessage<'a> {
    pub touser: String,
    pub toparty: String,
    pub totag: String,
    pub agentid: &'a str,
    #[serde(flatten)]
    pub content: &'a MessageContent,
    #[serde(flatten)]
    pub options: SendOptions,
}

impl<'a> AppMessage<'a> {
    pub fn new(
        agent_id: &'a str,
        recipients: &Recipients,
        content: &'a MessageContent,
        options: SendOptions,
    ) -> Self {
        Self {
            touser: recipients.users.join(RECIPIENT_SEPARATOR),
            toparty: recipients.parties.join(RECIPIENT_SEPARATOR),
            totag: recipients.tags.join(RECIPIENT_SEPARATOR),
            agentid: agent_id,
            content,
            options,
        }
    }
}

/// Request body of `POST /appchat/send`
#[derive(Debug, Serialize)]
pub struct GroupMessage<'a> {
    pub chatid: &'a str,
    #[serde(flatten)]
    pub content: &'a MessageContent,
    #[serde(skip_serializing_if = "is_unset", serialize_with = "as_flag")]
    pub safe: bool,
}

/// Recipients the platform refused to deliver to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageReceipt {
    pub invalid_users: Vec<String>,
    pub invalid_parties: Vec<String>,
    pub invalid_tags: Vec<String>,
}

impl MessageReceipt {
    /// True when the platform resolved every recipient.
    pub fn all_delivered(&self) -> bool {
        self.invalid_users.is_empty() && self.invalid_parties.is_empty() && self.invalid_tags.is_empty()
    }
}

fn split_ids(joined: &str) -> Vec<String> {
    joined.split(RECIPIENT_SEPARATOR).filter(|id| !id.is_empty()).map(str::to_string).collect()
}

impl From<MessageResponse> for MessageReceipt {
    fn from(resp: MessageResponse) -> Self {
        Self {
            invalid_users: split_ids(&resp.invaliduser),
            invalid_parties: split_ids(&resp.invalidparty),
            invalid_tags: split_ids(&resp.invalidtag),
        }
    }
}
