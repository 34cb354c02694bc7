//! Wire types for the WxWork app API

pub mod envelope;
pub mod group;
pub mod media;
pub mod message;

pub use envelope::{
    ApiStatus, CreateGroupResponse, Envelope, GetGroupResponse, MessageResponse, StatusResponse,
    TokenResponse, UploadImageResponse, UploadMediaResponse,
};
pub use group::{
    CreateGroupOptions, CreateGroupRequest, GroupChat, UpdateGroupOptions, UpdateGroupRequest,
};
pub use media::{MediaType, UploadedMedia};
pub use message::{
    AppMessage, GroupMessage, MediaBody, MessageContent, MessageKind, MessageReceipt,
    MiniProgramNoticeBody, MpNewsArticle, MpNewsBody, NewsArticle, NewsBody, NoticeItem,
    Recipients, SendOptions, TaskCardBody, TaskCardButton, TextBody, TextCardBody, VideoBody,
};
