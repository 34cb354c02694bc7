//! API operations built on [`crate::ports::ApiDispatcher`]

pub mod group;
pub mod media;
pub mod message;

pub use group::GroupChatService;
pub use media::MediaService;
pub use message::MessageService;

#[cfg(test)]
pub(crate) mod test_support;
