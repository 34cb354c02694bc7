//! Media upload types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::envelope::UploadMediaResponse;
use crate::impl_wire_name_conversions;

/// Temporary media category accepted by `media/upload?type=`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Voice,
    Video,
    File,
}

impl_wire_name_conversions!(MediaType {
    Image => "image",
    Voice => "voice",
    Video => "video",
    File => "file",
});

/// Result of a temporary media upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedMedia {
    pub media_id: String,
    /// Type echoed by the platform; empty if it sent none
    pub media_type: String,
    /// Unix seconds, 0 when the platform sent something unparseable
    pub created_at: i64,
}

impl UploadedMedia {
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        if self.created_at == 0 {
            return None;
        }
        DateTime::from_timestamp(self.created_at, 0)
    }
}

impl From<UploadMediaResponse> for UploadedMedia {
    fn from(resp: UploadMediaResponse) -> Self {
        Self { media_id: resp.media_id, media_type: resp.media_type, created_at: resp.created_at }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_type_names_match_query_values() {
        assert_eq!(MediaType::Voice.as_str(), "voice");
        assert_eq!("FILE".parse::<MediaType>().unwrap(), MediaType::File);
        assert!("gif".parse::<MediaType>().is_err());
    }

    #[test]
    fn created_at_converts_to_utc() {
        let media =
            UploadedMedia { media_id: "m".into(), media_type: "image".into(), created_at: 1_380_000_000 };
        assert_eq!(media.created_at_utc().unwrap().timestamp(), 1_380_000_000);

        let unknown = UploadedMedia { created_at: 0, ..media };
        assert!(unknown.created_at_utc().is_none());
    }
}
