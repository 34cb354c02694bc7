//! Temporary media and image uploads
//!
//! See https://work.weixin.qq.com/api/doc/90000/90135/90253 and
//! https://work.weixin.qq.com/api/doc/90000/90135/90256

use std::sync::Arc;

use tracing::debug;
use wxwork_domain::constants::{MEDIA_TYPE_PARAM, UPLOAD_IMAGE_PATH, UPLOAD_MEDIA_PATH};
use wxwork_domain::{
    MediaType, Result, UploadImageResponse, UploadMediaResponse, UploadedMedia, WxWorkError,
};

use crate::envelope::decode_checked;
use crate::ports::{ApiDispatcher, HttpMethod};

/// Uploads files for use in messages
pub struct MediaService {
    dispatcher: Arc<dyn ApiDispatcher>,
}

fn require_file(bytes: &[u8], file_name: &str) -> Result<()> {
    if bytes.is_empty() {
        return Err(WxWorkError::InvalidInput(format!("{file_name} is empty")));
    }
    if file_name.trim().is_empty() {
        return Err(WxWorkError::InvalidInput("file name must not be empty".into()));
    }
    Ok(())
}

impl MediaService {
    pub fn new(dispatcher: Arc<dyn ApiDispatcher>) -> Self {
        Self { dispatcher }
    }

    /// Upload a temporary media file; the returned id is valid for three days.
    pub async fn upload_media(
        &self,
        bytes: &[u8],
        file_name: &str,
        media_type: MediaType,
    ) -> Result<UploadedMedia> {
        require_file(bytes, file_name)?;
        debug!(file_name, size = bytes.len(), media_type = %media_type, "uploading media");

        let value = self
            .dispatcher
            .send_multipart(
                HttpMethod::Post,
                UPLOAD_MEDIA_PATH,
                &[(MEDIA_TYPE_PARAM, media_type.as_str())],
                bytes,
                file_name,
            )
            .await?;
        let resp: UploadMediaResponse =
            decode_checked(self.dispatcher.as_ref(), "upload media", value).await?;
        Ok(resp.into())
    }

    /// Upload a permanent image and return its URL.
    pub async fn upload_image(&self, bytes: &[u8], file_name: &str) -> Result<String> {
        require_file(bytes, file_name)?;
        debug!(file_name, size = bytes.len(), "uploading image");

        let value = self
            .dispatcher
            .send_multipart(HttpMethod::Post, UPLOAD_IMAGE_PATH, &[], bytes, file_name)
            .await?;
        let resp: UploadImageResponse =
            decode_checked(self.dispatcher.as_ref(), "upload image", value).await?;
        Ok(resp.url)
    }
}
