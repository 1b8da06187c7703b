//! Media deletion, single and batched.

use nocloud_core::constants::{BATCH_DELETE_PATH, DELETE_BATCH_SIZE, MEDIA_PATH};
use nocloud_core::models::BatchDeleteRequest;
use nocloud_core::{MediaIds, NoCloudError, NoCloudResult};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::Method;

use crate::transport::TransportRequest;
use crate::NoCloudClient;

/// Characters escaped when an id is used as a URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// An empty id would address the collection path instead of a media item.
fn validate_ids(ids: &MediaIds) -> NoCloudResult<()> {
    let ids: &[String] = match ids {
        MediaIds::One(id) => std::slice::from_ref(id),
        MediaIds::Many(ids) => ids,
    };

    match ids.iter().position(|id| id.trim().is_empty()) {
        Some(index) => Err(NoCloudError::InvalidMediaId(format!(
            "media id at position {} is empty",
            index
        ))),
        None => Ok(()),
    }
}

impl NoCloudClient {
    /// Delete one media item or a collection of them.
    ///
    /// Collections of two or more ids are sent in consecutive batches of at
    /// most `DELETE_BATCH_SIZE`, one at a time. The first failing batch stops
    /// the loop; batches before it stay deleted. The error records the failing
    /// batch's offset so the caller can resume from there.
    ///
    /// Empty ids are rejected before any request is sent.
    pub async fn delete(&self, ids: impl Into<MediaIds>) -> NoCloudResult<()> {
        let ids = ids.into();
        validate_ids(&ids)?;

        match ids {
            MediaIds::One(id) => self.delete_one(&id).await,
            MediaIds::Many(ids) => match ids.as_slice() {
                [] => Ok(()),
                [id] => self.delete_one(id).await,
                _ => self.delete_batches(&ids).await,
            },
        }
    }

    async fn delete_one(&self, media_id: &str) -> NoCloudResult<()> {
        let path = format!(
            "{}/{}",
            MEDIA_PATH,
            utf8_percent_encode(media_id, PATH_SEGMENT)
        );

        let response = self
            .transport
            .send(&path, TransportRequest::new(Method::DELETE))
            .await?;
        self.resolver.resolve_empty(response).await?;

        tracing::info!(media_id = %media_id, "Media deleted");
        Ok(())
    }

    async fn delete_batches(&self, ids: &[String]) -> NoCloudResult<()> {
        let batch_count = ids.len().div_ceil(DELETE_BATCH_SIZE);

        for (batch_index, batch) in ids.chunks(DELETE_BATCH_SIZE).enumerate() {
            let offset = batch_index * DELETE_BATCH_SIZE;

            self.delete_batch(batch)
                .await
                .map_err(|source| NoCloudError::BatchDeleteFailed {
                    batch_index,
                    batch_count,
                    offset,
                    batch_len: batch.len(),
                    source: Box::new(source),
                })?;

            tracing::debug!(
                batch_index = batch_index,
                batch_count = batch_count,
                batch_len = batch.len(),
                "Delete batch completed"
            );
        }

        tracing::info!(
            count = ids.len(),
            batch_count = batch_count,
            "Media batch deleted"
        );
        Ok(())
    }

    async fn delete_batch(&self, media_ids: &[String]) -> NoCloudResult<()> {
        let request =
            TransportRequest::new(Method::POST).json(&BatchDeleteRequest { media_ids })?;
        let response = self.transport.send(BATCH_DELETE_PATH, request).await?;
        self.resolver.resolve_empty(response).await
    }
}
