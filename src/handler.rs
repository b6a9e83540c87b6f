use std::time::Duration;

use color_eyre::Report;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::event::S3Event;
use crate::keys::{self, ImageKind};
use crate::store::BlobStore;
use crate::thumbnails;

/// Where a record's processing failed.
///
/// `Deadline` is not a pipeline stage of its own; it marks a record that blew
/// through its overall time budget, wherever it happened to be stuck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PipelineStage {
    Fetch,
    Decode,
    Resize,
    Encode,
    Store,
    Deadline,
}

/// What happened to a single record.
///
/// The batch as a whole never fails, so this is where the per-record truth
/// lives for callers that want more than the log stream.
#[derive(Debug)]
pub enum RecordOutcome {
    /// A thumbnail was generated and uploaded.
    Stored {
        key: String,
        thumbnail_key: String,
        location: String,
    },
    /// The key does not denote a supported image, nothing was done.
    Skipped { key: String },
    /// A pipeline stage failed; no thumbnail was uploaded for this record.
    Failed {
        key: String,
        stage: PipelineStage,
        error: Report,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HandlerOptions {
    /// How many records may be processed at once. Records are independent,
    /// the only shared resource is the blob store client.
    pub concurrency: usize,
    /// Per-record time budget in seconds. A stuck fetch or upload fails that
    /// record instead of stalling the whole batch.
    pub record_timeout_secs: u64,
}

impl Default for HandlerOptions {
    fn default() -> Self {
        Self {
            concurrency: 4,
            record_timeout_secs: 30,
        }
    }
}

/// The result of handling one notification batch.
#[derive(Debug)]
pub struct BatchSummary {
    /// `"<N> records processed"`, where N counts every delivered record,
    /// including skipped and failed ones.
    pub message: String,
    /// One outcome per record, in delivered order.
    pub outcomes: Vec<RecordOutcome>,
}

/// Handle one object-created notification batch.
///
/// Every record whose key classifies as a supported image goes through the
/// thumbnail pipeline; everything else is skipped. Per-record failures are
/// logged and folded into the returned outcomes, never propagated, so the
/// caller always gets a summary for the full batch. Safe to invoke again for
/// the same event: regenerating a thumbnail overwrites the same derived key.
pub async fn handle_event(
    event: S3Event,
    store: &dyn BlobStore,
    options: &HandlerOptions,
) -> BatchSummary {
    let total = event.records.len();
    let deadline = Duration::from_secs(options.record_timeout_secs);

    let outcomes = stream::iter(event.records)
        .map(|record| async move {
            process_record(store, &record.s3.bucket.name, &record.s3.object.key, deadline).await
        })
        .buffered(options.concurrency.max(1))
        .collect::<Vec<_>>()
        .await;

    BatchSummary {
        message: format!("{total} records processed"),
        outcomes,
    }
}

/// Run one record through classify, derive, and the pipeline, with an overall
/// deadline.
async fn process_record(
    store: &dyn BlobStore,
    bucket: &str,
    key: &str,
    deadline: Duration,
) -> RecordOutcome {
    let Some(kind) = ImageKind::from_key(key) else {
        info!(bucket, key, "not a supported image, skipping");
        return RecordOutcome::Skipped {
            key: key.to_string(),
        };
    };
    let Some(thumbnail_key) = keys::thumbnail_key(key) else {
        info!(bucket, key, "no extension to derive a thumbnail key from, skipping");
        return RecordOutcome::Skipped {
            key: key.to_string(),
        };
    };

    let run = generate_thumbnail(store, bucket, key, &thumbnail_key, kind);
    match tokio::time::timeout(deadline, run).await {
        Ok(Ok(location)) => RecordOutcome::Stored {
            key: key.to_string(),
            thumbnail_key,
            location,
        },
        Ok(Err((stage, error))) => {
            error!(bucket, key, ?stage, error = %error, "failed to generate thumbnail");
            RecordOutcome::Failed {
                key: key.to_string(),
                stage,
                error,
            }
        }
        Err(elapsed) => {
            error!(bucket, key, error = %elapsed, "record deadline exceeded");
            RecordOutcome::Failed {
                key: key.to_string(),
                stage: PipelineStage::Deadline,
                error: Report::from(elapsed),
            }
        }
    }
}

/// The pipeline proper: fetch, decode, resize, composite, encode, store.
///
/// Stages run strictly in order and are attempted once. The first failure
/// aborts the record, so nothing is ever uploaded under the derived key
/// unless every prior stage succeeded.
async fn generate_thumbnail(
    store: &dyn BlobStore,
    bucket: &str,
    key: &str,
    thumbnail_key: &str,
    kind: ImageKind,
) -> Result<String, (PipelineStage, Report)> {
    let bytes = store
        .get(bucket, key)
        .await
        .map_err(|e| (PipelineStage::Fetch, e))?;
    info!(bucket, key, bytes = bytes.len(), "object downloaded");

    // A malformed image fails its own record only; the rest of the batch
    // keeps going.
    let image = thumbnails::decode(&bytes, kind).map_err(|e| (PipelineStage::Decode, e))?;
    let thumb = thumbnails::resize_to_fill(&image).map_err(|e| (PipelineStage::Resize, e))?;
    let canvas = thumbnails::composite_onto_canvas(&thumb);
    let encoded = thumbnails::encode(canvas, kind).map_err(|e| (PipelineStage::Encode, e))?;

    let location = store
        .put(bucket, thumbnail_key, encoded, kind.content_type())
        .await
        .map_err(|e| (PipelineStage::Store, e))?;
    info!(bucket, thumbnail = thumbnail_key, location = %location, "thumbnail uploaded");
    Ok(location)
}
