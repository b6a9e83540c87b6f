//! # S3 Thumbnails
//!
//! An event-driven thumbnail generator for S3 buckets. The handler consumes
//! object-created notification batches, and for every record whose key ends
//! in `.jpg`, `.png` or `.gif` it downloads the object, produces a 100x100
//! crop-to-fill thumbnail, composites it onto a transparent canvas, and
//! uploads the result back to the same bucket under a `_thumb` key
//! (`photos/cat.jpg` becomes `photos/cat_thumb.jpg`).
//!
//! Per-record failures are logged and reported through [`RecordOutcome`] but
//! never fail the batch: the caller always receives a summary covering every
//! delivered record. The blob store sits behind the [`BlobStore`] trait, so
//! the same handler runs against S3 in production and against
//! [`MemoryBlobStore`] in tests and local experiments.
//!
//! ## Example
//!
//! ```
//! use s3_thumbnails::{HandlerOptions, MemoryBlobStore, S3Event, handle_event};
//!
//! #[tokio::main]
//! async fn main() {
//!     let store = MemoryBlobStore::new();
//!     let event: S3Event = serde_json::from_str(r#"{"Records": []}"#).unwrap();
//!
//!     let summary = handle_event(event, &store, &HandlerOptions::default()).await;
//!     println!("{}", summary.message);
//! }
//! ```

// Serde model of the notification batch.
mod event;
// Batch handling and the per-record pipeline.
mod handler;
// Object-key classification and thumbnail-key derivation.
mod keys;
// The blob store seam and its S3 and in-memory implementations.
mod store;
// The raster stages: decode, resize, composite, encode.
mod thumbnails;

pub use event::{S3Bucket, S3Entity, S3Event, S3EventRecord, S3Object};
pub use handler::{BatchSummary, HandlerOptions, PipelineStage, RecordOutcome, handle_event};
pub use keys::{ImageKind, is_supported_image, thumbnail_key};
pub use store::{BlobStore, MemoryBlobStore, S3BlobStore};
pub use thumbnails::{THUMB_HEIGHT, THUMB_WIDTH};
