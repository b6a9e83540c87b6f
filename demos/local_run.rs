//! Runs the handler end to end against the in-memory store: two real images,
//! one non-image key, and one object that went missing between notification
//! and processing.
//!
//! ```sh
//! cargo run --example local_run
//! ```

use std::io::Cursor;

use color_eyre::Result;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba};
use tracing_subscriber::EnvFilter;

use s3_thumbnails::{
    HandlerOptions, MemoryBlobStore, RecordOutcome, S3Bucket, S3Entity, S3Event, S3EventRecord,
    S3Object, handle_event,
};

const BUCKET: &str = "demo-bucket";

fn record(key: &str) -> S3EventRecord {
    S3EventRecord {
        s3: S3Entity {
            bucket: S3Bucket {
                name: BUCKET.to_string(),
            },
            object: S3Object {
                key: key.to_string(),
            },
        },
    }
}

fn sample_image(w: u32, h: u32, format: ImageFormat) -> Result<Vec<u8>> {
    let img = DynamicImage::ImageRgba8(ImageBuffer::from_fn(w, h, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 160, 255])
    }));
    let mut bytes = Cursor::new(Vec::new());
    match format {
        ImageFormat::Jpeg => img.to_rgb8().write_to(&mut bytes, format)?,
        _ => img.write_to(&mut bytes, format)?,
    }
    Ok(bytes.into_inner())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let store = MemoryBlobStore::new();
    store.insert(BUCKET, "photos/cat.png", sample_image(320, 200, ImageFormat::Png)?);
    store.insert(BUCKET, "photos/dog.jpg", sample_image(90, 400, ImageFormat::Jpeg)?);

    let event = S3Event {
        records: vec![
            record("photos/cat.png"),
            record("photos/dog.jpg"),
            record("docs/report.pdf"),
            record("photos/deleted.gif"),
        ],
    };

    let summary = handle_event(event, &store, &HandlerOptions::default()).await;
    println!("{}", summary.message);
    for outcome in &summary.outcomes {
        match outcome {
            RecordOutcome::Stored {
                key,
                thumbnail_key,
                location,
            } => println!("  stored  {key} -> {thumbnail_key} ({location})"),
            RecordOutcome::Skipped { key } => println!("  skipped {key}"),
            RecordOutcome::Failed { key, stage, error } => {
                println!("  failed  {key} at {stage:?}: {error}")
            }
        }
    }

    Ok(())
}
