use std::sync::Arc;

use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use tracing::info;
use tracing_subscriber::EnvFilter;

use s3_thumbnails::{HandlerOptions, S3BlobStore, S3Event, handle_event};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        // The Lambda log stream stamps every line already.
        .without_time()
        .init();

    // One client and one set of options per container lifecycle, injected
    // into every invocation.
    let config = aws_config::load_from_env().await;
    let store = Arc::new(S3BlobStore::new(aws_sdk_s3::Client::new(&config)));
    let options = HandlerOptions::default();

    run(service_fn(move |event: LambdaEvent<S3Event>| {
        let store = Arc::clone(&store);
        let options = options.clone();
        async move {
            info!(records = event.payload.records.len(), "handling notification batch");
            let summary = handle_event(event.payload, store.as_ref(), &options).await;
            Ok::<String, Error>(summary.message)
        }
    }))
    .await
}
