use serde::{Deserialize, Serialize};

/// An object-created notification batch, in the shape S3 puts on the wire:
/// `{"Records": [{"s3": {"bucket": {"name": ...}, "object": {"key": ...}}}]}`.
///
/// Only the fields the handler consumes are modeled; the rest of the
/// notification payload is ignored during deserialization.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct S3Event {
    #[serde(rename = "Records", default)]
    pub records: Vec<S3EventRecord>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct S3EventRecord {
    pub s3: S3Entity,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct S3Object {
    pub key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_shape_in_order() {
        let body = r#"{
            "Records": [
                {
                    "eventName": "ObjectCreated:Put",
                    "awsRegion": "eu-west-1",
                    "s3": {
                        "bucket": {"name": "my-bucket", "arn": "arn:aws:s3:::my-bucket"},
                        "object": {"key": "photos/cat.jpg", "size": 1024}
                    }
                },
                {
                    "s3": {
                        "bucket": {"name": "other-bucket"},
                        "object": {"key": "docs/report.pdf"}
                    }
                }
            ]
        }"#;

        let event: S3Event = serde_json::from_str(body).unwrap();
        assert_eq!(event.records.len(), 2);
        assert_eq!(event.records[0].s3.bucket.name, "my-bucket");
        assert_eq!(event.records[0].s3.object.key, "photos/cat.jpg");
        assert_eq!(event.records[1].s3.object.key, "docs/report.pdf");
    }

    #[test]
    fn missing_records_field_is_an_empty_batch() {
        let event: S3Event = serde_json::from_str("{}").unwrap();
        assert!(event.records.is_empty());
    }
}
