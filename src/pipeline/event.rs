//! Object-created notification payloads.
//!
//! Only the fields the pipeline reads are modelled; everything else in the notification is
//! ignored. Keys arrive form-URL-encoded (`+` for space, `%XX` escapes) and are decoded here.

use serde::Deserialize;
use serde_json::Value;

/// Notification delivered by the object store, possibly carrying several records.
#[derive(Debug, Default, Deserialize)]
pub struct S3Notification {
    /// Records in delivery order. Empty or absent for a manual invocation.
    #[serde(rename = "Records", default)]
    pub records: Vec<NotificationRecord>,
}

/// One object-created record.
#[derive(Debug, Deserialize)]
pub struct NotificationRecord {
    /// Storage section of the record.
    #[serde(default)]
    pub s3: Option<S3Entity>,
}

/// Bucket and object references carried by a record.
#[derive(Debug, Deserialize)]
pub struct S3Entity {
    /// Bucket holding the new object.
    #[serde(default)]
    pub bucket: Option<BucketRef>,
    /// The new object.
    #[serde(default)]
    pub object: Option<ObjectRef>,
}

/// Bucket reference.
#[derive(Debug, Deserialize)]
pub struct BucketRef {
    /// Bucket name.
    #[serde(default)]
    pub name: Option<String>,
}

/// Object reference.
#[derive(Debug, Deserialize)]
pub struct ObjectRef {
    /// URL-encoded object key.
    #[serde(default)]
    pub key: Option<String>,
}

/// A resolved upload: bucket plus decoded key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadEvent {
    /// Bucket holding the object.
    pub bucket: String,
    /// Decoded object key.
    pub key: String,
}

impl S3Notification {
    /// Parse a notification from a raw JSON payload. Payloads without `Records` parse as empty.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// True when the payload carries no records and the manual trigger applies.
    pub fn is_manual_invocation(&self) -> bool {
        self.records.is_empty()
    }

    /// Resolve records into uploads, falling back to `default_bucket` when a record has none.
    ///
    /// Records without a key are dropped with a warning.
    pub fn upload_events(&self, default_bucket: &str) -> Vec<UploadEvent> {
        self.records
            .iter()
            .enumerate()
            .filter_map(|(index, record)| {
                let entity = record.s3.as_ref();
                let key = entity
                    .and_then(|entity| entity.object.as_ref())
                    .and_then(|object| object.key.as_deref())
                    .filter(|key| !key.is_empty());
                let Some(key) = key else {
                    tracing::warn!(record = index, "Skipping notification record without key");
                    return None;
                };
                let bucket = entity
                    .and_then(|entity| entity.bucket.as_ref())
                    .and_then(|bucket| bucket.name.as_deref())
                    .filter(|name| !name.is_empty())
                    .unwrap_or(default_bucket);
                Some(UploadEvent {
                    bucket: bucket.to_string(),
                    key: decode_key(key),
                })
            })
            .collect()
    }
}

/// Decode a form-URL-encoded object key; undecodable input is returned as-is.
pub fn decode_key(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}
