//! Object-storage port and its S3 backend.

use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use tokio::runtime::Runtime;
use tracing::debug;

use super::TransferError;
use crate::location::ObjectUri;

/// Byte-transfer service keyed by bucket and object key.
pub trait ObjectStore {
    /// Store `bytes` at `key` in the bucket of `uri`.
    fn put(&self, uri: &ObjectUri, key: &str, bytes: Vec<u8>) -> Result<(), TransferError>;
}

/// S3 client with blocking calls.
///
/// Credentials and region come from the standard AWS environment and config
/// files. Each upload blocks on a private current-thread runtime.
pub struct S3ObjectStore {
    runtime: Runtime,
    client: aws_sdk_s3::Client,
}

impl S3ObjectStore {
    pub fn from_env() -> Result<Self, TransferError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| TransferError::Client(format!("failed to start runtime: {e}")))?;

        let config = runtime.block_on(aws_config::load_defaults(
            aws_config::BehaviorVersion::latest(),
        ));
        let client = aws_sdk_s3::Client::new(&config);

        Ok(Self { runtime, client })
    }
}

impl ObjectStore for S3ObjectStore {
    fn put(&self, uri: &ObjectUri, key: &str, bytes: Vec<u8>) -> Result<(), TransferError> {
        debug!("PUT s3://{}/{} ({} bytes)", uri.bucket, key, bytes.len());

        self.runtime
            .block_on(
                self.client
                    .put_object()
                    .bucket(&uri.bucket)
                    .key(key)
                    .body(ByteStream::from(bytes))
                    .send(),
            )
            .map_err(|e| TransferError::Upload {
                scheme: uri.scheme.clone(),
                bucket: uri.bucket.clone(),
                key: key.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        Ok(())
    }
}
