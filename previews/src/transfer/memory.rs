use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};

use super::{ObjectStore, TransferError};
use crate::location::ObjectUri;

/// In-memory object store for tests.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: RefCell<BTreeMap<(String, String), Vec<u8>>>,
    failing_keys: HashSet<String>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make uploads to `key` fail.
    pub fn failing_on(mut self, key: &str) -> Self {
        self.failing_keys.insert(key.to_string());
        self
    }

    /// Sorted keys stored in `bucket`.
    pub fn keys(&self, bucket: &str) -> Vec<String> {
        self.objects
            .borrow()
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, key)| key.clone())
            .collect()
    }

    pub fn get(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.objects
            .borrow()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }
}

impl ObjectStore for MemoryObjectStore {
    fn put(&self, uri: &ObjectUri, key: &str, bytes: Vec<u8>) -> Result<(), TransferError> {
        if self.failing_keys.contains(key) {
            return Err(TransferError::Upload {
                scheme: uri.scheme.clone(),
                bucket: uri.bucket.clone(),
                key: key.to_string(),
                message: "simulated failure".to_string(),
            });
        }
        self.objects
            .borrow_mut()
            .insert((uri.bucket.clone(), key.to_string()), bytes);
        Ok(())
    }
}
