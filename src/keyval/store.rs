//! Key-value zone operations.
//!
//! HTTP zones live under `http/keyvals`, stream zones under `stream/keyvals`.
//! Both share the private helpers below; the public methods only pick the
//! prefix.

use std::collections::HashMap;

use reqwest::StatusCode;

use crate::client::error::{NginxError, NginxResult};
use crate::client::NginxClient;
use crate::keyval::types::{KeyValPairs, KeyValPairsByZone};

const HTTP: &str = "http";
const STREAM: &str = "stream";
const KEYVALS: &str = "keyvals";

fn require_non_empty(name: &str, value: &str) -> NginxResult<()> {
    if value.is_empty() {
        return Err(NginxError::InvalidArgument(format!("{name} must not be empty")));
    }
    Ok(())
}

impl NginxClient {
    async fn keyvals_by_zone(&self, prefix: &str) -> NginxResult<KeyValPairsByZone> {
        self.get_json(
            &[prefix, KEYVALS],
            &format!("failed to get all {prefix} key-value pairs"),
        )
        .await
    }

    async fn keyvals(&self, prefix: &str, zone: &str) -> NginxResult<KeyValPairs> {
        require_non_empty("zone", zone)?;
        self.get_json(
            &[prefix, KEYVALS, zone],
            &format!("failed to get {prefix} key-value pairs for {zone} zone"),
        )
        .await
    }

    async fn add_keyval(&self, prefix: &str, zone: &str, key: &str, value: &str) -> NginxResult<()> {
        require_non_empty("zone", zone)?;
        require_non_empty("key", key)?;
        let body = HashMap::from([(key, value)]);
        self.post_json(
            &[prefix, KEYVALS, zone],
            &body,
            StatusCode::CREATED,
            &format!("failed to add {prefix} key-value pair to {zone} zone"),
        )
        .await?;
        tracing::debug!(zone = %zone, key = %key, kind = prefix, "Added key-value pair");
        Ok(())
    }

    async fn modify_keyval(
        &self,
        prefix: &str,
        zone: &str,
        key: &str,
        value: &str,
    ) -> NginxResult<()> {
        require_non_empty("zone", zone)?;
        require_non_empty("key", key)?;
        let body = HashMap::from([(key, value)]);
        self.patch_json(
            &[prefix, KEYVALS, zone],
            &body,
            StatusCode::NO_CONTENT,
            &format!("failed to update {prefix} key-value pair in {zone} zone"),
        )
        .await?;
        tracing::debug!(zone = %zone, key = %key, kind = prefix, "Modified key-value pair");
        Ok(())
    }

    async fn delete_keyval(&self, prefix: &str, zone: &str, key: &str) -> NginxResult<()> {
        require_non_empty("zone", zone)?;
        require_non_empty("key", key)?;
        // NGINX deletes a key when it is patched to null.
        let body: HashMap<&str, Option<&str>> = HashMap::from([(key, None)]);
        self.patch_json(
            &[prefix, KEYVALS, zone],
            &body,
            StatusCode::NO_CONTENT,
            &format!("failed to remove {prefix} key-value pair from {zone} zone"),
        )
        .await?;
        tracing::debug!(zone = %zone, key = %key, kind = prefix, "Removed key-value pair");
        Ok(())
    }

    async fn clear_keyvals(&self, prefix: &str, zone: &str) -> NginxResult<()> {
        require_non_empty("zone", zone)?;
        self.delete(
            &[prefix, KEYVALS, zone],
            StatusCode::NO_CONTENT,
            &format!("failed to remove all {prefix} key-value pairs from {zone} zone"),
        )
        .await?;
        tracing::info!(zone = %zone, kind = prefix, "Cleared key-value zone");
        Ok(())
    }

    /// Pairs of an HTTP key-value zone.
    pub async fn get_key_val_pairs(&self, zone: &str) -> NginxResult<KeyValPairs> {
        self.keyvals(HTTP, zone).await
    }

    /// Pairs of every HTTP key-value zone.
    pub async fn get_all_key_val_pairs(&self) -> NginxResult<KeyValPairsByZone> {
        self.keyvals_by_zone(HTTP).await
    }

    /// Add a new key. NGINX rejects an existing key with 409.
    pub async fn add_key_val_pair(&self, zone: &str, key: &str, value: &str) -> NginxResult<()> {
        self.add_keyval(HTTP, zone, key, value).await
    }

    /// Change the value of an existing key. NGINX rejects a missing key with 404.
    pub async fn modify_key_val_pair(&self, zone: &str, key: &str, value: &str) -> NginxResult<()> {
        self.modify_keyval(HTTP, zone, key, value).await
    }

    pub async fn delete_key_val_pair(&self, zone: &str, key: &str) -> NginxResult<()> {
        self.delete_keyval(HTTP, zone, key).await
    }

    /// Remove every pair of an HTTP zone.
    pub async fn delete_key_val_pairs(&self, zone: &str) -> NginxResult<()> {
        self.clear_keyvals(HTTP, zone).await
    }

    pub async fn get_stream_key_val_pairs(&self, zone: &str) -> NginxResult<KeyValPairs> {
        self.keyvals(STREAM, zone).await
    }

    pub async fn get_all_stream_key_val_pairs(&self) -> NginxResult<KeyValPairsByZone> {
        self.keyvals_by_zone(STREAM).await
    }

    pub async fn add_stream_key_val_pair(
        &self,
        zone: &str,
        key: &str,
        value: &str,
    ) -> NginxResult<()> {
        self.add_keyval(STREAM, zone, key, value).await
    }

    pub async fn modify_stream_key_val_pair(
        &self,
        zone: &str,
        key: &str,
        value: &str,
    ) -> NginxResult<()> {
        self.modify_keyval(STREAM, zone, key, value).await
    }

    pub async fn delete_stream_key_val_pair(&self, zone: &str, key: &str) -> NginxResult<()> {
        self.delete_keyval(STREAM, zone, key).await
    }

    pub async fn delete_stream_key_val_pairs(&self, zone: &str) -> NginxResult<()> {
        self.clear_keyvals(STREAM, zone).await
    }
}
