//! Azure Blob Storage adapter.
//!
//! Talks to the Blob service REST surface directly with a container-scoped
//! or account-scoped SAS token, so no connection-string signing is needed:
//! the token rides along as the query string of every object URL.

use crate::error::{ReportError, Result};
use crate::store::BlobStore;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use std::time::Duration;

const SERVICE: &str = "blob store";

/// Blob store backed by an Azure-Blob-style HTTP endpoint.
pub struct AzureBlobStore {
    client: Client,
    account_url: String,
    sas_token: String,
}

impl AzureBlobStore {
    /// `account_url` is the storage account root, e.g.
    /// `https://acct.blob.core.windows.net`; `sas_token` is the SAS query
    /// string without the leading `?`.
    pub fn new(account_url: &str, sas_token: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ReportError::external(SERVICE, e))?;
        Ok(Self {
            client,
            account_url: account_url.trim_end_matches('/').to_string(),
            sas_token: sas_token.trim_start_matches('?').to_string(),
        })
    }

    fn object_url(&self, container: &str, name: &str) -> String {
        format!(
            "{}/{}/{}?{}",
            self.account_url, container, name, self.sas_token
        )
    }
}

impl BlobStore for AzureBlobStore {
    fn put(&self, container: &str, name: &str, data: &[u8]) -> Result<()> {
        let response = self
            .client
            .put(self.object_url(container, name))
            .header("x-ms-blob-type", "BlockBlob")
            .body(data.to_vec())
            .send()
            .map_err(|e| ReportError::external(SERVICE, e))?;

        if !response.status().is_success() {
            return Err(ReportError::external(
                SERVICE,
                format!("upload of '{name}' returned status {}", response.status()),
            ));
        }
        tracing::debug!(container, name, bytes = data.len(), "uploaded blob");
        Ok(())
    }

    fn get(&self, container: &str, name: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(self.object_url(container, name))
            .send()
            .map_err(|e| ReportError::external(SERVICE, e))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ReportError::BlobNotFound {
                container: container.to_string(),
                name: name.to_string(),
            });
        }
        if !response.status().is_success() {
            return Err(ReportError::external(
                SERVICE,
                format!("download of '{name}' returned status {}", response.status()),
            ));
        }
        let bytes = response
            .bytes()
            .map_err(|e| ReportError::external(SERVICE, e))?;
        Ok(bytes.to_vec())
    }
}
