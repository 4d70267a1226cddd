//! Report pipeline application entry point.
//!
//! Wires configuration into concrete collaborators and drives the complete
//! flow: upload → transcribe → extract → fill.

use crate::config::{Config, MappingMode, StoreBackend};
use crate::defaults;
use crate::extract::{AzureOpenAiClient, CompletionClient};
use crate::form::{FormBackend, JsonFormBackend};
use crate::pipeline::Pipeline;
use crate::speech::{HttpSpeechEngine, SpeechEngine};
use crate::store::{AzureBlobStore, BlobStore, DirStore};
use anyhow::Context;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Run the full pipeline over a local audio file and write the completed
/// document to `output`.
///
/// # Arguments
/// * `config` - Base configuration (can be overridden by CLI args)
/// * `audio` - Local audio file with the recorded statement
/// * `output` - Destination path for the completed document
/// * `template` - Optional template blob name override from CLI
/// * `mapping` - Optional field mapping override from CLI
/// * `timeout` - Optional base recognition wait override, in seconds
pub fn run_report_command(
    mut config: Config,
    audio: PathBuf,
    output: PathBuf,
    template: Option<String>,
    mapping: Option<MappingMode>,
    timeout: Option<u64>,
) -> anyhow::Result<()> {
    // Apply CLI overrides
    if let Some(t) = template {
        config.pipeline.template_blob = t;
    }
    if let Some(m) = mapping {
        config.pipeline.mapping = m;
    }
    if let Some(secs) = timeout {
        config.speech.base_timeout_secs = secs;
    }

    // Fail on missing credentials before any stage runs.
    config.validate()?;

    let http_timeout = Duration::from_secs(defaults::HTTP_TIMEOUT_SECS);
    let store = build_store(&config, http_timeout)?;
    let engine: Arc<dyn SpeechEngine> = Arc::new(HttpSpeechEngine::new(
        &config.speech.endpoint.clone().unwrap_or_default(),
        &config.speech.api_key.clone().unwrap_or_default(),
        &config.speech.language,
        http_timeout,
    )?);
    let completions: Arc<dyn CompletionClient> = Arc::new(AzureOpenAiClient::new(
        &config.extraction.endpoint.clone().unwrap_or_default(),
        &config.extraction.deployment.clone().unwrap_or_default(),
        &config.extraction.api_version,
        &config.extraction.api_key.clone().unwrap_or_default(),
        http_timeout,
    )?);
    let forms: Arc<dyn FormBackend> = Arc::new(JsonFormBackend::new());

    let pipeline = Pipeline::new(&config, store, engine, completions, forms);
    let document = pipeline.run(&audio)?;

    std::fs::write(&output, document)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    eprintln!("Completed report written to {}", output.display());
    Ok(())
}

/// Print a local template's declared field names, one per line, in order.
pub fn run_fields_command(template: &Path) -> anyhow::Result<()> {
    let bytes = std::fs::read(template)
        .with_context(|| format!("Failed to read {}", template.display()))?;
    let names = JsonFormBackend::new().field_names(&bytes)?;
    for (position, name) in names.iter().enumerate() {
        println!("{position}: {name}");
    }
    Ok(())
}

/// Print the effective configuration as TOML.
pub fn run_config_show(config: &Config) -> anyhow::Result<()> {
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

fn build_store(config: &Config, timeout: Duration) -> anyhow::Result<Arc<dyn BlobStore>> {
    Ok(match config.store.backend {
        StoreBackend::Dir => Arc::new(DirStore::new(config.store_root())),
        StoreBackend::Azure => Arc::new(AzureBlobStore::new(
            &config.store.account_url.clone().unwrap_or_default(),
            &config.store.sas_token.clone().unwrap_or_default(),
            timeout,
        )?),
    })
}
