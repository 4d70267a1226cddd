use crate::defaults;
use crate::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Root configuration structure
///
/// Built once at startup and passed by reference into each pipeline stage.
/// Stages never read credentials or endpoints from the process environment
/// themselves, which keeps them testable with fake collaborators.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub speech: SpeechConfig,
    pub extraction: ExtractionConfig,
    pub pipeline: PipelineConfig,
}

/// Blob store configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// Root directory for the `dir` backend (default: ./voxreport-store)
    pub root: Option<PathBuf>,
    /// Account URL for the `azure` backend, e.g. https://acct.blob.core.windows.net
    pub account_url: Option<String>,
    /// SAS token for the `azure` backend (query string, without leading '?')
    pub sas_token: Option<String>,
    pub audio_container: String,
    pub transcript_container: String,
    pub record_container: String,
}

/// Blob store backend selection
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Dir,
    Azure,
}

/// Speech recognition configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpeechConfig {
    /// Batch recognition endpoint URL
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    /// Recognition language tag, e.g. "en-US"
    pub language: String,
    /// Base allowance for the session's bounded wait, in seconds
    pub base_timeout_secs: u64,
    /// Extra wait allowed per second of audio
    pub secs_per_audio_sec: f32,
}

/// Incident extraction (completion service) configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Azure OpenAI resource endpoint, e.g. https://res.openai.azure.com
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    /// Chat model deployment name
    pub deployment: Option<String>,
    pub api_version: String,
}

/// Well-known artifact names and form-fill behavior
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    pub transcript_blob: String,
    pub record_blob: String,
    pub template_blob: String,
    pub completed_blob: String,
    pub mapping: MappingMode,
}

/// How record fields are bound to template fields
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum MappingMode {
    /// First three declared template fields bind to name, surname, reason,
    /// in that order. The default, matching the template contract.
    Positional,
    /// Template fields bind to record fields with the same name.
    Named,
}

impl FromStr for MappingMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "positional" => Ok(MappingMode::Positional),
            "named" => Ok(MappingMode::Named),
            other => Err(format!(
                "unknown mapping mode '{other}' (expected 'positional' or 'named')"
            )),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Dir,
            root: None,
            account_url: None,
            sas_token: None,
            audio_container: defaults::AUDIO_CONTAINER.to_string(),
            transcript_container: defaults::TRANSCRIPT_CONTAINER.to_string(),
            record_container: defaults::RECORD_CONTAINER.to_string(),
        }
    }
}

impl Default for StoreBackend {
    fn default() -> Self {
        StoreBackend::Dir
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            language: "en-US".to_string(),
            base_timeout_secs: defaults::SESSION_BASE_TIMEOUT_SECS,
            secs_per_audio_sec: defaults::SESSION_SECS_PER_AUDIO_SEC,
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            deployment: None,
            api_version: defaults::OPENAI_API_VERSION.to_string(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            transcript_blob: defaults::TRANSCRIPT_BLOB.to_string(),
            record_blob: defaults::RECORD_BLOB.to_string(),
            template_blob: defaults::TEMPLATE_BLOB.to_string(),
            completed_blob: defaults::COMPLETED_BLOB.to_string(),
            mapping: MappingMode::Positional,
        }
    }
}

impl Default for MappingMode {
    fn default() -> Self {
        MappingMode::Positional
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ReportError::ConfigFileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                ReportError::Io(e)
            }
        })?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    /// Returns errors for invalid TOML.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(ReportError::ConfigFileNotFound { .. }) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - VOXREPORT_SPEECH_ENDPOINT / VOXREPORT_SPEECH_KEY → speech.endpoint / speech.api_key
    /// - VOXREPORT_OPENAI_ENDPOINT / VOXREPORT_OPENAI_KEY → extraction.endpoint / extraction.api_key
    /// - VOXREPORT_OPENAI_DEPLOYMENT → extraction.deployment
    /// - VOXREPORT_STORE_URL / VOXREPORT_STORE_SAS → store.account_url / store.sas_token
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(endpoint) = std::env::var("VOXREPORT_SPEECH_ENDPOINT")
            && !endpoint.is_empty()
        {
            self.speech.endpoint = Some(endpoint);
        }

        if let Ok(key) = std::env::var("VOXREPORT_SPEECH_KEY")
            && !key.is_empty()
        {
            self.speech.api_key = Some(key);
        }

        if let Ok(endpoint) = std::env::var("VOXREPORT_OPENAI_ENDPOINT")
            && !endpoint.is_empty()
        {
            self.extraction.endpoint = Some(endpoint);
        }

        if let Ok(key) = std::env::var("VOXREPORT_OPENAI_KEY")
            && !key.is_empty()
        {
            self.extraction.api_key = Some(key);
        }

        if let Ok(deployment) = std::env::var("VOXREPORT_OPENAI_DEPLOYMENT")
            && !deployment.is_empty()
        {
            self.extraction.deployment = Some(deployment);
        }

        if let Ok(url) = std::env::var("VOXREPORT_STORE_URL")
            && !url.is_empty()
        {
            self.store.account_url = Some(url);
        }

        if let Ok(sas) = std::env::var("VOXREPORT_STORE_SAS")
            && !sas.is_empty()
        {
            self.store.sas_token = Some(sas);
        }

        self
    }

    /// Check that every credential required by the selected backends is set.
    ///
    /// Called once at startup so a missing key fails before any stage runs,
    /// not halfway through a pipeline.
    pub fn validate(&self) -> Result<()> {
        if self.store.backend == StoreBackend::Azure {
            require(&self.store.account_url, "store.account_url")?;
            require(&self.store.sas_token, "store.sas_token")?;
        }
        require(&self.speech.endpoint, "speech.endpoint")?;
        require(&self.speech.api_key, "speech.api_key")?;
        require(&self.extraction.endpoint, "extraction.endpoint")?;
        require(&self.extraction.api_key, "extraction.api_key")?;
        require(&self.extraction.deployment, "extraction.deployment")?;
        Ok(())
    }

    /// Root directory for the `dir` store backend.
    pub fn store_root(&self) -> PathBuf {
        self.store
            .root
            .clone()
            .unwrap_or_else(|| PathBuf::from("voxreport-store"))
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/voxreport/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("voxreport")
            .join("config.toml")
    }
}

fn require(value: &Option<String>, key: &str) -> Result<()> {
    match value {
        Some(v) if !v.is_empty() => Ok(()),
        _ => Err(ReportError::ConfigInvalidValue {
            key: key.to_string(),
            message: "required but not set".to_string(),
        }),
    }
}
