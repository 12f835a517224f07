use std::env;
use std::path::PathBuf;
use thiserror::Error;

/// Substring a key must contain (case-insensitively) to be picked up by a rescan.
pub const DEFAULT_RESCAN_MARKER: &str = "aws";
/// Directory walked by the manual trigger when no notification records are present.
pub const DEFAULT_LOCAL_DOCS_DIR: &str = "./docs";
/// Region used by the query front end when neither the environment nor the profile has one.
pub const DEFAULT_FRONTEND_REGION: &str = "us-west-2";

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Settings consumed by the ingestion triggers (upload event, rescan, local mode).
#[derive(Debug, Clone)]
pub struct IngestConfig {
    /// Bucket holding uploaded PDFs.
    pub pdf_bucket: String,
    /// Knowledge base that receives extracted documents.
    pub knowledge_base_id: String,
    /// Custom data source inside the knowledge base targeted by direct ingestion.
    pub data_source_id: String,
    /// Optional region override; the default provider chain applies otherwise.
    pub aws_region: Option<String>,
    /// Lowercase substring selecting keys during a rescan.
    pub rescan_marker: String,
    /// Directory walked by the manual trigger.
    pub local_docs_dir: PathBuf,
}

/// Settings consumed by the query front end.
#[derive(Debug, Clone)]
pub struct FrontEndConfig {
    /// Knowledge base whose data sources back the readiness check.
    pub knowledge_base_id: String,
    /// Bedrock agent answering questions.
    pub agent_id: String,
    /// Alias of the agent to invoke.
    pub agent_alias_id: String,
    /// Optional region override.
    pub aws_region: Option<String>,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
}

impl IngestConfig {
    /// Load ingestion settings from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            pdf_bucket: load_env("PDF_BUCKET")?,
            knowledge_base_id: load_env("BEDROCK_KB_ID")?,
            data_source_id: load_env("BEDROCK_DATA_SOURCE_ID")?,
            aws_region: load_env_optional("AWS_REGION"),
            rescan_marker: load_env_optional("RESCAN_KEY_MARKER")
                .map(|marker| marker.to_lowercase())
                .unwrap_or_else(|| DEFAULT_RESCAN_MARKER.to_string()),
            local_docs_dir: load_env_optional("LOCAL_DOCS_DIR")
                .unwrap_or_else(|| DEFAULT_LOCAL_DOCS_DIR.to_string())
                .into(),
        })
    }
}

impl FrontEndConfig {
    /// Load front end settings from environment variables.
    ///
    /// The knowledge base id is read from `BEDROCK_KB_ID`, falling back to `KNOWLEDGE_BASE_ID`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let knowledge_base_id = load_env_optional("BEDROCK_KB_ID")
            .or_else(|| load_env_optional("KNOWLEDGE_BASE_ID"))
            .ok_or_else(|| ConfigError::MissingVariable("BEDROCK_KB_ID".to_string()))?;

        Ok(Self {
            knowledge_base_id,
            agent_id: load_env("BEDROCK_AGENT_ID")?,
            agent_alias_id: load_env("BEDROCK_AGENT_ALIAS_ID")?,
            aws_region: load_env_optional("AWS_REGION"),
            server_port: load_env_optional("SERVER_PORT")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?,
        })
    }
}

fn load_env(key: &str) -> Result<String, ConfigError> {
    load_env_optional(key).ok_or_else(|| ConfigError::MissingVariable(key.to_string()))
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Load `.env` (if present) and the ingestion settings.
pub fn init_ingest_config() -> Result<IngestConfig, ConfigError> {
    dotenvy::dotenv().ok();
    let config = IngestConfig::from_env()?;
    tracing::debug!(
        bucket = %config.pdf_bucket,
        knowledge_base = %config.knowledge_base_id,
        data_source = %config.data_source_id,
        region = ?config.aws_region,
        marker = %config.rescan_marker,
        "Loaded ingestion configuration"
    );
    Ok(config)
}

/// Load `.env` (if present) and the front end settings.
pub fn init_frontend_config() -> Result<FrontEndConfig, ConfigError> {
    dotenvy::dotenv().ok();
    let config = FrontEndConfig::from_env()?;
    tracing::debug!(
        knowledge_base = %config.knowledge_base_id,
        agent = %config.agent_id,
        alias = %config.agent_alias_id,
        server_port = ?config.server_port,
        "Loaded front end configuration"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn set_env(key: &str, value: &str) {
        // SAFETY: every test touching the environment holds ENV_LOCK.
        unsafe { env::set_var(key, value) }
    }

    fn remove_env(key: &str) {
        // SAFETY: every test touching the environment holds ENV_LOCK.
        unsafe { env::remove_var(key) }
    }

    #[test]
    fn ingest_config_applies_defaults() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        set_env("PDF_BUCKET", "kb-pdfs");
        set_env("BEDROCK_KB_ID", "KB123");
        set_env("BEDROCK_DATA_SOURCE_ID", "DS456");
        remove_env("RESCAN_KEY_MARKER");
        remove_env("LOCAL_DOCS_DIR");

        let config = IngestConfig::from_env().expect("config");
        assert_eq!(config.pdf_bucket, "kb-pdfs");
        assert_eq!(config.knowledge_base_id, "KB123");
        assert_eq!(config.data_source_id, "DS456");
        assert_eq!(config.rescan_marker, "aws");
        assert_eq!(config.local_docs_dir, PathBuf::from("./docs"));
    }

    #[test]
    fn ingest_config_rejects_blank_bucket() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        set_env("PDF_BUCKET", "   ");
        set_env("BEDROCK_KB_ID", "KB123");
        set_env("BEDROCK_DATA_SOURCE_ID", "DS456");

        let err = IngestConfig::from_env().expect_err("blank bucket must fail");
        assert!(matches!(err, ConfigError::MissingVariable(ref key) if key == "PDF_BUCKET"));
    }

    #[test]
    fn frontend_config_falls_back_to_knowledge_base_id() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        remove_env("BEDROCK_KB_ID");
        set_env("KNOWLEDGE_BASE_ID", "KB-fallback");
        set_env("BEDROCK_AGENT_ID", "AGENT");
        set_env("BEDROCK_AGENT_ALIAS_ID", "ALIAS");
        remove_env("SERVER_PORT");

        let config = FrontEndConfig::from_env().expect("config");
        assert_eq!(config.knowledge_base_id, "KB-fallback");
        assert_eq!(config.server_port, None);
    }

    #[test]
    fn frontend_config_rejects_bad_port() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        set_env("BEDROCK_KB_ID", "KB123");
        set_env("BEDROCK_AGENT_ID", "AGENT");
        set_env("BEDROCK_AGENT_ALIAS_ID", "ALIAS");
        set_env("SERVER_PORT", "not-a-port");

        let err = FrontEndConfig::from_env().expect_err("bad port must fail");
        assert!(matches!(err, ConfigError::InvalidValue(ref key) if key == "SERVER_PORT"));
        remove_env("SERVER_PORT");
    }
}
