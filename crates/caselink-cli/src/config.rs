//! Run configuration loaded from `caselink.toml`.
//!
//! Every field has a default, so the file is optional. Example:
//!
//! ```toml
//! [normalization]
//! min_token_len = 3
//! extra_stopwords = ["estate of"]
//!
//! [email]
//! firm_domains = ["smithlaw.com"]
//!
//! [call]
//! internal_numbers = ["502-555-0100"]
//!
//! [[document.rules]]
//! name = "archive"
//! segment = 1
//! matcher = { kind = "named", names = ["archive", "closed cases"] }
//!
//! [resolver]
//! strategies = ["identity", "code", "exact_name"]
//!
//! [writer]
//! batch_size = 500
//! protect_manual = true
//!
//! [report]
//! top_unmatched = 20
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use caselink_ingest::{AdapterOptions, CallOptions, DocumentOptions, EmailOptions};
use caselink_map::ResolverOptions;
use caselink_normalization::{CodePatterns, NormalizationError, NormalizationOptions};
use caselink_report::DEFAULT_TOP_UNMATCHED;
use caselink_store::WriterOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Config file looked up in the data directory when `--config` is absent.
pub const CONFIG_FILE_NAME: &str = "caselink.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(transparent)]
    Pattern(#[from] NormalizationError),

    #[error("resolver.strategies must name at least one strategy")]
    NoStrategies,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    /// Number of unmatched labels listed in the report.
    pub top_unmatched: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            top_unmatched: DEFAULT_TOP_UNMATCHED,
        }
    }
}

/// All tunables of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    pub normalization: NormalizationOptions,
    pub codes: CodePatterns,
    pub email: EmailOptions,
    pub call: CallOptions,
    pub document: DocumentOptions,
    pub resolver: ResolverOptions,
    pub writer: WriterOptions,
    pub report: ReportOptions,
}

impl LinkConfig {
    /// Parses a TOML document. `path` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for invalid TOML, unknown strategy
    /// names or mistyped values.
    pub fn from_toml_str(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read, otherwise
    /// see [`LinkConfig::from_toml_str`].
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content, path)
    }

    pub fn adapter_options(&self) -> AdapterOptions {
        AdapterOptions {
            email: self.email.clone(),
            call: self.call.clone(),
            document: self.document.clone(),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.resolver.strategies.is_empty() {
            return Err(ConfigError::NoStrategies);
        }
        Ok(())
    }
}

/// Loads the run configuration.
///
/// An explicit path must exist. Without one, `<data_dir>/caselink.toml`
/// is used if present and the defaults otherwise.
///
/// # Errors
///
/// See [`LinkConfig::from_path`].
pub fn load_config(explicit: Option<&Path>, data_dir: &Path) -> Result<LinkConfig, ConfigError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let candidate = data_dir.join(CONFIG_FILE_NAME);
            if !candidate.is_file() {
                debug!("no config file found, using defaults");
                return Ok(LinkConfig::default());
            }
            candidate
        }
    };
    debug!(path = %path.display(), "loading config");
    LinkConfig::from_path(&path)
}

#[cfg(test)]
mod tests {
    use caselink_map::StrategyKind;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = LinkConfig::from_toml_str("", Path::new("caselink.toml")).unwrap();
        assert_eq!(config, LinkConfig::default());
        assert_eq!(config.report.top_unmatched, 20);
        assert_eq!(config.writer.batch_size, 500);
        assert!(config.writer.protect_manual);
        assert_eq!(config.resolver.strategies.len(), 6);
    }

    #[test]
    fn sections_override_defaults() {
        let content = r#"
[normalization]
min_token_len = 4

[email]
firm_domains = ["smithlaw.com"]

[resolver]
strategies = ["code", "identity"]

[writer]
batch_size = 50
protect_manual = false

[report]
top_unmatched = 5
"#;
        let config = LinkConfig::from_toml_str(content, Path::new("caselink.toml")).unwrap();
        assert_eq!(config.normalization.min_token_len, 4);
        assert_eq!(config.adapter_options().email.firm_domains, vec!["smithlaw.com"]);
        assert_eq!(
            config.resolver.strategies,
            vec![StrategyKind::Code, StrategyKind::Identity]
        );
        assert_eq!(config.writer.batch_size, 50);
        assert!(!config.writer.protect_manual);
        assert_eq!(config.report.top_unmatched, 5);
    }

    #[test]
    fn unknown_strategy_and_empty_chain_are_rejected() {
        let err = LinkConfig::from_toml_str(
            "[resolver]\nstrategies = [\"fuzzy\"]\n",
            Path::new("caselink.toml"),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));

        let err = LinkConfig::from_toml_str("[resolver]\nstrategies = []\n", Path::new("c.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::NoStrategies));
    }

    #[test]
    fn load_prefers_explicit_then_data_dir() {
        let dir = tempdir().unwrap();
        assert_eq!(load_config(None, dir.path()).unwrap(), LinkConfig::default());

        fs::write(dir.path().join(CONFIG_FILE_NAME), "[report]\ntop_unmatched = 3\n").unwrap();
        assert_eq!(load_config(None, dir.path()).unwrap().report.top_unmatched, 3);

        let explicit = dir.path().join("other.toml");
        fs::write(&explicit, "[report]\ntop_unmatched = 7\n").unwrap();
        assert_eq!(
            load_config(Some(&explicit), dir.path())
                .unwrap()
                .report
                .top_unmatched,
            7
        );

        let missing = dir.path().join("missing.toml");
        assert!(matches!(
            load_config(Some(&missing), dir.path()).unwrap_err(),
            ConfigError::Read { .. }
        ));
    }
}
