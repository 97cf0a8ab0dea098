// src/config/document.rs

//! On-disk layout of the configuration file
//!
//! ```yaml
//! default_repository: rstuf
//! repositories:
//!   rstuf:
//!     artifact_base_url: https://rstuf.org
//!     metadata_url: https://metadata.rstuf.org
//!     trusted_root: eyJzaWduZWQiOi...
//!     hash_prefix: false
//! ```
//!
//! Missing fields read as empty so hand-edited files still load; the
//! download path reports whatever is left empty.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::{Configuration, RepositoryProfile};
use crate::error::{Error, Result};

#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigDocument {
    #[serde(default)]
    default_repository: Option<String>,
    #[serde(default)]
    repositories: BTreeMap<String, RepositoryRecord>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct RepositoryRecord {
    artifact_base_url: String,
    metadata_url: String,
    trusted_root: String,
    hash_prefix: bool,
}

/// Parse configuration file contents
pub(super) fn parse(text: &str, path: &Path) -> Result<Configuration> {
    if text.trim().is_empty() {
        return Ok(Configuration::default());
    }

    let document: ConfigDocument =
        serde_yaml::from_str(text).map_err(|e| Error::ConfigFormat {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let repositories = document
        .repositories
        .into_iter()
        .map(|(name, record)| {
            let profile = RepositoryProfile {
                name: name.clone(),
                metadata_url: record.metadata_url,
                artifact_base_url: record.artifact_base_url,
                trusted_root: record.trusted_root,
                hash_prefix: record.hash_prefix,
            };
            (name, profile)
        })
        .collect();

    Ok(Configuration {
        default_repository: document.default_repository.filter(|name| !name.is_empty()),
        repositories,
    })
}

/// Render a configuration as file contents
pub(super) fn render(config: &Configuration, path: &Path) -> Result<String> {
    let document = ConfigDocument {
        default_repository: Some(config.default_repository.clone().unwrap_or_default()),
        repositories: config
            .repositories
            .values()
            .map(|profile| {
                let record = RepositoryRecord {
                    artifact_base_url: profile.artifact_base_url.clone(),
                    metadata_url: profile.metadata_url.clone(),
                    trusted_root: profile.trusted_root.clone(),
                    hash_prefix: profile.hash_prefix,
                };
                (profile.name.clone(), record)
            })
            .collect(),
    };

    serde_yaml::to_string(&document).map_err(|e| Error::ConfigFormat {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> &'static Path {
        Path::new("config.yml")
    }

    #[test]
    fn test_parse_full_document() {
        let yaml = r#"
default_repository: rstuf
repositories:
  rstuf:
    artifact_base_url: https://rstuf.org
    metadata_url: https://metadata.rstuf.org
    trusted_root: MTIz
    hash_prefix: true
"#;
        let config = parse(yaml, path()).unwrap();
        assert_eq!(config.default_name(), Some("rstuf"));
        let profile = config.get("rstuf").unwrap();
        assert_eq!(profile.metadata_url, "https://metadata.rstuf.org");
        assert_eq!(profile.artifact_base_url, "https://rstuf.org");
        assert_eq!(profile.trusted_root, "MTIz");
        assert!(profile.hash_prefix);
    }

    #[test]
    fn test_parse_empty_default_and_missing_fields() {
        let yaml = r#"
default_repository: ""
repositories:
  partial:
    metadata_url: https://metadata.example.com
"#;
        let config = parse(yaml, path()).unwrap();
        assert_eq!(config.default_name(), None);
        let profile = config.get("partial").unwrap();
        assert!(profile.artifact_base_url.is_empty());
        assert!(!profile.hash_prefix);
    }

    #[test]
    fn test_parse_blank_file() {
        let config = parse("\n  \n", path()).unwrap();
        assert!(config.is_empty());
    }

    #[test]
    fn test_parse_garbage() {
        let err = parse("repositories: [1, 2", path()).unwrap_err();
        assert!(matches!(err, Error::ConfigFormat { .. }));
    }

    #[test]
    fn test_render_then_parse() {
        let mut config = Configuration::default();
        config
            .add(
                RepositoryProfile::new("kairo", "https://m.example", "https://a.example", "MTIz")
                    .with_hash_prefix(true),
                true,
            )
            .unwrap();

        let text = render(&config, path()).unwrap();
        assert!(text.contains("default_repository: kairo"));
        assert!(text.contains("hash_prefix: true"));
        assert_eq!(parse(&text, path()).unwrap(), config);
    }
}
