//! Source configuration
//!
//! Each configured source arrives as an untyped YAML mapping. It is turned
//! into a typed [`SourceSpec`] here, once, so the update loop never does
//! ad-hoc field lookups. A source without a `kind` is dropped silently; any
//! other shape problem becomes a [`ConfigurationError`] that the update loop
//! reports before moving on.

use serde::Deserialize;
use serde_yaml_ng::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Kind value for sources that rebuild a catalog from the lines forum
pub const KIND_LINES: &str = "lines";

/// Kind value for sources that fetch a prebuilt file verbatim
pub const KIND_DOWNLOAD: &str = "download";

/// A validated source definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    /// Gather projects and write a fresh catalog to `output`
    Lines { output: String },

    /// Fetch `url` and write the body to `output` unmodified
    Download { output: String, url: String },
}

impl SourceSpec {
    pub fn kind(&self) -> &'static str {
        match self {
            SourceSpec::Lines { .. } => KIND_LINES,
            SourceSpec::Download { .. } => KIND_DOWNLOAD,
        }
    }

    /// Output path before environment expansion
    pub fn output(&self) -> &str {
        match self {
            SourceSpec::Lines { output } | SourceSpec::Download { output, .. } => output,
        }
    }
}

/// Problems with a single source definition; never fatal to a run
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("missing '{field}' value config for source")]
    MissingField { field: &'static str },

    #[error("unrecognized catalog source: {kind}")]
    UnrecognizedKind { kind: String },

    #[error("malformed source config: {reason}")]
    Malformed { reason: String },
}

/// Sources keyed by name, in processing order
pub type ParsedSources = BTreeMap<String, Result<SourceSpec, ConfigurationError>>;

/// Raw per-source fields as they appear in the settings file
#[derive(Debug, Deserialize)]
struct RawSource {
    kind: Option<String>,
    output: Option<String>,
    url: Option<String>,
}

/// Parse one source value.
///
/// Returns `None` when the source has no `kind` at all.
pub fn parse_source(value: &Value) -> Option<Result<SourceSpec, ConfigurationError>> {
    let mapping = match value.as_mapping() {
        Some(mapping) => mapping,
        None => {
            return Some(Err(ConfigurationError::Malformed {
                reason: "expected a mapping".to_string(),
            }))
        }
    };

    if !mapping.contains_key("kind") {
        return None;
    }

    let raw: RawSource = match serde_yaml_ng::from_value(value.clone()) {
        Ok(raw) => raw,
        Err(e) => {
            return Some(Err(ConfigurationError::Malformed {
                reason: e.to_string(),
            }))
        }
    };

    Some(raw.into_spec())
}

/// Parse every configured source, dropping those without a `kind`
pub fn parse_sources(sources: &BTreeMap<String, Value>) -> ParsedSources {
    sources
        .iter()
        .filter_map(|(key, value)| match parse_source(value) {
            Some(parsed) => Some((key.clone(), parsed)),
            None => {
                tracing::debug!("Ignoring source '{}' without a kind", key);
                None
            }
        })
        .collect()
}

impl RawSource {
    fn into_spec(self) -> Result<SourceSpec, ConfigurationError> {
        let kind = self.kind.ok_or_else(|| ConfigurationError::Malformed {
            reason: "kind must be a string".to_string(),
        })?;

        match kind.as_str() {
            KIND_LINES => {
                let output = self
                    .output
                    .ok_or(ConfigurationError::MissingField { field: "output" })?;
                Ok(SourceSpec::Lines { output })
            }
            KIND_DOWNLOAD => {
                let output = self
                    .output
                    .ok_or(ConfigurationError::MissingField { field: "output" })?;
                let url = self
                    .url
                    .ok_or(ConfigurationError::MissingField { field: "url" })?;
                Ok(SourceSpec::Download { output, url })
            }
            _ => Err(ConfigurationError::UnrecognizedKind { kind }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Value {
        serde_yaml_ng::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_lines_source() {
        let parsed = parse_source(&yaml("kind: lines\noutput: $HOME/lines.json")).unwrap();
        assert_eq!(
            parsed,
            Ok(SourceSpec::Lines {
                output: "$HOME/lines.json".to_string()
            })
        );
    }

    #[test]
    fn test_parse_download_source() {
        let parsed = parse_source(&yaml(
            "kind: download\noutput: /tmp/out.txt\nurl: http://x/y",
        ))
        .unwrap()
        .unwrap();
        assert_eq!(parsed.kind(), KIND_DOWNLOAD);
        assert_eq!(parsed.output(), "/tmp/out.txt");
    }

    #[test]
    fn test_missing_kind_is_dropped() {
        assert!(parse_source(&yaml("output: /tmp/out.txt")).is_none());
    }

    #[test]
    fn test_download_checks_output_before_url() {
        let parsed = parse_source(&yaml("kind: download")).unwrap();
        assert_eq!(
            parsed,
            Err(ConfigurationError::MissingField { field: "output" })
        );

        let parsed = parse_source(&yaml("kind: download\noutput: /tmp/x")).unwrap();
        assert_eq!(parsed, Err(ConfigurationError::MissingField { field: "url" }));
    }

    #[test]
    fn test_unrecognized_kind() {
        let parsed = parse_source(&yaml("kind: bogus")).unwrap();
        assert_eq!(
            parsed,
            Err(ConfigurationError::UnrecognizedKind {
                kind: "bogus".to_string()
            })
        );
    }

    #[test]
    fn test_mistyped_fields_are_malformed() {
        let parsed = parse_source(&yaml("kind: lines\noutput: [a, b]")).unwrap();
        assert!(matches!(parsed, Err(ConfigurationError::Malformed { .. })));

        let parsed = parse_source(&yaml("just-a-string")).unwrap();
        assert!(matches!(parsed, Err(ConfigurationError::Malformed { .. })));
    }

    #[test]
    fn test_parse_sources_is_sorted_and_skips_kindless() {
        let mut raw = BTreeMap::new();
        raw.insert("zeta".to_string(), yaml("kind: lines\noutput: /z"));
        raw.insert("alpha".to_string(), yaml("kind: bogus"));
        raw.insert("middle".to_string(), yaml("output: /m"));

        let parsed = parse_sources(&raw);
        let keys: Vec<&str> = parsed.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["alpha", "zeta"]);
    }
}
