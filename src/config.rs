// src/config.rs
// =============================================================================
// This module turns the parsed command line into a validated run
// configuration.
//
// Everything that can be wrong with the user's input (a bad regular
// expression, an unknown HTTP method, a malformed header, a missing path)
// is detected here, before a single document is read. Those are caller
// bugs, not per-link conditions, so they abort the run.
//
// Rust concepts:
// - thiserror: Derive std::error::Error for our own error enum
// - FromStr / transpose: Optional values that may fail to parse
// =============================================================================

use crate::checker::{Classifier, RequestMethod, VerifyStrategy};
use crate::cli::Cli;
use crate::docs::IgnoreRules;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use std::path::PathBuf;
use thiserror::Error;

// http://www.useragentstring.com
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 6.1; WOW64; rv:64.0) Gecko/20100101 Firefox/64.0";

/// Name of the ignore file picked up from the root directory when
/// `--ignore-file` is not given.
pub const DEFAULT_IGNORE_FILE: &str = ".linkcheckignore";

/// Configuration-level failures. Any of these terminates the run before a
/// summary is printed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid exclude pattern '{pattern}': {source}")]
    InvalidExcludePattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid ignore pattern '{pattern}': {source}")]
    InvalidIgnorePattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("unknown retrieve method '{0}' (expected 'get' or 'head')")]
    UnknownMethod(String),

    #[error("invalid header '{0}' (expected 'Name: value')")]
    InvalidHeader(String),

    #[error("path not found: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("could not read ignore file {}: {source}", path.display())]
    IgnoreFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Everything one run needs, validated up front.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub root: PathBuf,
    pub ext: String,
    pub recurse: bool,
    pub local_only: bool,
    pub classifier: Classifier,
    pub method: Option<RequestMethod>,
    pub strategy: VerifyStrategy,
    pub headers: HeaderMap,
    pub ignore: IgnoreRules,
}

impl RunConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        if !cli.path.exists() {
            return Err(ConfigError::RootNotFound(cli.path.clone()));
        }

        let method = cli
            .method
            .as_deref()
            .map(str::parse::<RequestMethod>)
            .transpose()?;

        let strategy = if cli.sync {
            VerifyStrategy::Sequential
        } else {
            VerifyStrategy::Concurrent
        };

        let ignore = match &cli.ignore_file {
            Some(path) => IgnoreRules::from_file(path)?,
            None => {
                let candidate = cli.path.join(DEFAULT_IGNORE_FILE);
                if cli.path.is_dir() && candidate.is_file() {
                    IgnoreRules::from_file(&candidate)?
                } else {
                    IgnoreRules::default()
                }
            }
        };

        Ok(Self {
            root: cli.path.clone(),
            ext: normalize_ext(&cli.ext),
            recurse: cli.recurse,
            local_only: cli.local,
            classifier: Classifier::new(cli.domain.clone(), cli.exclude.as_slice())?,
            method,
            strategy,
            headers: build_headers(&cli.headers)?,
            ignore,
        })
    }
}

/// `md` and `.md` both mean the `.md` extension.
pub fn normalize_ext(ext: &str) -> String {
    if ext.is_empty() || ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{ext}")
    }
}

/// The default user agent plus any caller-supplied `Name: value` headers.
/// A caller-supplied User-Agent replaces the default one.
pub fn build_headers(extra: &[String]) -> Result<HeaderMap, ConfigError> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));

    for raw in extra {
        let (name, value) = raw
            .split_once(':')
            .ok_or_else(|| ConfigError::InvalidHeader(raw.clone()))?;
        let name = HeaderName::from_bytes(name.trim().as_bytes())
            .map_err(|_| ConfigError::InvalidHeader(raw.clone()))?;
        let value = HeaderValue::from_str(value.trim())
            .map_err(|_| ConfigError::InvalidHeader(raw.clone()))?;
        headers.insert(name, value);
    }

    Ok(headers)
}
