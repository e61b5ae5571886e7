//! Configuration management for redline.
//!
//! Configuration is loaded from multiple sources and merged, later sources
//! winning field by field:
//! 1. Global config: `~/.config/redline/config.json`
//! 2. Environment variable: `REDLINE_CONFIG_CONTENT`
//! 3. Project config: `redline.jsonc` or `redline.json` in the working directory
//!
//! Files are JSONC (JSON with `//` and `/* */` comments) and may reference
//! `{env:VAR_NAME}` and `{file:path}`; file paths are relative to the
//! config file.

use crate::error::{ConfigError, CoreResult};
use redline_tracking::{DiffOptions, EngineSettings};
use redline_util::log::LogLevel;
use redline_util::path::{default_documents_dir, expand_home};
use redline_util::DocumentResolver;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Environment variable holding inline config content.
pub const CONFIG_CONTENT_ENV: &str = "REDLINE_CONFIG_CONTENT";

/// Project config file names, in lookup order.
const PROJECT_FILES: &[&str] = &["redline.jsonc", "redline.json"];

/// Global config file names, in lookup order.
const GLOBAL_FILES: &[&str] = &["config.json", "config.jsonc", "redline.json"];

static VAR_REGEX: OnceLock<Regex> = OnceLock::new();

fn var_regex() -> &'static Regex {
    VAR_REGEX.get_or_init(|| {
        Regex::new(r"\{(env|file):([^}]+)\}")
            .expect("Invalid regex pattern - this is a compile-time constant")
    })
}

/// Main configuration structure.
///
/// Every field is optional so that partial files merge cleanly; the
/// accessors below supply defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// JSON Schema reference.
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Log level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<LogLevel>,

    /// Directory bare document names resolve against. Defaults to `~/Documents`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents_dir: Option<String>,

    /// Refuse documents outside `documents_dir`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confine_to_root: Option<bool>,

    /// Context lines around each diff hunk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_context_lines: Option<usize>,

    /// Lines returned by a read with no limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_limit: Option<usize>,

    /// Lines shown around an edit in its confirmation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snippet_context_lines: Option<usize>,

    /// Largest document that will be loaded, in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_file_size: Option<u64>,
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Returns the merged config and the files it came from.
    pub async fn load(project_dir: Option<&Path>) -> CoreResult<(Self, Vec<PathBuf>)> {
        let mut config = Config::default();
        let mut sources = Vec::new();

        if let Some(global_dir) = Self::global_config_dir() {
            if let Some(path) = first_existing(&global_dir, GLOBAL_FILES) {
                config = config.merge(Self::load_file(&path).await?);
                sources.push(path);
            }
        }

        if let Ok(content) = std::env::var(CONFIG_CONTENT_ENV) {
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            let content = Self::substitute_variables(&content, &cwd.join("<env>"))?;
            config = config.merge(Self::parse_jsonc(&content, "<env>")?);
        }

        if let Some(dir) = project_dir {
            if let Some(path) = first_existing(dir, PROJECT_FILES) {
                config = config.merge(Self::load_file(&path).await?);
                sources.push(path);
            }
        }

        config.validate()?;
        tracing::debug!(sources = ?sources, "Loaded configuration");
        Ok((config, sources))
    }

    /// Get the global config directory.
    ///
    /// On Unix, `~/.config/redline` is used when it exists, even where the
    /// platform config directory is elsewhere (macOS).
    pub fn global_config_dir() -> Option<PathBuf> {
        #[cfg(unix)]
        {
            if let Some(home) = dirs::home_dir() {
                let xdg_config = home.join(".config").join("redline");
                if xdg_config.exists() {
                    return Some(xdg_config);
                }
            }
        }

        redline_util::path::config_dir()
    }

    /// Load configuration from a file.
    pub async fn load_file(path: &Path) -> CoreResult<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let content = Self::substitute_variables(&content, path)?;
        Self::parse_jsonc(&content, &path.display().to_string())
    }

    /// Parse JSONC (JSON with comments).
    pub fn parse_jsonc(content: &str, source: &str) -> CoreResult<Self> {
        let stripped = Self::strip_comments(content);

        serde_json::from_str(&stripped).map_err(|e| {
            ConfigError::InvalidJson {
                path: source.to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Strip `//` and `/* */` comments outside string literals.
    ///
    /// Newlines inside comments are kept so parse errors point at the right line.
    fn strip_comments(input: &str) -> String {
        #[derive(Clone, Copy, PartialEq)]
        enum State {
            Code,
            Str,
            StrEscape,
            Line,
            Block,
            BlockStar,
        }

        let mut out = String::with_capacity(input.len());
        let mut state = State::Code;
        let mut chars = input.chars().peekable();

        while let Some(c) = chars.next() {
            state = match (state, c) {
                (State::Code, '"') => {
                    out.push(c);
                    State::Str
                }
                (State::Code, '/') if chars.peek() == Some(&'/') => {
                    chars.next();
                    State::Line
                }
                (State::Code, '/') if chars.peek() == Some(&'*') => {
                    chars.next();
                    State::Block
                }
                (State::Code, _) => {
                    out.push(c);
                    State::Code
                }
                (State::Str, '\\') => {
                    out.push(c);
                    State::StrEscape
                }
                (State::Str, '"') => {
                    out.push(c);
                    State::Code
                }
                (State::Str, _) | (State::StrEscape, _) => {
                    out.push(c);
                    State::Str
                }
                (State::Line, '\n') => {
                    out.push(c);
                    State::Code
                }
                (State::Line, _) => State::Line,
                (State::Block | State::BlockStar, '\n') => {
                    out.push(c);
                    State::Block
                }
                (State::Block | State::BlockStar, '*') => State::BlockStar,
                (State::BlockStar, '/') => State::Code,
                (State::Block | State::BlockStar, _) => State::Block,
            };
        }

        out
    }

    /// Replace `{env:NAME}` and `{file:path}` references.
    ///
    /// The first reference that cannot be resolved is reported.
    fn substitute_variables(content: &str, config_path: &Path) -> CoreResult<String> {
        let config_dir = config_path.parent().unwrap_or(Path::new("."));
        let mut failure: Option<ConfigError> = None;

        let result = var_regex().replace_all(content, |cap: &Captures<'_>| {
            let value = &cap[2];
            let resolved = match &cap[1] {
                "env" => std::env::var(value).map_err(|_| ConfigError::EnvVarNotFound {
                    name: value.to_string(),
                }),
                _ => {
                    let file_path = config_dir.join(expand_home(value));
                    std::fs::read_to_string(&file_path)
                        .map(|v| v.trim().to_string())
                        .map_err(|_| ConfigError::FileRefNotFound {
                            path: file_path.display().to_string(),
                        })
                }
            };

            match resolved {
                Ok(v) => v,
                Err(e) => {
                    failure.get_or_insert(e);
                    cap[0].to_string()
                }
            }
        });

        match failure {
            Some(e) => Err(e.into()),
            None => Ok(result.into_owned()),
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(self, other: Self) -> Self {
        Self {
            schema: other.schema.or(self.schema),
            log_level: other.log_level.or(self.log_level),
            documents_dir: other.documents_dir.or(self.documents_dir),
            confine_to_root: other.confine_to_root.or(self.confine_to_root),
            diff_context_lines: other.diff_context_lines.or(self.diff_context_lines),
            read_limit: other.read_limit.or(self.read_limit),
            snippet_context_lines: other.snippet_context_lines.or(self.snippet_context_lines),
            max_file_size: other.max_file_size.or(self.max_file_size),
        }
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.read_limit == Some(0) {
            return Err(ConfigError::validation("read_limit must be greater than 0"));
        }
        if self.max_file_size == Some(0) {
            return Err(ConfigError::validation(
                "max_file_size must be greater than 0",
            ));
        }
        Ok(())
    }

    /// Effective log level.
    pub fn log_level(&self) -> LogLevel {
        self.log_level.unwrap_or_default()
    }

    /// Effective documents root.
    pub fn documents_root(&self) -> Result<PathBuf, ConfigError> {
        match &self.documents_dir {
            Some(dir) => Ok(expand_home(dir)),
            None => default_documents_dir().ok_or_else(|| {
                ConfigError::InvalidPath("Could not determine the documents directory".to_string())
            }),
        }
    }

    /// A resolver for the documents root.
    pub fn resolver(&self) -> Result<DocumentResolver, ConfigError> {
        Ok(DocumentResolver::new(self.documents_root()?)
            .confined(self.confine_to_root.unwrap_or(false)))
    }

    /// Engine settings, with defaults for anything unset.
    pub fn engine_settings(&self) -> EngineSettings {
        let defaults = EngineSettings::default();
        EngineSettings {
            diff: DiffOptions {
                context_lines: self
                    .diff_context_lines
                    .unwrap_or(defaults.diff.context_lines),
            },
            read_limit: self.read_limit.unwrap_or(defaults.read_limit),
            snippet_context_lines: self
                .snippet_context_lines
                .unwrap_or(defaults.snippet_context_lines),
            max_file_size: self.max_file_size.unwrap_or(defaults.max_file_size),
        }
    }
}

fn first_existing(dir: &Path, names: &[&str]) -> Option<PathBuf> {
    names.iter().map(|name| dir.join(name)).find(|p| p.exists())
}
