// SPDX-License-Identifier: MIT

//! Process configuration, resolved once from the environment

use crate::adk::error::ConfigError;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const API_KEY_VAR: &str = "OPENROUTER_API_KEY";
pub const BASE_URL_VAR: &str = "OPENROUTER_BASE_URL";
pub const MODEL_VAR: &str = "LINKPOST_MODEL";
pub const OUTPUT_DIR_VAR: &str = "LINKPOST_OUTPUT_DIR";
pub const MAX_RETRIES_VAR: &str = "LINKPOST_MAX_RETRIES";
pub const APPROVAL_TIMEOUT_VAR: &str = "LINKPOST_APPROVAL_TIMEOUT_SECS";
pub const TEMPLATES_VAR: &str = "LINKPOST_TEMPLATES";

const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_MODEL: &str = "anthropic/claude-sonnet-4.5";
const DEFAULT_OUTPUT_DIR: &str = "outputs";
const DEFAULT_MAX_RETRIES: u32 = 3;
const DEFAULT_APPROVAL_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: Url,
    pub model_name: String,
    pub output_dir: PathBuf,
    pub max_retries: u32,
    pub approval_timeout: Duration,
    /// Optional YAML file with extra post templates
    pub templates_file: Option<PathBuf>,
}

impl Config {
    /// Load from the process environment.
    ///
    /// A missing `OPENROUTER_API_KEY` fails here, before any service is built.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get(API_KEY_VAR).ok_or_else(|| ConfigError::MissingVar(API_KEY_VAR.into()))?;

        let raw_url = get(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url =
            Url::parse(&raw_url).map_err(|e| ConfigError::invalid(BASE_URL_VAR, e.to_string()))?;

        let max_retries = match get(MAX_RETRIES_VAR) {
            Some(v) => v.trim().parse().map_err(|_| {
                ConfigError::invalid(MAX_RETRIES_VAR, format!("'{}' is not a count", v))
            })?,
            None => DEFAULT_MAX_RETRIES,
        };

        let timeout_secs = match get(APPROVAL_TIMEOUT_VAR) {
            Some(v) => v.trim().parse().map_err(|_| {
                ConfigError::invalid(
                    APPROVAL_TIMEOUT_VAR,
                    format!("'{}' is not a number of seconds", v),
                )
            })?,
            None => DEFAULT_APPROVAL_TIMEOUT_SECS,
        };

        Ok(Self {
            api_key,
            base_url,
            model_name: get(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            output_dir: get(OUTPUT_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            max_retries,
            approval_timeout: Duration::from_secs(timeout_secs),
            templates_file: get(TEMPLATES_VAR).map(PathBuf::from),
        })
    }
}
