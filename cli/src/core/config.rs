//! # SupportBot Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! Loads, merges, and validates the TOML configuration that tells SupportBot
//! where its data files live, how the assistant speaks, how FAQ pages are
//! sized, where helpful votes are stored, and how the HTTP server binds.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. An explicit file (`--config` or `SUPPORTBOT_CONFIG`). When given, no
//!    other file is read.
//! 2. Project-specific `.supportbot.toml` in the current directory or an
//!    ancestor (the search stops at a directory containing `.git`)
//! 3. User-specific `config.toml` in the platform config directory
//! 4. Default values defined in the code
//!
//! Files 2 and 3 are merged key by key before deserializing: a key present in
//! the project file wins over the user file, whatever its value.
//!
//! Data file paths may use `~` and may be relative. Relative paths are
//! resolved against the directory of the file that declared them, so a
//! project file can say `knowledge_base = "data/kb.json"` and work from any
//! subdirectory.
//!
//! ## Example
//!
//! ```toml
//! [data]
//! knowledge_base = "data/knowledge-base.json"
//! dataset = "data/chatbot-dataset.json"
//! faq = "data/faq.json"
//!
//! [chat]
//! bot_name = "Billy"
//! default_tone = "casual"
//!
//! [votes]
//! endpoint = "https://project.supabase.co/rest/v1"
//! api_key = "anon-key"
//! ```
//!
use crate::core::error::{Result, SupportError};
use crate::engine::Tone;
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    net::{IpAddr, Ipv4Addr},
    path::{Path, PathBuf},
};
use toml::{Table, Value};
use tracing::{debug, info, warn};

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub faq: FaqConfig,
    #[serde(default)]
    pub votes: VotesConfig,
    #[serde(default)]
    pub server: ServerSection,
}

/// Locations of the JSON data files. Unset paths fall back to the
/// `data/` directory under the working directory.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DataConfig {
    pub knowledge_base: Option<String>,
    pub dataset: Option<String>,
    pub faq: Option<String>,
}

const DEFAULT_KNOWLEDGE_BASE: &str = "data/knowledge-base.json";
const DEFAULT_DATASET: &str = "data/chatbot-dataset.json";
const DEFAULT_FAQ: &str = "data/faq.json";

impl DataConfig {
    pub fn knowledge_base_path(&self) -> PathBuf {
        PathBuf::from(self.knowledge_base.as_deref().unwrap_or(DEFAULT_KNOWLEDGE_BASE))
    }

    pub fn dataset_path(&self) -> PathBuf {
        PathBuf::from(self.dataset.as_deref().unwrap_or(DEFAULT_DATASET))
    }

    pub fn faq_path(&self) -> PathBuf {
        PathBuf::from(self.faq.as_deref().unwrap_or(DEFAULT_FAQ))
    }
}

/// How the assistant presents itself.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    #[serde(default = "default_bot_name")]
    pub bot_name: String,
    /// Tone used when the caller does not pick one. Unset means detect it
    /// from each message.
    pub default_tone: Option<Tone>,
    #[serde(default = "default_fallback_message")]
    pub fallback_message: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            bot_name: default_bot_name(),
            default_tone: None,
            fallback_message: default_fallback_message(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FaqConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for FaqConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

/// Helpful-vote storage. Without an `endpoint`, votes are kept in memory
/// for the lifetime of the process.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct VotesConfig {
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    #[serde(default = "default_votes_table")]
    pub table: String,
    #[serde(default = "default_ip_lookup_url")]
    pub ip_lookup_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for VotesConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            table: default_votes_table(),
            ip_lookup_url: default_ip_lookup_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// `[server]` section, the file-level defaults for `supportbot srv`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,
    pub widget_dir: Option<String>,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            enable_cors: default_enable_cors(),
            widget_dir: None,
        }
    }
}

fn default_bot_name() -> String {
    "Billy".to_string()
}
fn default_fallback_message() -> String {
    "죄송합니다. 문의하신 내용에 대한 답변을 찾지 못했습니다. 다른 표현으로 다시 질문해 주세요."
        .to_string()
}
fn default_page_size() -> usize {
    10
}
fn default_votes_table() -> String {
    "faq_helpful".to_string()
}
fn default_ip_lookup_url() -> String {
    "https://api.ipify.org?format=json".to_string()
}
fn default_timeout_secs() -> u64 {
    5
}
pub(crate) fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}
pub(crate) fn default_port() -> u16 {
    8080
}
fn default_enable_cors() -> bool {
    true
}

const PROJECT_CONFIG_FILENAME: &str = ".supportbot.toml";

/// Keys holding filesystem paths, as `(section, key)`.
const PATH_KEYS: [(&str, &str); 4] = [
    ("data", "knowledge_base"),
    ("data", "dataset"),
    ("data", "faq"),
    ("server", "widget_dir"),
];

/// # Load Config (`load_config`)
///
/// Loads the explicit file when one is given. Otherwise the user file and
/// then the project file are merged key by key, so any key the project file
/// sets wins, even when it restates a default. The result is validated.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let config = match explicit {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            load_config_from_path(path)?
        }
        None => {
            let mut merged = Table::new();
            if let Some(user) = load_user_config()? {
                merge_tables(&mut merged, user);
            }
            if let Some(project) = load_project_config()? {
                merge_tables(&mut merged, project);
            }
            config_from_table(merged, "merged user and project configuration")?
        }
    };
    validate_config(&config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", config);
    Ok(config)
}

fn load_user_config() -> Result<Option<Table>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "SupportBot", "supportbot") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            read_config_table(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<Table>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    match find_project_config_path(&current_dir) {
        Some(path) => {
            info!("Loading project configuration from: {}", path.display());
            read_config_table(&path).map(Some)
        }
        None => {
            debug!("No project configuration file (.supportbot.toml) found.");
            Ok(None)
        }
    }
}

fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

/// Parses one TOML file and resolves its paths against its own directory.
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let table = read_config_table(path)?;
    config_from_table(table, &path.display().to_string())
}

/// Reads one TOML file as a raw table with its paths already resolved, so
/// tables from different directories can be merged.
fn read_config_table(path: &Path) -> Result<Table> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    let mut table: Table = content
        .parse()
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    expand_config_paths(&mut table, base_dir);
    Ok(table)
}

fn config_from_table(table: Table, origin: &str) -> Result<Config> {
    Value::Table(table)
        .try_into()
        .with_context(|| format!("Failed to parse TOML configuration from {}", origin))
}

/// Copies `overlay` into `base`. Nested tables merge; other values replace.
fn merge_tables(base: &mut Table, overlay: Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(Value::Table(existing)), Value::Table(incoming)) => {
                merge_tables(existing, incoming)
            }
            (Some(slot), value) => *slot = value,
            (None, value) => {
                base.insert(key, value);
            }
        }
    }
}

fn resolve_path(raw: &str, base_dir: &Path) -> String {
    let expanded = PathBuf::from(shellexpand::tilde(raw).into_owned());
    if expanded.is_absolute() {
        expanded.to_string_lossy().into_owned()
    } else {
        base_dir.join(expanded).to_string_lossy().into_owned()
    }
}

fn expand_config_paths(table: &mut Table, base_dir: &Path) {
    debug!("Expanding paths in configuration relative to {}", base_dir.display());
    for (section, key) in PATH_KEYS {
        let slot = table
            .get_mut(section)
            .and_then(Value::as_table_mut)
            .and_then(|section| section.get_mut(key));
        if let Some(Value::String(raw)) = slot {
            *raw = resolve_path(raw, base_dir);
            debug!("Expanded path: {}", raw);
        }
    }
}

fn validate_config(config: &Config) -> Result<()> {
    if config.faq.page_size == 0 {
        return Err(anyhow!(SupportError::Config(
            "faq.page_size must be at least 1.".to_string()
        )));
    }
    if config.votes.timeout_secs == 0 {
        return Err(anyhow!(SupportError::Config(
            "votes.timeout_secs must be at least 1.".to_string()
        )));
    }
    if let Some(endpoint) = &config.votes.endpoint {
        if !is_http_url(endpoint) {
            return Err(anyhow!(SupportError::Config(format!(
                "votes.endpoint '{}' must start with http:// or https://.",
                endpoint
            ))));
        }
    }
    if !is_http_url(&config.votes.ip_lookup_url) {
        return Err(anyhow!(SupportError::Config(format!(
            "votes.ip_lookup_url '{}' must start with http:// or https://.",
            config.votes.ip_lookup_url
        ))));
    }
    for path in [
        config.data.knowledge_base_path(),
        config.data.dataset_path(),
        config.data.faq_path(),
    ] {
        if !path.exists() {
            warn!("Configured data file '{}' does not exist.", path.display());
        }
    }
    if let Some(dir) = &config.server.widget_dir {
        let dir = Path::new(dir);
        if dir.exists() && !dir.is_dir() {
            return Err(anyhow!(SupportError::Config(format!(
                "Configured widget path '{}' exists but is not a directory.",
                dir.display()
            ))));
        }
    }
    Ok(())
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}
