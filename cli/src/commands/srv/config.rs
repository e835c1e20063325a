//! # SupportBot Server Configuration
//!
//! File: cli/src/commands/srv/config.rs
//!
//! ## Overview
//!
//! Resolves the effective settings for `supportbot srv` from two sources:
//!
//! 1. Command-line flags (`--port`, `--host`, `--no-cors`, `--widget-dir`)
//! 2. The `[server]` section of the loaded configuration
//!
//! A flag wins when the user actually changed it. A flag left at its clap
//! default yields to the configuration file, so `port = 9000` in
//! `.supportbot.toml` applies unless `--port` is passed.
//!
//! The optional widget directory (a built chat widget or FAQ page) is
//! canonicalized and must be a directory.
//!
use crate::core::config::ServerSection;
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;
use std::net::IpAddr;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser, Debug)]
pub struct SrvArgs {
    /// Port to listen on. The next free port is used when it is taken.
    #[arg(long, short, default_value_t = 8080)]
    pub port: u16,

    /// Address to bind.
    #[arg(long, default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Disable the permissive CORS layer.
    #[arg(long)]
    pub no_cors: bool,

    /// Directory with static widget files to serve at `/`.
    #[arg(long)]
    pub widget_dir: Option<PathBuf>,
}

/// Effective server settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    pub host: IpAddr,
    pub enable_cors: bool,
    pub widget_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_section(&ServerSection::default())
    }
}

impl ServerConfig {
    fn from_section(section: &ServerSection) -> Self {
        Self {
            port: section.port,
            host: section.host,
            enable_cors: section.enable_cors,
            widget_dir: section.widget_dir.as_ref().map(PathBuf::from),
        }
    }

    async fn resolve_widget_dir(&mut self) -> Result<()> {
        let Some(dir) = &self.widget_dir else {
            return Ok(());
        };
        let canonical = tokio::fs::canonicalize(dir)
            .await
            .with_context(|| format!("Widget directory '{}' could not be found or accessed", dir.display()))?;
        let metadata = tokio::fs::metadata(&canonical)
            .await
            .with_context(|| format!("Failed to get metadata for path '{}'", canonical.display()))?;
        if !metadata.is_dir() {
            anyhow::bail!("Widget path is not a directory: {}", canonical.display());
        }
        debug!("Resolved widget directory to: {}", canonical.display());
        self.widget_dir = Some(canonical);
        Ok(())
    }
}

/// # Merge Server Config (`merge_server_config`)
///
/// Starts from the `[server]` section and applies every flag that differs
/// from its default.
pub async fn merge_server_config(args: SrvArgs, section: &ServerSection) -> Result<ServerConfig> {
    let cli_defaults = SrvArgs::parse_from(["srv"]);
    let mut effective = ServerConfig::from_section(section);

    if args.port != cli_defaults.port {
        effective.port = args.port;
    }
    if args.host != cli_defaults.host {
        effective.host = args.host;
    }
    if args.no_cors {
        effective.enable_cors = false;
    }
    if let Some(dir) = args.widget_dir {
        effective.widget_dir = Some(dir);
    }

    effective.resolve_widget_dir().await?;
    debug!("Effective server config: {:?}", effective);
    Ok(effective)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn section(toml_text: &str) -> ServerSection {
        toml::from_str(toml_text).unwrap()
    }

    #[tokio::test]
    async fn test_defaults_when_nothing_is_set() -> Result<()> {
        let config = merge_server_config(SrvArgs::parse_from(["srv"]), &ServerSection::default()).await?;
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.port, 8080);
        assert!(config.enable_cors);
        assert_eq!(config.widget_dir, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_file_values_apply_when_flags_are_default() -> Result<()> {
        let file = section("port = 9090\nhost = \"0.0.0.0\"\nenable_cors = false\n");
        let config = merge_server_config(SrvArgs::parse_from(["srv"]), &file).await?;
        assert_eq!(config.port, 9090);
        assert_eq!(config.host.to_string(), "0.0.0.0");
        assert!(!config.enable_cors);
        Ok(())
    }

    #[tokio::test]
    async fn test_flags_override_file() -> Result<()> {
        let file = section("port = 9090\nhost = \"0.0.0.0\"\n");
        let args = SrvArgs::parse_from(["srv", "--port", "9999", "--host", "10.0.0.1", "--no-cors"]);
        let config = merge_server_config(args, &file).await?;
        assert_eq!(config.port, 9999);
        assert_eq!(config.host.to_string(), "10.0.0.1");
        assert!(!config.enable_cors);
        Ok(())
    }

    #[tokio::test]
    async fn test_widget_dir_is_canonicalized() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let widget = temp_dir.path().join("widget");
        fs::create_dir(&widget)?;

        let args = SrvArgs::parse_from(["srv", "--widget-dir", widget.to_str().unwrap()]);
        let config = merge_server_config(args, &ServerSection::default()).await?;
        assert_eq!(config.widget_dir, Some(fs::canonicalize(&widget)?));
        Ok(())
    }

    #[tokio::test]
    async fn test_widget_dir_must_exist_and_be_a_directory() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let file = temp_dir.path().join("index.html");
        fs::write(&file, "<html></html>")?;

        let not_dir = SrvArgs::parse_from(["srv", "--widget-dir", file.to_str().unwrap()]);
        assert!(merge_server_config(not_dir, &ServerSection::default()).await.is_err());

        let missing = SrvArgs::parse_from(["srv", "--widget-dir", "/path/that/does/not/exist"]);
        assert!(merge_server_config(missing, &ServerSection::default()).await.is_err());
        Ok(())
    }
}
