//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.streems/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//!
//! Validation errors (no channel, or `--auth` without a username/token) are
//! returned as [`ConfigError`]; only `main` decides to exit.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::bridge::DEFAULT_CAPACITY;
use crate::core::mention::MentionMatch;
use crate::core::message::{Rgb, resolve_color};
use crate::core::state::{DEFAULT_MAX_HISTORY, SessionConfig};

/// Username, also the default channel.
pub const ENV_USER: &str = "TWUSER";
/// OAuth token used when `--auth` is set.
pub const ENV_TOKEN: &str = "TT";

pub const DEFAULT_SELF_COLOR: &str = "#FF00FF";

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StreemsConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub twitch: TwitchConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub username: Option<String>,
    pub channel: Option<String>,
    pub max_history: Option<usize>,
    pub mention_match: Option<MentionMatch>,
    pub show_timestamps: Option<bool>,
    pub self_color: Option<String>,
    pub bridge_capacity: Option<usize>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TwitchConfig {
    pub token: Option<String>,
}

/// Values from the command line. `None` means the flag was not given.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub user: Option<String>,
    pub channel: Option<String>,
    pub auth: bool,
    pub mention_match: Option<MentionMatch>,
}

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub session: SessionConfig,
    /// Present iff `session.authenticated`.
    pub token: Option<String>,
    pub max_history: usize,
    pub mention: MentionMatch,
    pub show_timestamps: bool,
    pub self_color: Rgb,
    pub bridge_capacity: usize,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    MissingChannel,
    MissingUser,
    MissingToken,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
            ConfigError::MissingChannel => write!(
                f,
                "channel is missing, set the {ENV_USER} env var or pass --channel"
            ),
            ConfigError::MissingUser => write!(
                f,
                "user is missing, set the {ENV_USER} env var or pass --user"
            ),
            ConfigError::MissingToken => write!(
                f,
                "oauth token is missing, set the {ENV_TOKEN} env var or [twitch] token in the config file"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.streems/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".streems").join("config.toml"))
}

/// Load config from `~/.streems/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `StreemsConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<StreemsConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(StreemsConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(StreemsConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: StreemsConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r##"# streems configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults -> this file -> env vars -> CLI flags.

# [general]
# username = "your_login"            # Or set TWUSER env var
# channel = "some_streamer"          # Defaults to username (your own channel)
# max_history = 5000                 # Oldest lines are dropped past this
# mention_match = "substring"        # "substring" or "word"
# show_timestamps = false
# self_color = "#FF00FF"             # Color for your own echoed messages
# bridge_capacity = 200              # Inbound queue size

# [twitch]
# token = "..."                      # Or set TT env var; needed for --auth
"##;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `env` looks up environment variables; pass `|k| std::env::var(k).ok()` in production.
pub fn resolve(
    config: &StreemsConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ResolvedConfig, ConfigError> {
    let non_empty = |s: String| {
        let trimmed = s.trim().to_string();
        (!trimmed.is_empty()).then_some(trimmed)
    };

    // Username: CLI → env → config
    let username = cli
        .user
        .clone()
        .and_then(non_empty)
        .or_else(|| env(ENV_USER).and_then(non_empty))
        .or_else(|| config.general.username.clone().and_then(non_empty));

    // Channel: CLI → config → own channel
    let channel = cli
        .channel
        .clone()
        .and_then(non_empty)
        .or_else(|| config.general.channel.clone().and_then(non_empty))
        .or_else(|| username.clone())
        .map(|c| normalize_channel(&c))
        .filter(|c| !c.is_empty())
        .ok_or(ConfigError::MissingChannel)?;

    let token = if cli.auth {
        if username.is_none() {
            return Err(ConfigError::MissingUser);
        }
        // Token: env → config
        let token = env(ENV_TOKEN)
            .and_then(non_empty)
            .or_else(|| config.twitch.token.clone().and_then(non_empty))
            .ok_or(ConfigError::MissingToken)?;
        Some(normalize_token(&token))
    } else {
        None
    };

    let self_color = config
        .general
        .self_color
        .as_deref()
        .map(resolve_color)
        .unwrap_or_else(|| resolve_color(DEFAULT_SELF_COLOR));

    Ok(ResolvedConfig {
        session: SessionConfig {
            username: username.unwrap_or_default(),
            channel,
            authenticated: cli.auth,
        },
        token,
        max_history: config.general.max_history.unwrap_or(DEFAULT_MAX_HISTORY),
        mention: cli
            .mention_match
            .or(config.general.mention_match)
            .unwrap_or_default(),
        show_timestamps: config.general.show_timestamps.unwrap_or(false),
        self_color,
        bridge_capacity: config
            .general
            .bridge_capacity
            .unwrap_or(DEFAULT_CAPACITY)
            .max(1),
    })
}

/// Twitch channel logins are lowercase and carry no `#` on the API side.
pub fn normalize_channel(channel: &str) -> String {
    channel.trim().trim_start_matches('#').to_lowercase()
}

/// Tokens are often pasted with the IRC `oauth:` prefix; the client wants the bare token.
pub fn normalize_token(token: &str) -> String {
    let token = token.trim();
    token.strip_prefix("oauth:").unwrap_or(token).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn no_env() -> impl Fn(&str) -> Option<String> {
        env_from(&[])
    }

    #[test]
    fn test_default_config_parses() {
        let config = StreemsConfig::default();
        assert!(config.general.username.is_none());
        assert!(config.twitch.token.is_none());
    }

    #[test]
    fn test_missing_channel_is_an_error() {
        let err = resolve(&StreemsConfig::default(), &CliOverrides::default(), no_env()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingChannel));
        assert!(err.to_string().contains("channel is missing"));
    }

    #[test]
    fn test_channel_defaults_to_env_user() {
        let resolved = resolve(
            &StreemsConfig::default(),
            &CliOverrides::default(),
            env_from(&[("TWUSER", "Alice")]),
        )
        .unwrap();
        assert_eq!(resolved.session.channel, "alice");
        assert_eq!(resolved.session.username, "Alice");
        assert!(!resolved.session.authenticated);
        assert!(resolved.token.is_none());
    }

    #[test]
    fn test_anonymous_channel_only() {
        let cli = CliOverrides {
            channel: Some("#TestStream".to_string()),
            ..Default::default()
        };
        let resolved = resolve(&StreemsConfig::default(), &cli, no_env()).unwrap();
        assert_eq!(resolved.session.channel, "teststream");
        assert_eq!(resolved.session.username, "");
        assert_eq!(resolved.max_history, DEFAULT_MAX_HISTORY);
        assert_eq!(resolved.bridge_capacity, DEFAULT_CAPACITY);
        assert_eq!(resolved.mention, MentionMatch::Substring);
        assert_eq!(resolved.self_color, Rgb::new(0xFF, 0x00, 0xFF));
    }

    #[test]
    fn test_auth_without_user_is_an_error() {
        let cli = CliOverrides {
            channel: Some("teststream".to_string()),
            auth: true,
            ..Default::default()
        };
        let err = resolve(&StreemsConfig::default(), &cli, env_from(&[("TT", "abc")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingUser));
    }

    #[test]
    fn test_auth_without_token_is_an_error() {
        let cli = CliOverrides {
            user: Some("alice".to_string()),
            auth: true,
            ..Default::default()
        };
        let err = resolve(&StreemsConfig::default(), &cli, no_env()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingToken));
    }

    #[test]
    fn test_auth_strips_oauth_prefix() {
        let cli = CliOverrides {
            user: Some("alice".to_string()),
            auth: true,
            ..Default::default()
        };
        let resolved = resolve(
            &StreemsConfig::default(),
            &cli,
            env_from(&[("TT", "oauth:secret123")]),
        )
        .unwrap();
        assert_eq!(resolved.token.as_deref(), Some("secret123"));
        assert!(resolved.session.authenticated);
        assert_eq!(resolved.session.channel, "alice");
    }

    #[test]
    fn test_cli_wins_over_env_and_file() {
        let config = StreemsConfig {
            general: GeneralConfig {
                username: Some("fileuser".to_string()),
                channel: Some("filechannel".to_string()),
                mention_match: Some(MentionMatch::Substring),
                ..Default::default()
            },
            ..Default::default()
        };
        let cli = CliOverrides {
            user: Some("cliuser".to_string()),
            channel: Some("clichannel".to_string()),
            mention_match: Some(MentionMatch::Word),
            ..Default::default()
        };
        let resolved = resolve(&config, &cli, env_from(&[("TWUSER", "envuser")])).unwrap();
        assert_eq!(resolved.session.username, "cliuser");
        assert_eq!(resolved.session.channel, "clichannel");
        assert_eq!(resolved.mention, MentionMatch::Word);
    }

    #[test]
    fn test_file_values_override_defaults() {
        let config = StreemsConfig {
            general: GeneralConfig {
                channel: Some("filechannel".to_string()),
                max_history: Some(100),
                show_timestamps: Some(true),
                self_color: Some("notacolor".to_string()),
                bridge_capacity: Some(0),
                ..Default::default()
            },
            twitch: TwitchConfig {
                token: Some("filetoken".to_string()),
            },
        };
        let resolved = resolve(&config, &CliOverrides::default(), no_env()).unwrap();
        assert_eq!(resolved.session.channel, "filechannel");
        assert_eq!(resolved.max_history, 100);
        assert!(resolved.show_timestamps);
        assert_eq!(resolved.self_color, Rgb::WHITE);
        assert_eq!(resolved.bridge_capacity, 1);
        // Token is only resolved for authenticated sessions
        assert!(resolved.token.is_none());
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r##"
[general]
username = "alice"
channel = "teststream"
max_history = 1000
mention_match = "word"
show_timestamps = true
self_color = "#00FFFF"

[twitch]
token = "oauth:abc"
"##;
        let config: StreemsConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.username.as_deref(), Some("alice"));
        assert_eq!(config.general.mention_match, Some(MentionMatch::Word));
        assert_eq!(config.general.max_history, Some(1000));
        assert_eq!(config.twitch.token.as_deref(), Some("oauth:abc"));
    }

    #[test]
    fn test_sparse_toml_parses() {
        let toml_str = r#"
[general]
channel = "teststream"
"#;
        let config: StreemsConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.channel.as_deref(), Some("teststream"));
        assert!(config.general.username.is_none());
        assert!(config.twitch.token.is_none());
    }

    #[test]
    fn test_bad_mention_rule_fails_to_parse() {
        let toml_str = r#"
[general]
mention_match = "fuzzy"
"#;
        assert!(toml::from_str::<StreemsConfig>(toml_str).is_err());
    }
}
