//! Configuration constants and profile loading for postline
//!
//! Profiles live in an INI file, one section per profile name:
//!
//! ```ini
//! [default]
//! server = http://127.0.0.1:5000
//! dialect = legacy
//! timeout = 30
//! insecure = false
//! ```

use anyhow::{Context, Result};
use ini::Ini;
use std::path::Path;
use std::time::Duration;

use crate::dispatch::ApiDialect;

/// Default profile file path for postline
pub const DEFAULT_PROFILE_PATH: &str = "~/.postline/profile";

/// Environment variable name for overriding the profile path
pub const PROFILE_PATH_ENV_VAR: &str = "POSTLINE_PROFILE_PATH";

/// Backend address used when a profile does not name one
pub const DEFAULT_SERVER: &str = "http://127.0.0.1:5000";

const KEY_SERVER: &str = "server";
const KEY_DIALECT: &str = "dialect";
const KEY_TIMEOUT: &str = "timeout";
const KEY_INSECURE: &str = "insecure";
const KEY_PROXY: &str = "proxy";
const KEY_USER_AGENT: &str = "user_agent";

/// Get the profile file path, checking environment variable first, then falling back to default
pub fn get_profile_path() -> String {
    std::env::var_os(PROFILE_PATH_ENV_VAR)
        .and_then(|val| val.into_string().ok())
        .unwrap_or_else(|| DEFAULT_PROFILE_PATH.to_string())
}

/// Connection settings for one backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    name: String,
    server: String,
    dialect: ApiDialect,
    timeout: Option<Duration>,
    insecure: bool,
    proxy: Option<String>,
    user_agent: Option<String>,
}

impl Profile {
    /// Profile with every setting at its default
    pub fn blank(name: &str) -> Self {
        Self {
            name: name.to_string(),
            server: DEFAULT_SERVER.to_string(),
            dialect: ApiDialect::default(),
            timeout: None,
            insecure: false,
            proxy: None,
            user_agent: None,
        }
    }

    pub fn with_server(mut self, server: &str) -> Self {
        self.server = server.to_string();
        self
    }

    pub fn with_dialect(mut self, dialect: ApiDialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn server(&self) -> &str {
        &self.server
    }

    pub fn dialect(&self) -> ApiDialect {
        self.dialect
    }

    /// Request timeout; `None` waits indefinitely
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn insecure(&self) -> bool {
        self.insecure
    }

    pub fn proxy(&self) -> Option<&str> {
        self.proxy.as_deref()
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }
}

/// Profile store backed by an INI file
pub struct IniProfileStore {
    path: String,
}

impl IniProfileStore {
    pub fn new(path: &str) -> Self {
        Self {
            path: shellexpand::tilde(path).into_owned(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Read a named profile
    ///
    /// `Ok(None)` when the file or the section does not exist; an error when
    /// the file is unreadable or a value is malformed.
    pub fn get_profile(&self, name: &str) -> Result<Option<Profile>> {
        if !Path::new(&self.path).exists() {
            return Ok(None);
        }

        let ini = Ini::load_from_file(&self.path)
            .with_context(|| format!("Failed to read profile file '{}'", self.path))?;
        let Some(section) = ini.section(Some(name)) else {
            return Ok(None);
        };

        let mut profile = Profile::blank(name);
        if let Some(server) = section.get(KEY_SERVER) {
            profile.server = server.trim().to_string();
        }
        if let Some(dialect) = section.get(KEY_DIALECT) {
            profile.dialect = dialect
                .parse()
                .with_context(|| format!("Invalid '{KEY_DIALECT}' in profile '{name}'"))?;
        }
        if let Some(timeout) = section.get(KEY_TIMEOUT) {
            let seconds: u64 = timeout
                .trim()
                .parse()
                .with_context(|| {
                    format!("Invalid '{KEY_TIMEOUT}' in profile '{name}': {timeout}")
                })?;
            profile.timeout = Some(Duration::from_secs(seconds));
        }
        if let Some(insecure) = section.get(KEY_INSECURE) {
            profile.insecure = parse_flag(insecure)
                .with_context(|| format!("Invalid '{KEY_INSECURE}' in profile '{name}'"))?;
        }
        profile.proxy = section.get(KEY_PROXY).map(|v| v.trim().to_string());
        profile.user_agent = section.get(KEY_USER_AGENT).map(|v| v.trim().to_string());

        Ok(Some(profile))
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        other => Err(anyhow::anyhow!("expected true or false, got '{other}'")),
    }
}

/// Load profile from INI file or return blank profile if not found
pub fn load_profile(profile_name: &str, profile_path: &str) -> Result<Profile> {
    tracing::debug!("Loading profile '{}' from '{}'", profile_name, profile_path);

    let store = IniProfileStore::new(profile_path);
    match store.get_profile(profile_name)? {
        Some(profile) => {
            tracing::debug!("Profile loaded successfully, server: {}", profile.server());
            Ok(profile)
        }
        None => {
            tracing::warn!(
                "Profile '{}' not found in '{}', using defaults",
                profile_name,
                store.path()
            );
            Ok(Profile::blank(profile_name))
        }
    }
}
