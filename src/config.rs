//! Configuration constants and profile loading for gradeline
//!
//! Connection settings live in an INI profile file, one section per profile:
//!
//! ```ini
//! [default]
//! base_url = http://127.0.0.1:8000/
//! timeout_secs = 30
//! grades_fetch_policy = last-response-wins
//! ```

use crate::gradebook::{ControllerOptions, GradesFetchPolicy};
use anyhow::{anyhow, Context, Result};
use ini::Ini;
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Default profile file path for gradeline
pub const DEFAULT_PROFILE_PATH: &str = "~/.gradeline/profile";

/// Environment variable name for overriding the profile path
pub const PROFILE_PATH_ENV_VAR: &str = "GRADELINE_PROFILE_PATH";

/// Environment variable holding the log filter (e.g. `debug`, `gradeline=trace`)
pub const LOG_LEVEL_ENV_VAR: &str = "GRADELINE_LOG_LEVEL";

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Get the profile file path, checking environment variable first, then falling back to default
pub fn get_profile_path() -> String {
    std::env::var_os(PROFILE_PATH_ENV_VAR)
        .and_then(|val| val.into_string().ok())
        .unwrap_or_else(|| DEFAULT_PROFILE_PATH.to_string())
}

/// Trim a base URL and make sure it ends with `/` so that resource paths
/// join beneath it instead of replacing its last segment.
pub fn normalize_base_url(url: &str) -> String {
    let url = url.trim();
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{url}/")
    }
}

/// Connection settings of one profile
#[derive(Debug, Clone, PartialEq)]
pub struct ClientProfile {
    pub base_url: String,
    pub timeout: Duration,
    pub grades_fetch_policy: GradesFetchPolicy,
}

impl Default for ClientProfile {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            grades_fetch_policy: GradesFetchPolicy::default(),
        }
    }
}

impl ClientProfile {
    /// Load a profile from the INI file at `profile_path` (`~` is expanded).
    /// A missing file or section yields the default profile.
    pub fn load(profile_name: &str, profile_path: &str) -> Result<Self> {
        let expanded = shellexpand::tilde(profile_path);
        tracing::debug!("Loading profile '{}' from '{}'", profile_name, expanded);

        if !Path::new(expanded.as_ref()).exists() {
            tracing::debug!("Profile file not found, using defaults");
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(expanded.as_ref())
            .with_context(|| format!("Failed to read profile file '{expanded}'"))?;
        Self::from_ini(&ini, profile_name)
    }

    pub fn from_ini(ini: &Ini, profile_name: &str) -> Result<Self> {
        let mut profile = Self::default();
        let Some(section) = ini.section(Some(profile_name)) else {
            tracing::debug!("Profile '{}' not found, using defaults", profile_name);
            return Ok(profile);
        };

        if let Some(base_url) = section.get("base_url") {
            profile = profile.with_base_url_override(Some(base_url));
        }
        if let Some(timeout) = section.get("timeout_secs") {
            let secs: u64 = parse_setting(profile_name, "timeout_secs", timeout)?;
            profile.timeout = Duration::from_secs(secs);
        }
        if let Some(policy) = section.get("grades_fetch_policy") {
            profile.grades_fetch_policy =
                parse_setting(profile_name, "grades_fetch_policy", policy)?;
        }

        Ok(profile)
    }

    /// Replace the base URL; blank overrides are ignored.
    pub fn with_base_url_override(mut self, base_url: Option<&str>) -> Self {
        if let Some(url) = base_url.filter(|url| !url.trim().is_empty()) {
            self.base_url = normalize_base_url(url);
        }
        self
    }

    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            grades_fetch_policy: self.grades_fetch_policy,
        }
    }
}

fn parse_setting<T>(profile_name: &str, key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| anyhow!("Invalid {key} '{value}' in profile '{profile_name}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn profile_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_profile_path() {
        assert_eq!(DEFAULT_PROFILE_PATH, "~/.gradeline/profile");
    }

    #[test]
    fn test_get_profile_path_default_and_env_override() {
        // Save current env var state
        let original = std::env::var_os(PROFILE_PATH_ENV_VAR);

        std::env::remove_var(PROFILE_PATH_ENV_VAR);
        assert_eq!(get_profile_path(), DEFAULT_PROFILE_PATH);

        std::env::set_var(PROFILE_PATH_ENV_VAR, "/custom/profile/path");
        assert_eq!(get_profile_path(), "/custom/profile/path");

        // Restore original state
        match original {
            Some(val) => std::env::set_var(PROFILE_PATH_ENV_VAR, val),
            None => std::env::remove_var(PROFILE_PATH_ENV_VAR),
        }
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url("http://host:8000"), "http://host:8000/");
        assert_eq!(normalize_base_url(" http://host/api/ "), "http://host/api/");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let profile = ClientProfile::load("default", "/nonexistent/gradeline/profile").unwrap();
        assert_eq!(profile, ClientProfile::default());
    }

    #[test]
    fn test_load_reads_named_section() {
        let file = profile_file(
            "[default]\nbase_url = http://localhost:9000\n\n\
             [school]\nbase_url = https://grades.example.org/api\n\
             timeout_secs = 5\n\
             grades_fetch_policy = latest-request-wins\n",
        );

        let profile = ClientProfile::load("school", file.path().to_str().unwrap()).unwrap();

        assert_eq!(profile.base_url, "https://grades.example.org/api/");
        assert_eq!(profile.timeout, Duration::from_secs(5));
        assert_eq!(
            profile.grades_fetch_policy,
            GradesFetchPolicy::LatestRequestWins
        );
    }

    #[test]
    fn test_load_missing_section_uses_defaults() {
        let file = profile_file("[default]\nbase_url = http://localhost:9000\n");
        let profile = ClientProfile::load("other", file.path().to_str().unwrap()).unwrap();
        assert_eq!(profile, ClientProfile::default());
    }

    #[test]
    fn test_load_rejects_bad_values() {
        let file = profile_file("[default]\ntimeout_secs = soon\n");
        assert!(ClientProfile::load("default", file.path().to_str().unwrap()).is_err());

        let file = profile_file("[default]\ngrades_fetch_policy = random\n");
        assert!(ClientProfile::load("default", file.path().to_str().unwrap()).is_err());
    }

    #[test]
    fn test_base_url_override_ignores_blank() {
        let profile = ClientProfile::default().with_base_url_override(Some("   "));
        assert_eq!(profile.base_url, DEFAULT_BASE_URL);

        let override_url = Some("http://10.0.2.2:8000");
        let profile = ClientProfile::default().with_base_url_override(override_url);
        assert_eq!(profile.base_url, "http://10.0.2.2:8000/");
    }
}
