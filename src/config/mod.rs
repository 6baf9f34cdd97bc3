use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct ConfigFile {
    #[serde(alias = "server_url")]
    pub server: Option<String>,
    pub timeout: Option<u64>,
    pub proxy: Option<String>,
    pub filter: Option<String>,
    pub output: Option<String>,
    pub output_format: Option<String>,
    pub download: Option<bool>,
    pub download_dir: Option<String>,
    pub no_color: Option<bool>,
    pub demo: Option<bool>,
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
        .or_else(|| {
            let drive = env::var_os("HOMEDRIVE")?;
            let path = env::var_os("HOMEPATH")?;
            Some(PathBuf::from(drive).join(path))
        })
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(home_dir()?.join(".qpscrutiniser").join("config.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn expand_tilde_string(path: &str) -> String {
    expand_tilde(path).to_string_lossy().to_string()
}

pub fn load_config(path: &Path, allow_missing: bool) -> Result<ConfigFile, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) if contents.trim().is_empty() => Ok(ConfigFile::default()),
        Ok(contents) => serde_yaml::from_str::<ConfigFile>(&contents)
            .map_err(|e| format!("failed to parse config '{}': {e}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("config file not found '{}'", path.display()))
        }
        Err(e) => Err(format!("failed to read config '{}': {e}", path.display())),
    }
}

fn default_config_yaml() -> String {
    r#"# QP Scrutiniser config
#
# Location (default):
#   ~/.qpscrutiniser/config.yml

# Server
server: http://127.0.0.1:5002
# Validation runs one LLM call per question on the server, so keep this generous.
timeout: 300
# proxy: http://127.0.0.1:8080

# Use canned results instead of contacting the server
demo: false

# Results: all, in_syllabus, out_of_syllabus or error
filter: all

# Output (optional)
# output: ./validation.html
# output_format: html

# Export all results to validation_results_<date>.json
download: false
# download_dir: ./exports

# Output styling
no_color: false
"#
    .to_string()
}

/// Writes the commented default config unless a file already exists.
/// Returns whether a file was written.
pub fn ensure_default_config_file(path: &Path) -> Result<bool, String> {
    if path.exists() {
        return Ok(false);
    }
    let parent = path
        .parent()
        .ok_or_else(|| format!("invalid config path '{}'", path.display()))?;
    std::fs::create_dir_all(parent).map_err(|e| {
        format!(
            "failed to create config directory '{}': {e}",
            parent.display()
        )
    })?;
    let contents = default_config_yaml();
    std::fs::write(path, contents)
        .map_err(|e| format!("failed to write config file '{}': {e}", path.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_parses() {
        let cfg: ConfigFile = serde_yaml::from_str(&default_config_yaml()).unwrap();
        assert_eq!(cfg.server.as_deref(), Some("http://127.0.0.1:5002"));
        assert_eq!(cfg.timeout, Some(300));
        assert_eq!(cfg.filter.as_deref(), Some("all"));
        assert_eq!(cfg.demo, Some(false));
        assert!(cfg.output.is_none());
    }

    #[test]
    fn missing_config_respects_allow_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.yml");
        assert!(load_config(&path, true).is_ok());
        let err = load_config(&path, false).unwrap_err();
        assert!(err.contains("config file not found"));
    }

    #[test]
    fn ensure_default_config_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yml");
        assert!(ensure_default_config_file(&path).unwrap());
        std::fs::write(&path, "server: http://example.test/\n").unwrap();
        assert!(!ensure_default_config_file(&path).unwrap());
        let cfg = load_config(&path, false).unwrap();
        assert_eq!(cfg.server.as_deref(), Some("http://example.test/"));
    }

    #[test]
    fn server_url_alias_is_accepted() {
        let cfg: ConfigFile = serde_yaml::from_str("server_url: http://qp.local:5001\n").unwrap();
        assert_eq!(cfg.server.as_deref(), Some("http://qp.local:5001"));
    }
}
