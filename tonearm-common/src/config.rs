//! Configuration loading and music folder resolution

use crate::error::{Error, Result};
use std::path::PathBuf;

/// Resolve the music folder, in priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file (`music_folder` key)
/// 4. OS-dependent default (fallback)
pub fn resolve_music_folder(cli_arg: Option<&str>, env_var_name: &str) -> Result<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Ok(PathBuf::from(path));
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        return Ok(PathBuf::from(path));
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = locate_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(folder) = config.get("music_folder").and_then(|v| v.as_str()) {
                    return Ok(PathBuf::from(folder));
                }
            }
        }
    }

    // Priority 4: OS-dependent default
    Ok(default_music_folder())
}

/// Platform configuration file path (`<config dir>/tonearm/config.toml`)
fn locate_config_file() -> Result<PathBuf> {
    let path = dirs::config_dir()
        .map(|d| d.join("tonearm").join("config.toml"))
        .ok_or_else(|| Error::Config("could not determine config directory".to_string()))?;

    if path.exists() {
        Ok(path)
    } else {
        Err(Error::Config(format!("config file not found: {:?}", path)))
    }
}

/// OS default music folder, falling back to the home directory
fn default_music_folder() -> PathBuf {
    dirs::audio_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_argument_wins() {
        let folder =
            resolve_music_folder(Some("/tmp/music"), "TONEARM_TEST_UNSET_VAR").unwrap();
        assert_eq!(folder, PathBuf::from("/tmp/music"));
    }

    #[test]
    fn test_env_var_used_without_cli() {
        std::env::set_var("TONEARM_TEST_MUSIC_DIR", "/srv/music");
        let folder = resolve_music_folder(None, "TONEARM_TEST_MUSIC_DIR").unwrap();
        assert_eq!(folder, PathBuf::from("/srv/music"));
        std::env::remove_var("TONEARM_TEST_MUSIC_DIR");
    }
}
