//! Fills the process environment from a project `.env` and the user's XDG config.
//!
//! Precedence for each key: **process env > `.env` > `<config dir>/<app>/config.toml [env]`**.
//! Only keys missing from the process environment are set, so an explicit
//! `WEFT_MAX_STEPS=10 cargo run ...` always wins over files.

mod dotenv;
mod xdg_toml;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("no config directory for this platform")]
    NoConfigDir,
    #[error("read xdg config: {0}")]
    XdgRead(std::io::Error),
    #[error("parse xdg toml: {0}")]
    XdgParse(#[from] toml::de::Error),
    #[error("[env] value for {0} must be a string, number or boolean")]
    NonScalar(String),
    #[error("read .env: {0}")]
    DotenvRead(std::io::Error),
}

/// Where an applied key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Dotenv,
    Xdg,
}

/// Keys set by [`load_and_apply`], sorted by name.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Applied {
    pub keys: Vec<(String, Source)>,
}

impl Applied {
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn source_of(&self, key: &str) -> Option<Source> {
        self.keys.iter().find(|(k, _)| k == key).map(|(_, s)| *s)
    }
}

/// Path of the XDG config file for `app_name`, whether or not it exists.
pub fn config_file_path(app_name: &str) -> Result<PathBuf, LoadError> {
    xdg_toml::config_path(app_name)
}

/// Reads both sources and sets every key the process environment lacks.
///
/// * `app_name`: directory under the config dir, e.g. `"weft"`.
/// * `dotenv_dir`: where to look for `.env`; `None` means the working directory.
///
/// Missing files are not errors. Returns the keys that were set.
pub fn load_and_apply(app_name: &str, dotenv_dir: Option<&Path>) -> Result<Applied, LoadError> {
    let xdg = xdg_toml::load_env_map(app_name)?;
    let dotenv = dotenv::load_env_map(dotenv_dir).map_err(LoadError::DotenvRead)?;

    let keys: BTreeSet<&String> = xdg.keys().chain(dotenv.keys()).collect();
    let mut applied = Applied::default();
    for key in keys {
        if std::env::var_os(key).is_some() {
            continue;
        }
        let (value, source) = match (dotenv.get(key), xdg.get(key)) {
            (Some(v), _) => (v, Source::Dotenv),
            (None, Some(v)) => (v, Source::Xdg),
            (None, None) => continue,
        };
        std::env::set_var(key, value);
        applied.keys.push((key.clone(), source));
    }
    Ok(applied)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_env::with_xdg_home;
    use std::env;

    fn xdg_with(body: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let app_dir = dir.path().join("weft");
        std::fs::create_dir_all(&app_dir).unwrap();
        std::fs::write(app_dir.join("config.toml"), body).unwrap();
        dir
    }

    fn dotenv_with(body: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".env"), body).unwrap();
        dir
    }

    /// **Scenario**: No .env and no XDG file applies nothing and succeeds.
    #[test]
    fn nothing_to_load_is_ok() {
        let xdg = tempfile::tempdir().unwrap();
        let empty = tempfile::tempdir().unwrap();
        let applied =
            with_xdg_home(xdg.path(), || load_and_apply("weft", Some(empty.path()))).unwrap();
        assert!(applied.is_empty());
    }

    /// **Scenario**: A variable already set in the process is never overwritten by a file.
    #[test]
    fn process_env_beats_files() {
        let xdg = xdg_with("[env]\nWEFT_CFG_TEST_PROCESS = \"xdg\"\n");
        let dot = dotenv_with("WEFT_CFG_TEST_PROCESS=dotenv\n");
        env::set_var("WEFT_CFG_TEST_PROCESS", "process");
        let applied =
            with_xdg_home(xdg.path(), || load_and_apply("weft", Some(dot.path()))).unwrap();
        assert_eq!(env::var("WEFT_CFG_TEST_PROCESS").as_deref(), Ok("process"));
        assert_eq!(applied.source_of("WEFT_CFG_TEST_PROCESS"), None);
        env::remove_var("WEFT_CFG_TEST_PROCESS");
    }

    /// **Scenario**: .env wins over the XDG file; the XDG file supplies keys .env lacks.
    #[test]
    fn dotenv_beats_xdg_and_xdg_fills_gaps() {
        let xdg = xdg_with(
            "[env]\nWEFT_CFG_TEST_BOTH = \"xdg\"\nWEFT_CFG_TEST_XDG_ONLY = 7\n",
        );
        let dot = dotenv_with("WEFT_CFG_TEST_BOTH=dotenv\n");
        env::remove_var("WEFT_CFG_TEST_BOTH");
        env::remove_var("WEFT_CFG_TEST_XDG_ONLY");

        let applied =
            with_xdg_home(xdg.path(), || load_and_apply("weft", Some(dot.path()))).unwrap();
        let both = env::var("WEFT_CFG_TEST_BOTH").unwrap();
        let xdg_only = env::var("WEFT_CFG_TEST_XDG_ONLY").unwrap();
        env::remove_var("WEFT_CFG_TEST_BOTH");
        env::remove_var("WEFT_CFG_TEST_XDG_ONLY");

        assert_eq!(both, "dotenv");
        assert_eq!(xdg_only, "7");
        assert_eq!(applied.source_of("WEFT_CFG_TEST_BOTH"), Some(Source::Dotenv));
        assert_eq!(applied.source_of("WEFT_CFG_TEST_XDG_ONLY"), Some(Source::Xdg));
    }

    /// **Scenario**: A malformed XDG config file fails the load.
    #[test]
    fn bad_xdg_file_fails() {
        let xdg = xdg_with("[env\n");
        let empty = tempfile::tempdir().unwrap();
        let result = with_xdg_home(xdg.path(), || load_and_apply("weft", Some(empty.path())));
        assert!(matches!(result, Err(LoadError::XdgParse(_))));
    }

    /// **Scenario**: The config path lives under $XDG_CONFIG_HOME/<app>/config.toml.
    #[test]
    fn config_file_path_under_xdg_home() {
        let xdg = tempfile::tempdir().unwrap();
        let path = with_xdg_home(xdg.path(), || config_file_path("weft")).unwrap();
        assert_eq!(path, xdg.path().join("weft").join("config.toml"));
    }
}
