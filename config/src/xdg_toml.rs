//! `[env]` table of `<config dir>/<app>/config.toml`.
//!
//! The config dir is `$XDG_CONFIG_HOME` when set and non-empty, else the platform
//! default from `dirs::config_dir()`.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::LoadError;

pub(crate) fn config_path(app_name: &str) -> Result<PathBuf, LoadError> {
    let base = match std::env::var_os("XDG_CONFIG_HOME") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => dirs::config_dir().ok_or(LoadError::NoConfigDir)?,
    };
    Ok(base.join(app_name).join("config.toml"))
}

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    env: HashMap<String, toml::Value>,
}

/// Scalars become their text form; tables and arrays are rejected.
fn scalar_text(key: &str, value: toml::Value) -> Result<String, LoadError> {
    match value {
        toml::Value::String(s) => Ok(s),
        toml::Value::Integer(i) => Ok(i.to_string()),
        toml::Value::Float(f) => Ok(f.to_string()),
        toml::Value::Boolean(b) => Ok(b.to_string()),
        _ => Err(LoadError::NonScalar(key.to_string())),
    }
}

pub(crate) fn load_env_map(app_name: &str) -> Result<HashMap<String, String>, LoadError> {
    let path = config_path(app_name)?;
    if !path.is_file() {
        return Ok(HashMap::new());
    }
    let content = std::fs::read_to_string(&path).map_err(LoadError::XdgRead)?;
    let file: ConfigFile = toml::from_str(&content)?;
    file.env
        .into_iter()
        .map(|(k, v)| scalar_text(&k, v).map(|v| (k, v)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_env::with_xdg_home;

    fn write_config(dir: &std::path::Path, app: &str, body: &str) {
        let app_dir = dir.join(app);
        std::fs::create_dir_all(&app_dir).unwrap();
        std::fs::write(app_dir.join("config.toml"), body).unwrap();
    }

    /// **Scenario**: A missing config file yields an empty map.
    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let map = with_xdg_home(dir.path(), || load_env_map("weft")).unwrap();
        assert!(map.is_empty());
    }

    /// **Scenario**: Scalars in the [env] table, numbers included, are read as text.
    #[test]
    fn reads_env_table_with_numbers() {
        let dir = tempfile::tempdir().unwrap();
        write_config(
            dir.path(),
            "weft",
            "[env]\nWEFT_MAX_STEPS = 40\nRUST_LOG = \"weft=debug\"\nFLAG = true\n",
        );
        let map = with_xdg_home(dir.path(), || load_env_map("weft")).unwrap();
        assert_eq!(map.get("WEFT_MAX_STEPS").map(String::as_str), Some("40"));
        assert_eq!(map.get("RUST_LOG").map(String::as_str), Some("weft=debug"));
        assert_eq!(map.get("FLAG").map(String::as_str), Some("true"));
    }

    /// **Scenario**: Tables other than [env] are ignored.
    #[test]
    fn other_tables_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "weft", "[graphs]\ndefault = \"react\"\n");
        let map = with_xdg_home(dir.path(), || load_env_map("weft")).unwrap();
        assert!(map.is_empty());
    }

    /// **Scenario**: An array inside [env] is rejected as non-scalar.
    #[test]
    fn nested_value_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "weft", "[env]\nLIST = [1, 2]\n");
        let err = with_xdg_home(dir.path(), || load_env_map("weft")).unwrap_err();
        assert!(matches!(err, LoadError::NonScalar(ref k) if k == "LIST"));
    }

    /// **Scenario**: Unparseable TOML is reported as a parse error.
    #[test]
    fn broken_toml_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "weft", "[env\n");
        let err = with_xdg_home(dir.path(), || load_env_map("weft")).unwrap_err();
        assert!(matches!(err, LoadError::XdgParse(_)));
    }
}
