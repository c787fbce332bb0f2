//! Environment variable naming for configuration overrides.
//!
//! A configuration path such as `server.base_url` maps to
//! `AGENDAMENTO__SERVER__BASE_URL`. The prefix can be changed with `PREFIX`.

use std::env;

/// The default prefix for configuration environment variables
pub const DEFAULT_PREFIX: &str = "AGENDAMENTO";

/// The separator for configuration environment variables
pub const CONFIG_SEPARATOR: &str = "__";

/// Get the prefix for configuration environment variables
pub fn get_config_prefix() -> String {
    env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string())
}

/// Convert a configuration path to an environment variable name
///
/// # Arguments
///
/// * `path` - The configuration path (e.g., "server.base_url")
///
/// # Returns
///
/// The environment variable name (e.g., "AGENDAMENTO__SERVER__BASE_URL")
pub fn config_path_to_env_var(path: &str) -> String {
    let prefix = get_config_prefix();
    let path = path.replace('.', CONFIG_SEPARATOR);
    format!("{}{}{}", prefix, CONFIG_SEPARATOR, path).to_uppercase()
}

/// Get the override for a configuration path, if one is set.
pub fn get_config_env_var(path: &str) -> Option<String> {
    env::var(config_path_to_env_var(path)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_to_env_var() {
        assert_eq!(
            config_path_to_env_var("server.base_url"),
            "AGENDAMENTO__SERVER__BASE_URL"
        );
        assert_eq!(
            config_path_to_env_var("widget.labels.no_slots"),
            "AGENDAMENTO__WIDGET__LABELS__NO_SLOTS"
        );
    }

    #[test]
    fn test_get_config_env_var_unset() {
        assert_eq!(get_config_env_var("widget.ids.does_not_exist"), None);
    }
}
