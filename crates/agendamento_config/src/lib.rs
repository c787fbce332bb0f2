use config::{Config, ConfigError, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::path::PathBuf;
use tracing::debug;

pub mod env_vars;
pub mod models;
pub use models::*;

/// Directory holding `default.toml` and the per-environment files.
pub const DEFAULT_CONFIG_DIR: &str = "config";

/// Loads the application configuration.
///
/// Sources, lowest precedence first:
/// 1. built-in defaults
/// 2. `{config_dir}/default.{toml,yaml,json}`
/// 3. `{config_dir}/{RUN_ENV}.{toml,yaml,json}` (`RUN_ENV` defaults to `debug`)
/// 4. environment variables `AGENDAMENTO__SECTION__KEY`
///
/// `config_dir` is `AGENDAMENTO_CONFIG_DIR` or [`DEFAULT_CONFIG_DIR`].
pub fn load_config() -> Result<AppConfig, ConfigError> {
    ensure_dotenv_loaded();

    let config_dir = env::var("AGENDAMENTO_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_DIR));
    load_config_from(config_dir)
}

/// Same as [`load_config`] but with an explicit configuration directory.
pub fn load_config_from(config_dir: PathBuf) -> Result<AppConfig, ConfigError> {
    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = env_vars::get_config_prefix();

    let default_path = config_dir.join("default");
    let env_path = config_dir.join(&run_env);

    debug!(
        "loading config from {} and {} (prefix {})",
        default_path.display(),
        env_path.display(),
        prefix
    );

    let builder = Config::builder()
        .add_source(File::from(default_path).required(false))
        .add_source(File::from(env_path).required(false))
        .add_source(
            Environment::with_prefix(&prefix)
                .separator(env_vars::CONFIG_SEPARATOR)
                .try_parsing(true),
        );

    builder.build()?.try_deserialize()
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// The file is `DOTENV_OVERRIDE` if set, else the first command line argument
/// when it starts with `.env`, else `.env`. Loading happens at most once per
/// process; a missing file is not an error.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path_override = env::var("DOTENV_OVERRIDE").ok();
    let dotenv_path_arg = env::args().nth(1).filter(|s| s.starts_with(".env"));

    let dotenv_path = dotenv_path_override
        .or(dotenv_path_arg)
        .unwrap_or_else(|| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}
