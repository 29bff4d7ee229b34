use color_eyre::{
    eyre::{Result, WrapErr as _},
    Section as _,
};
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use tracing::{debug, warn};
use url::Url;

const ENV_PREFIX: &str = "SHAREOXIDE";
const ENV_SEPARATOR: &str = "_";
const ENV_NESTING_SEPARATOR: &str = "__";

/// Names an extra config file layered over `config.toml`. Must equal `env_name("CONFIG_FILE")`.
pub const CONFIG_FILE_ENV: &str = "SHAREOXIDE_CONFIG_FILE";

const CONFIG_FILE: &str = "config";
const EXAMPLE_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Deserialize, Serialize)]
pub struct General {
    /// Where the ShareOxide server lives, e.g. `https://share.example.com`
    pub server_url: Url,

    /// Sent as the `Cookie` header, like a browser would for the dashboard
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_cookie: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Settings {
    pub general: General,
}

impl Settings {
    /// Loads the settings, writing an example `config.toml` if there is no config file at all.
    pub fn try_load(custom_config_file: Option<&str>) -> Result<Self> {
        let res = Self::new(custom_config_file);

        let add_suggestion = matches!(&res, Err(err) if is_missing_config_file(err));

        let mut res = res.wrap_err("failed to load settings");

        if add_suggestion && !std::path::Path::new(EXAMPLE_CONFIG_PATH).exists() {
            let example_settings = toml::to_string_pretty(&Self::example())?;
            std::fs::write(EXAMPLE_CONFIG_PATH, example_settings)
                .wrap_err("failed to write the example configuration file")?;

            res = res.suggestion(
                "An example configuration file has been created at `config.toml` in the current directory.",
            );
        }

        res
    }

    fn new(custom_config_file: Option<&str>) -> Result<Self, ConfigError> {
        let environment_type = get_environment_type();
        debug!(environment = %environment_type, "loading settings");

        if environment_type == EnvironmentType::Development {
            warn!("Running in development mode");
        }

        let mut settings = Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(custom_config_file.is_none()));

        if let Some(file) = custom_config_file {
            settings = settings.add_source(File::with_name(file));
        }

        settings = settings
            .add_source(
                File::with_name(&format!("{CONFIG_FILE}-{environment_type}")).required(false),
            )
            .add_source(File::with_name(&format!("{CONFIG_FILE}-local")).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_NESTING_SEPARATOR),
            );

        settings.build()?.try_deserialize()
    }

    pub fn example() -> Self {
        Self {
            general: General {
                server_url: Url::parse("http://localhost:8080").expect("example URL is valid"),
                session_cookie: Some("id=<session id from your browser>".to_string()),
            },
        }
    }
}

fn is_missing_config_file(err: &ConfigError) -> bool {
    matches!(
        err,
        ConfigError::Foreign(foreign_error)
            if matches!(
                foreign_error.downcast_ref::<std::io::Error>(),
                Some(io_error)
                    if io_error.kind() == std::io::ErrorKind::NotFound
                        && io_error.get_ref().is_some_and(|custom_error| {
                            let custom_error = custom_error.to_string();
                            custom_error.starts_with("configuration file \"")
                                && custom_error.ends_with("\" not found")
                        })
            )
    )
}

#[derive(Debug, Eq, PartialEq, EnumString, Display, AsRefStr, IntoStaticStr)]
#[strum(ascii_case_insensitive, serialize_all = "snake_case")]
enum EnvironmentType {
    #[strum(serialize = "development", serialize = "dev", serialize = "d")]
    Development,

    #[strum(serialize = "production", serialize = "prod", serialize = "p")]
    Production,
}

fn get_environment_type() -> EnvironmentType {
    let from_env = env_var("ENVIRONMENT")
        .inspect_err(|err| {
            if let std::env::VarError::NotUnicode(_) = err {
                warn!(
                    "Environment variable '{}' is not valid unicode",
                    env_name("ENVIRONMENT")
                );
            }
        })
        .ok()
        .map(|val| val.trim().to_string());

    let from_env = from_env.and_then(|env| env.parse::<EnvironmentType>().inspect_err(|err| {
        warn!(error = ?err, "Environment variable '{}' is not a valid environment type", env_name("ENVIRONMENT"));
    }).ok());

    from_env.unwrap_or({
        if cfg!(debug_assertions) {
            EnvironmentType::Development
        } else {
            EnvironmentType::Production
        }
    })
}

pub fn env_name(name: &str) -> String {
    format!("{}{}{}", ENV_PREFIX, ENV_SEPARATOR, name.to_uppercase())
}

pub fn env_var(name: &str) -> Result<String, std::env::VarError> {
    std::env::var(env_name(name))
}
