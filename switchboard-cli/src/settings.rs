use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use switchboard_server::ActorConfig;

pub const DEFAULT_ADDR: &str = "0.0.0.0:9000";
pub const DEFAULT_ALLOW_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub addr: String,
    pub cors: CorsSettings,
    pub actor: ActorSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsSettings {
    /// Allowed browser origins; `*` allows any.
    pub allow_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActorSettings {
    pub negotiation_timeout_secs: u64,
    pub max_in_flight: usize,
    pub queue_capacity: usize,
}

impl ActorSettings {
    pub fn to_actor_config(&self) -> ActorConfig {
        ActorConfig {
            negotiation_timeout: Duration::from_secs(self.negotiation_timeout_secs),
            max_in_flight: self.max_in_flight,
            queue_capacity: self.queue_capacity,
        }
    }
}

impl Settings {
    /// Layers defaults, the config file and `SWITCHBOARD__*` environment variables.
    ///
    /// Without an explicit path, `config.{yaml,toml,json}` is looked up in
    /// `$HOME/.switchboard/` and then the working directory; both are optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Self::defaults()?;

        match path {
            Some(path) => {
                builder = builder.add_source(File::from(path.to_path_buf()).required(true));
            }
            None => {
                if let Some(home) = std::env::var_os("HOME") {
                    let home_config = PathBuf::from(home).join(".switchboard").join("config");
                    builder = builder.add_source(
                        File::with_name(&home_config.to_string_lossy()).required(false),
                    );
                }
                builder = builder.add_source(File::with_name("config").required(false));
            }
        }

        builder
            .add_source(Self::environment())
            .build()?
            .try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let defaults = ActorConfig::default();

        Config::builder()
            .set_default("addr", DEFAULT_ADDR)?
            .set_default("cors.allow_origins", vec![DEFAULT_ALLOW_ORIGIN])?
            .set_default(
                "actor.negotiation_timeout_secs",
                defaults.negotiation_timeout.as_secs() as i64,
            )?
            .set_default("actor.max_in_flight", defaults.max_in_flight as i64)?
            .set_default("actor.queue_capacity", defaults.queue_capacity as i64)
    }

    /// `SWITCHBOARD__CORS__ALLOW_ORIGINS` takes a comma separated list.
    fn environment() -> Environment {
        Environment::with_prefix("SWITCHBOARD")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("cors.allow_origins")
            .try_parsing(true)
    }
}
