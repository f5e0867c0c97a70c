#[macro_use]
extern crate tracing;

mod error;
mod section;
mod settings;

pub use error::ConfigError;
use section::Section;
pub use settings::{
    JujuController,
    Settings,
    Target,
};
use std::path::Path;

/// Where the snap keeps its configuration.
pub const DEFAULT_CONFIG_PATH: &str = "/var/snap/software-inventory-collector/current/config.yaml";

/// Prefix of environment variables overriding file values, e.g.
/// `SOFTWARE_INVENTORY_COLLECTOR__JUJU_CONTROLLER__PASSWORD`.
pub const ENV_PREFIX: &str = "SOFTWARE_INVENTORY_COLLECTOR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub settings: Settings,
    pub targets: Vec<Target>,
    pub juju_controller: JujuController,
}

impl Config {
    const REQUIRED: &'static [&'static str] = &[Settings::KEY, Target::KEY, JujuController::KEY];

    /// Reads the YAML config file at `path` and applies environment overrides on top of it.
    #[instrument(level = "debug")]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let source = Self::builder(&content)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let config = Self::from_source(source)?;
        debug!(targets = config.targets.len(), "Loaded configuration");
        Ok(config)
    }

    /// Parses a YAML document without consulting the environment.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Self::from_source(Self::builder(content).build()?)
    }

    fn builder(content: &str) -> config::ConfigBuilder<config::builder::DefaultState> {
        config::Config::builder().add_source(config::File::from_str(content, config::FileFormat::Yaml))
    }

    fn from_source(source: config::Config) -> Result<Self, ConfigError> {
        let table = config::Source::collect(&source)?;
        let mut root = Section::root(table, Self::REQUIRED)?;

        let settings = Settings::from_section(root.section(Settings::KEY, Settings::REQUIRED)?)?;
        let targets = root
            .sections(Target::KEY, Target::REQUIRED)?
            .into_iter()
            .map(Target::from_section)
            .collect::<Result<Vec<_>, _>>()?;
        let juju_controller =
            JujuController::from_section(root.section(JujuController::KEY, JujuController::REQUIRED)?)?;

        Ok(Self {
            settings,
            targets,
            juju_controller,
        })
    }
}
