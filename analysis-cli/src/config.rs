use std::{path::Path, str::FromStr};

use image_analysis::{ImageLimits, MAX_IMAGE_DATA_BYTES};
use serde::Deserialize;
use serde_with::serde_as;
use strum::{Display, EnumString};

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub limits: LimitSettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApplicationSettings {
    pub log_level: String,
}

#[serde_as]
#[derive(Deserialize, Clone, Debug)]
pub struct LimitSettings {
    #[serde_as(as = "serde_with::DisplayFromStr")]
    pub max_encoded_bytes: usize,
}

impl From<&LimitSettings> for ImageLimits {
    fn from(settings: &LimitSettings) -> Self {
        ImageLimits::new(settings.max_encoded_bytes)
    }
}

pub fn read_config() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Message(format!("no current directory: {e}")))?;

    let environment = Environment::from_str(
        std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .as_str(),
    )
    .map_err(|e| config::ConfigError::Message(format!("invalid APP_ENVIRONMENT: {e}")))?;

    read_config_from(&base_path.join("config"), environment)
}

/// Layers defaults, `base.yaml`, `{environment}.yaml` and `ANALYSIS_*` variables.
///
/// Both files are optional so the binary also runs outside the crate directory.
pub fn read_config_from(
    config_directory: &Path,
    environment: Environment,
) -> Result<Settings, config::ConfigError> {
    let environment_filename = format!("{}.yaml", environment);

    let settings = config::Config::builder()
        .set_default("application.log_level", "info")?
        .set_default("limits.max_encoded_bytes", MAX_IMAGE_DATA_BYTES as u64)?
        .add_source(config::File::from(config_directory.join("base.yaml")).required(false))
        .add_source(
            config::File::from(config_directory.join(environment_filename)).required(false),
        )
        .add_source(
            config::Environment::with_prefix("ANALYSIS")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}

#[derive(Display, Debug, Clone, Copy, PartialEq, EnumString)]
pub enum Environment {
    #[strum(ascii_case_insensitive, serialize = "local")]
    Local,
    #[strum(ascii_case_insensitive, serialize = "production")]
    Production,
}

#[cfg(test)]
mod tests {
    use std::sync::{Mutex, MutexGuard};

    use super::*;

    // Tests that read `ANALYSIS_*` variables must not overlap with one that sets them.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_lock() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[test]
    fn defaults_apply_without_config_files() {
        let _env = env_lock();
        let dir = tempfile::tempdir().unwrap();
        let settings = read_config_from(dir.path(), Environment::Local).unwrap();

        assert_eq!(settings.application.log_level, "info");
        assert_eq!(settings.limits.max_encoded_bytes, MAX_IMAGE_DATA_BYTES);
    }

    #[test]
    fn environment_file_overrides_base() {
        let _env = env_lock();
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("base.yaml"),
            "application:\n  log_level: info\nlimits:\n  max_encoded_bytes: 2048\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("production.yaml"),
            "application:\n  log_level: warn\n",
        )
        .unwrap();

        let settings = read_config_from(dir.path(), Environment::Production).unwrap();

        assert_eq!(settings.application.log_level, "warn");
        assert_eq!(settings.limits.max_encoded_bytes, 2048);
        assert_eq!(ImageLimits::from(&settings.limits), ImageLimits::new(2048));
    }

    #[test]
    fn non_numeric_limit_is_an_error() {
        let _env = env_lock();
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("base.yaml"),
            "limits:\n  max_encoded_bytes: ten megabytes\n",
        )
        .unwrap();

        assert!(read_config_from(dir.path(), Environment::Local).is_err());
    }

    #[test]
    fn environment_variable_overrides_files() {
        let _env = env_lock();
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("base.yaml"),
            "limits:\n  max_encoded_bytes: 2048\n",
        )
        .unwrap();

        std::env::set_var("ANALYSIS_LIMITS__MAX_ENCODED_BYTES", "4096");
        let settings = read_config_from(dir.path(), Environment::Local);
        std::env::remove_var("ANALYSIS_LIMITS__MAX_ENCODED_BYTES");

        assert_eq!(settings.unwrap().limits.max_encoded_bytes, 4096);
    }

    #[test]
    fn environment_names_parse_case_insensitively() {
        assert_eq!(Environment::from_str("PRODUCTION").unwrap(), Environment::Production);
        assert_eq!(Environment::Local.to_string(), "local");
        assert!(Environment::from_str("staging").is_err());
    }
}
