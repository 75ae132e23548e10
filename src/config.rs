use std::io::{Error, ErrorKind};

const AUTO_EDITOR_BIN: &str = "auto-editor";
const KEY: &str = "E";

fn default_as_true() -> bool {
    true
}

fn default_acceleration_factor() -> f64 {
    3.0
}

fn default_min_cut_seconds() -> f64 {
    0.04
}

fn default_max_cut_percent() -> u32 {
    60
}

fn default_auto_editor_bin() -> String {
    AUTO_EDITOR_BIN.to_string()
}

fn default_key() -> String {
    KEY.to_string()
}

#[derive(serde_derive::Deserialize, Clone, Debug, PartialEq)]
pub struct Config {
    #[serde(default = "default_acceleration_factor")]
    pub acceleration_factor: f64,
    #[serde(default = "default_min_cut_seconds")]
    pub min_cut_seconds: f64,
    #[serde(default = "default_max_cut_percent")]
    pub max_cut_percent: u32,
    #[serde(default = "default_auto_editor_bin")]
    pub auto_editor_bin: String,
    #[serde(default = "default_key")]
    pub key: String,
    #[serde(default = "default_as_true")]
    pub notice: bool,
}

impl Config {
    pub fn get() -> Self {
        dirs::config_dir()
            .ok_or(Error::new(ErrorKind::NotFound, "configuration directory not found"))
            .and_then(|dir| std::fs::read_to_string(dir.join("mpv/skip-silence.toml")))
            .and_then(|data| Self::parse(&data))
            .unwrap_or_else(|e| {
                log::warn!("Failed to load configuration file: {}. Falling back to default", e);
                Self::default()
            })
    }

    fn parse(data: &str) -> std::io::Result<Self> {
        let config: Self = toml::from_str(data).map_err(|e| Error::new(ErrorKind::InvalidData, e))?;
        if !(config.acceleration_factor > 0.0) {
            return Err(Error::new(
                ErrorKind::InvalidData,
                "acceleration_factor must be greater than zero",
            ));
        }
        Ok(config)
    }

    /// Arguments passed to auto-editor after the input file.
    pub fn analysis_args(&self) -> Vec<String> {
        vec![
            "--export_as_json".to_string(),
            "-mcut".to_string(),
            self.max_cut_percent.to_string(),
            "-t".to_string(),
            self.min_cut_seconds.to_string(),
        ]
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            acceleration_factor: default_acceleration_factor(),
            min_cut_seconds: default_min_cut_seconds(),
            max_cut_percent: default_max_cut_percent(),
            auto_editor_bin: default_auto_editor_bin(),
            key: default_key(),
            notice: default_as_true(),
        }
    }
}
