use anyhow::{Context, Result};
use plotworld_world::{PlotWorldConfig, PlotWorldSettings};
use std::{fs, path::Path};
use tracing::{info, warn};

pub const DEFAULT_CONFIG_PATH: &str = "config/plotworld.toml";

/// Load world settings from `path`.
///
/// A missing file at the default location falls back to the classic plot
/// world. Any other read or parse failure is an error.
pub fn load_settings(path: &Path) -> Result<PlotWorldSettings> {
    match fs::read_to_string(path) {
        Ok(contents) => toml::from_str::<PlotWorldSettings>(&contents)
            .with_context(|| format!("Failed to parse {}", path.display())),
        Err(err)
            if path == Path::new(DEFAULT_CONFIG_PATH)
                && err.kind() == std::io::ErrorKind::NotFound =>
        {
            warn!(
                "World config not found at {}. Using defaults",
                path.display()
            );
            Ok(PlotWorldSettings::default())
        }
        Err(err) => Err(err).with_context(|| format!("Failed to read {}", path.display())),
    }
}

/// Load and validate a world configuration.
pub fn load_config(path: &Path) -> Result<PlotWorldConfig> {
    let settings = load_settings(path)?;
    let config = PlotWorldConfig::try_from(settings)
        .with_context(|| format!("Invalid world config in {}", path.display()))?;
    info!(
        plot_width = config.plot_width(),
        road_width = config.road_width(),
        "Loaded world config"
    );
    Ok(config)
}

/// Render settings as TOML.
pub fn settings_to_toml(settings: &PlotWorldSettings) -> Result<String> {
    toml::to_string_pretty(settings).context("Failed to serialize world settings")
}

/// Save settings to an explicit path.
pub fn save_settings(settings: &PlotWorldSettings, path: &Path) -> Result<()> {
    let toml = settings_to_toml(settings)?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, toml).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
