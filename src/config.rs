//! Configuration management for docscan
//!
//! Provides loading, saving, and validation of scanner and enhancement
//! settings. All values are supplied by the host application; the engine
//! only reads them.

use crate::errors::ScanError;
use crate::types::{FacingMode, QualityTier, ScanMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    pub scanner: ScannerConfig,
    pub enhancement: EnhancementSettings,
}

/// Scanner behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// How capture is triggered (auto, manual, burst)
    pub mode: ScanMode,
    /// Output quality tier; also selects the camera resolution
    pub quality: QualityTier,
    /// Camera facing direction
    pub facing: FacingMode,
    /// Draw a framing grid over the preview. Presentation only.
    pub grid_overlay: bool,
    /// Run document detection and scoring. When off, only manual capture works.
    pub ai_detection: bool,
}

/// Post-capture enhancement, held for the session's lifetime
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnhancementSettings {
    /// Apply brightness/contrast/sharpness at capture time
    pub auto_enhance: bool,
    /// Brightness percentage (50-150, 100 = unchanged)
    pub brightness: u8,
    /// Contrast percentage (50-150, 100 = unchanged)
    pub contrast: u8,
    /// Sharpness percentage (100-150, 100 = no sharpening)
    pub sharpness: u8,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            mode: ScanMode::Auto,
            quality: QualityTier::High,
            facing: FacingMode::Back,
            grid_overlay: true,
            ai_detection: true,
        }
    }
}

impl Default for EnhancementSettings {
    fn default() -> Self {
        Self {
            auto_enhance: true,
            brightness: 100,
            contrast: 120,
            sharpness: 110,
        }
    }
}

impl EnhancementSettings {
    /// Settings that leave pixels untouched
    pub fn identity() -> Self {
        Self {
            auto_enhance: true,
            brightness: 100,
            contrast: 100,
            sharpness: 100,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(50..=150).contains(&self.brightness) {
            return Err("Brightness must be between 50 and 150".to_string());
        }
        if !(50..=150).contains(&self.contrast) {
            return Err("Contrast must be between 50 and 150".to_string());
        }
        if !(100..=150).contains(&self.sharpness) {
            return Err("Sharpness must be between 100 and 150".to_string());
        }
        Ok(())
    }
}

impl ScanConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScanError> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| ScanError::Config(format!("Failed to read config file: {}", e)))?;

        let config: ScanConfig = toml::from_str(&contents)
            .map_err(|e| ScanError::Config(format!("Failed to parse config file: {}", e)))?;

        config.validate().map_err(ScanError::InvalidConfig)?;

        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ScanError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ScanError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ScanError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)
            .map_err(|e| ScanError::Config(format!("Failed to write config file: {}", e)))?;

        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Get default config file path
    pub fn default_path() -> PathBuf {
        PathBuf::from("docscan.toml")
    }

    /// Load from default location or fall back to defaults
    pub fn load_or_default() -> Self {
        Self::load_from_file(Self::default_path()).unwrap_or_else(|e| {
            log::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        self.enhancement.validate()
    }
}
