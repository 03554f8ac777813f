//! Renderer settings and preferences
//!
//! Persisted in LocalStorage on wasm; the engine itself holds no persisted
//! state.

use serde::{Deserialize, Serialize};

use crate::consts::SEGMENT_COUNT;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Tunnel pool size for this preset
    pub fn segment_count(&self) -> usize {
        match self {
            QualityPreset::Low => SEGMENT_COUNT / 2,
            QualityPreset::Medium => SEGMENT_COUNT,
            QualityPreset::High => SEGMENT_COUNT * 2,
        }
    }
}

/// Renderer settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Fixed seed for the tunnel; None derives one from the clock
    pub seed: Option<u64>,
    /// Reduced motion caps the pool at the Low preset size
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            seed: None,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective pool size (respects reduced_motion)
    pub fn effective_segment_count(&self) -> usize {
        if self.reduced_motion {
            QualityPreset::Low.segment_count()
        } else {
            self.quality.segment_count()
        }
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "hex_tunnel_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
