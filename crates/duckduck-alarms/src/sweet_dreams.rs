//! Sweet-dreams (pre-bed dim) settings.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Dim lead time used until the device receives its first update.
pub const DEFAULT_DIM_MINUTES: u32 = 1;

/// Process-wide sweet-dreams settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweetDreamsConfig {
    /// Whether the dim job dims the lamp.
    pub dim_active: bool,
    /// Minutes before bed time the dim job fires.
    pub dim_minutes: u32,
    /// Lullaby announced with the dim notification.
    pub lullaby: Option<String>,
}

impl Default for SweetDreamsConfig {
    fn default() -> Self {
        Self {
            dim_active: true,
            dim_minutes: DEFAULT_DIM_MINUTES,
            lullaby: None,
        }
    }
}

impl SweetDreamsConfig {
    /// Replace every setting with the values carried by `update`.
    pub fn apply(&mut self, update: SweetDreamsUpdate) {
        self.dim_active = update.dim_light.active;
        self.dim_minutes = update.dim_light.duration;
        self.lullaby = update.current_lullaby_song_path;
    }

    /// Payload of the `sweet-dreams` notification sent by the dim job.
    pub fn notification_payload(&self) -> Value {
        match &self.lullaby {
            Some(path) => json!({ "current_lullaby_song_path": path }),
            None => json!({}),
        }
    }
}

/// `update-sweet-dreams` command payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweetDreamsUpdate {
    pub dim_light: DimLight,
    #[serde(default)]
    pub current_lullaby_song_path: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimLight {
    pub active: bool,
    /// Minutes before bed time.
    pub duration: u32,
}

/// Shared handle to the live [`SweetDreamsConfig`].
///
/// Clones share the same settings; jobs read them when they fire.
#[derive(Debug, Clone, Default)]
pub struct SweetDreams {
    inner: Arc<RwLock<SweetDreamsConfig>>,
}

impl SweetDreams {
    pub fn new(config: SweetDreamsConfig) -> Self {
        Self {
            inner: Arc::new(RwLock::new(config)),
        }
    }

    pub fn snapshot(&self) -> SweetDreamsConfig {
        self.inner.read().clone()
    }

    pub fn dim_minutes(&self) -> u32 {
        self.inner.read().dim_minutes
    }

    /// Apply an update and return the resulting settings.
    pub fn apply(&self, update: SweetDreamsUpdate) -> SweetDreamsConfig {
        let mut config = self.inner.write();
        config.apply(update);
        config.clone()
    }
}
