//! Settings sources behind [`SettingsSource`].

pub mod conf_file;
pub mod env;
pub mod memory;

pub use conf_file::{ConfFileSettings, resolve_app_dir};
pub use env::EnvSettings;
pub use memory::MemorySettings;

use crate::domain::ports::SettingsSource;

/// Ordered stack of sources. The first source holding a non-blank value for
/// a key wins.
#[derive(Default)]
pub struct LayeredSettings {
    layers: Vec<Box<dyn SettingsSource>>,
}

impl LayeredSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layer(mut self, layer: impl SettingsSource + 'static) -> Self {
        self.layers.push(Box::new(layer));
        self
    }
}

impl SettingsSource for LayeredSettings {
    fn get(&self, key: &str) -> Option<String> {
        self.layers
            .iter()
            .filter_map(|layer| layer.get(key))
            .find(|value| !value.trim().is_empty())
    }
}
