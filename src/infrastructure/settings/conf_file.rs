//! Splunk `.conf` file settings.
//!
//! Layering follows splunkd for a single app: `default/<file>.conf` is read
//! first and `local/<file>.conf` overrides it key by key. Within the merged
//! result, keys from the `[default]` stanza (or before any stanza header)
//! apply only where the requested stanza does not set them.

use crate::config::{APP_NAME, CONF_FILE, CONF_STANZA};
use crate::domain::errors::CollectorError;
use crate::domain::ports::SettingsSource;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const GLOBAL_STANZA: &str = "default";

type Stanzas = HashMap<String, HashMap<String, String>>;

/// Settings for one stanza, merged from one or more `.conf` files.
#[derive(Debug, Clone, Default)]
pub struct ConfFileSettings {
    values: HashMap<String, String>,
    sources: Vec<PathBuf>,
}

impl ConfFileSettings {
    /// Settings for this app's `asm_settings.conf` `[settings]` stanza.
    pub fn for_app_dir(app_dir: &Path) -> Result<Self, CollectorError> {
        let file_name = format!("{}.conf", CONF_FILE);
        Self::from_files(
            &[
                app_dir.join("default").join(&file_name),
                app_dir.join("local").join(&file_name),
            ],
            CONF_STANZA,
        )
    }

    /// Merge `stanza` from `paths`; later files override earlier ones.
    /// Files that do not exist are skipped.
    pub fn from_files(paths: &[PathBuf], stanza: &str) -> Result<Self, CollectorError> {
        let mut merged: Stanzas = HashMap::new();
        let mut sources = Vec::new();

        for path in paths {
            let contents = match fs::read_to_string(path) {
                Ok(contents) => contents,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    debug!("Settings file not found, skipping: {}", path.display());
                    continue;
                }
                Err(error) => {
                    return Err(CollectorError::Settings {
                        path: path.clone(),
                        error,
                    });
                }
            };

            for (name, values) in parse_stanzas(&contents) {
                merged.entry(name).or_default().extend(values);
            }
            sources.push(path.clone());
        }

        if sources.is_empty() {
            warn!("No {}.conf found in {:?}", CONF_FILE, paths);
        }

        let mut values = merged.remove(GLOBAL_STANZA).unwrap_or_default();
        if let Some(own) = merged.remove(stanza) {
            values.extend(own);
        }

        Ok(Self { values, sources })
    }

    /// Settings for one stanza of an in-memory conf document.
    pub fn from_document(contents: &str, stanza: &str) -> Self {
        let mut stanzas = parse_stanzas(contents);
        let mut values = stanzas.remove(GLOBAL_STANZA).unwrap_or_default();
        if let Some(own) = stanzas.remove(stanza) {
            values.extend(own);
        }
        Self {
            values,
            sources: Vec::new(),
        }
    }

    /// Files that contributed to these settings, in read order.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }
}

impl SettingsSource for ConfFileSettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Locate the app directory: an explicit path, then
/// `$SPLUNK_HOME/etc/apps/<app>`, then the parent of the executable's
/// directory (scripted inputs run from `<app>/bin`).
pub fn resolve_app_dir(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| {
            env::var_os("SPLUNK_HOME")
                .map(|home| PathBuf::from(home).join("etc").join("apps").join(APP_NAME))
        })
        .or_else(|| {
            env::current_exe()
                .ok()
                .and_then(|exe| exe.parent()?.parent().map(Path::to_path_buf))
        })
}

/// Parse a `.conf` document into stanzas.
///
/// Supports `[stanza]` headers, `key = value` lines, `#`/`;` comments and
/// trailing-backslash continuation. Keys before the first header belong to
/// `[default]`. Duplicate keys: last one wins.
pub fn parse_stanzas(contents: &str) -> Stanzas {
    let mut stanzas: Stanzas = HashMap::new();
    let mut current = GLOBAL_STANZA.to_string();
    let mut pending = String::new();

    for raw in contents.lines() {
        if let Some(continued) = raw.strip_suffix('\\') {
            pending.push_str(continued);
            pending.push('\n');
            continue;
        }
        pending.push_str(raw);
        let line = std::mem::take(&mut pending);
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            current = name.trim().to_string();
            stanzas.entry(current.clone()).or_default();
            continue;
        }

        match line.split_once('=') {
            Some((key, value)) => {
                stanzas
                    .entry(current.clone())
                    .or_default()
                    .insert(key.trim().to_string(), value.trim().to_string());
            }
            None => debug!("Ignoring malformed conf line in [{}]", current),
        }
    }

    stanzas
}
