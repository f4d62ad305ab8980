//! Configuration for the notes module.

use notekeep_core::{defaults, SortField};
use tracing::warn;

/// Channels and preferences used by [`NotesModule`](crate::NotesModule).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesConfig {
    /// Channel the module answers on and publishes its events to.
    pub channel: String,
    pub tags_channel: String,
    pub notebooks_channel: String,
    pub files_channel: String,
    pub configs_channel: String,
    /// Config key holding the user's sort preference.
    pub sort_config_key: String,
    /// Sort used when the preference is missing or unreadable.
    pub default_sort: SortField,
    /// Buffer size for routers built from this config.
    pub event_bus_capacity: usize,
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            channel: defaults::NOTES_CHANNEL.to_string(),
            tags_channel: defaults::TAGS_CHANNEL.to_string(),
            notebooks_channel: defaults::NOTEBOOKS_CHANNEL.to_string(),
            files_channel: defaults::FILES_CHANNEL.to_string(),
            configs_channel: defaults::CONFIGS_CHANNEL.to_string(),
            sort_config_key: defaults::SORT_CONFIG_KEY.to_string(),
            default_sort: SortField::default(),
            event_bus_capacity: defaults::EVENT_BUS_CAPACITY,
        }
    }
}

impl NotesConfig {
    /// Create config from environment variables (with defaults).
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `NOTEKEEP_NOTES_CHANNEL` | `collections/Notes` | Channel answered by the module |
    /// | `NOTEKEEP_TAGS_CHANNEL` | `collections/Tags` | Tags collaborator |
    /// | `NOTEKEEP_NOTEBOOKS_CHANNEL` | `collections/Notebooks` | Notebooks collaborator |
    /// | `NOTEKEEP_FILES_CHANNEL` | `collections/Files` | Files collaborator |
    /// | `NOTEKEEP_CONFIGS_CHANNEL` | `collections/Configs` | Configs collaborator |
    /// | `NOTEKEEP_SORT_CONFIG_KEY` | `sortnotes` | Sort preference key |
    /// | `NOTEKEEP_DEFAULT_SORT` | `created` | Fallback sort field |
    /// | `NOTEKEEP_EVENT_BUS_CAPACITY` | `256` | Event buffer size |
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_vars<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = Self::default();
        let text = |key: &str, fallback: String| {
            get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(fallback)
        };

        let default_sort = match get("NOTEKEEP_DEFAULT_SORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!(value = %raw, "Ignoring invalid NOTEKEEP_DEFAULT_SORT");
                base.default_sort
            }),
            None => base.default_sort,
        };

        let event_bus_capacity = get("NOTEKEEP_EVENT_BUS_CAPACITY")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(base.event_bus_capacity)
            .max(1);

        Self {
            channel: text("NOTEKEEP_NOTES_CHANNEL", base.channel),
            tags_channel: text("NOTEKEEP_TAGS_CHANNEL", base.tags_channel),
            notebooks_channel: text("NOTEKEEP_NOTEBOOKS_CHANNEL", base.notebooks_channel),
            files_channel: text("NOTEKEEP_FILES_CHANNEL", base.files_channel),
            configs_channel: text("NOTEKEEP_CONFIGS_CHANNEL", base.configs_channel),
            sort_config_key: text("NOTEKEEP_SORT_CONFIG_KEY", base.sort_config_key),
            default_sort,
            event_bus_capacity,
        }
    }

    /// Answer on a different channel.
    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = channel.into();
        self
    }

    /// Set the fallback sort field.
    pub fn with_default_sort(mut self, sort: SortField) -> Self {
        self.default_sort = sort;
        self
    }

    /// Set the event buffer size.
    pub fn with_event_bus_capacity(mut self, capacity: usize) -> Self {
        self.event_bus_capacity = capacity.max(1);
        self
    }
}
