//! The DependencyControl feed document.
//!
//! Deserialization is deliberately lenient: a record missing its `version` or
//! a file missing its `sha1` still parses, and lint reports the omission.
//! Map order and unknown keys are preserved so that reading and re-writing a
//! feed never scrambles a hand-maintained document.

use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::Display;

/// Whether a record was advertised under `macros` or `modules`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum RecordKind {
    Macro,
    Module,
}

impl RecordKind {
    /// The top-level key this kind lives under.
    pub fn key(&self) -> &'static str {
        match self {
            RecordKind::Macro => "macros",
            RecordKind::Module => "modules",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feed {
    #[serde(default)]
    pub dependency_control_feed_format_version: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub maintainer: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub known_feeds: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub macros: IndexMap<String, ScriptRecord>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub modules: IndexMap<String, ScriptRecord>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub channels: IndexMap<String, Channel>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub changelog: IndexMap<String, Vec<String>>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub released: Option<String>,
    #[serde(default)]
    pub default: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<FileEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_modules: Vec<RequiredModule>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha1: Option<String>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequiredModule {
    #[serde(default)]
    pub module_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed: Option<String>,
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl Feed {
    pub fn to_string_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// All records, macros first, in document order.
    pub fn records(&self) -> impl Iterator<Item = (RecordKind, &str, &ScriptRecord)> {
        self.macros
            .iter()
            .map(|(ns, record)| (RecordKind::Macro, ns.as_str(), record))
            .chain(
                self.modules
                    .iter()
                    .map(|(ns, record)| (RecordKind::Module, ns.as_str(), record)),
            )
    }

    /// Looks a namespace up in `macros`, then in `modules`.
    pub fn get(&self, namespace: &str) -> Option<(RecordKind, &ScriptRecord)> {
        if let Some(record) = self.macros.get(namespace) {
            return Some((RecordKind::Macro, record));
        }
        self.modules
            .get(namespace)
            .map(|record| (RecordKind::Module, record))
    }

    pub fn record_count(&self) -> usize {
        self.macros.len() + self.modules.len()
    }
}

impl FromStr for Feed {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s)
    }
}

impl ScriptRecord {
    /// The channel marked `default: true`, falling back to the first channel.
    pub fn default_channel(&self) -> Option<(&str, &Channel)> {
        self.channels
            .iter()
            .find(|(_, channel)| channel.default)
            .or_else(|| self.channels.first())
            .map(|(name, channel)| (name.as_str(), channel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::SAMPLE_FEED;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_the_sample_feed() {
        let feed: Feed = SAMPLE_FEED.parse().unwrap();

        assert_eq!(feed.dependency_control_feed_format_version, "0.3.0");
        assert_eq!(feed.maintainer, "arch1t3cht");
        assert_eq!(feed.known_feeds.len(), 2);
        assert_eq!(feed.macros.len(), 1);
        assert_eq!(feed.modules.len(), 1);
        assert_eq!(feed.record_count(), 2);

        let (kind, record) = feed.get("arch.AegisubChain").unwrap();
        assert_eq!(kind, RecordKind::Macro);
        assert_eq!(record.name.as_deref(), Some("AegisubChain"));

        let (channel_name, channel) = record.default_channel().unwrap();
        assert_eq!(channel_name, "release");
        assert_eq!(channel.version, "0.4.0");
        assert!(channel.default);
        assert_eq!(channel.files.len(), 1);
        assert_eq!(channel.required_modules.len(), 1);
        assert_eq!(
            channel.required_modules[0].module_name,
            "l0.DependencyControl"
        );
    }

    #[test]
    fn preserves_map_order_across_a_round_trip() {
        let feed: Feed = SAMPLE_FEED.parse().unwrap();
        let rewritten = feed.to_string_pretty().unwrap();
        let reparsed: Feed = rewritten.parse().unwrap();

        assert_eq!(feed, reparsed);

        let record = &reparsed.macros["arch.AegisubChain"];
        let changelog_keys: Vec<&String> = record.changelog.keys().collect();
        assert_eq!(changelog_keys, vec!["0.1.0", "0.3.0", "0.4.0"]);
    }

    #[test]
    fn unknown_keys_are_kept() {
        let src = r##"{
            "dependencyControlFeedFormatVersion": "0.3.0",
            "name": "f",
            "description": "",
            "maintainer": "m",
            "someFutureKey": {"nested": true},
            "macros": {},
            "modules": {}
        }"##;
        let feed: Feed = src.parse().unwrap();
        assert!(feed.extra.contains_key("someFutureKey"));
        let rewritten = feed.to_string_pretty().unwrap();
        assert!(rewritten.contains("someFutureKey"));
    }

    #[test]
    fn missing_record_fields_parse_as_defaults() {
        let src = r##"{
            "name": "f",
            "macros": {
                "a.B": {
                    "channels": {
                        "release": { "files": [ { "name": ".lua" } ] }
                    }
                }
            }
        }"##;
        let feed: Feed = src.parse().unwrap();
        let (_, record) = feed.get("a.B").unwrap();
        let (_, channel) = record.default_channel().unwrap();
        assert_eq!(channel.version, "");
        assert_eq!(channel.files[0].sha1, None);
    }

    #[test]
    fn default_channel_falls_back_to_the_first() {
        let src = r##"{
            "name": "f",
            "modules": {
                "a.B": {
                    "channels": {
                        "beta": { "version": "0.2.0" },
                        "release": { "version": "0.1.0" }
                    }
                }
            }
        }"##;
        let feed: Feed = src.parse().unwrap();
        let (_, record) = feed.get("a.B").unwrap();
        let (name, channel) = record.default_channel().unwrap();
        assert_eq!(name, "beta");
        assert_eq!(channel.version, "0.2.0");
    }
}
