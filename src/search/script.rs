use serde::{Deserialize, Serialize};

use crate::feed::lint::Diagnostic;
use crate::feed::manifest::{Feed, RecordKind, ScriptRecord};
use crate::feed::template::{self, expand};

/// One file of a release, with its URL template already expanded.
/// When expansion fails the raw template is kept so the UI still has
/// something to show; lint reports the actual problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedFile {
    pub name: String,
    pub url: String,
    pub sha1: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredModuleView {
    pub module_name: String,
    pub version: Option<String>,
    pub feed: Option<String>,
}

/// A flattened, display-ready view of one macro/module record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptItem {
    pub namespace: String,
    pub kind: RecordKind,
    pub feed_name: String,
    pub feed_url: Option<String>,
    pub name: String,
    pub author: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub channel: Option<String>,
    pub version: Option<String>,
    pub released: Option<String>,
    pub files: Vec<ResolvedFile>,
    pub required_modules: Vec<RequiredModuleView>,
    /// Newest first.
    pub changelog: Vec<(String, Vec<String>)>,
    pub exact_match: bool,
    #[serde(default)]
    pub diagnostics: Option<Vec<Diagnostic>>,
}

impl ScriptItem {
    pub fn from_record(
        feed: &Feed,
        kind: RecordKind,
        namespace: &str,
        record: &ScriptRecord,
    ) -> Self {
        let feed_scope = template::feed_scope(feed);
        let record_scope = template::record_scope(&feed_scope, namespace, record);

        let feed_url = feed
            .url
            .as_deref()
            .map(|url| expand(url, &feed_scope).unwrap_or_else(|_| url.to_string()));
        let url = record
            .url
            .as_deref()
            .map(|url| expand(url, &record_scope).unwrap_or_else(|_| url.to_string()));

        let default_channel = record.default_channel();
        let mut files = Vec::new();
        if let Some((channel_name, channel)) = default_channel {
            let channel_scope = template::channel_scope(&record_scope, channel_name, channel);
            for file in &channel.files {
                let file_scope = template::file_scope(&channel_scope, file);
                let raw = file.url.as_deref().unwrap_or_default();
                files.push(ResolvedFile {
                    name: file.name.clone(),
                    url: expand(raw, &file_scope).unwrap_or_else(|_| raw.to_string()),
                    sha1: file.sha1.clone(),
                });
            }
        }

        let required_modules = default_channel
            .map(|(_, channel)| {
                channel
                    .required_modules
                    .iter()
                    .map(|required| RequiredModuleView {
                        module_name: required.module_name.clone(),
                        version: required.version.clone(),
                        feed: required.feed.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        // Document order is oldest-first by convention; the UI wants the
        // latest release on top.
        let changelog: Vec<(String, Vec<String>)> = record
            .changelog
            .iter()
            .rev()
            .map(|(version, entries)| (version.clone(), entries.clone()))
            .collect();

        ScriptItem {
            namespace: namespace.to_string(),
            kind,
            feed_name: feed.name.clone(),
            feed_url,
            name: record
                .name
                .clone()
                .unwrap_or_else(|| namespace.to_string()),
            author: record.author.clone(),
            description: record.description.clone(),
            url,
            channel: default_channel.map(|(name, _)| name.to_string()),
            version: default_channel.map(|(_, channel)| channel.version.clone()),
            released: default_channel.and_then(|(_, channel)| channel.released.clone()),
            files,
            required_modules,
            changelog,
            exact_match: false,
            diagnostics: None,
        }
    }

    pub fn is_validated(&self) -> bool {
        self.diagnostics.is_some()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics
            .as_deref()
            .map(crate::feed::lint::error_count)
            .unwrap_or(0)
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .as_deref()
            .map(crate::feed::lint::warning_count)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::SAMPLE_FEED;
    use pretty_assertions::assert_eq;

    #[test]
    fn resolves_the_default_channel() {
        let feed: Feed = SAMPLE_FEED.parse().unwrap();
        let (kind, record) = feed.get("arch.AegisubChain").unwrap();
        let item = ScriptItem::from_record(&feed, kind, "arch.AegisubChain", record);

        assert_eq!(item.name, "AegisubChain");
        assert_eq!(item.channel.as_deref(), Some("release"));
        assert_eq!(item.version.as_deref(), Some("0.4.0"));
        assert_eq!(item.files.len(), 1);
        assert_eq!(
            item.files[0].url,
            "https://raw.githubusercontent.com/arch1t3cht/Aegisub-Scripts/release/macros/arch.AegisubChain.lua"
        );
        assert!(!item.files[0].url.contains("@{"));
        assert_eq!(
            item.url.as_deref(),
            Some("https://github.com/arch1t3cht/Aegisub-Scripts#aegisubchain")
        );
    }

    #[test]
    fn changelog_is_newest_first() {
        let feed: Feed = SAMPLE_FEED.parse().unwrap();
        let (kind, record) = feed.get("arch.AegisubChain").unwrap();
        let item = ScriptItem::from_record(&feed, kind, "arch.AegisubChain", record);

        let versions: Vec<&str> = item.changelog.iter().map(|(v, _)| v.as_str()).collect();
        assert_eq!(versions, vec!["0.4.0", "0.3.0", "0.1.0"]);
    }

    #[test]
    fn a_broken_template_falls_back_to_the_raw_text() {
        let mut feed: Feed = SAMPLE_FEED.parse().unwrap();
        feed.macros["arch.AegisubChain"].url = Some("@{missing}".into());
        let (kind, record) = feed.get("arch.AegisubChain").unwrap();
        let item = ScriptItem::from_record(&feed, kind, "arch.AegisubChain", record);
        assert_eq!(item.url.as_deref(), Some("@{missing}"));
    }
}
