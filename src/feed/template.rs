//! `@{field}` placeholder expansion for feed URL templates.
//!
//! Values live in a chain of scopes (feed, record, channel, file). A lookup
//! normally starts at the innermost scope, but a placeholder that names the
//! field currently being expanded resolves against the layers *outside* the
//! one that defined it, so a record-level `fileBaseUrl` of
//! `"@{fileBaseUrl}/macros"` appends to the feed-level value instead of
//! recursing into itself.

use std::collections::HashMap;

use thiserror::Error;

use crate::feed::manifest::{Channel, Feed, FileEntry, ScriptRecord};

const MAX_DEPTH: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("unresolved placeholder @{{{0}}}")]
    Unresolved(String),
    #[error("unterminated placeholder in {0:?}")]
    Unterminated(String),
    #[error("placeholder expansion too deep in {0:?}")]
    TooDeep(String),
}

/// A chain of variable layers, outermost first. Values may themselves
/// contain placeholders; they are expanded on lookup.
#[derive(Debug, Clone)]
pub struct Scope {
    layers: Vec<HashMap<String, String>>,
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl Scope {
    pub fn new() -> Self {
        Scope {
            layers: vec![HashMap::new()],
        }
    }

    /// A new scope with one additional (innermost) layer.
    pub fn child(&self) -> Self {
        let mut scope = self.clone();
        scope.layers.push(HashMap::new());
        scope
    }

    pub fn set<N: Into<String>, V: Into<String>>(&mut self, name: N, value: V) {
        // new() guarantees at least one layer
        self.layers
            .last_mut()
            .expect("scope has no layers")
            .insert(name.into(), value.into());
    }

    /// First match for `name`, searching only layers below `below`, innermost
    /// first. Returns the layer index the value was found in.
    fn lookup_below(&self, name: &str, below: usize) -> Option<(usize, &str)> {
        self.layers[..below]
            .iter()
            .enumerate()
            .rev()
            .find_map(|(ix, layer)| layer.get(name).map(|value| (ix, value.as_str())))
    }

    fn len(&self) -> usize {
        self.layers.len()
    }
}

/// Expands every `@{field}` token in `template` against `scope`.
pub fn expand(template: &str, scope: &Scope) -> Result<String, TemplateError> {
    expand_inner(template, scope, scope.len(), None, 0)
}

fn expand_inner(
    template: &str,
    scope: &Scope,
    below: usize,
    defining: Option<&str>,
    depth: usize,
) -> Result<String, TemplateError> {
    if depth > MAX_DEPTH {
        return Err(TemplateError::TooDeep(template.to_string()));
    }

    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("@{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let end = after
            .find('}')
            .ok_or_else(|| TemplateError::Unterminated(template.to_string()))?;
        let name = &after[..end];

        // A field referring to its own name resolves against the layers
        // outside its definition; everything else searches the full chain.
        let from = if defining == Some(name) {
            below
        } else {
            scope.len()
        };
        let (layer_ix, value) = scope
            .lookup_below(name, from)
            .ok_or_else(|| TemplateError::Unresolved(name.to_string()))?;

        if value.contains("@{") {
            out.push_str(&expand_inner(value, scope, layer_ix, Some(name), depth + 1)?);
        } else {
            out.push_str(value);
        }

        rest = &after[end + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

/// The feed-level scope: identity fields plus the raw URL templates.
pub fn feed_scope(feed: &Feed) -> Scope {
    let mut scope = Scope::new();
    scope.set("feedName", &feed.name);
    if let Some(value) = &feed.base_url {
        scope.set("baseUrl", value);
    }
    if let Some(value) = &feed.url {
        scope.set("url", value);
    }
    if let Some(value) = &feed.file_base_url {
        scope.set("fileBaseUrl", value);
    }
    scope
}

/// A record layer on top of the feed scope. `@{namespace}` is the record's
/// map key, `@{namespacePath}` the same with dots as path separators.
pub fn record_scope(parent: &Scope, namespace: &str, record: &ScriptRecord) -> Scope {
    let mut scope = parent.child();
    scope.set("namespace", namespace);
    scope.set("namespacePath", namespace.replace('.', "/"));
    if let Some(value) = &record.name {
        scope.set("scriptName", value);
    }
    if let Some(value) = &record.file_base_url {
        scope.set("fileBaseUrl", value);
    }
    if let Some(value) = &record.url {
        scope.set("url", value);
    }
    scope
}

/// A channel layer: `@{channel}` and the channel's `@{version}`.
pub fn channel_scope(parent: &Scope, channel_name: &str, channel: &Channel) -> Scope {
    let mut scope = parent.child();
    scope.set("channel", channel_name);
    if !channel.version.is_empty() {
        scope.set("version", &channel.version);
    }
    scope
}

/// A file layer: `@{fileName}` is the entry's `name` field.
pub fn file_scope(parent: &Scope, file: &FileEntry) -> Scope {
    let mut scope = parent.child();
    scope.set("fileName", &file.name);
    scope
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scope(vars: &[(&str, &str)]) -> Scope {
        let mut scope = Scope::new();
        for (name, value) in vars {
            scope.set(*name, *value);
        }
        scope
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(expand("no placeholders", &Scope::new()).unwrap(), "no placeholders");
    }

    #[test]
    fn expands_simple_placeholders() {
        let scope = scope(&[("name", "value")]);
        assert_eq!(expand("a @{name} b", &scope).unwrap(), "a value b");
    }

    #[test]
    fn expands_nested_values() {
        let scope = scope(&[
            ("baseUrl", "https://example.com"),
            ("fileBaseUrl", "@{baseUrl}/files"),
        ]);
        assert_eq!(
            expand("@{fileBaseUrl}/x.lua", &scope).unwrap(),
            "https://example.com/files/x.lua"
        );
    }

    #[test]
    fn inner_layers_shadow_outer_ones() {
        let scope = scope(&[("version", "1.0.0")]);
        let mut child = scope.child();
        child.set("version", "2.0.0");
        assert_eq!(expand("@{version}", &child).unwrap(), "2.0.0");
        assert_eq!(expand("@{version}", &scope).unwrap(), "1.0.0");
    }

    #[test]
    fn self_reference_resolves_against_outer_layer() {
        let mut outer = Scope::new();
        outer.set("fileBaseUrl", "https://example.com");
        let mut inner = outer.child();
        inner.set("fileBaseUrl", "@{fileBaseUrl}/macros");
        assert_eq!(
            expand("@{fileBaseUrl}/f.lua", &inner).unwrap(),
            "https://example.com/macros/f.lua"
        );
    }

    #[test]
    fn outer_values_may_reference_inner_variables() {
        // A feed-level fileBaseUrl commonly references @{channel}, which only
        // exists once a channel layer is in scope.
        let mut feed = Scope::new();
        feed.set("fileBaseUrl", "https://example.com/@{channel}");
        let mut channel = feed.child();
        channel.set("channel", "release");
        assert_eq!(
            expand("@{fileBaseUrl}/f.lua", &channel).unwrap(),
            "https://example.com/release/f.lua"
        );
    }

    #[test]
    fn unresolved_placeholder_is_an_error() {
        assert_eq!(
            expand("@{nope}", &Scope::new()),
            Err(TemplateError::Unresolved("nope".to_string()))
        );
    }

    #[test]
    fn unterminated_placeholder_is_an_error() {
        let scope = scope(&[("a", "1")]);
        assert_eq!(
            expand("@{a} @{oops", &scope),
            Err(TemplateError::Unterminated("@{a} @{oops".to_string()))
        );
    }

    #[test]
    fn mutual_recursion_hits_the_depth_limit() {
        let scope = scope(&[("a", "@{b}"), ("b", "@{a}")]);
        assert!(matches!(
            expand("@{a}", &scope),
            Err(TemplateError::TooDeep(_))
        ));
    }

    #[test]
    fn self_reference_without_outer_value_is_unresolved() {
        let scope = scope(&[("url", "@{url}")]);
        assert_eq!(
            expand("@{url}", &scope),
            Err(TemplateError::Unresolved("url".to_string()))
        );
    }
}
