//! Non-interactive subcommands: lint, resolve and show run against a feed
//! and print to stdout instead of entering the TUI.

use crate::errors::{AppError, AppResult};
use crate::feed::lint;
use crate::feed::manifest::{Channel, Feed, RecordKind, ScriptRecord};
use crate::feed::template::{self, expand};
use crate::feed::{FeedEnv, FeedSource};

pub async fn lint(sources: Vec<FeedSource>, strict: bool) -> AppResult<()> {
    let mut env = FeedEnv::new(sources);
    env.load().await?;

    let mut errors = 0;
    let mut warnings = 0;

    for (source, err) in &env.load_errors {
        println!("error: {source}: {err}");
        errors += 1;
    }

    for loaded in &env.feeds {
        let source = loaded
            .source
            .as_ref()
            .map(|source| source.to_string())
            .unwrap_or_else(|| loaded.manifest.name.clone());

        let diags = lint::lint_feed(&loaded.manifest, Some(&env));
        if diags.is_empty() {
            println!("{source}: ok ({} records)", loaded.manifest.record_count());
            continue;
        }

        for diag in &diags {
            println!("{source}: {diag}");
        }
        errors += lint::error_count(&diags);
        warnings += lint::warning_count(&diags);
    }

    println!("{errors} errors, {warnings} warnings");

    if errors > 0 || (strict && warnings > 0) {
        std::process::exit(1);
    }
    Ok(())
}

pub async fn resolve(
    source: FeedSource,
    namespace: &str,
    channel: Option<&str>,
) -> AppResult<()> {
    let manifest = FeedEnv::load_source(&source).await?;
    let (kind, record) = get_record(&manifest, namespace)?;
    let (channel_name, channel) = get_channel(record, namespace, channel)?;

    let feed_scope = template::feed_scope(&manifest);
    let record_scope = template::record_scope(&feed_scope, namespace, record);
    let channel_scope = template::channel_scope(&record_scope, channel_name, channel);

    println!(
        "{namespace} {} ({kind}, channel {channel_name})",
        channel.version
    );
    for file in &channel.files {
        let file_scope = template::file_scope(&channel_scope, file);
        let url = expand(file.url.as_deref().unwrap_or_default(), &file_scope)?;
        println!("{}  {url}", file.sha1.as_deref().unwrap_or("-"));
    }

    Ok(())
}

pub async fn show(source: FeedSource, namespace: &str) -> AppResult<()> {
    let manifest = FeedEnv::load_source(&source).await?;
    let (kind, record) = get_record(&manifest, namespace)?;

    let feed_scope = template::feed_scope(&manifest);
    let record_scope = template::record_scope(&feed_scope, namespace, record);

    println!(
        "{} ({kind} {namespace}, from {})",
        record.name.as_deref().unwrap_or(namespace),
        manifest.name
    );
    if let Some(author) = &record.author {
        println!("author: {author}");
    }
    if let Some(description) = &record.description {
        println!("{description}");
    }
    if let Some(url) = &record.url {
        println!("web: {}", expand(url, &record_scope).unwrap_or_else(|_| url.clone()));
    }

    for (channel_name, channel) in &record.channels {
        let default = if channel.default { " (default)" } else { "" };
        let released = channel
            .released
            .as_deref()
            .map(|date| format!(", released {date}"))
            .unwrap_or_default();
        println!(
            "channel {channel_name}{default}: {}{released}, {} files",
            channel.version,
            channel.files.len()
        );
    }

    if !record.changelog.is_empty() {
        println!("changelog:");
        for (version, entries) in record.changelog.iter().rev() {
            println!("  {version}:");
            for entry in entries {
                println!("    - {entry}");
            }
        }
    }

    Ok(())
}

fn get_record<'a>(
    manifest: &'a Feed,
    namespace: &str,
) -> AppResult<(RecordKind, &'a ScriptRecord)> {
    manifest.get(namespace).ok_or_else(|| {
        AppError::Feed(format!(
            "{namespace:?} is not advertised by {:?}",
            manifest.name
        ))
    })
}

fn get_channel<'a>(
    record: &'a ScriptRecord,
    namespace: &str,
    channel: Option<&str>,
) -> AppResult<(&'a str, &'a Channel)> {
    match channel {
        Some(name) => record
            .channels
            .get_key_value(name)
            .map(|(name, channel)| (name.as_str(), channel))
            .ok_or_else(|| AppError::Feed(format!("{namespace} has no channel {name:?}"))),
        None => record
            .default_channel()
            .ok_or_else(|| AppError::Feed(format!("{namespace} has no channels"))),
    }
}
