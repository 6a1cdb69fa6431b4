use std::sync::Arc;
use std::time::Duration;

use lazy_static::lazy_static;
use reqwest::Client;

use crate::errors::{AppError, AppResult};
use crate::feed::manifest::Feed;

lazy_static! {
    static ref CLIENT: Arc<Client> = Arc::new(
        Client::builder()
            .user_agent(concat!(
                "feedseek/",
                env!("CARGO_PKG_VERSION"),
                " (https://github.com/feedseek/feedseek)"
            ))
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap()
    );
}

/// Fetches and parses a feed manifest from an http(s) URL.
pub async fn fetch_feed(url: &str) -> AppResult<Feed> {
    let response = CLIENT.get(url).send().await?;
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        return Err(AppError::ResponseUnsuccessful(status.as_u16(), text));
    }

    Ok(text.parse()?)
}
