use color_eyre::Result;
use thiserror::Error;
use tokio::sync::mpsc::error::SendError;
use tracing::error;

use crate::feed::template::TemplateError;
use crate::feed::version::ParseVersionError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Version(#[from] ParseVersionError),
    #[error(transparent)]
    Join(#[from] tokio::task::JoinError),
    #[error("response unsuccessful ({0}): {1}")]
    ResponseUnsuccessful(u16, String),
    #[error("feed error: {0}")]
    Feed(String),
    #[error("channel closed: {0}")]
    Send(String),
    #[error("{0}")]
    Unknown(String),
}

impl<T> From<SendError<T>> for AppError {
    fn from(err: SendError<T>) -> Self {
        AppError::Send(err.to_string())
    }
}

impl From<color_eyre::Report> for AppError {
    fn from(err: color_eyre::Report) -> Self {
        AppError::Unknown(err.to_string())
    }
}

pub fn init() -> Result<()> {
    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default()
        .panic_section(format!(
            "This is a bug. Consider reporting it at {}",
            env!("CARGO_PKG_REPOSITORY")
        ))
        .capture_span_trace_by_default(false)
        .display_location_section(false)
        .display_env_section(false)
        .into_hooks();
    eyre_hook.install()?;

    std::panic::set_hook(Box::new(move |panic_info| {
        if let Ok(mut t) = crate::tui::Tui::new() {
            if let Err(r) = t.exit() {
                error!("Unable to exit Terminal: {:?}", r);
            }
        }

        #[cfg(not(debug_assertions))]
        {
            use human_panic::{handle_dump, print_msg, Metadata};
            let meta = Metadata::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
                .homepage(env!("CARGO_PKG_HOMEPAGE"));
            let file_path = handle_dump(&meta, panic_info);
            // prints human-panic message
            print_msg(file_path, &meta)
                .expect("human-panic: printing error message to console failed");
            eprintln!("{}", panic_hook.panic_report(panic_info)); // prints color-eyre stack trace to stderr
        }

        let msg = format!("{}", panic_hook.panic_report(panic_info));
        error!("Error: {}", strip_ansi_escapes::strip_str(&msg));

        #[cfg(debug_assertions)]
        {
            // Better Panic stacktrace that is only enabled when debugging.
            better_panic::Settings::auto()
                .most_recent_first(false)
                .lineno_suffix(true)
                .verbosity(better_panic::Verbosity::Full)
                .create_panic_handler()(panic_info);
        }

        std::process::exit(1);
    }));

    Ok(())
}
