//! Command-line front end: argument parsing and the two commands.

mod app;
mod flash;
mod inspect;

pub use app::{App, Commands, FlashArgs, InspectAction, InspectArgs};

use std::sync::Arc;

use fwprov_fetch::FetchOptions;

use crate::config::FlashConfig;
use crate::ui::DownloadBars;

pub async fn run(app: App) -> anyhow::Result<()> {
    let config = FlashConfig::load_or_default(app.config.as_deref())?;
    match app.cmd {
        None => flash::execute(config, app.flash, app.quiet).await,
        Some(Commands::Flash(args)) => flash::execute(config, args, app.quiet).await,
        Some(Commands::Inspect(args)) => inspect::execute(config, args, app.quiet).await,
    }
}

/// Single line of `a: b: c`, dropping causes already spelled out by their parent.
pub fn render_error(err: &anyhow::Error) -> String {
    let mut line = String::new();
    for cause in err.chain() {
        let text = cause.to_string();
        if line.contains(&text) {
            continue;
        }
        if !line.is_empty() {
            line.push_str(": ");
        }
        line.push_str(&text);
    }
    line
}

fn fetch_options(quiet: bool) -> FetchOptions {
    if quiet {
        FetchOptions::default()
    } else {
        FetchOptions::default().on_progress(Arc::new(DownloadBars::default()).callback())
    }
}
