use std::process::ExitCode;

use clap::Parser;
use console::style;
use fwprov::cli::{self, App};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let app = App::parse();
    fwprov::logging::init(app.verbose, app.quiet);

    match cli::run(app).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {}", style("error:").red().bold(), cli::render_error(&err));
            ExitCode::FAILURE
        }
    }
}
