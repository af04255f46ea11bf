use console::style;
use fwprov_fetch::ReqwestClient;
use tracing::info;

use super::app::FlashArgs;
use crate::config::FlashConfig;
use crate::error::Error;
use crate::pipeline::{Pipeline, Summary};
use crate::ui::ExpandSpinner;

pub(super) async fn execute(mut config: FlashConfig, args: FlashArgs, quiet: bool) -> anyhow::Result<()> {
    args.apply(&mut config);
    info!(
        boot = %config.boot,
        image = %config.image,
        tar = %config.tar,
        version = %config.version,
        variant = config.variant.as_deref().unwrap_or("-"),
        dir = %config.dir.display(),
        "flashing"
    );

    let mut options = config.extract_options();
    let spinner = (!quiet).then(ExpandSpinner::new);
    if let Some(spinner) = &spinner {
        options = options.on_progress(spinner.clone().callback());
    }

    let client = ReqwestClient::new().map_err(Error::Client)?;
    let pipeline = Pipeline::new(client)
        .fetch_options(super::fetch_options(quiet))
        .extract_options(options);
    let summary = pipeline.run(&config).await;
    if let Some(spinner) = &spinner {
        spinner.finish();
    }
    let Summary { firmware, archive: report } = summary?;

    info!(
        entries = report.entry_count,
        bytes = report.total_bytes,
        replaced = report.replaced_count(),
        skipped = report.skipped.len(),
        "archive expanded"
    );

    if !quiet {
        println!("{} {}", style("boot").green().bold(), firmware.boot.display());
        println!("{} {}", style("image").green().bold(), firmware.image.display());
        println!(
            "{} {} entries into {} ({} replaced, {} skipped)",
            style("archive").green().bold(),
            report.entry_count,
            config.dir.display(),
            report.replaced_count(),
            report.skipped.len()
        );
    }
    Ok(())
}
