use std::io::Write;

use anyhow::Context;
use console::style;
use fwprov_archive::EntryInfo;
use fwprov_fetch::{Artifact, Release, ReqwestClient, Resolver};

use super::app::{InspectAction, InspectArgs};
use crate::config::FlashConfig;
use crate::error::Error;

pub(super) async fn execute(config: FlashConfig, args: InspectArgs, quiet: bool) -> anyhow::Result<()> {
    let source = args.source.as_deref().unwrap_or(&config.tar);
    let release = Release::new(
        args.release.as_deref().unwrap_or(&config.version),
        config.variant.as_deref(),
    );

    let resolver = Resolver::new(ReqwestClient::new().map_err(Error::Client)?);
    let archive = resolver
        .resolve(Artifact::Archive, source, &release, &super::fetch_options(quiet))
        .await
        .map_err(Error::resolve(Artifact::Archive))?;
    let bytes = &archive.bytes;

    match args.action {
        InspectAction::List => {
            for info in fwprov_archive::list_entries(bytes)? {
                println!("{}", listing(&info));
            }
        }
        InspectAction::Info { path } => {
            let info = fwprov_archive::entry_info(bytes, &path)?;
            print_info(&info);
        }
        InspectAction::Cat { path } => {
            let content = fwprov_archive::read_entry(bytes, &path)?;
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(&content)
                .and_then(|()| stdout.flush())
                .context("writing to stdout")?;
        }
        InspectAction::Extract { path, dir } => {
            let dir = dir.unwrap_or_else(|| config.dir.clone());
            let extracted =
                fwprov_archive::extract_entry(bytes, &path, &dir, &config.extract_options())?;
            println!(
                "{} {} -> {}",
                style("extracted").green().bold(),
                extracted.original_path.display(),
                extracted.target_path.display()
            );
        }
    }
    Ok(())
}

fn listing(info: &EntryInfo) -> String {
    format!(
        "{:<9} {:>6} {:>10}  {}",
        info.kind.label(),
        info.mode.map(|m| format!("{m:o}")).unwrap_or_default(),
        info.size,
        info.path.display()
    )
}

fn print_info(info: &EntryInfo) {
    let owner = |id: Option<u64>| id.map(|v| v.to_string()).unwrap_or_else(|| "-".into());
    println!("{:<6} {}", style("name").bold(), info.path.display());
    println!("{:<6} {}", style("kind").bold(), info.kind.label());
    println!("{:<6} {}", style("size").bold(), info.size);
    if let Some(mode) = info.mode {
        println!("{:<6} {mode:o}", style("mode").bold());
    }
    println!("{:<6} {}:{}", style("owner").bold(), owner(info.uid), owner(info.gid));
    if let Some(mtime) = info.mtime {
        println!("{:<6} {mtime}", style("mtime").bold());
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use fwprov_archive::EntryKind;

    use super::*;

    #[test]
    fn listing_columns() {
        let info = EntryInfo {
            path: PathBuf::from("etc/hostname"),
            kind: EntryKind::File,
            size: 7,
            mode: Some(0o644),
            uid: Some(0),
            gid: Some(0),
            mtime: Some(0),
        };
        assert_eq!(listing(&info), "file         644          7  etc/hostname");
    }
}
