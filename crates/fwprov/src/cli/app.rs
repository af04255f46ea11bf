use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::config::{FlashConfig, Ownership};

#[derive(Clone, Debug, Parser)]
#[command(
    name = "fwprov",
    version = env!("CARGO_PKG_VERSION"),
    about,
    long_about = None,
    propagate_version = true,
    args_conflicts_with_subcommands = true
)]
pub struct App {
    #[command(subcommand)]
    pub cmd: Option<Commands>,

    /// Flash options when no subcommand is given
    #[command(flatten)]
    pub flash: FlashArgs,

    /// TOML file with defaults for the flash options
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// No progress bars, warnings only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// More logging; repeat for trace output
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    #[command(alias = "f", name = "flash", about = "Fetch BOOT.BIN, image.ub and SD_p2.tar.gz and lay them out under DIR")]
    Flash(FlashArgs),
    #[command(alias = "i", name = "inspect", about = "Browse the archive without writing any firmware")]
    Inspect(InspectArgs),
}

#[derive(Clone, Debug, Default, Args)]
pub struct FlashArgs {
    /// Source for BOOT.BIN: release URL (http:// or https://) or local file/directory
    #[arg(long, value_name = "SRC")]
    pub boot: Option<String>,

    /// Source for image.ub: release URL or local file/directory
    #[arg(long, value_name = "SRC")]
    pub image: Option<String>,

    /// Source for SD_p2.tar.gz: release URL or local file/directory
    #[arg(long, value_name = "SRC")]
    pub tar: Option<String>,

    /// Release version; ignored for local sources
    #[arg(long = "ver", value_name = "VERSION")]
    pub release: Option<String>,

    /// Hardware variant appended to BOOT.BIN and image.ub; ignored for local sources
    #[arg(long, alias = "zynq", value_name = "NAME")]
    pub variant: Option<String>,

    /// Output directory; images go to DIR/firmware, the archive expands into DIR
    #[arg(long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Skip archive members that fail to extract instead of aborting
    #[arg(long)]
    pub skip_bad_entries: bool,

    /// Never apply archive uid/gid to extracted files
    #[arg(long)]
    pub no_preserve_owner: bool,

    /// Use the default umask instead of the archive's mode bits
    #[arg(long)]
    pub no_preserve_permissions: bool,

    /// Stamp extracted files with the current time instead of the archive's mtime
    #[arg(long)]
    pub no_preserve_mtime: bool,
}

impl FlashArgs {
    /// Flags win over whatever the config file said.
    pub fn apply(self, config: &mut FlashConfig) {
        if let Some(boot) = self.boot {
            config.boot = boot;
        }
        if let Some(image) = self.image {
            config.image = image;
        }
        if let Some(tar) = self.tar {
            config.tar = tar;
        }
        if let Some(release) = self.release {
            config.version = release;
        }
        if let Some(variant) = self.variant {
            config.variant = Some(variant);
        }
        if let Some(dir) = self.dir {
            config.dir = dir;
        }
        if self.skip_bad_entries {
            config.skip_bad_entries = true;
        }
        if self.no_preserve_owner {
            config.ownership = Ownership::Never;
        }
        if self.no_preserve_permissions {
            config.preserve_permissions = false;
        }
        if self.no_preserve_mtime {
            config.preserve_mtime = false;
        }
    }
}

#[derive(Clone, Debug, Args)]
pub struct InspectArgs {
    /// Archive source; defaults to the configured tar source
    #[arg(long, value_name = "SRC")]
    pub source: Option<String>,

    /// Release version used for remote sources
    #[arg(long = "ver", value_name = "VERSION")]
    pub release: Option<String>,

    #[command(subcommand)]
    pub action: InspectAction,
}

#[derive(Clone, Debug, Subcommand)]
pub enum InspectAction {
    /// List every member
    #[command(alias = "ls")]
    List,
    /// Show name, size, mode, owner and mtime of a member
    Info { path: String },
    /// Print a member to stdout
    Cat { path: String },
    /// Extract a single member
    Extract {
        path: String,

        /// Destination; defaults to the configured output directory
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },
}
