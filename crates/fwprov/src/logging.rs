use std::io::{self, Write};

use tracing::Level;

use crate::ui::BARS;

/// Map `-q`/`-v` to a maximum level. Quiet keeps warnings so skipped
/// archive members are still reported.
pub fn level(verbosity: u8, quiet: bool) -> Level {
    if quiet {
        return Level::WARN;
    }
    match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Stderr writer that hides progress bars while a log line is printed.
struct BarAwareStderr;

impl Write for BarAwareStderr {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        BARS.suspend(|| io::stderr().write(buf))
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        BARS.suspend(|| io::stderr().write_all(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

/// Install the stderr subscriber. Calling it twice is harmless.
pub fn init(verbosity: u8, quiet: bool) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level(verbosity, quiet))
        .with_target(false)
        .with_writer(|| BarAwareStderr)
        .try_init();
}
