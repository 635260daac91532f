//! Logger bootstrap: `[YYYY.MM.DD HH:MM:SS] L message`, to stdout or a file.

use anyhow::Context;
use chrono::Local;
use env_logger::{Builder, Env, Target};
use log::Record;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

pub const TIMESTAMP_FORMAT: &str = "%Y.%m.%d %H:%M:%S";

fn level_letter(record: &Record<'_>) -> char {
    record.level().as_str().chars().next().unwrap_or('?')
}

pub fn format_line(record: &Record<'_>) -> String {
    format!(
        "[{}] {} {}",
        Local::now().format(TIMESTAMP_FORMAT),
        level_letter(record),
        record.args()
    )
}

/// Install the global logger. `RUST_LOG` overrides the default `info` level.
pub fn init(log_file: Option<&Path>) -> anyhow::Result<()> {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    builder.format(|buf, record| writeln!(buf, "{}", format_line(record)));

    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening log file {}", path.display()))?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    builder.try_init().context("installing logger")
}
