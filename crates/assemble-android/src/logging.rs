//! Defines the logging output of assemble builds

use fern::{Dispatch, FormatCallback};
use log::{Level, LevelFilter, Record, SetLoggerError};
use std::fmt;
use std::io::stdout;
use std::path::Path;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

/// How much context is printed in front of each message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputType {
    Basic,
    TimeOnly,
    Complicated,
}

impl OutputType {
    /// The output type usually paired with a level filter
    pub fn for_level(filter: LevelFilter) -> Self {
        match filter {
            LevelFilter::Off | LevelFilter::Error | LevelFilter::Warn => OutputType::Basic,
            LevelFilter::Info => OutputType::TimeOnly,
            LevelFilter::Debug | LevelFilter::Trace => OutputType::Complicated,
        }
    }
}

/// Installs the root logger.
///
/// # Error
/// Errors if a logger was already installed for this process.
pub fn init_root_logger(filter: LevelFilter, output_mode: OutputType) -> Result<(), SetLoggerError> {
    Dispatch::new()
        .format(message_format(output_mode))
        .level(filter)
        .chain(stdout())
        .apply()
}

fn message_format(
    output_mode: OutputType,
) -> impl Fn(FormatCallback, &fmt::Arguments, &Record) + Sync + Send + 'static {
    move |out, message, record| {
        out.finish(format_args!(
            "{} {}",
            format_prefix(&output_mode, record),
            message
        ))
    }
}

fn format_prefix(output_mode: &OutputType, record: &Record) -> String {
    use colored::Colorize;
    static DATE_TIME_FORMAT: &[FormatItem] = format_description!(
        "[year]/[month]/[day] [hour]:[minute]:[second].[subsecond digits:4]"
    );

    let level_string = record.level().to_string().to_lowercase();
    let level_string = match record.level() {
        Level::Error => level_string.red().to_string(),
        Level::Warn => level_string.yellow().to_string(),
        Level::Info => level_string.green().to_string(),
        Level::Debug => level_string.blue().to_string(),
        Level::Trace => level_string.bright_black().to_string(),
    };
    let now = || {
        OffsetDateTime::now_local()
            .unwrap_or_else(|_| OffsetDateTime::now_utc())
            .format(DATE_TIME_FORMAT)
            .unwrap_or_default()
    };
    match output_mode {
        OutputType::Basic => format!("{}:", level_string),
        OutputType::TimeOnly => format!("[{}] {}:", now(), level_string),
        OutputType::Complicated => {
            let file_path = Path::new(record.file().unwrap_or("unknown"));
            format!(
                "[{} {}{} {}]",
                now(),
                file_path
                    .file_name()
                    .and_then(|s| s.to_str())
                    .unwrap_or("unknown"),
                record
                    .line()
                    .map(|l| format!(":{l}"))
                    .unwrap_or_default(),
                level_string
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_type_follows_level() {
        assert_eq!(OutputType::for_level(LevelFilter::Warn), OutputType::Basic);
        assert_eq!(OutputType::for_level(LevelFilter::Info), OutputType::TimeOnly);
        assert_eq!(OutputType::for_level(LevelFilter::Trace), OutputType::Complicated);
    }
}
