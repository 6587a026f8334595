//! A logger implementation which outputs log messages from the harness crates to the terminal.

mod settings;
mod structured_message;
mod terminal_logger;

use std::collections::BTreeMap;

use log::{self, Level, LevelFilter, Log, SetLoggerError};

pub use self::{
    settings::{Output, Settings, Style},
    terminal_logger::TerminalLogger,
};
use self::structured_message::Details;
use crate::utils::jsonify;

/// Marks the JSON payload in a structured log line.
pub const PAYLOAD_KEY: &str = "payload=";

const MESSAGE_TEMPLATE_KEY: &str = "message_template";
const DEFAULT_MESSAGE_TEMPLATE: &str = "{message}";
const DEFAULT_MESSAGE_KEY: &str = "message";
const DETAILS_PREFIX: &str = "details=";

/// Initializes the global logger using the given settings.
///
/// By default the logger writes log messages to stdout, with errors going to stderr; see
/// [`Output`].
///
/// Returns an error if the global logger has already been set in this process.
pub fn initialize(settings: Settings) -> Result<(), SetLoggerError> {
    let logger = Box::new(TerminalLogger::new(&settings));
    initialize_with_logger(logger, settings)
}

/// Initializes the global logger using the given logger and settings.
///
/// Returns an error if the global logger has already been set in this process.
pub fn initialize_with_logger(
    logger: Box<dyn Log>,
    settings: Settings,
) -> Result<(), SetLoggerError> {
    if settings.max_level() == LevelFilter::Off {
        // No logger is needed if the level is `Off`.
        return Ok(());
    }

    log::set_boxed_logger(logger)?;
    log::set_max_level(settings.max_level());
    Ok(())
}

/// Logs a message using the given format and properties.
///
/// # Arguments
///
/// * `log_level` - log level of the message to be logged
/// * `message_template` - a message template to apply over properties by key
/// * `properties` - a collection of machine readable key / value properties which will be logged
#[inline]
pub fn log_details(
    log_level: Level,
    message_template: String,
    properties: BTreeMap<&str, String>,
) {
    if log_level > log::max_level() {
        return;
    }

    let details = Details {
        message_template,
        properties: properties
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect(),
    };

    log::log!(log_level, "{}{}", DETAILS_PREFIX, jsonify(&details, false));
}
