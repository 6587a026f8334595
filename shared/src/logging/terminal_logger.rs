use std::collections::BTreeMap;

use log::{Level, LevelFilter, Log, Metadata, Record};

use super::{
    settings::{Output, Settings, Style},
    structured_message::{self, Details, LogLineItem},
    DEFAULT_MESSAGE_KEY, DEFAULT_MESSAGE_TEMPLATE, DETAILS_PREFIX, MESSAGE_TEMPLATE_KEY,
    PAYLOAD_KEY,
};
use crate::utils::{self, jsonify};

/// Logger which writes each enabled record as a single line to stdout or stderr.
pub struct TerminalLogger {
    max_level: LevelFilter,
    style: Style,
    output: Output,
}

impl TerminalLogger {
    pub fn new(settings: &Settings) -> Self {
        TerminalLogger {
            max_level: settings.max_level(),
            style: settings.style(),
            output: settings.output(),
        }
    }

    /// Returns `true` if records at `level` are written to stderr rather than stdout.
    pub fn writes_to_stderr(&self, level: Level) -> bool {
        match self.output {
            Output::Split => level == Level::Error,
            Output::Stderr => true,
        }
    }

    /// Renders `record` as a log line, or returns `None` if the record is filtered out.
    pub fn prepare_log_line(&self, record: &Record) -> Option<String> {
        if !self.enabled(record.metadata()) {
            return None;
        }

        let (description, properties) = description_and_properties(record);

        let line = match self.style {
            Style::Structured => {
                let level = record.level();
                let item = LogLineItem::new(level, description, properties);
                format!(
                    "{timestamp} {loglevel} {priority} {facility} {payload_key}{payload}",
                    timestamp = item.timestamp,
                    loglevel = item.log_level.to_uppercase(),
                    priority = item.priority,
                    facility = item.process_name,
                    payload_key = PAYLOAD_KEY,
                    payload = jsonify(&item, false)
                )
            }
            Style::HumanReadable => format!(
                "{timestamp} {loglevel:<5} [{target}] {description}",
                timestamp = structured_message::timestamp(),
                loglevel = record.level().to_string(),
                target = record.target(),
                description = description
            ),
        };

        Some(line)
    }
}

/// Splits a record into its rendered description and its properties.
///
/// Records emitted by `log_details` carry a JSON payload after `DETAILS_PREFIX`; any other
/// record is treated as a plain message.
fn description_and_properties(record: &Record) -> (String, BTreeMap<String, String>) {
    let message = record.args().to_string();

    if message.starts_with(DETAILS_PREFIX) {
        if let Ok(details) = serde_json::from_str::<Details>(&message[DETAILS_PREFIX.len()..]) {
            let description = utils::transclude(
                &details.message_template,
                details
                    .properties
                    .iter()
                    .map(|(key, value)| (key.as_str(), value.as_str())),
            );
            let mut properties = details.properties;
            properties.insert(MESSAGE_TEMPLATE_KEY.to_string(), details.message_template);
            return (description, properties);
        }
    }

    let mut properties = BTreeMap::new();
    properties.insert(
        MESSAGE_TEMPLATE_KEY.to_string(),
        DEFAULT_MESSAGE_TEMPLATE.to_string(),
    );
    properties.insert(DEFAULT_MESSAGE_KEY.to_string(), message.clone());
    (message, properties)
}

impl Log for TerminalLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if let Some(line) = self.prepare_log_line(record) {
            if self.writes_to_stderr(record.level()) {
                eprintln!("{}", line);
            } else {
                println!("{}", line);
            }
        }
    }

    fn flush(&self) {}
}
