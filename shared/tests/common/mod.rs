#![allow(dead_code)]

use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex, Once,
    },
};

use lazy_static::lazy_static;
use log::{debug, error, info, trace, warn, Level, Metadata, Record};
use serde::{Deserialize, Serialize};

use harness_shared::logging::{self, Settings, TerminalLogger, PAYLOAD_KEY};

const LOG_MSG_TARGET: &str = "harness_logging";
const MESSAGE_TEMPLATE_KEY: &str = "message_template";
const MARKER_KEY: &str = "marker";

lazy_static! {
    pub static ref BUFFER: Buffer = Buffer::default();
}

static NEXT_MARKER: AtomicUsize = AtomicUsize::new(0);
static LOGGER_INIT: Once = Once::new();

fn next_marker() -> String {
    format!("marker-{}", NEXT_MARKER.fetch_add(1, Ordering::SeqCst))
}

struct BufferedLogger {
    terminal_logger: TerminalLogger,
    buffer: Buffer,
}

impl BufferedLogger {
    fn new(buffer: Buffer, settings: &Settings) -> Self {
        BufferedLogger {
            terminal_logger: TerminalLogger::new(settings),
            buffer,
        }
    }
}

impl log::Log for BufferedLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.terminal_logger.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if let Some(log_line_item) = self
            .terminal_logger
            .prepare_log_line(record)
            .and_then(LogLineItem::from_log_line)
        {
            self.buffer.push(log_line_item);
        }
    }

    fn flush(&self) {}
}

#[derive(Clone, Default, Debug)]
pub struct Buffer {
    items: Arc<Mutex<Vec<LogLineItem>>>,
}

impl Buffer {
    // Pushes item to buffer.
    fn push(&self, line: LogLineItem) {
        self.items.lock().unwrap().push(line);
    }

    /// Removes and returns items matching `predicate`.
    fn extract_by<F: Fn(&LogLineItem) -> bool>(&self, predicate: F) -> Vec<LogLineItem> {
        let mut items = self.items.lock().unwrap();
        let extracted = items.iter().filter(|line| predicate(line)).cloned().collect();
        items.retain(|line| !predicate(line));
        extracted
    }

    /// Removes and returns items whose `description` field contains `description_fragment`.
    pub fn extract(&self, description_fragment: &str) -> Vec<LogLineItem> {
        self.extract_by(|line| line.description.contains(description_fragment))
    }

    /// Removes and returns items whose `properties` have a matching `marker`.
    pub fn extract_marked(&self, marker: &str) -> Vec<LogLineItem> {
        self.extract_by(|line| line.properties.get(MARKER_KEY).map(String::as_str) == Some(marker))
    }
}

/// container for LogLineItem data
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LogLineItem {
    timestamp: String,
    process_id: u32,
    process_name: String,
    log_level: String,
    priority: u8,
    message_type: String,
    message_type_version: String,
    message_id: usize,
    description: String,
    properties: BTreeMap<String, String>,
}

impl LogLineItem {
    fn from_log_line(line: String) -> Option<LogLineItem> {
        let idx = line.find(PAYLOAD_KEY)?;
        let slice = &line[idx + PAYLOAD_KEY.len()..];
        serde_json::from_str::<LogLineItem>(slice).ok()
    }
}

pub fn set_up_logging(settings: Settings) {
    LOGGER_INIT.call_once(|| {
        let logger = Box::new(BufferedLogger::new(BUFFER.clone(), &settings));
        logging::initialize_with_logger(logger, settings).expect("should initialize logger");
    });
}

fn expected_level(level: Level) -> &'static str {
    match level {
        Level::Trace => "Trace",
        Level::Debug => "Debug",
        Level::Info => "Info",
        Level::Warn => "Warn",
        Level::Error => "Error",
    }
}

pub fn assert_log_via_macro_is_output(level: Level) {
    log_via_macro(level, true);
}

pub fn assert_log_via_macro_is_not_output(level: Level) {
    log_via_macro(level, false);
}

fn log_via_macro(level: Level, expect_output: bool) {
    let marker = next_marker();

    let msg = format!("{}-level message with {}", level, marker);
    match level {
        Level::Trace => trace!(target: LOG_MSG_TARGET, "{}", msg),
        Level::Debug => debug!(target: LOG_MSG_TARGET, "{}", msg),
        Level::Info => info!(target: LOG_MSG_TARGET, "{}", msg),
        Level::Warn => warn!(target: LOG_MSG_TARGET, "{}", msg),
        Level::Error => error!(target: LOG_MSG_TARGET, "{}", msg),
    }

    let msgs = BUFFER.extract(&marker);
    if expect_output {
        assert_eq!(1, msgs.len());
        assert_eq!(msg, msgs[0].description);
        assert_eq!(expected_level(level), &msgs[0].log_level);
    } else {
        assert!(msgs.is_empty());
    }
}

pub fn assert_log_via_log_details_is_output(level: Level) {
    log_via_log_details(level, true);
}

pub fn assert_log_via_log_details_is_not_output(level: Level) {
    log_via_log_details(level, false);
}

fn log_via_log_details(level: Level, expect_output: bool) {
    let marker = next_marker();

    let key = "function";
    let value = "map_addr_user".to_string();

    let mut properties = BTreeMap::new();
    properties.insert(key, value.clone());
    properties.insert(MARKER_KEY, marker.clone());

    let message_template = format!("{{{}}} {{{}}}", MARKER_KEY, key);

    logging::log_details(level, message_template.clone(), properties.clone());

    let msgs = BUFFER.extract_marked(&marker);
    if expect_output {
        assert_eq!(1, msgs.len());
        let expected_description = format!("{} {}", marker, value);
        assert_eq!(expected_description, msgs[0].description);
        assert_eq!(expected_level(level), &msgs[0].log_level);
        for (key, value) in properties.iter() {
            assert_eq!(value, msgs[0].properties.get(*key).unwrap());
        }
        assert_eq!(
            &message_template,
            msgs[0].properties.get(MESSAGE_TEMPLATE_KEY).unwrap()
        );
    } else {
        assert!(msgs.is_empty());
    }
}
