use std::{
    collections::{hash_map::DefaultHasher, BTreeMap},
    env,
    hash::{Hash, Hasher},
    process,
};

use chrono::{SecondsFormat, Utc};
use lazy_static::lazy_static;
use log::Level;
use serde::{Deserialize, Serialize};

const MESSAGE_TYPE: &str = "harness-structured";
const MESSAGE_TYPE_VERSION: &str = "1.0.0";

lazy_static! {
    static ref PROCESS_NAME: String = env::current_exe()
        .ok()
        .and_then(|path| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "unknown-process".to_string());
}

/// Properties attached to a record by [`log_details`](super::log_details), carried through the
/// `log` facade as JSON.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct Details {
    pub message_template: String,
    pub properties: BTreeMap<String, String>,
}

/// container for log line data
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct LogLineItem {
    pub timestamp: String,
    pub process_id: u32,
    pub process_name: String,
    pub log_level: String,
    pub priority: u8,
    pub message_type: String,
    pub message_type_version: String,
    pub message_id: usize,
    pub description: String,
    pub properties: BTreeMap<String, String>,
}

impl LogLineItem {
    pub fn new(level: Level, description: String, properties: BTreeMap<String, String>) -> Self {
        let mut hasher = DefaultHasher::new();
        description.hash(&mut hasher);
        let message_id = hasher.finish() as usize;

        LogLineItem {
            timestamp: timestamp(),
            process_id: process::id(),
            process_name: PROCESS_NAME.clone(),
            log_level: level_name(level).to_string(),
            priority: priority(level),
            message_type: MESSAGE_TYPE.to_string(),
            message_type_version: MESSAGE_TYPE_VERSION.to_string(),
            message_id,
            description,
            properties,
        }
    }
}

pub(crate) fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn level_name(level: Level) -> &'static str {
    match level {
        Level::Trace => "Trace",
        Level::Debug => "Debug",
        Level::Info => "Info",
        Level::Warn => "Warn",
        Level::Error => "Error",
    }
}

/// syslog priority
pub(crate) fn priority(level: Level) -> u8 {
    match level {
        Level::Error => 3,
        Level::Warn => 4,
        Level::Info => 5,
        Level::Debug | Level::Trace => 7,
    }
}
