use log::LevelFilter;
use serde::{Deserialize, Serialize};

/// How log lines are written to the terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Style {
    /// `<timestamp> <LEVEL> <priority> <process name> payload=<json>`.
    Structured,
    /// `<timestamp> <LEVEL> [<target>] <description>`.
    HumanReadable,
}

impl Default for Style {
    fn default() -> Self {
        Style::Structured
    }
}

/// Where log lines are written.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Output {
    /// Errors go to stderr, everything else to stdout.
    Split,
    /// Every line goes to stderr, leaving stdout to the program's own output.
    Stderr,
}

impl Default for Output {
    fn default() -> Self {
        Output::Split
    }
}

/// Settings used to initialize the global logger.
#[derive(Clone, Copy, Debug)]
pub struct Settings {
    max_level: LevelFilter,
    style: Style,
    output: Output,
}

impl Settings {
    /// Constructs new `Settings` which log records at or above `max_level` in the
    /// `Structured` style.
    pub fn new(max_level: LevelFilter) -> Self {
        Settings {
            max_level,
            style: Style::default(),
            output: Output::default(),
        }
    }

    /// Sets the output style.
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Sets where log lines are written.
    pub fn with_output(mut self, output: Output) -> Self {
        self.output = output;
        self
    }

    pub fn max_level(&self) -> LevelFilter {
        self.max_level
    }

    pub fn style(&self) -> Style {
        self.style
    }

    pub fn output(&self) -> Output {
        self.output
    }
}
