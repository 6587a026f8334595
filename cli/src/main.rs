//! Command line tool for encoding the arguments of, and formatting the values returned by, the
//! functions of the `types_harness` contract.
//!
//! Sending the transaction is left to an external submitter: `encode` prints the request it
//! needs, and `format` renders whatever value the submitter got back.

use std::{
    env, fs,
    io::{self, Read},
    path::PathBuf,
};

use clap::{crate_version, App, AppSettings, Arg, ArgMatches, SubCommand};
use log::{info, LevelFilter};

use harness_codec::{external::Representation, format_external, Encoder, HarnessFunction};
use harness_shared::logging::{self, Output, Settings, Style};
use types::AddressKind;

mod common;
mod config;
mod payload;

use config::{Config, LOG_LEVEL_VAR};

const APP_NAME: &str = "types-harness";
const ABOUT: &str = "Encodes the arguments of, and formats the values returned by, the functions \
                     of the types_harness contract.";

const ENCODE_SUBCOMMAND: &str = "encode";
const ENCODE_ABOUT: &str =
    "Prints the invocation of a harness function, ready for the transaction submitter";
const FORMAT_SUBCOMMAND: &str = "format";
const FORMAT_ABOUT: &str = "Formats a value returned by a harness function";
const FUNCTIONS_SUBCOMMAND: &str = "functions";
const FUNCTIONS_ABOUT: &str = "Lists the harness functions";

const FUNCTION_ARG_NAME: &str = "function";
const FUNCTION_ARG_HELP: &str = "Name of the harness function, e.g. 'option_u32'";

const MODE_ARGS_ARG_NAME: &str = "args";
const MODE_ARGS_ARG_HELP: &str =
    "Mode arguments: 'some' or 'none' for option_* functions, depth and width for \
     nested_type and flatten_nested_type";

const SOURCE_ARG_NAME: &str = "source";
const SOURCE_ARG_VALUE_NAME: &str = "ADDRESS";
const SOURCE_ARG_HELP: &str = "Caller's account; overrides the SOURCE_ACCOUNT variable";

const INPUT_ARG_NAME: &str = "input";
const INPUT_ARG_SHORT: &str = "i";
const INPUT_ARG_VALUE_NAME: &str = "PATH";
const INPUT_ARG_HELP: &str = "File holding the returned value; read from stdin if omitted";

const HEX_ARG_NAME: &str = "hex";
const HEX_ARG_HELP: &str = "Use hex-encoded wire bytes instead of JSON";

const LOG_LEVEL_ARG_NAME: &str = "log-level";
const LOG_LEVEL_ARG_SHORT: &str = "l";
const LOG_LEVEL_ARG_VALUE_NAME: &str = "LEVEL";
const LOG_LEVEL_ARG_HELP: &str = "Log level; overrides the HARNESS_LOG_LEVEL variable";
const DEFAULT_LOG_LEVEL: &str = "warn";

const LOG_STYLE_ARG_NAME: &str = "log-style";
const LOG_STYLE_ARG_VALUE_NAME: &str = "STYLE";
const LOG_STYLE_ARG_HELP: &str = "Format of log lines";
const STRUCTURED_LOG_STYLE: &str = "structured";
const HUMAN_LOG_STYLE: &str = "human";

fn function_arg() -> Arg<'static, 'static> {
    Arg::with_name(FUNCTION_ARG_NAME)
        .required(true)
        .index(1)
        .help(FUNCTION_ARG_HELP)
}

fn mode_args_arg() -> Arg<'static, 'static> {
    Arg::with_name(MODE_ARGS_ARG_NAME)
        .multiple(true)
        .allow_hyphen_values(true)
        .index(2)
        .help(MODE_ARGS_ARG_HELP)
}

fn source_arg() -> Arg<'static, 'static> {
    Arg::with_name(SOURCE_ARG_NAME)
        .long(SOURCE_ARG_NAME)
        .takes_value(true)
        .value_name(SOURCE_ARG_VALUE_NAME)
        .help(SOURCE_ARG_HELP)
}

fn input_arg() -> Arg<'static, 'static> {
    Arg::with_name(INPUT_ARG_NAME)
        .short(INPUT_ARG_SHORT)
        .long(INPUT_ARG_NAME)
        .takes_value(true)
        .value_name(INPUT_ARG_VALUE_NAME)
        .help(INPUT_ARG_HELP)
}

fn hex_arg() -> Arg<'static, 'static> {
    Arg::with_name(HEX_ARG_NAME)
        .long(HEX_ARG_NAME)
        .help(HEX_ARG_HELP)
}

fn log_level_arg() -> Arg<'static, 'static> {
    Arg::with_name(LOG_LEVEL_ARG_NAME)
        .short(LOG_LEVEL_ARG_SHORT)
        .long(LOG_LEVEL_ARG_NAME)
        .takes_value(true)
        .global(true)
        .value_name(LOG_LEVEL_ARG_VALUE_NAME)
        .possible_values(&["off", "error", "warn", "info", "debug", "trace"])
        .case_insensitive(true)
        .help(LOG_LEVEL_ARG_HELP)
}

fn log_style_arg() -> Arg<'static, 'static> {
    Arg::with_name(LOG_STYLE_ARG_NAME)
        .long(LOG_STYLE_ARG_NAME)
        .takes_value(true)
        .global(true)
        .value_name(LOG_STYLE_ARG_VALUE_NAME)
        .possible_values(&[STRUCTURED_LOG_STYLE, HUMAN_LOG_STYLE])
        .default_value(STRUCTURED_LOG_STYLE)
        .help(LOG_STYLE_ARG_HELP)
}

#[derive(Debug)]
enum Command {
    Encode {
        function: String,
        mode_args: Vec<String>,
        source: Option<String>,
        hex: bool,
    },
    Format {
        function: String,
        input: Option<PathBuf>,
        hex: bool,
    },
    Functions,
}

#[derive(Debug)]
struct Args {
    log_level: Option<String>,
    log_style: Style,
    command: Command,
}

impl Args {
    fn new() -> Self {
        let arg_matches = App::new(APP_NAME)
            .version(crate_version!())
            .about(ABOUT)
            .setting(AppSettings::SubcommandRequiredElseHelp)
            .arg(log_level_arg())
            .arg(log_style_arg())
            .subcommand(
                SubCommand::with_name(ENCODE_SUBCOMMAND)
                    .about(ENCODE_ABOUT)
                    .arg(function_arg())
                    .arg(mode_args_arg())
                    .arg(source_arg())
                    .arg(hex_arg()),
            )
            .subcommand(
                SubCommand::with_name(FORMAT_SUBCOMMAND)
                    .about(FORMAT_ABOUT)
                    .arg(function_arg())
                    .arg(input_arg())
                    .arg(hex_arg()),
            )
            .subcommand(SubCommand::with_name(FUNCTIONS_SUBCOMMAND).about(FUNCTIONS_ABOUT))
            .get_matches();

        let log_level = arg_matches
            .value_of(LOG_LEVEL_ARG_NAME)
            .map(str::to_string);
        let log_style = match arg_matches.value_of(LOG_STYLE_ARG_NAME) {
            Some(HUMAN_LOG_STYLE) => Style::HumanReadable,
            _ => Style::Structured,
        };
        let command = match arg_matches.subcommand() {
            (ENCODE_SUBCOMMAND, Some(matches)) => Command::Encode {
                function: function_name(matches),
                mode_args: matches
                    .values_of(MODE_ARGS_ARG_NAME)
                    .map(|values| values.map(str::to_string).collect::<Vec<_>>())
                    .unwrap_or_default(),
                source: matches.value_of(SOURCE_ARG_NAME).map(str::to_string),
                hex: matches.is_present(HEX_ARG_NAME),
            },
            (FORMAT_SUBCOMMAND, Some(matches)) => Command::Format {
                function: function_name(matches),
                input: matches.value_of(INPUT_ARG_NAME).map(PathBuf::from),
                hex: matches.is_present(HEX_ARG_NAME),
            },
            _ => Command::Functions,
        };

        Args {
            log_level,
            log_style,
            command,
        }
    }
}

fn function_name(matches: &ArgMatches) -> String {
    matches
        .value_of(FUNCTION_ARG_NAME)
        .unwrap_or_default()
        .to_string()
}

/// Log lines go to stderr so that stdout carries only the command's output.
fn log_settings(level_filter: LevelFilter, style: Style) -> Settings {
    Settings::new(level_filter)
        .with_style(style)
        .with_output(Output::Stderr)
}

fn init_logging(args: &Args) {
    let level = args
        .log_level
        .clone()
        .or_else(|| env::var(LOG_LEVEL_VAR).ok())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
    let level_filter = match level.parse::<LevelFilter>() {
        Ok(level_filter) => level_filter,
        Err(_) => common::print_error_and_exit(&format!(
            ": invalid {} value '{}'",
            LOG_LEVEL_VAR, level
        )),
    };

    if let Err(error) = logging::initialize(log_settings(level_filter, args.log_style)) {
        common::print_error_and_exit(&format!(": failed to initialize logging: {}", error));
    }
}

fn encode(function_name: &str, extra_args: &[String], source: Option<&str>, hex: bool) {
    let config = Config::from_env()
        .unwrap_or_else(|error| common::print_error_and_exit(&format!(": {}", error)));

    let source = match source {
        Some(source) => config::parse_address(SOURCE_ARG_NAME, source, AddressKind::Account),
        None => config.source_account().map(Clone::clone),
    }
    .unwrap_or_else(|error| common::print_error_and_exit(&format!(": {}", error)));

    let function = function_name
        .parse::<HarnessFunction>()
        .unwrap_or_else(|error| common::print_error_and_exit(&format!(": {}", error)));

    // Mode arguments are positional with the function name first.
    let mut mode_args = vec![function_name.to_string()];
    mode_args.extend_from_slice(extra_args);

    let invocation = Encoder::new(source.clone())
        .invocation(function, mode_args.as_slice())
        .unwrap_or_else(|error| common::print_error_and_exit(&format!(": {}", error)));
    info!(
        "encoded {} argument(s) for {}",
        invocation.args.len(),
        function
    );

    common::print_highlighted("Invoking function: ", function.name());
    if hex {
        let arguments = payload::wire_arguments(&invocation)
            .unwrap_or_else(|error| common::print_error_and_exit(&format!(": {}", error)));
        for argument in arguments {
            println!("{}", argument);
        }
    } else {
        let payload = payload::invocation_payload(&invocation, &source, &config);
        println!("{}", harness_shared::utils::jsonify(&payload, true));
    }
}

fn read_input(input: Option<&PathBuf>) -> io::Result<String> {
    match input {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut contents = String::new();
            io::stdin().read_to_string(&mut contents)?;
            Ok(contents)
        }
    }
}

fn format(function_name: &str, input: Option<&PathBuf>, hex: bool) {
    let representation = if hex {
        Representation::WireHex
    } else {
        Representation::Json
    };
    let contents = read_input(input).unwrap_or_else(|error| {
        common::print_error_and_exit(&format!(": failed to read returned value: {}", error))
    });

    println!("Returned value:");
    println!(
        "{}",
        format_external(&contents, representation, function_name)
    );
}

fn list_functions() {
    for function in HarnessFunction::ALL.iter() {
        println!("{}", function);
    }
}

fn main() {
    let args = Args::new();
    init_logging(&args);

    match &args.command {
        Command::Encode {
            function,
            mode_args,
            source,
            hex,
        } => encode(function, mode_args, source.as_deref(), *hex),
        Command::Format {
            function,
            input,
            hex,
        } => format(function, input.as_ref(), *hex),
        Command::Functions => list_functions(),
    }
}
