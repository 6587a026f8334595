use std::process;

use colour::{cyan_ln, red};

pub const FAILURE_EXIT_CODE: i32 = 101;

pub fn print_error_and_exit(msg: &str) -> ! {
    red!("error");
    eprintln!("{}", msg);
    process::exit(FAILURE_EXIT_CODE)
}

/// Prints `label` followed by `value` highlighted in cyan.
pub fn print_highlighted(label: &str, value: &str) {
    print!("{}", label);
    cyan_ln!("{}", value);
}
