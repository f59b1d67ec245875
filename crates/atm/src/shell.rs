//! Styled terminal output for the front-end.
//!
//! Rendered views and action results go to stdout; warnings and errors go to stderr with a
//! colored prefix. Diagnostics go through `tracing` instead.

use std::fmt;

use anstyle::{AnsiColor, Effects, Style};

pub const ERROR: Style = AnsiColor::Red.on_default().effects(Effects::BOLD);
pub const WARN: Style = AnsiColor::Yellow.on_default().effects(Effects::BOLD);

/// When to color output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorChoice {
    /// Color when writing to a terminal.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    /// Makes this choice the global one.
    pub fn apply(self) {
        let choice = match self {
            Self::Auto => anstream::ColorChoice::Auto,
            Self::Always => anstream::ColorChoice::Always,
            Self::Never => anstream::ColorChoice::Never,
        };
        choice.write_global();
    }
}

#[doc(hidden)]
pub fn print_line(args: fmt::Arguments<'_>) {
    anstream::println!("{args}");
}

#[doc(hidden)]
pub fn print_warning(args: fmt::Arguments<'_>) {
    anstream::eprintln!("{WARN}Warning:{WARN:#} {args}");
}

#[doc(hidden)]
pub fn print_error(args: fmt::Arguments<'_>) {
    anstream::eprintln!("{ERROR}Error:{ERROR:#} {args}");
}

/// Prints a line to stdout.
#[macro_export]
macro_rules! sh_println {
    () => {
        $crate::shell::print_line(format_args!(""))
    };
    ($($arg:tt)*) => {
        $crate::shell::print_line(format_args!($($arg)*))
    };
}

/// Prints a warning to stderr.
#[macro_export]
macro_rules! sh_warn {
    ($($arg:tt)*) => {
        $crate::shell::print_warning(format_args!($($arg)*))
    };
}

/// Prints an error to stderr.
#[macro_export]
macro_rules! sh_err {
    ($($arg:tt)*) => {
        $crate::shell::print_error(format_args!($($arg)*))
    };
}
