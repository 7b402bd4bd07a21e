#![forbid(unsafe_code)]

//! Command-line argument parsing for the hover-intent demo.
//!
//! Parses args manually. `HOVER_INTENT_*` environment variables are applied
//! first; explicit flags override them.

use std::env;
use std::process;
use std::time::Duration;

use hoverintent_core::HoverIntentOptions;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
Hover Intent Demo

Move the mouse in and out of the box. Raw crossings are shown immediately;
settled ENTER/LEAVE signals appear once the pointer stays put long enough.

USAGE:
    hoverintent-demo [OPTIONS]

OPTIONS:
    --enter-ms=N    Delay before ENTER settles (default: 500)
    --leave-ms=N    Delay before LEAVE settles (default: 2000)
    --muted         Start with settled signals muted
    --replay        Print a scripted enter/leave/enter replay and exit
    --help, -h      Show this help message
    --version, -V   Show version

KEYS:
    m               Toggle mute
    s               Toggle start/stop (attach/detach)
    q / Esc         Quit

ENVIRONMENT VARIABLES:
    HOVER_INTENT_ENTER_MS   Default for --enter-ms
    HOVER_INTENT_LEAVE_MS   Default for --leave-ms
    HOVER_INTENT_MUTED      Default for --muted (1/0/true/false)";

/// Parsed command-line options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opts {
    pub options: HoverIntentOptions,
    /// Run the scripted replay instead of the interactive demo.
    pub replay: bool,
}

/// Outcome of parsing that is not a runnable configuration.
#[derive(Debug, PartialEq, Eq)]
pub enum ParseExit {
    Help,
    Version,
    Error(String),
}

impl Opts {
    /// Parse process args and environment, exiting on help/version/error.
    pub fn parse() -> Self {
        let args: Vec<String> = env::args().skip(1).collect();
        match Self::parse_from(&args, |key| env::var(key).ok()) {
            Ok(opts) => opts,
            Err(ParseExit::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Err(ParseExit::Version) => {
                println!("hoverintent-demo {VERSION}");
                process::exit(0);
            }
            Err(ParseExit::Error(msg)) => {
                eprintln!("{msg}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    /// Parse from explicit args and an environment lookup.
    pub fn parse_from<F>(args: &[String], get_env: F) -> Result<Self, ParseExit>
    where
        F: Fn(&str) -> Option<String>,
    {
        let options =
            HoverIntentOptions::from_env_with(get_env).map_err(|e| ParseExit::Error(e.to_string()))?;
        let mut opts = Self {
            options,
            replay: false,
        };

        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Err(ParseExit::Help),
                "--version" | "-V" => return Err(ParseExit::Version),
                "--muted" => opts.options.muted = true,
                "--replay" => opts.replay = true,
                other => {
                    if let Some(val) = other.strip_prefix("--enter-ms=") {
                        opts.options.config.enter_delay = parse_delay("--enter-ms", val)?;
                    } else if let Some(val) = other.strip_prefix("--leave-ms=") {
                        opts.options.config.leave_delay = parse_delay("--leave-ms", val)?;
                    } else {
                        return Err(ParseExit::Error(format!("Unknown argument: {other}")));
                    }
                }
            }
        }

        Ok(opts)
    }
}

fn parse_delay(flag: &str, val: &str) -> Result<Duration, ParseExit> {
    match val.parse::<i64>() {
        Ok(n) if n >= 0 => Ok(Duration::from_millis(n.unsigned_abs())),
        Ok(_) => Err(ParseExit::Error(format!("{flag} must not be negative: {val}"))),
        Err(_) => Err(ParseExit::Error(format!("Invalid {flag} value: {val}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn default_opts() {
        let opts = Opts::parse_from(&[], no_env).unwrap();
        assert_eq!(opts.options, HoverIntentOptions::default());
        assert!(!opts.replay);
    }

    #[test]
    fn flags_override_env() {
        let env = |key: &str| (key == "HOVER_INTENT_ENTER_MS").then(|| "900".to_string());
        let opts = Opts::parse_from(&args(&["--enter-ms=100", "--muted"]), env).unwrap();
        assert_eq!(opts.options.config.enter_delay, Duration::from_millis(100));
        assert!(opts.options.muted);
    }

    #[test]
    fn env_applies_without_flags() {
        let env = |key: &str| (key == "HOVER_INTENT_LEAVE_MS").then(|| "750".to_string());
        let opts = Opts::parse_from(&[], env).unwrap();
        assert_eq!(opts.options.config.leave_delay, Duration::from_millis(750));
    }

    #[test]
    fn negative_delay_is_an_error() {
        let err = Opts::parse_from(&args(&["--leave-ms=-3"]), no_env).unwrap_err();
        assert!(matches!(err, ParseExit::Error(msg) if msg.contains("negative")));
    }

    #[test]
    fn help_and_version_exit() {
        assert_eq!(Opts::parse_from(&args(&["-h"]), no_env), Err(ParseExit::Help));
        assert_eq!(Opts::parse_from(&args(&["--version"]), no_env), Err(ParseExit::Version));
    }

    #[test]
    fn unknown_argument_is_rejected() {
        assert!(Opts::parse_from(&args(&["--bogus"]), no_env).is_err());
    }

    #[test]
    fn help_text_lists_env_vars() {
        assert!(HELP_TEXT.contains("HOVER_INTENT_ENTER_MS"));
        assert!(HELP_TEXT.contains("HOVER_INTENT_MUTED"));
    }
}
