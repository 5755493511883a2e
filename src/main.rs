// Copyright 2026 The ChromiumOS Authors
// Use of this source code is governed by a BSD-style license that can be
// found in the LICENSE file.

//! Watches the system bus and reports every wake from sleep.

use log::error;

use wakemon::MonitorOptions;
use wakemon::OutputMode;

const IDENT: &str = "wakemon";

fn usage(error: bool) {
    let usage_msg = r#"Usage: wakemon [option]
Watch the system bus for sleep/wake transitions and print one line on
stdout every time the system wakes up. At most one option may be given.

Options:
  -u, --unix-timestamp  Report each wake as seconds since the Unix epoch.
  -t, --timestamp       Report each wake as human-readable wall-clock time.
  -d, --debug           Report each wake as the word "woken", logging
                        verbosely to stderr.
  -v, --version         Print the version string and exit.
  -h, --help            Show this help string.

With no option, each wake is reported as the word "woken".
"#;
    if error {
        eprintln!("{}", usage_msg)
    } else {
        println!("{}", usage_msg);
    }
}

/// What one run of the program has been asked to do.
#[derive(Debug, PartialEq, Eq)]
enum Invocation {
    Monitor { mode: OutputMode, debug: bool },
    Version,
    Help,
}

// Decides what to do from the arguments following the executable name. An
// error is a usage problem for the caller to report.
fn parse_args(args: &[String]) -> std::result::Result<Invocation, String> {
    if args.len() > 1 {
        return Err(format!("expected at most one argument, got {}", args.len()));
    }

    match args.first().map(|arg| arg.as_str()) {
        None => Ok(Invocation::Monitor {
            mode: OutputMode::Plain,
            debug: false,
        }),
        Some("-u") | Some("--unix-timestamp") => Ok(Invocation::Monitor {
            mode: OutputMode::UnixTimestamp,
            debug: false,
        }),
        Some("-t") | Some("--timestamp") => Ok(Invocation::Monitor {
            mode: OutputMode::HumanTimestamp,
            debug: false,
        }),
        Some("-d") | Some("--debug") => Ok(Invocation::Monitor {
            mode: OutputMode::Plain,
            debug: true,
        }),
        Some("-v") | Some("--version") => Ok(Invocation::Version),
        Some("-h") | Some("--help") => Ok(Invocation::Help),
        Some(other) => Err(format!("unrecognized argument: {}", other)),
    }
}

fn wakemon_main() -> std::result::Result<(), ()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let invocation = match parse_args(&args) {
        Ok(invocation) => invocation,
        Err(message) => {
            eprintln!("{}: {}", IDENT, message);
            usage(true);
            return Err(());
        }
    };

    match invocation {
        Invocation::Help => {
            usage(false);
            Ok(())
        }
        Invocation::Version => {
            println!("{} {}", IDENT, env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Invocation::Monitor { mode, debug } => {
            let verbosity = if debug { 9 } else { 1 };
            stderrlog::new()
                .module(module_path!())
                .verbosity(verbosity)
                .init()
                .unwrap();

            if let Err(e) = wakemon::monitor(MonitorOptions { mode }) {
                error!("Failed to monitor for wake transitions: {:#}", e);
                return Err(());
            }

            Ok(())
        }
    }
}

fn main() {
    std::process::exit(i32::from(wakemon_main().is_err()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn no_arguments_monitors_in_plain_mode() {
        assert_eq!(
            parse_args(&[]),
            Ok(Invocation::Monitor {
                mode: OutputMode::Plain,
                debug: false,
            })
        );
    }

    #[test]
    fn timestamp_flags_select_output_modes() {
        for flag in ["-u", "--unix-timestamp"] {
            assert_eq!(
                parse_args(&args(&[flag])),
                Ok(Invocation::Monitor {
                    mode: OutputMode::UnixTimestamp,
                    debug: false,
                })
            );
        }
        for flag in ["-t", "--timestamp"] {
            assert_eq!(
                parse_args(&args(&[flag])),
                Ok(Invocation::Monitor {
                    mode: OutputMode::HumanTimestamp,
                    debug: false,
                })
            );
        }
    }

    #[test]
    fn debug_flag_keeps_plain_mode() {
        assert_eq!(
            parse_args(&args(&["--debug"])),
            Ok(Invocation::Monitor {
                mode: OutputMode::Plain,
                debug: true,
            })
        );
    }

    #[test]
    fn version_and_help_flags_short_circuit() {
        assert_eq!(parse_args(&args(&["-v"])), Ok(Invocation::Version));
        assert_eq!(parse_args(&args(&["--version"])), Ok(Invocation::Version));
        assert_eq!(parse_args(&args(&["-h"])), Ok(Invocation::Help));
        assert_eq!(parse_args(&args(&["--help"])), Ok(Invocation::Help));
    }

    #[test]
    fn rejects_multiple_arguments() {
        let result = parse_args(&args(&["-u", "-t"]));
        assert!(result.is_err());
    }

    #[test]
    fn rejects_unrecognized_argument() {
        let result = parse_args(&args(&["--frobnicate"]));
        assert!(result.is_err());
    }
}
