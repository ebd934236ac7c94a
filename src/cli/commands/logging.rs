//! Log verbosity. Repeat `-v` to raise it one step at a time, or name a level
//! with `--log-level` / `FINFLOW_LOG_LEVEL`; the more verbose of the two wins.

use clap::{Arg, ArgAction, ArgMatches, Command};
use tracing::Level;

pub const ARG_VERBOSE: &str = "verbose";
pub const ARG_LOG_LEVEL: &str = "log-level";

// Quietest first; the index is the matching `-v` count.
const LEVELS: [Level; 5] = [
    Level::ERROR,
    Level::WARN,
    Level::INFO,
    Level::DEBUG,
    Level::TRACE,
];

fn rank(level: Level) -> usize {
    LEVELS.iter().position(|known| *known == level).unwrap_or(0)
}

fn at_rank(rank: usize) -> Level {
    LEVELS[rank.min(LEVELS.len() - 1)]
}

/// Accepts a level name (any case) or a step count; counts past `trace` stay
/// at `trace`.
fn parse_level(value: &str) -> Result<Level, String> {
    let value = value.trim();
    if let Ok(steps) = value.parse::<usize>() {
        return Ok(at_rank(steps));
    }
    match value.to_ascii_lowercase().as_str() {
        "error" => Ok(Level::ERROR),
        "warn" | "warning" => Ok(Level::WARN),
        "info" => Ok(Level::INFO),
        "debug" => Ok(Level::DEBUG),
        "trace" => Ok(Level::TRACE),
        _ => Err(format!(
            "unknown log level `{value}`, expected error, warn, info, debug or trace"
        )),
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_VERBOSE)
                .short('v')
                .long("verbose")
                .help("More log output: -v warn, -vv info, -vvv debug, -vvvv trace")
                .action(ArgAction::Count)
                .global(true),
        )
        .arg(
            Arg::new(ARG_LOG_LEVEL)
                .long("log-level")
                .help("Log level by name (default: error); RUST_LOG directives still apply")
                .env("FINFLOW_LOG_LEVEL")
                .value_parser(parse_level)
                .global(true),
        )
}

/// Level for the log subscriber.
#[must_use]
pub fn level(matches: &ArgMatches) -> Level {
    let steps = usize::from(matches.get_count(ARG_VERBOSE));
    let named = matches
        .get_one::<Level>(ARG_LOG_LEVEL)
        .map_or(0, |level| rank(*level));
    at_rank(steps.max(named))
}
