// SPDX-FileCopyrightText: 2026 The Boardsmith Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Boardsmith headless checker.
//!
//! Loads a map folder, reports import repairs and validation findings in English, and
//! optionally dumps route geometry or a reachability overlay as JSON on stdout.
//!
//! Exit codes: 0 when the board is valid, 1 when any finding was reported, 2 on usage or
//! load errors.

use std::error::Error;
use std::process::ExitCode;

use boardsmith::config::BoardConfig;
use boardsmith::layout::compose_routes;
use boardsmith::model::TileId;
use boardsmith::query::verification_overlay;
use boardsmith::store::MapFolder;
use boardsmith::validate::{validate_board, Diagnostic};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} <map-dir> [--config <file>] [--routes] [--reach <tile-id>] [--verbose]\n\n<map-dir> is an unpacked map archive containing manifest.json.\n--config overrides board constants from a JSON file (partial files are fine).\n--routes prints the composed route records as JSON.\n--reach prints the reachability overlay from <tile-id> as JSON.\n--verbose enables debug logging on stderr."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    map_dir: Option<String>,
    config: Option<String>,
    routes: bool,
    reach: Option<String>,
    verbose: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                if options.config.is_some() {
                    return Err(());
                }
                options.config = Some(args.next().ok_or(())?);
            }
            "--routes" => {
                if options.routes {
                    return Err(());
                }
                options.routes = true;
            }
            "--reach" => {
                if options.reach.is_some() {
                    return Err(());
                }
                options.reach = Some(args.next().ok_or(())?);
            }
            "--verbose" => {
                if options.verbose {
                    return Err(());
                }
                options.verbose = true;
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => {
                if options.map_dir.is_some() {
                    return Err(());
                }
                options.map_dir = Some(arg);
            }
        }
    }

    if options.map_dir.is_none() {
        return Err(());
    }

    Ok(options)
}

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record<'_>) {
        if self.enabled(record.metadata()) {
            eprintln!(
                "boardsmith: {}: {}",
                record.level().as_str().to_ascii_lowercase(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

fn init_logging(verbose: bool) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(if verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        });
    }
}

fn join_names<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(", ")
}

/// English wording for a validation finding.
fn describe(diagnostic: &Diagnostic) -> String {
    match diagnostic {
        Diagnostic::SpawnsUnassigned { slots } => format!(
            "missing initial placements: {}",
            slots
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        ),
        Diagnostic::ResourcesMissing { categories } => format!(
            "missing prop tiles: {}",
            categories
                .iter()
                .map(|shortfall| format!("{} {}", shortfall.missing, shortfall.category))
                .collect::<Vec<_>>()
                .join(", ")
        ),
        Diagnostic::ResourcesExcess { categories } => format!(
            "too many prop tiles: {}",
            categories
                .iter()
                .map(|excess| format!("{} {} of {}", excess.category, excess.used, excess.quota))
                .collect::<Vec<_>>()
                .join(", ")
        ),
        Diagnostic::TilesUnconnected { tiles } => format!(
            "rooms without paths: {}",
            join_names(tiles.iter().map(|tile| tile.name.as_str()))
        ),
        Diagnostic::DeadEnds { tiles } => format!(
            "rooms with only one-way exits: {}",
            join_names(tiles.iter().map(|tile| tile.name.as_str()))
        ),
        Diagnostic::BreakableShortfall { placed, quota } => {
            format!("missing breakable walls: {placed} of {quota} placed")
        }
    }
}

fn run(options: CliOptions) -> Result<ExitCode, Box<dyn Error>> {
    let config = match options.config.as_deref() {
        Some(path) => BoardConfig::load(path)?,
        None => BoardConfig::default(),
    };

    let map_dir = options.map_dir.unwrap_or_else(|| ".".to_owned());
    let loaded = MapFolder::new(map_dir).load_board(&config)?;
    for adjustment in &loaded.adjustments {
        eprintln!("boardsmith: adjusted: {adjustment}");
    }
    let board = loaded.board;

    if options.routes {
        let routes = compose_routes(&board, &config);
        println!("{}", serde_json::to_string_pretty(&routes)?);
    }

    if let Some(raw) = options.reach {
        let source = TileId::new(raw)?;
        if board.tile(&source).is_none() {
            eprintln!("boardsmith: unknown tile {source}");
            return Ok(ExitCode::from(2));
        }
        let overlay = verification_overlay(&board, &config, &source);
        println!("{}", serde_json::to_string_pretty(&overlay)?);
    }

    let diagnostics = validate_board(&board, &config);
    for diagnostic in &diagnostics {
        eprintln!("boardsmith: {}: {}", diagnostic.kind().code(), describe(diagnostic));
    }

    if diagnostics.is_empty() {
        eprintln!("boardsmith: board is valid");
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

fn main() -> ExitCode {
    let mut args = std::env::args();
    let program = args.next().unwrap_or_else(|| "boardsmith".to_owned());

    let options = match parse_options(args) {
        Ok(options) => options,
        Err(()) => {
            print_usage(&program);
            return ExitCode::from(2);
        }
    };

    init_logging(options.verbose);

    match run(options) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("boardsmith: {err}");
            ExitCode::from(2)
        }
    }
}
