#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # labcheck
//!
//! Command line front end for the lab checks.
//!
//! ```text
//! labcheck average 18 25 30 33 22 28
//! labcheck race --time 120 --time 110 --time 90 \
//!               --winner 100 --winner 100 --winner 100 \
//!               --penalty 20 --penalty 10
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use bpaf::*;
use colored::Colorize;
use dotenvy::dotenv;
use labcheck::{
    Config, GradeAverager, RaceDisqualifier, RaceRecord, Verdict,
    input::{grades_from_json, race_from_json},
};
use serde_json::{Value, json};
use tabled::Table;
use tracing::{Level, info, metadata::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Race inputs given on the command line.
#[derive(Debug, Clone)]
struct RaceArgs {
    /// JSON file holding the race record
    input:     Option<PathBuf>,
    /// The racer's event times
    times:     Vec<i64>,
    /// The winner's event times
    winner:    Vec<i64>,
    /// Declared number of penalties
    count:     Option<i64>,
    /// Penalty values
    penalties: Vec<i64>,
}

/// Subcommands.
#[derive(Debug, Clone)]
enum Cmd {
    /// Average six grades
    Average {
        /// JSON file holding the grade list
        input:  Option<PathBuf>,
        /// Grades given on the command line
        grades: Vec<i64>,
    },
    /// Check a racer for disqualification
    Race(RaceArgs),
}

/// Global options plus the chosen subcommand.
#[derive(Debug, Clone)]
struct Opts {
    /// Configuration file overriding the default thresholds
    config:  Option<PathBuf>,
    /// Print results as JSON
    json:    bool,
    /// Enable debug logging
    verbose: bool,
    /// What to run
    cmd:     Cmd,
}

/// Parse the command line arguments and return the `Opts` struct
fn options() -> Opts {
    /// parses an optional JSON input file
    fn input() -> impl Parser<Option<PathBuf>> {
        long("input")
            .short('i')
            .help("Read the input from a JSON file instead of the command line")
            .argument::<PathBuf>("FILE")
            .optional()
    }

    let average = {
        let input = input();
        let grades = positional::<i64>("GRADE")
            .help("A grade between 18 and 33 (33 is 30 e lode)")
            .many();
        construct!(Cmd::Average { input, grades })
            .to_options()
            .command("average")
            .help("Average six grades, dropping the lowest and the highest")
    };

    let race = {
        let input = input();
        let times = long("time")
            .short('t')
            .help("The racer's time for an event; repeat once per event")
            .argument::<i64>("T")
            .many();
        let winner = long("winner")
            .short('w')
            .help("The winning time for an event; repeat once per event")
            .argument::<i64>("T")
            .many();
        let count = long("count")
            .short('n')
            .help("Declared number of penalties (defaults to the number of --penalty values)")
            .argument::<i64>("N")
            .optional();
        let penalties = long("penalty")
            .short('p')
            .help("A penalty value; repeat once per penalty")
            .argument::<i64>("P")
            .many();
        construct!(RaceArgs {
            input,
            times,
            winner,
            count,
            penalties
        })
        .to_options()
        .command("race")
        .help("Decide whether a racer is disqualified")
        .map(Cmd::Race)
    };

    let config = long("config")
        .short('c')
        .help("JSON file with the grading scale and race thresholds")
        .argument::<PathBuf>("FILE")
        .optional();
    let json = long("json").help("Print results as JSON").switch();
    let verbose = long("verbose")
        .short('v')
        .help("Log every check as it runs")
        .switch();
    let cmd = construct!([average, race]);

    construct!(Opts {
        config,
        json,
        verbose,
        cmd
    })
    .to_options()
    .descr("Grade averaging and race disqualification checks")
    .run()
}

/// Reads and parses a JSON input file.
fn read_json(path: &Path) -> Result<Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read input file: {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Could not parse input file as JSON: {}", path.display()))
}

/// Runs the `average` subcommand.
fn average(config: &Config, input: Option<PathBuf>, grades: Vec<i64>, json: bool) -> Result<()> {
    let grades = match input {
        Some(path) if grades.is_empty() => grades_from_json(&read_json(&path)?)?,
        Some(_) => bail!("Pass grades either on the command line or with --input, not both"),
        None => grades,
    };

    let average = GradeAverager::new(config.grades).compute_average(&grades)?;

    if json {
        println!("{}", json!({ "grades": grades, "average": average }));
    } else {
        println!("{average:.2}");
    }
    Ok(())
}

/// Runs the `race` subcommand.
fn race(config: &Config, args: RaceArgs, json: bool) -> Result<()> {
    let RaceArgs {
        input,
        times,
        winner,
        count,
        penalties,
    } = args;

    let record = match input {
        Some(path) => {
            if !(times.is_empty() && winner.is_empty() && count.is_none() && penalties.is_empty())
            {
                bail!("Pass the race record either on the command line or with --input, not both");
            }
            race_from_json(&read_json(&path)?)?
        }
        None => {
            let count = count.unwrap_or(penalties.len() as i64);
            RaceRecord::new(&times, &winner, count, &penalties)?
        }
    };

    let verdict = RaceDisqualifier::new(config.race).evaluate(&record);

    if json {
        println!("{}", serde_json::to_string_pretty(&verdict)?);
    } else {
        print_verdict(&verdict);
    }
    Ok(())
}

/// Prints a table of rule checks followed by the verdict.
fn print_verdict(verdict: &Verdict) {
    println!("{}", Table::new(verdict.rows()));
    if verdict.disqualified() {
        println!("{}", "DISQUALIFIED".red().bold());
    } else {
        println!("{}", "NOT DISQUALIFIED".green().bold());
    }
}

fn main() -> Result<()> {
    dotenv().ok();

    let opts = options();

    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);
    let level = if opts.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::registry()
        .with(fmt)
        .with(LevelFilter::from_level(level))
        .init();

    let config = Config::resolve(opts.config.as_deref())?;
    if config != Config::default() {
        info!(?config, "using non-default thresholds");
    }

    match opts.cmd {
        Cmd::Average { input, grades } => average(&config, input, grades, opts.json),
        Cmd::Race(args) => race(&config, args, opts.json),
    }
}
