//! Relay Variations CLI
//!
//! Usage:
//!   relay-variations [OPTIONS] [FILE]
//!
//! Options:
//!   -c, --course <NAME>      Course to plan (default: first in file)
//!   -s, --settings <FILE>    Relay settings file (TOML format)
//!   -f, --format <FORMAT>    Output format: text, csv or xml
//!   -g, --grammar            Show course notation reference
//!   -h, --help               Print help

use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use relay_variations::export::{write_csv, write_team_table, write_xml};
use relay_variations::{parse_courses, CourseError, RelaySettings, RelayVariations};

#[derive(Parser)]
#[command(name = "relay-variations")]
#[command(about = "Deterministic relay variation assignment for forked courses")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Course to plan (default: first course in the file)
    #[arg(short, long)]
    course: Option<String>,

    /// Number of the first team
    #[arg(long, value_name = "N")]
    first_team: Option<u32>,

    /// Number of teams
    #[arg(short, long, value_name = "N")]
    teams: Option<u32>,

    /// Number of legs per team
    #[arg(short, long, value_name = "N")]
    legs: Option<usize>,

    /// Pin legs to a branch, e.g. 'A=1,3' (1-based legs, repeatable)
    #[arg(long, value_name = "BRANCH=LEG[,LEG...]")]
    fix: Vec<String>,

    /// Relay settings file (TOML format)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Write output to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the total number of possible paths and exit
    #[arg(long)]
    paths: bool,

    /// Print branch balance warnings and exit
    #[arg(long)]
    warnings: bool,

    /// Show course notation reference
    #[arg(short, long)]
    grammar: bool,

    /// Debug mode: dump plan statistics to stderr
    #[arg(short, long)]
    debug: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Csv,
    Xml,
}

fn main() {
    let cli = Cli::parse();

    if cli.grammar {
        print_grammar();
        return;
    }

    // If no input file and stdin is a terminal (interactive), show intro help
    if cli.input.is_none() && io::stdin().is_terminal() {
        print_intro();
        return;
    }

    // Settings file first, explicit flags on top
    let mut settings = match &cli.settings {
        Some(path) => match RelaySettings::from_file(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error loading settings '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => RelaySettings::new(1, 20, 2),
    };
    if let Some(first_team) = cli.first_team {
        settings.first_team_number = first_team;
    }
    if let Some(teams) = cli.teams {
        settings.number_of_teams = teams;
    }
    if let Some(legs) = cli.legs {
        settings.number_of_legs = legs;
    }
    for spec in &cli.fix {
        match parse_fix(spec) {
            Ok((branch, legs)) => {
                for leg in legs {
                    settings.fixed_branches.add_branch_assignment(branch, leg);
                }
            }
            Err(e) => {
                eprintln!("Error in --fix '{}': {}", spec, e);
                std::process::exit(1);
            }
        }
    }

    // Read input
    let (source, filename) = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let courses = match parse_courses(&source) {
        Ok(courses) => courses,
        Err(relay_variations::RelayError::Parse(errors)) => {
            for error in errors {
                eprintln!("{}", error.format(&source, &filename));
            }
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let course = match &cli.course {
        Some(name) => match courses.course(name) {
            Some(course) => course,
            None => {
                eprintln!("Error: {}", CourseError::unknown(name, courses.names()));
                std::process::exit(1);
            }
        },
        None => match courses.first() {
            Some(course) => course,
            None => {
                eprintln!("Error: {}", CourseError::NoCourses);
                std::process::exit(1);
            }
        },
    };

    let relay = RelayVariations::new(course, &settings);

    // Problems in the fixed set are not fatal; the plan is built from the
    // normalized remainder
    for error in relay.validation_errors() {
        eprintln!("Warning: {}", error);
    }

    if cli.paths {
        println!("{}", relay.total_possible_paths());
        return;
    }

    if cli.warnings {
        for warning in relay.branch_warnings() {
            println!("{}", warning);
        }
        return;
    }

    if cli.debug {
        eprintln!("=== Plan Debug ===");
        eprintln!("course: {}", course.name);
        eprintln!(
            "teams: {}..={}, legs: {}",
            relay.first_team_number(),
            relay.last_team_number(),
            relay.number_of_legs()
        );
        eprintln!("possible paths: {}", relay.total_possible_paths());
        for warning in relay.branch_warnings() {
            eprintln!("warning: {}", warning);
        }
        eprintln!("==================");
    }

    let rendered = match cli.format {
        Format::Text => write_team_table(&relay),
        Format::Csv => write_csv(&relay),
        Format::Xml => write_xml(&relay, &course.name),
    };

    match &cli.output {
        Some(path) => {
            if let Err(e) = fs::File::create(path).and_then(|mut f| f.write_all(rendered.as_bytes()))
            {
                eprintln!("Error writing '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        }
        None => print!("{}", rendered),
    }
}

/// Parse one `--fix` argument like `A=1,3` into a letter and 0-based legs
fn parse_fix(spec: &str) -> Result<(char, Vec<i32>), String> {
    let (branch, legs) = spec
        .split_once('=')
        .ok_or_else(|| "expected BRANCH=LEG[,LEG...]".to_string())?;
    let mut chars = branch.chars();
    let (Some(letter), None) = (chars.next(), chars.next()) else {
        return Err(format!("branch '{}' must be a single letter", branch));
    };
    let legs = legs
        .split(',')
        .map(|leg| {
            leg.trim()
                .parse::<i32>()
                .map(|n| n - 1) // 1-based on the command line
                .map_err(|_| format!("'{}' is not a number", leg))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok((letter, legs))
}

fn print_intro() {
    println!(
        r#"Relay Variations - deterministic relay path assignment for forked courses

USAGE:
    relay-variations [OPTIONS] [FILE]
    echo '<notation>' | relay-variations --teams 10 --legs 3

OPTIONS:
    -c, --course       Course to plan (default: first in file)
    -t, --teams        Number of teams
    -l, --legs         Number of legs per team
    --first-team       Number of the first team (default 1)
    --fix              Pin legs to a branch, e.g. 'A=1,3'
    -s, --settings     Relay settings file (TOML)
    -f, --format       Output format: text, csv or xml
    --paths            Print the number of possible paths and exit
    --warnings         Print branch balance warnings and exit
    -g, --grammar      Show course notation reference
    -h, --help         Print help

QUICK START:
    echo 'course r {{ start 31 fork {{ 32 33 | 34 }} 36 finish }}' \
        | relay-variations --teams 4 --legs 2

This prints one variation code per team and leg.
Run --grammar for the notation reference."#
    );
}

fn print_grammar() {
    println!(
        r#"RELAY COURSE NOTATION
=====================

FILE
----
file     := course+
course   := "course" name "{{" sequence "}}"
sequence := element+
element  := control | fork | loop

CONTROLS
--------
A control is a bare code: 31, 100, start, F1, finish.

FORKS
-----
fork {{ 32 33 | 34 }}

Each leg takes exactly one branch. Branches are lettered A, B, C, ...
in discovery order across the whole course; the letters appear in the
variation code strings and are the handles for --fix.

LOOPS
-----
31 loop {{ 40 | 41 | 42 }}

Anchored at the preceding control (31 here). Every branch is run,
returning to the anchor after each one; only the order varies. A loop
with n branches contributes n! variations.

NESTING
-------
fork {{ 40 fork {{ 41 | 42 }} | 50 }}

Forks and loops nest inside branches. A nested fork is only resolved
on legs that run its parent branch.

COMMENTS
--------
// line comment
/* block comment */

FIXED BRANCHES
--------------
--fix 'A=1,3' pins legs 1 and 3 (1-based) to branch A wherever the
fork carrying A is run. Only branches of non-loop forks that every leg
passes through can be pinned. Illegal pins are reported to stderr and
dropped; the plan is built from the rest.

SETTINGS FILE (TOML)
--------------------
first-team = 1
teams = 20
legs = 6

[fixed-branches]
A = [1, 3]"#
    );
}
