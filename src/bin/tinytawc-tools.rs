//! Prepare text for counting
//!
//! `clean` prints a text the way `tinytawc` sees it after sanitizing. `combine` turns a set of
//! files into line-based input, one `id text` line per file with the file name as id:
//!
//! ```text
//! $ tinytawc-tools combine letters/*.txt | tinytawc --lines emotions.dic
//! %alice.txt posemo:4 negemo:1 total:120
//! %bob.txt posemo:0 negemo:3 total:80
//! ```

// argument parsing
#[macro_use] extern crate clap;
// logging
#[macro_use] extern crate log;
extern crate env_logger;
// lastly, this library
extern crate tinytawc;

use std::fs::File;
use std::io::{self, Read, Write};
use std::process;
use clap::{App, AppSettings, ArgMatches, SubCommand};
use log::LevelFilter;

use tinytawc::aggregate::{sanitize, sanitize_lines};
use tinytawc::errors::*;
use tinytawc::group;
use tinytawc::report;

pub fn main() {
    if let Err(err) = inner_main() {
        eprintln!("[Error] {}", err);
        process::exit(1);
    }
}

fn app() -> App<'static, 'static> {
    App::new("tinytawc-tools")
        .version(crate_version!())
        .author(crate_authors!())
        .about("Clean text, or combine files into line-based input for tinytawc --lines")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg_from_usage("-d, --verbose 'Show debug information'")
        .subcommand(SubCommand::with_name("clean")
            .about("Print the text the way counting sees it")
            .arg_from_usage("--keeplines 'Clean every line on its own instead of joining them'")
            .arg_from_usage("[input] 'text to clean, STDIN if not given'"))
        .subcommand(SubCommand::with_name("combine")
            .about("Print one \"id text\" line per file, the id being the file name")
            .arg_from_usage("<files>... 'files to combine'"))
}

pub fn inner_main() -> Result<()> {
    let args = app().get_matches();

    let mut builder = env_logger::Builder::new();
    builder.format(|buf, record| {
        writeln!(buf, "{}{}", report::log_prefix(record.target(), record.level()), record.args())
    });
    builder.filter_level(if args.is_present("verbose") { LevelFilter::Debug } else { LevelFilter::Warn });
    builder.parse_default_env();
    builder.init();

    let output = run(&args)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write!(out, "{}", output)?;
    Ok(())
}

fn run(args: &ArgMatches) -> Result<String> {
    match args.subcommand() {
        ("clean", Some(sub)) => {
            let text = read_input(sub.value_of("input"))?;
            Ok(clean(&text, sub.is_present("keeplines")))
        }
        ("combine", Some(sub)) => {
            let files: Vec<&str> = sub.values_of("files").map(|v| v.collect()).unwrap_or_default();
            debug!("Combining {:?}", files);
            group::combine(&files)
        }
        (other, _) => Err(Error::Other(format!("Unknown mode {:?}", other))),
    }
}

/// Sanitized text, either line by line or as a single line
fn clean(text: &str, keep_lines: bool) -> String {
    if keep_lines {
        sanitize_lines(text)
    } else {
        sanitize(text) + "\n"
    }
}

fn read_input(path: Option<&str>) -> Result<String> {
    let mut text = String::new();
    match path {
        Some(path) => {
            File::open(path)
                .map_err(|e| Error::Other(format!("Input file {} is not readable: {}", path, e)))?
                .read_to_string(&mut text)?;
        }
        None => {
            io::stdin().read_to_string(&mut text)?;
        }
    }
    Ok(text)
}
