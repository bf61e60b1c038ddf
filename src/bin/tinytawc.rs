//! Count the words of a text by dictionary category
//!
//! Takes a LIWC-style dictionary and a text (a file, or STDIN) and prints how many words fell into
//! each category, followed by the total number of words:
//!
//! ```text
//! $ echo "I am happy happy sad" | tinytawc emotions.dic
//! posemo:2 negemo:1 total:5
//! ```
//!
//! With `--lines` every input line starts with an id and each id is counted separately, one output
//! line per id, prefixed with `%id`.

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
use clap::{App, ArgMatches};
use log::LevelFilter;

use tinytawc::aggregate::{Aggregator, TRACE_TARGET};
use tinytawc::config::{parse_number, CategoryFilter, Config, DEFAULT_CACHE_SIZE};
use tinytawc::dictionary::Dictionary;
use tinytawc::errors::*;
use tinytawc::group;
use tinytawc::report;

/// Shown after `--help`: what the input, the dictionary and the output look like
const FORMAT_HELP: &'static str = "\
INPUT DATA
    Any plain text file. Whitespace and line breaks are ignored. Unless --raw is given, every
    character that is not a word character, and every digit, separates words.
    With --lines, every line starts with an id followed by whitespace. Lines sharing an id are
    counted together, and lines holding only an id are skipped.

DICT DATA
    Every line is a word rule followed by the category codes it counts toward, separated by
    whitespace. A plain rule is matched against the whole word, ignoring case, with * standing
    for any run of characters:
        happy*      posemo
    A rule written as /regex/flags is searched for anywhere in the word. The flags are any of
    i (ignore case), x (ignore whitespace in the pattern) and m (. matches newlines). A rule
    whose tail after the last / is anything else, like /usr/bin, is a plain rule.
        /^joy(ful)?$/i  posemo
    Lines starting with % are comments. A line holding only % opens or closes the category
    block, where each line maps a code to a readable name:
        %
        posemo  Positive emotion
        negemo  Negative emotion
        %
    Only the first rule matching a word counts. With the rules \"word catA\" and \"word catB\" an
    occurrence of 'word' only counts toward catA. Use \"word catA catB\" instead.

OUTPUT DATA
    By default a single line \"cat0:count0 cat1:count1 ... total:n\", where the counts are word
    counts or, with --percent, percentages of the total. The total is always a word count.
    With --lines, one such line per id, starting with %id.
    With --human, a header row followed by one \"count code (name)\" row per category that matched
    at least one word.";

pub fn main() {
    if let Err(err) = inner_main() {
        eprintln!("[Error] {}", err);
        process::exit(1);
    }
}

fn app() -> App<'static, 'static> {
    app_from_crate!()
        .arg_from_usage("-r, --raw 'Use raw input data with no sanitizing'")
        .arg_from_usage("-p, --percent 'Show output in percent of total words'")
        .arg_from_usage("--round=[DIGITS] 'Round percentages to DIGITS decimal places'")
        .arg_from_usage("--include=[CATEGORIES] 'Count only these categories, e.g. \"cat0,cat1\"'")
        .arg_from_usage("--exclude=[CATEGORIES] 'Count everything except these categories'")
        .arg_from_usage("-l, --lines 'Every input line starts with an id, count each id separately'")
        .arg_from_usage("--cache-size=[WORDS] 'How many words to remember between lookups, 0 to disable'")
        .arg_from_usage("-j, --jobs=[N] 'Worker threads for --lines input'")
        .arg_from_usage("-m, --show-matching 'Show every word and the category it matches'")
        .arg_from_usage("--human 'Show human-readable output'")
        .arg_from_usage("-s, --sort 'Sort output by value (desc)'")
        .arg_from_usage("-d, --verbose 'Show debug information'")
        .arg_from_usage("<dictionary> 'LIWC-style dictionary file'")
        .arg_from_usage("[input] 'text to count, STDIN if not given'")
        .after_help(FORMAT_HELP)
}

pub fn inner_main() -> Result<()> {
    let args = app().get_matches();

    init_logging(args.is_present("verbose"), args.is_present("show-matching"));

    // Settle the configuration before touching the dictionary
    let config = build_config(&args)?;
    let dict_path = args.value_of("dictionary").unwrap_or_default();
    let dict = Dictionary::load(dict_path, config.filter.as_ref())?;

    let sample = args.value_of("input").unwrap_or("STDIN");
    debug!("Input file: {:?}", sample);
    let text = read_input(args.value_of("input"))?;

    let human = args.is_present("human");
    let sort = args.is_present("sort");
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if human {
        writeln!(out, "{}", report::HUMAN_HEADER)?;
    }
    if config.line_based {
        for (id, tally) in group::count_lines(&dict.rules, text.lines(), &config)? {
            let mut entries = report::tally_report(&tally, &config, Some(id.as_str()));
            if sort {
                report::sort_report(&mut entries);
            }
            if human {
                writeln!(out, "---- {} ----", id)?;
                write!(out, "{}", report::human(&entries, &dict.categories))?;
            } else {
                writeln!(out, "{}", report::record(&id, &entries))?;
            }
        }
    } else {
        let mut aggregator = Aggregator::new(&dict.rules, &config);
        let tally = aggregator.aggregate(&text);
        let mut entries = report::tally_report(&tally, &config, None);
        if sort {
            report::sort_report(&mut entries);
        }
        if human {
            write!(out, "{}", report::human(&entries, &dict.categories))?;
        } else {
            writeln!(out, "{}", report::machine(&entries))?;
        }
    }
    Ok(())
}

/// RUST_LOG wins over the flags
fn init_logging(verbose: bool, show_matching: bool) {
    let mut builder = env_logger::Builder::new();
    builder.format(|buf, record| {
        writeln!(buf, "{}{}", report::log_prefix(record.target(), record.level()), record.args())
    });
    builder.filter_level(if verbose { LevelFilter::Debug } else { LevelFilter::Warn });
    if show_matching {
        builder.filter_module(TRACE_TARGET, LevelFilter::Info);
    }
    builder.parse_default_env();
    builder.init();
}

fn build_config(args: &ArgMatches) -> Result<Config> {
    let filter = CategoryFilter::from_lists(args.value_of("include"), args.value_of("exclude"))?;
    let round_digits = parse_number("round", args.value_of("round"), -1)?;
    if args.is_present("round") && !args.is_present("percent") {
        warn!("--round only changes percentages, and --percent is not set");
    }
    Config::default()
        .sanitize(!args.is_present("raw"))
        .percent(args.is_present("percent"))
        .round_digits(round_digits)
        .filter(filter)
        .cache_size(parse_number("cache-size", args.value_of("cache-size"), DEFAULT_CACHE_SIZE)?)
        .line_based(args.is_present("lines"))
        .trace(args.is_present("show-matching"))
        .jobs(parse_number("jobs", args.value_of("jobs"), 1)?)
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
