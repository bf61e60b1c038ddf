//! Word counts by dictionary category, in the style of LIWC
//!
//! A dictionary of word rules (see `dictionary`) sorts every word of a text into categories, and
//! the counts per category (see `aggregate`) are what comes out. Input can also be line-based,
//! with a separate count for every id (see `group`).
//!
//! ```
//! use tinytawc::config::Config;
//! use tinytawc::dictionary::Dictionary;
//! use tinytawc::aggregate::Aggregator;
//!
//! let dict = Dictionary::parse("happy* posemo\nsad* negemo\n", None).unwrap();
//! let mut aggregator = Aggregator::new(&dict.rules, &Config::default());
//! let tally = aggregator.aggregate("I am happy happy sad");
//! assert_eq!(tally.count("posemo"), 2);
//! assert_eq!(tally.total(), 5);
//! ```


#[macro_use] extern crate log;
extern crate regex;
extern crate farmhash;
extern crate rayon;
pub mod errors;
pub mod farm;
pub mod config;
pub mod dictionary;
pub mod cache;
pub mod classifier;
pub mod aggregate;
pub mod group;
pub mod report;
