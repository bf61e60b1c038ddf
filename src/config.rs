//! Run configuration
//!
//! One immutable value built up front (usually from the command line) and handed to every stage.
use std::collections::HashSet;
use std::str::FromStr;
use errors::*;

/// Default number of words the classification cache remembers
pub const DEFAULT_CACHE_SIZE: usize = 10000;

/// Keep or drop dictionary categories at load time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFilter {
    codes: HashSet<String>,
    include: bool,
}

impl CategoryFilter {
    /// Keep only the listed categories, e.g. `"posemo,negemo"`
    pub fn include(list: &str) -> Result<Self> {
        Ok(CategoryFilter { codes: parse_codes(list)?, include: true })
    }

    /// Keep everything except the listed categories
    pub fn exclude(list: &str) -> Result<Self> {
        Ok(CategoryFilter { codes: parse_codes(list)?, include: false })
    }

    /// Whether a category code survives the filter
    pub fn keeps(&self, code: &str) -> bool {
        self.codes.contains(code) == self.include
    }

    pub fn is_include(&self) -> bool {
        self.include
    }

    /// The filter an include list or an exclude list asks for. Giving both is an error.
    pub fn from_lists(include: Option<&str>, exclude: Option<&str>) -> Result<Option<Self>> {
        match (include, exclude) {
            (Some(_), Some(_)) => {
                Err(Error::Config("--include and --exclude can't be used together".to_string()))
            }
            (Some(list), None) => Ok(Some(CategoryFilter::include(list)?)),
            (None, Some(list)) => Ok(Some(CategoryFilter::exclude(list)?)),
            (None, None) => Ok(None),
        }
    }
}

/// A numeric option, `default` when it wasn't given
pub fn parse_number<T: FromStr>(name: &str, raw: Option<&str>, default: T) -> Result<T> {
    match raw {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| {
            Error::Config(format!("--{} expects a number, got {:?}", name, raw))
        }),
    }
}

fn parse_codes(list: &str) -> Result<HashSet<String>> {
    let mut codes = HashSet::new();
    for code in list.split(',') {
        let code = code.trim();
        if code.is_empty() {
            return Err(Error::Config(format!("empty category code in filter list {:?}", list)));
        }
        if code.chars().any(char::is_whitespace) {
            return Err(Error::Config(format!("category code {:?} contains whitespace", code)));
        }
        codes.insert(code.to_string());
    }
    Ok(codes)
}

/// Everything that changes how a run counts
#[derive(Debug, Clone)]
pub struct Config {
    /// Replace non-word characters and digits with spaces before splitting
    pub sanitize: bool,
    /// Report categories as a percentage of the total word count
    pub percent: bool,
    /// Decimal places for percentages, negative means no rounding
    pub round_digits: i32,
    pub filter: Option<CategoryFilter>,
    /// Words the classification cache may hold, 0 disables it
    pub cache_size: usize,
    /// Input lines start with an id, and each id is counted separately
    pub line_based: bool,
    /// Report every (word, category) match as it happens
    pub trace: bool,
    /// Worker threads for line-based input
    pub jobs: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            sanitize: true,
            percent: false,
            round_digits: -1,
            filter: None,
            cache_size: DEFAULT_CACHE_SIZE,
            line_based: false,
            trace: false,
            jobs: 1,
        }
    }
}

impl Config {
    pub fn sanitize(mut self, sanitize: bool) -> Self {
        self.sanitize = sanitize;
        self
    }

    pub fn percent(mut self, percent: bool) -> Self {
        self.percent = percent;
        self
    }

    pub fn round_digits(mut self, digits: i32) -> Self {
        self.round_digits = digits;
        self
    }

    pub fn filter(mut self, filter: Option<CategoryFilter>) -> Self {
        self.filter = filter;
        self
    }

    pub fn cache_size(mut self, size: usize) -> Self {
        self.cache_size = size;
        self
    }

    pub fn line_based(mut self, line_based: bool) -> Self {
        self.line_based = line_based;
        self
    }

    pub fn trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn jobs(mut self, jobs: usize) -> Result<Self> {
        if jobs == 0 {
            return Err(Error::Config("jobs must be at least 1".to_string()));
        }
        self.jobs = jobs;
        Ok(self)
    }
}
