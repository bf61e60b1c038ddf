//! LIWC-style dictionary compiler
//!
//! A dictionary is plain text. Lines holding nothing but `%` open and close a block of
//! category names (`<code> <name>`); outside of it every line is a word rule
//! (`<pattern> <code> <code> ...`) and lines starting with `%` are comments.
//!
//! ```text
//! %
//! 1   posemo
//! 2   negemo
//! %
//! happy*      1
//! /^joy(ful)?$/i  1
//! sad*        2
//! ```
//!
//! Rules keep their file order because only the first rule that matches a word counts.
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use regex::{Regex, RegexBuilder};

use config::CategoryFilter;
use errors::*;
use farm::FarmMap;

/// Marks comments, and on a line of its own, the category block
pub const COMMENT_FLAG: char = '%';

/// Category codes a word counts toward. Empty means the word matched nothing.
pub type Categories = Arc<[String]>;

/// An empty category list, for words no rule accepts
pub fn no_categories() -> Categories {
    Arc::from(Vec::new())
}

/// A compiled word pattern
#[derive(Debug, Clone)]
pub enum Pattern {
    /// `happy*` style: `*` is any run of characters, the rest is literal, the whole word has
    /// to match and case is ignored
    LiteralWildcard { source: String, regex: Regex },
    /// `/regex/flags`, searched anywhere in the word
    FullRegex { source: String, regex: Regex },
}

impl Pattern {
    /// Compile one pattern token, or say what's wrong with it
    pub fn compile(token: &str) -> ::std::result::Result<Pattern, String> {
        match split_delimited(token) {
            Some((body, flags)) => {
                let mut builder = RegexBuilder::new(body);
                for flag in flags.chars() {
                    match flag {
                        'i' => { builder.case_insensitive(true); }
                        'x' => { builder.ignore_whitespace(true); }
                        // split_delimited only lets REGEX_FLAGS through, so this is 'm'
                        _ => { builder.dot_matches_new_line(true); }
                    }
                }
                let regex = builder.build().map_err(|e| e.to_string())?;
                Ok(Pattern::FullRegex { source: token.to_string(), regex: regex })
            }
            None => {
                let body = token.split('*')
                    .map(|piece| ::regex::escape(piece))
                    .collect::<Vec<_>>()
                    .join(".*");
                let regex = RegexBuilder::new(&format!("^(?:{})$", body))
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| e.to_string())?;
                Ok(Pattern::LiteralWildcard { source: token.to_string(), regex: regex })
            }
        }
    }

    pub fn matches(&self, word: &str) -> bool {
        self.regex().is_match(word)
    }

    /// The pattern as written in the dictionary
    pub fn source(&self) -> &str {
        match *self {
            Pattern::LiteralWildcard { ref source, .. } => source,
            Pattern::FullRegex { ref source, .. } => source,
        }
    }

    fn regex(&self) -> &Regex {
        match *self {
            Pattern::LiteralWildcard { ref regex, .. } => regex,
            Pattern::FullRegex { ref regex, .. } => regex,
        }
    }
}

/// Flags a `/body/flags` pattern may carry
pub const REGEX_FLAGS: &'static str = "ixm";

/// `/body/flags` -> (body, flags). Flags are what follows the last slash, and only `REGEX_FLAGS`
/// count: `/usr/bin` is a literal path, not `usr` with flags `bin`.
fn split_delimited(token: &str) -> Option<(&str, &str)> {
    if token.len() < 2 || !token.starts_with('/') {
        return None;
    }
    let close = token.rfind('/')?;
    if close == 0 {
        return None;
    }
    let flags = &token[close + 1..];
    if flags.chars().all(|c| REGEX_FLAGS.contains(c)) {
        Some((&token[1..close], flags))
    } else {
        None
    }
}

/// A pattern and the categories a matching word counts toward
#[derive(Debug, Clone)]
pub struct Rule {
    pub pattern: Pattern,
    pub categories: Categories,
}

/// Rules in dictionary order
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        RuleSet { rules: rules }
    }

    /// The earliest rule accepting the word, if any
    pub fn first_match(&self, word: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.pattern.matches(word))
    }

    pub fn iter(&self) -> ::std::slice::Iter<Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Human-readable names for category codes
#[derive(Debug, Clone, Default)]
pub struct CategoryRegistry {
    names: FarmMap<String, Option<String>>,
}

impl CategoryRegistry {
    pub fn insert(&mut self, code: &str, name: Option<&str>) {
        self.names.insert(code.to_string(), name.map(str::to_string));
    }

    /// Display name of a code, if the dictionary gave one
    pub fn name(&self, code: &str) -> Option<&str> {
        self.names.get(code).and_then(|n| n.as_ref().map(String::as_str))
    }

    pub fn contains(&self, code: &str) -> bool {
        self.names.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    ScanningRules,
    ScanningCategories,
}

impl ParseState {
    fn toggle(self) -> Self {
        match self {
            ParseState::ScanningRules => ParseState::ScanningCategories,
            ParseState::ScanningCategories => ParseState::ScanningRules,
        }
    }
}

/// A loaded dictionary: the rules and the category names
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    pub rules: RuleSet,
    pub categories: CategoryRegistry,
}

impl Dictionary {
    /// Read and compile a dictionary file
    pub fn load<P: AsRef<Path>>(path: P, filter: Option<&CategoryFilter>) -> Result<Dictionary> {
        let mut content = String::new();
        File::open(path.as_ref())?.read_to_string(&mut content)?;
        debug!("Dict file: {:?}", path.as_ref().display());
        Dictionary::parse(&content, filter)
    }

    /// Compile a dictionary from text
    pub fn parse(content: &str, filter: Option<&CategoryFilter>) -> Result<Dictionary> {
        let mut state = ParseState::ScanningRules;
        let mut rules = vec![];
        let mut categories = CategoryRegistry::default();
        let mut filtered_out = 0;

        for (idx, raw) in content.lines().enumerate() {
            let line = clean_line(raw);
            if is_delimiter(&line) {
                state = state.toggle();
                if state == ParseState::ScanningCategories {
                    debug!("Found start of comment section at line {}, looking for categories", idx + 1);
                }
                continue;
            }
            if line.is_empty() {
                continue;
            }
            match state {
                ParseState::ScanningCategories => {
                    let mut parts = line.splitn(2, ' ');
                    if let Some(code) = parts.next() {
                        categories.insert(code, parts.next());
                    }
                }
                ParseState::ScanningRules => {
                    if line.starts_with(COMMENT_FLAG) {
                        continue;
                    }
                    let mut parts = line.split(' ');
                    let token = match parts.next() {
                        Some(token) => token,
                        None => continue,
                    };
                    let codes: Vec<String> = parts.map(str::to_string).collect();
                    if codes.is_empty() {
                        return Err(Error::load(idx + 1, raw, "rule has no categories"));
                    }
                    let pattern = Pattern::compile(token)
                        .map_err(|reason| Error::load(idx + 1, raw, reason))?;
                    let kept: Vec<String> = match filter {
                        Some(f) => codes.into_iter().filter(|c| f.keeps(c)).collect(),
                        None => codes,
                    };
                    if kept.is_empty() {
                        filtered_out += 1;
                        continue;
                    }
                    rules.push(Rule { pattern: pattern, categories: Arc::from(kept) });
                }
            }
        }

        if state == ParseState::ScanningCategories {
            debug!("Dictionary ended inside a category block");
        }
        debug!("Parsed {} categories", categories.len());
        debug!("Parsed {} word rules ({} dropped by the category filter)", rules.len(), filtered_out);
        if rules.is_empty() {
            warn!("The dictionary has no word rules; every word will be unmatched");
        }
        Ok(Dictionary { rules: RuleSet::new(rules), categories: categories })
    }
}

/// Trim and collapse whitespace runs to single spaces
fn clean_line(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_delimiter(line: &str) -> bool {
    let mut chars = line.chars();
    chars.next() == Some(COMMENT_FLAG) && chars.next().is_none()
}
