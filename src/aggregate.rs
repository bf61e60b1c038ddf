//! Split text into words and count them by category
use std::fmt;
use regex::Regex;

use classifier::Classifier;
use config::Config;
use dictionary::RuleSet;
use farm::{FarmMap, new_farm};

/// Name of the synthetic entry holding the number of words
pub const TOTAL: &'static str = "total";

/// Log target for `word matches category` lines
pub const TRACE_TARGET: &'static str = "tinytawc::trace";

/// Splits text into words
#[derive(Debug, Clone)]
pub struct Tokenizer {
    /// Runs of non-word characters or ASCII digits; None splits on whitespace only
    separator: Option<Regex>,
}

impl Tokenizer {
    pub fn new(sanitize: bool) -> Self {
        Tokenizer {
            separator: if sanitize {
                Some(Regex::new(r"[\W0-9]+").expect("separator pattern is valid"))
            } else {
                None
            },
        }
    }

    /// Words of the text, in order, never empty
    pub fn tokens<'t>(&self, text: &'t str) -> Vec<&'t str> {
        match self.separator {
            Some(ref separator) => separator.split(text).filter(|t| !t.is_empty()).collect(),
            None => text.split_whitespace().collect(),
        }
    }
}

/// Clean text the same way counting does, keeping words separated by single spaces
pub fn sanitize(text: &str) -> String {
    Tokenizer::new(true).tokens(text).join(" ")
}

/// `sanitize` every line on its own, keeping the line breaks
pub fn sanitize_lines(text: &str) -> String {
    let tokenizer = Tokenizer::new(true);
    text.lines()
        .map(|line| tokenizer.tokens(line).join(" ") + "\n")
        .collect()
}

/// Rounds to `digits` decimal places. Negative digits don't round.
pub fn round(num: f64, digits: i32) -> f64 {
    if digits < 0 {
        return num;
    }
    let scale = 10f64.powi(digits);
    (num * scale).round() / scale
}

/// `count` as a (rounded) percentage of `total`, 0 when there are no words at all
pub fn percent(count: u64, total: u64, digits: i32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round(count as f64 / total as f64 * 100.0, digits)
}

/// A reported number: a plain count or a share of the total
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Count(u64),
    Percent(f64),
}

impl Value {
    pub fn as_f64(&self) -> f64 {
        match *self {
            Value::Count(n) => n as f64,
            Value::Percent(p) => p,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Value::Count(n) => write!(f, "{}", n),
            // 40 percent reads as 40.0, so it can't be mistaken for a count
            Value::Percent(p) if p.fract() == 0.0 => write!(f, "{:.1}", p),
            Value::Percent(p) => write!(f, "{}", p),
        }
    }
}

/// Category counts of one text
#[derive(Debug, Clone, Default)]
pub struct Tally {
    /// In order of first appearance
    counts: Vec<(String, u64)>,
    index: FarmMap<String, usize>,
    total: u64,
}

impl Tally {
    pub fn new() -> Self {
        Tally { counts: vec![], index: new_farm(), total: 0 }
    }

    fn add(&mut self, code: &str) {
        if let Some(&i) = self.index.get(code) {
            self.counts[i].1 += 1;
            return;
        }
        self.index.insert(code.to_string(), self.counts.len());
        self.counts.push((code.to_string(), 1));
    }

    /// Words counted under a category
    pub fn count(&self, code: &str) -> u64 {
        self.index.get(code).map(|&i| self.counts[i].1).unwrap_or(0)
    }

    /// Number of words in the text, matched or not
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn counts(&self) -> &[(String, u64)] {
        &self.counts
    }

    /// Entries in first-seen order with the total last
    ///
    /// In percent mode every category becomes a share of the total; the total stays a count.
    pub fn report(&self, percent_mode: bool, digits: i32) -> Vec<(String, Value)> {
        let mut out: Vec<(String, Value)> = self.counts.iter()
            .map(|&(ref code, n)| {
                let value = if percent_mode {
                    Value::Percent(percent(n, self.total, digits))
                } else {
                    Value::Count(n)
                };
                (code.clone(), value)
            })
            .collect();
        out.push((TOTAL.to_string(), Value::Count(self.total)));
        out
    }
}

/// Turns texts into category tallies
///
/// Keeps one classifier (and so one cache) for all texts it counts, so repeated vocabulary gets
/// cheaper as the run goes on.
pub struct Aggregator<'r> {
    classifier: Classifier<'r>,
    tokenizer: Tokenizer,
}

impl<'r> Aggregator<'r> {
    pub fn new(rules: &'r RuleSet, config: &Config) -> Self {
        let mut classifier = Classifier::new(rules, config.cache_size);
        if config.trace {
            classifier.set_trace(|word, category| info!(target: TRACE_TARGET, "{} matches {}", word, category));
        }
        Aggregator::with_classifier(classifier, config)
    }

    /// Count with a classifier set up by the caller, e.g. with its own trace hook
    pub fn with_classifier(classifier: Classifier<'r>, config: &Config) -> Self {
        Aggregator {
            classifier: classifier,
            tokenizer: Tokenizer::new(config.sanitize),
        }
    }

    pub fn aggregate(&mut self, text: &str) -> Tally {
        let words = self.tokenizer.tokens(text);
        let rule_count = self.classifier.rules().len();
        debug!("Found {} words", words.len());
        debug!("Checking at most {}*{}={} rules, this may take a while",
            human_count(words.len() as u64),
            human_count(rule_count as u64),
            human_count(words.len() as u64 * rule_count as u64));

        let mut tally = Tally::new();
        for word in &words {
            for category in self.classifier.classify(word).iter() {
                tally.add(category);
            }
        }
        tally.total = words.len() as u64;
        let stats = self.classifier.stats();
        debug!("Done, {} cache hits and {} misses so far", stats.hits, stats.misses);
        tally
    }

    pub fn classifier(&self) -> &Classifier<'r> {
        &self.classifier
    }
}

/// 1234 -> "1.2k", 5600000 -> "5.6M"
fn human_count(n: u64) -> String {
    if n < 1000 {
        n.to_string()
    } else if n < 1000000 {
        format!("{}k", (n / 100) as f64 / 10.0)
    } else {
        format!("{}M", (n / 100000) as f64 / 10.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dictionary::Dictionary;

    fn count(dict: &str, config: &Config, text: &str) -> Vec<(String, Value)> {
        let d = Dictionary::parse(dict, None).unwrap();
        let mut agg = Aggregator::new(&d.rules, config);
        agg.aggregate(text).report(config.percent, config.round_digits)
    }

    fn entry(code: &str, value: Value) -> (String, Value) {
        (code.to_string(), value)
    }

    #[test]
    fn counts_by_first_matching_rule() {
        let out = count("happy* posemo\nsad* negemo\n", &Config::default(), "I am happy happy sad");
        assert_eq!(out, vec![
            entry("posemo", Value::Count(2)),
            entry("negemo", Value::Count(1)),
            entry("total", Value::Count(5)),
        ]);
    }

    #[test]
    fn regex_rules_count_case_insensitively_with_flag() {
        let out = count("/^joy(ful)?$/i posemo\n", &Config::default(), "joy Joyful JOY");
        assert_eq!(out, vec![entry("posemo", Value::Count(3)), entry("total", Value::Count(3))]);
    }

    #[test]
    fn percent_mode_rounds_and_leaves_total_alone() {
        let config = Config::default().percent(true).round_digits(1);
        let out = count("happy* posemo\nsad* negemo\n", &config, "I am happy happy sad");
        assert_eq!(out, vec![
            entry("posemo", Value::Percent(40.0)),
            entry("negemo", Value::Percent(20.0)),
            entry("total", Value::Count(5)),
        ]);
    }

    #[test]
    fn percent_of_nothing_is_zero() {
        assert_eq!(percent(0, 0, 2), 0.0);
        let config = Config::default().percent(true);
        let out = count("happy* posemo\n", &config, "   ");
        assert_eq!(out, vec![entry("total", Value::Count(0))]);
    }

    #[test]
    fn rounding() {
        assert_eq!(round(33.333333, 2), 33.33);
        assert_eq!(round(66.666666, 0), 67.0);
        assert_eq!(round(2.5, -1), 2.5);
        assert_eq!(percent(1, 3, 1), 33.3);
    }

    #[test]
    fn one_increment_per_category_per_word() {
        let out = count("grief negemo sad\ngrief* other\n", &Config::default(), "grief grief");
        assert_eq!(out, vec![
            entry("negemo", Value::Count(2)),
            entry("sad", Value::Count(2)),
            entry("total", Value::Count(2)),
        ]);
    }

    #[test]
    fn sanitizing_splits_on_punctuation_and_digits() {
        let t = Tokenizer::new(true);
        assert_eq!(t.tokens("Happy, happy!! sad...\n42 joy2day über_alles"),
            vec!["Happy", "happy", "sad", "joy", "day", "über_alles"]);
        assert_eq!(sanitize("  it's 9 o'clock "), "it s o clock");
    }

    #[test]
    fn sanitized_lines_keep_their_breaks() {
        let text = "id1 Happy, happy!\n\nid2 sad... 42\n";
        // digits are separators too, so ids lose their numbers
        assert_eq!(sanitize_lines(text), "id Happy happy\n\nid sad\n");
        assert_eq!(sanitize(text), "id Happy happy id sad");
    }

    #[test]
    fn raw_mode_splits_on_whitespace_only() {
        let t = Tokenizer::new(false);
        assert_eq!(t.tokens("Happy, happy!!\t42\n"), vec!["Happy,", "happy!!", "42"]);
        let config = Config::default().sanitize(false);
        let out = count("happy posemo\n", &config, "happy happy!");
        assert_eq!(out, vec![entry("posemo", Value::Count(1)), entry("total", Value::Count(2))]);
    }

    #[test]
    fn same_counts_with_and_without_cache() {
        let text = "the happy sad dog was happy and sad and the dog sat happily sadly";
        let dict = "happy posemo\nsad* negemo\nhapp* affect\n/^the$/ article\n";
        let with = count(dict, &Config::default(), text);
        let without = count(dict, &Config::default().cache_size(0), text);
        let tiny = count(dict, &Config::default().cache_size(2), text);
        assert_eq!(with, without);
        assert_eq!(with, tiny);
    }

    #[test]
    fn cache_stays_warm_across_texts() {
        let d = Dictionary::parse("happy posemo\n", None).unwrap();
        let mut agg = Aggregator::new(&d.rules, &Config::default());
        let first = agg.aggregate("happy day");
        let second = agg.aggregate("happy day");
        assert_eq!(first.count("posemo"), second.count("posemo"));
        assert_eq!(agg.classifier().stats().hits, 2);
        assert_eq!(agg.classifier().stats().misses, 2);
    }

    #[test]
    fn values_display() {
        assert_eq!(Value::Count(5).to_string(), "5");
        assert_eq!(Value::Percent(40.0).to_string(), "40.0");
        assert_eq!(Value::Percent(33.3).to_string(), "33.3");
    }

    #[test]
    fn human_counts() {
        assert_eq!(human_count(999), "999");
        assert_eq!(human_count(1234), "1.2k");
        assert_eq!(human_count(5600000), "5.6M");
    }
}
