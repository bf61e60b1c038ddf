//! Word -> categories, first matching rule wins
use cache::ClassificationCache;
use dictionary::{Categories, RuleSet, no_categories};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifierStats {
    pub hits: u64,
    pub misses: u64,
}

/// Resolves words against a rule set, remembering answers in a cache
///
/// Only the earliest rule that accepts a word counts, even if later rules would match too. A
/// dictionary that wants a word in two categories lists both on one rule.
pub struct Classifier<'r> {
    rules: &'r RuleSet,
    cache: ClassificationCache,
    trace: Option<Box<dyn FnMut(&str, &str) + 'r>>,
    empty: Categories,
    stats: ClassifierStats,
}

impl<'r> Classifier<'r> {
    pub fn new(rules: &'r RuleSet, cache_size: usize) -> Self {
        Classifier::with_cache(rules, ClassificationCache::new(cache_size))
    }

    pub fn with_cache(rules: &'r RuleSet, cache: ClassificationCache) -> Self {
        Classifier {
            rules: rules,
            cache: cache,
            trace: None,
            empty: no_categories(),
            stats: ClassifierStats::default(),
        }
    }

    /// Call `f(word, category)` for every category a word is counted under
    pub fn set_trace<F>(&mut self, f: F) where F: FnMut(&str, &str) + 'r {
        self.trace = Some(Box::new(f));
    }

    /// Categories of one word, empty if no rule matches
    pub fn classify(&mut self, word: &str) -> Categories {
        let cached = self.cache.get(word).cloned();
        let categories = match cached {
            Some(categories) => {
                self.cache.touch(word);
                self.stats.hits += 1;
                categories
            }
            None => {
                self.stats.misses += 1;
                let categories = match self.rules.first_match(word) {
                    Some(rule) => rule.categories.clone(),
                    None => self.empty.clone(),
                };
                self.cache.record(word, categories.clone());
                categories
            }
        };
        if let Some(ref mut trace) = self.trace {
            for category in categories.iter() {
                trace(word, category.as_str());
            }
        }
        categories
    }

    pub fn rules(&self) -> &'r RuleSet {
        self.rules
    }

    pub fn cache(&self) -> &ClassificationCache {
        &self.cache
    }

    pub fn stats(&self) -> ClassifierStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dictionary::Dictionary;

    fn dict(text: &str) -> Dictionary {
        Dictionary::parse(text, None).unwrap()
    }

    fn codes(categories: &Categories) -> Vec<String> {
        categories.to_vec()
    }

    #[test]
    fn first_matching_rule_wins() {
        let d = dict("happy posemo\nhapp* affect\n/ness$/ suffix\n");
        let mut c = Classifier::new(&d.rules, 100);
        assert_eq!(codes(&c.classify("happy")), vec!["posemo"]);
        assert_eq!(codes(&c.classify("happen")), vec!["affect"]);
        // "happiness" matches both happ* and /ness$/ but only the earlier rule counts
        assert_eq!(codes(&c.classify("happiness")), vec!["affect"]);
        assert_eq!(codes(&c.classify("kindness")), vec!["suffix"]);
        assert!(c.classify("table").is_empty());
    }

    #[test]
    fn repeated_words_come_from_the_cache() {
        let d = dict("sad* negemo\n");
        let mut c = Classifier::new(&d.rules, 100);
        c.classify("sad");
        c.classify("sad");
        c.classify("chair");
        c.classify("chair");
        assert_eq!(c.stats(), ClassifierStats { hits: 2, misses: 2 });
        assert_eq!(c.cache().len(), 2);
    }

    #[test]
    fn cache_does_not_change_answers() {
        let d = dict("happy posemo\nhapp* affect\nsad* negemo\n");
        let words = ["happy", "sad", "happen", "Happy", "sadness", "chair", "happy", "chair"];
        let mut cold = Classifier::new(&d.rules, 0);
        let mut tiny = Classifier::new(&d.rules, 1);
        let mut warm = Classifier::new(&d.rules, 1000);
        for word in words.iter() {
            let expected = codes(&cold.classify(word));
            assert_eq!(codes(&tiny.classify(word)), expected, "{}", word);
            assert_eq!(codes(&warm.classify(word)), expected, "{}", word);
        }
        assert_eq!(cold.stats().hits, 0);
        assert!(warm.stats().hits > 0);
    }

    #[test]
    fn trace_sees_every_counted_category() {
        let d = dict("grief negemo sad\nhappy posemo\n");
        let mut seen = vec![];
        {
            let mut c = Classifier::new(&d.rules, 10);
            c.set_trace(|word, category| seen.push(format!("{} matches {}", word, category)));
            c.classify("grief");
            c.classify("table");
            c.classify("grief");
        }
        assert_eq!(seen, vec![
            "grief matches negemo",
            "grief matches sad",
            "grief matches negemo",
            "grief matches sad",
        ]);
    }
}
