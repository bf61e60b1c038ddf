//! Bounded word -> categories memo
//!
//! Classifying a word means trying every rule until one matches, which is the expensive part of a
//! run. Natural text repeats itself a lot, so the answer for each word is remembered here.
//!
//! The cache is bounded. When it is full and a new word arrives, one eviction pass drops every
//! entry that has been hit fewer times than the current threshold. The threshold starts at 1 (so
//! the first pass drops everything never seen twice) and goes up by one whenever a pass frees
//! less than 30% of the cache. Over a long run that keeps the words that keep coming back.
//!
//! The threshold has no ceiling. With enough distinct vocabulary it can climb until each pass
//! clears the cache completely.
use dictionary::Categories;
use farm::{FarmMap, farm_with_capacity};

/// A pass that frees less than this share of the cache raises the threshold
const MIN_EVICTION_RATIO: f64 = 0.3;

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub categories: Categories,
    pub hits: u64,
}

/// Bookkeeping for logging and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Eviction passes run
    pub passes: u64,
    /// Entries removed over all passes
    pub evicted: u64,
    /// New words turned away because a pass freed no room
    pub refused: u64,
}

#[derive(Debug, Clone)]
pub struct ClassificationCache {
    entries: FarmMap<String, CacheEntry>,
    max_size: usize,
    threshold: u64,
    stats: CacheStats,
}

impl ClassificationCache {
    /// A cache holding at most `max_size` words. Zero disables caching.
    pub fn new(max_size: usize) -> Self {
        ClassificationCache {
            // Don't reserve the whole thing up front, most texts never fill it
            entries: farm_with_capacity(::std::cmp::min(max_size, 1024)),
            max_size: max_size,
            threshold: 1,
            stats: CacheStats::default(),
        }
    }

    /// Cached categories of a word. `Some` of an empty list is a remembered non-match.
    pub fn get(&self, word: &str) -> Option<&Categories> {
        self.entries.get(word).map(|entry| &entry.categories)
    }

    /// Count a hit for a word, returns false if it isn't cached
    pub fn touch(&mut self, word: &str) -> bool {
        match self.entries.get_mut(word) {
            Some(entry) => {
                entry.hits += 1;
                true
            }
            None => false,
        }
    }

    /// Remember a word's categories, starting its hit count over
    pub fn record(&mut self, word: &str, categories: Categories) {
        if self.max_size == 0 {
            return;
        }
        if let Some(entry) = self.entries.get_mut(word) {
            entry.categories = categories;
            entry.hits = 0;
            return;
        }
        if self.entries.len() >= self.max_size {
            self.evict();
            if self.entries.len() >= self.max_size {
                self.stats.refused += 1;
                return;
            }
        }
        self.entries.insert(word.to_string(), CacheEntry { categories: categories, hits: 0 });
    }

    /// Run one eviction pass, returning how many entries it removed
    pub fn evict(&mut self) -> usize {
        let before = self.entries.len();
        if before == 0 {
            return 0;
        }
        let threshold = self.threshold;
        self.entries.retain(|_, entry| entry.hits >= threshold);
        let removed = before - self.entries.len();
        self.stats.passes += 1;
        self.stats.evicted += removed as u64;
        if (removed as f64) < before as f64 * MIN_EVICTION_RATIO {
            self.threshold = self.threshold.saturating_add(1);
            debug!("Eviction pass freed {} of {} words, raising the hit threshold to {}",
                removed, before, self.threshold);
        } else {
            debug!("Eviction pass freed {} of {} words", removed, before);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_size
    }

    /// Hits an entry needs to survive the next pass
    pub fn threshold(&self) -> u64 {
        self.threshold
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use dictionary::no_categories;

    fn cats(codes: &[&str]) -> Categories {
        Arc::from(codes.iter().map(|c| c.to_string()).collect::<Vec<_>>())
    }

    #[test]
    fn miss_hit_and_remembered_non_match() {
        let mut cache = ClassificationCache::new(10);
        assert!(cache.get("happy").is_none());
        cache.record("happy", cats(&["posemo"]));
        cache.record("table", no_categories());
        assert_eq!(&cache.get("happy").unwrap()[..], &["posemo".to_string()][..]);
        let table = cache.get("table").expect("non-matches are cached too");
        assert!(table.is_empty());
        assert!(cache.touch("table"));
        assert!(!cache.touch("chair"));
    }

    #[test]
    fn record_overwrites_and_resets_hits() {
        let mut cache = ClassificationCache::new(2);
        cache.record("happy", cats(&["posemo"]));
        cache.touch("happy");
        cache.touch("happy");
        cache.record("happy", cats(&["affect"]));
        assert_eq!(cache.len(), 1);
        assert_eq!(&cache.get("happy").unwrap()[..], &["affect".to_string()][..]);
        // fresh hit count, so the first pass drops it
        assert_eq!(cache.evict(), 1);
    }

    #[test]
    fn capacity_one_evicts_before_each_new_word() {
        let mut cache = ClassificationCache::new(1);
        cache.record("one", no_categories());
        cache.record("two", no_categories());
        assert_eq!(cache.stats().passes, 1);
        cache.record("three", no_categories());
        assert_eq!(cache.stats().passes, 2);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("three").is_some());
        assert_eq!(cache.threshold(), 1);
    }

    #[test]
    fn frequent_words_survive_a_pass() {
        let mut cache = ClassificationCache::new(4);
        for word in &["a", "b", "c", "d"] {
            cache.record(word, no_categories());
        }
        cache.touch("a");
        cache.touch("c");
        cache.record("e", no_categories());
        assert!(cache.get("a").is_some());
        assert!(cache.get("c").is_some());
        assert!(cache.get("b").is_none());
        assert!(cache.get("d").is_none());
        assert!(cache.get("e").is_some());
        // half the cache went, no reason to get stricter
        assert_eq!(cache.threshold(), 1);
    }

    #[test]
    fn threshold_rises_when_passes_free_little() {
        let mut cache = ClassificationCache::new(3);
        for word in &["a", "b", "c"] {
            cache.record(word, no_categories());
            cache.touch(word);
        }
        cache.record("d", no_categories());
        assert_eq!(cache.threshold(), 2);
        // nothing could be freed so the new word was turned away
        assert!(cache.get("d").is_none());
        assert_eq!(cache.stats().refused, 1);
        assert_eq!(cache.len(), 3);

        cache.record("e", no_categories());
        assert_eq!(cache.len(), 1);
        assert!(cache.get("e").is_some());
        assert_eq!(cache.threshold(), 2);
        assert_eq!(cache.stats().evicted, 3);
    }

    #[test]
    fn size_never_exceeds_capacity() {
        let mut cache = ClassificationCache::new(16);
        for i in 0..500u32 {
            let word = format!("w{}", i % 37);
            if cache.get(&word).is_some() {
                cache.touch(&word);
            } else {
                cache.record(&word, no_categories());
            }
            assert!(cache.len() <= cache.capacity());
        }
        assert!(cache.stats().passes > 0);
    }

    #[test]
    fn evicting_empty_cache_is_a_no_op() {
        let mut cache = ClassificationCache::new(5);
        assert_eq!(cache.evict(), 0);
        assert_eq!(cache.threshold(), 1);
        assert_eq!(cache.stats(), CacheStats::default());
    }

    #[test]
    fn zero_capacity_disables_caching() {
        let mut cache = ClassificationCache::new(0);
        cache.record("happy", cats(&["posemo"]));
        assert!(cache.is_empty());
        assert!(cache.get("happy").is_none());
    }
}
