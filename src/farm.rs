//! Faster (but not DoS-resistant) hashmap
//!
//! Dictionary words and ids come from researchers' own files, so there's nobody to defend against.
use farmhash;
use std::collections::HashMap;
use std::hash::{Hash, Hasher, BuildHasherDefault};

/// Streaming adapter over farmhash
///
/// farmhash isn't a streaming hash, so every write is folded into the state by using the
/// previous state as the seed. `str` writes its bytes and then a 0xff terminator, so both
/// have to land in the hash or every word would collide.
pub struct FarmHasher(u64);

impl Default for FarmHasher {
    #[inline]
    fn default() -> FarmHasher { FarmHasher(0) }
}

impl Hasher for FarmHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        self.0 = farmhash::hash64_with_seed(bytes, self.0);
    }
}

pub type Farm = BuildHasherDefault<FarmHasher>;
pub type FarmMap<X, Y> = HashMap<X, Y, Farm>;

pub fn new_farm<X: Hash+Eq, Y>() -> FarmMap<X, Y> {
    Default::default()
}

pub fn farm_with_capacity<X: Hash+Eq, Y>(capacity: usize) -> FarmMap<X, Y> {
    HashMap::with_capacity_and_hasher(capacity, Farm::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::hash::BuildHasher;

    fn hash_of(word: &str) -> u64 {
        let mut h = Farm::default().build_hasher();
        word.hash(&mut h);
        h.finish()
    }

    #[test]
    fn distinct_words_hash_apart() {
        assert_ne!(hash_of("happy"), hash_of("sad"));
        assert_ne!(hash_of("ab"), hash_of("a"));
        assert_eq!(hash_of("happy"), hash_of("happy"));
    }

    #[test]
    fn works_as_a_map() {
        let mut m: FarmMap<String, usize> = new_farm();
        m.insert("joy".to_string(), 1);
        m.insert("grief".to_string(), 2);
        assert_eq!(m.get("joy"), Some(&1));
        assert_eq!(m.get("grief"), Some(&2));
        assert_eq!(m.get("calm"), None);
    }
}
