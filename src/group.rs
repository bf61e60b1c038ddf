//! Line-based input: every line starts with an id, and each id gets its own tally
//!
//! ```text
//! alice happy day
//! bob   sad news
//! alice more happy words
//! ```
//!
//! gives `alice` -> "happy day more happy words" and `bob` -> "sad news".
use std::fs::File;
use std::io::Read;
use std::path::Path;
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use aggregate::{sanitize, Aggregator, Tally};
use config::Config;
use dictionary::RuleSet;
use errors::*;
use farm::{FarmMap, new_farm};

/// All text seen for one id, in input order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdGroup {
    pub id: String,
    pub text: String,
}

/// Gather lines by their leading id, ids in order of first appearance
///
/// Lines without at least an id and one word contribute nothing.
pub fn group<I, S>(lines: I) -> Vec<IdGroup>
    where I: IntoIterator<Item = S>, S: AsRef<str> {
    let mut groups: Vec<IdGroup> = vec![];
    let mut index: FarmMap<String, usize> = new_farm();
    for line in lines {
        let mut parts = line.as_ref().split_whitespace();
        let id = match parts.next() {
            Some(id) => id,
            None => continue,
        };
        let rest = parts.collect::<Vec<_>>();
        if rest.is_empty() {
            continue;
        }
        let text = rest.join(" ");
        match index.get(id) {
            Some(&i) => {
                let group = &mut groups[i];
                group.text.push(' ');
                group.text.push_str(&text);
            }
            None => {
                index.insert(id.to_string(), groups.len());
                groups.push(IdGroup { id: id.to_string(), text: text });
            }
        }
    }
    debug!("Grouped input into {} ids", groups.len());
    groups
}

/// Count every group, in group order
///
/// With one job a single aggregator, and so a single cache, serves every id. With more, the
/// groups are spread over a thread pool and each worker keeps a private cache. Either way the
/// tallies are the same.
pub fn count_groups(rules: &RuleSet, groups: &[IdGroup], config: &Config) -> Result<Vec<(String, Tally)>> {
    if config.jobs <= 1 {
        let mut aggregator = Aggregator::new(rules, config);
        return Ok(groups.iter()
            .map(|g| {
                debug!("Counting id {:?}", g.id);
                (g.id.clone(), aggregator.aggregate(&g.text))
            })
            .collect());
    }

    let pool = ThreadPoolBuilder::new()
        .num_threads(config.jobs)
        .build()
        .map_err(|e| Error::Other(format!("Could not start {} workers: {}", config.jobs, e)))?;
    info!("Counting {} ids on {} workers", groups.len(), config.jobs);
    Ok(pool.install(|| {
        groups.par_iter()
            .map_init(|| Aggregator::new(rules, config),
                      |aggregator, g| (g.id.clone(), aggregator.aggregate(&g.text)))
            .collect()
    }))
}

/// Group lines by id and count each id
pub fn count_lines<I, S>(rules: &RuleSet, lines: I, config: &Config) -> Result<Vec<(String, Tally)>>
    where I: IntoIterator<Item = S>, S: AsRef<str> {
    count_groups(rules, &group(lines), config)
}

/// Id for a whole file in line-based input: its name, without directories or whitespace
pub fn file_id<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref().to_string_lossy();
    // Windows separators too, whatever platform made the list
    let name = path.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or("");
    name.chars().filter(|c| !c.is_whitespace()).collect()
}

/// A whole text as one line of line-based input
pub fn combine_line(id: &str, text: &str) -> String {
    format!("{} {}", id, sanitize(text))
}

/// Turn every file into one `id text` line, in the order given
pub fn combine<P: AsRef<Path>>(paths: &[P]) -> Result<String> {
    let mut out = String::new();
    for path in paths {
        let path = path.as_ref();
        let mut text = String::new();
        File::open(path)
            .map_err(|e| Error::Other(format!("Input file {} is not readable: {}", path.display(), e)))?
            .read_to_string(&mut text)?;
        let id = file_id(path);
        if id.is_empty() {
            warn!("{} gives an empty id, skipping it", path.display());
            continue;
        }
        out.push_str(&combine_line(&id, &text));
        out.push('\n');
    }
    debug!("Combined {} files", paths.len());
    Ok(out)
}
