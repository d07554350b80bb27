//! Word-list loading and dictionary pattern detection.
//!
//! Builds dictionary finders from either the bundled in-memory word list or a
//! directory of word-list files, one word per line.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::pattern::{MatchCollection, PatternCategory, PatternFinder, PatternMatch};

#[derive(Error, Debug)]
pub enum WordlistError {
    #[error("word list directory not found: {0}")]
    DirectoryNotFound(PathBuf),
    #[error("failed to read word list: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("word list {0:?} is empty")]
    EmptyList(String),
}

/// Words shorter than this are not worth reporting as dictionary patterns.
const MIN_WORD_LENGTH: usize = 3;

const DEFAULT_LIST_NAME: &str = "common";

/// Small bundled list of very common passwords and base words, used when the
/// caller opts into in-memory resources.
const DEFAULT_WORDS: &str = "\
password\nletmein\nwelcome\nmonkey\ndragon\nmaster\nshadow\nsunshine\n\
princess\nfootball\nbaseball\nsoccer\nhockey\nbatman\nsuperman\ntrustno1\n\
iloveyou\nstarwars\nwhatever\nfreedom\ncomputer\ninternet\nsummer\nwinter\n\
spring\nautumn\nlove\nangel\nflower\ntiger\neagle\nsilver\ngolden\npurple\n\
orange\nyellow\nsecret\nmagic\nmoney\nhappy\npepper\ncookie\ncoffee\nbanana\n\
cheese\nginger\nchicken\nturtle\nrabbit\nkiller\nsoldier\nhunter\nranger\n\
guitar\npiano\nmusic\ndancer\nplayer\nwizard\nknight\nqueen\nking\nprince\n\
jordan\ncharlie\nthomas\nrobert\ndaniel\nandrew\njoshua\nmatthew\nanthony\n\
michael\njessica\nashley\namanda\nnicole\nmichelle\nmelissa\nhannah\n";

/// Finds list words appearing anywhere in the password, case-insensitively.
/// Each occurrence of each word is reported as its own candidate; overlaps
/// are left for the optimizer.
#[derive(Debug)]
pub struct DictionaryFinder {
    name: String,
    words: HashSet<String>,
    max_word_length: usize,
}

impl DictionaryFinder {
    pub fn new(name: impl Into<String>, words: impl IntoIterator<Item = String>) -> Self {
        let words: HashSet<String> = words
            .into_iter()
            .map(|w| w.trim().to_lowercase())
            .filter(|w| w.chars().count() >= MIN_WORD_LENGTH)
            .collect();
        let max_word_length = words.iter().map(|w| w.chars().count()).max().unwrap_or(0);
        Self {
            name: name.into(),
            words,
            max_word_length,
        }
    }

    fn from_text(name: impl Into<String>, text: &str) -> Self {
        Self::new(name, text.lines().map(str::to_string))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }
}

impl PatternFinder for DictionaryFinder {
    fn search<'p>(&self, password: &'p str) -> MatchCollection<'p> {
        let mut patterns = MatchCollection::new(password);
        if self.words.is_empty() {
            return patterns;
        }
        let original: Vec<char> = password.chars().collect();
        let folded: Vec<char> = original
            .iter()
            .map(|c| c.to_lowercase().next().unwrap_or(*c))
            .collect();
        // every word in the list stands for any word in the list: the guess
        // space of a dictionary hit is the list size
        let weight = self.words.len() as f64;
        for start in 0..folded.len() {
            let longest = self.max_word_length.min(folded.len() - start);
            for length in MIN_WORD_LENGTH..=longest {
                let candidate: String = folded[start..start + length].iter().collect();
                if self.words.contains(&candidate) {
                    let text: String = original[start..start + length].iter().collect();
                    patterns.add(PatternMatch::new(
                        start,
                        length,
                        text,
                        weight,
                        PatternCategory::Dictionary,
                        format!("Word from the {} list", self.name),
                        self.name.clone(),
                    ));
                }
            }
        }
        patterns
    }
}

/// Returns the word-list directory from `PWD_WORDLIST_DIR`, if set.
pub fn wordlist_dir_from_env() -> Option<PathBuf> {
    std::env::var("PWD_WORDLIST_DIR").map(PathBuf::from).ok()
}

/// Builds dictionary finders from configured sources.
///
/// Recognized options mirror the word-list collaborator contract: in-memory
/// resources, a directory of word-list files, and the bundled default lists.
#[derive(Debug, Default)]
pub struct FinderBuilder {
    in_memory: bool,
    file_source: Option<PathBuf>,
    load_default: bool,
}

impl FinderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve word lists from in-memory resources instead of files.
    pub fn in_memory(mut self, in_memory: bool) -> Self {
        self.in_memory = in_memory;
        self
    }

    /// Load every `.txt` word list from a directory.
    pub fn file_source(mut self, directory: impl Into<PathBuf>) -> Self {
        self.file_source = Some(directory.into());
        self
    }

    /// Include the bundled default word lists.
    pub fn load_default_word_lists(mut self) -> Self {
        self.load_default = true;
        self
    }

    /// Builds one finder per word list, each tagged with its list name.
    ///
    /// With no explicit file source and no in-memory request, the
    /// `PWD_WORDLIST_DIR` environment variable is consulted.
    pub fn build(self) -> Result<Vec<Box<dyn PatternFinder>>, WordlistError> {
        let mut finders: Vec<Box<dyn PatternFinder>> = Vec::new();

        if self.load_default || self.in_memory {
            finders.push(Box::new(DictionaryFinder::from_text(
                DEFAULT_LIST_NAME,
                DEFAULT_WORDS,
            )));
        }

        let directory = self.file_source.or_else(|| {
            if self.in_memory {
                None
            } else {
                wordlist_dir_from_env()
            }
        });
        if let Some(directory) = directory {
            for finder in load_directory(&directory)? {
                finders.push(Box::new(finder));
            }
        }

        #[cfg(feature = "tracing")]
        tracing::info!("built {} dictionary finders", finders.len());

        Ok(finders)
    }
}

fn load_directory(directory: &Path) -> Result<Vec<DictionaryFinder>, WordlistError> {
    if !directory.is_dir() {
        #[cfg(feature = "tracing")]
        tracing::error!("word list directory not found: {}", directory.display());
        return Err(WordlistError::DirectoryNotFound(directory.to_path_buf()));
    }

    let mut paths: Vec<PathBuf> = std::fs::read_dir(directory)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "txt"))
        .collect();
    // deterministic finder order regardless of directory iteration order
    paths.sort();

    let mut finders = Vec::new();
    for path in paths {
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "wordlist".to_string());
        let content = std::fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Err(WordlistError::EmptyList(name));
        }
        finders.push(DictionaryFinder::from_text(name, &content));
    }
    Ok(finders)
}
