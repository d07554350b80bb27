//! Password pattern decomposition and guess-space estimation
//!
//! This library decomposes a password into recognizable substructures
//! (keyboard sequences, dates, dictionary words, random filler) and computes
//! the size of the brute-force search space implied by the cheapest such
//! decomposition: a deterministic, explainable strength estimate rather than
//! a black-box score.
//!
//! # Features
//!
//! - `async` (default): Enables async analysis with cancellation support
//! - `tracing`: Enables logging via tracing crate
//!
//! # Environment Variables
//!
//! - `PWD_WORDLIST_DIR`: Directory of `.txt` word lists for dictionary
//!   finders (used when no explicit source is configured)
//!
//! # Example
//!
//! ```rust,no_run
//! use pwd_patterns::{DateFinder, FinderBuilder, PasswordAnalyzer};
//! use secrecy::SecretString;
//!
//! let mut analyzer = PasswordAnalyzer::new().with_finder(Box::new(DateFinder));
//! let wordlists = FinderBuilder::new()
//!     .in_memory(true)
//!     .load_default_word_lists()
//!     .build()
//!     .expect("Failed to load word lists");
//! analyzer = analyzer.with_finders(wordlists);
//!
//! let password = SecretString::new("summer-1999".to_string().into());
//! let result = analyzer.analyze(&password, None).expect("Failed to analyze");
//!
//! println!("total guesses: {}", result.total_cost());
//! for pattern in result.path() {
//!     println!("{}: {} ({})", pattern.category(), pattern.text(), pattern.description());
//! }
//! ```

// Internal modules
mod analysis;
mod analyzer;
mod date;
mod keyboard;
mod optimizer;
mod pattern;
mod random;
mod wordlist;

// Public API
pub use analysis::{AnalysisResult, PatternError};
pub use analyzer::{AnalysisError, PasswordAnalyzer};
pub use date::DateFinder;
pub use keyboard::{Direction, Key, KeyboardLayout, KeyboardLayoutBuilder, KeySequenceFinder};
pub use optimizer::optimize;
pub use pattern::{MatchCollection, PatternCategory, PatternFinder, PatternMatch};
pub use random::{
    alphabet_size, lower_case_cost, mixed_case_cost, random_match, run_cost, ClassSet,
    RandomClass, RandomFinder, RANDOM_CLASSES,
};
pub use wordlist::{wordlist_dir_from_env, DictionaryFinder, FinderBuilder, WordlistError};

#[cfg(feature = "async")]
pub use analyzer::analyze_tx;
