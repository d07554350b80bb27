//! Password analysis orchestration: runs finders, merges their candidates,
//! and hands the union to the path optimizer.

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

#[cfg(feature = "async")]
use tokio::sync::mpsc;

#[cfg(feature = "async")]
use tokio_util::sync::CancellationToken;

use crate::analysis::{AnalysisResult, PatternError};
use crate::optimizer;
use crate::pattern::{MatchCollection, PatternFinder};

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("analysis cancelled")]
    Cancelled,
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

/// Runs a set of pattern finders over a password and reconciles their
/// candidate matches into the cheapest decomposition.
///
/// Finders are pure and share nothing mutable, so the analyzer may be shared
/// across threads; each analysis owns its intermediate collections.
pub struct PasswordAnalyzer {
    finders: Vec<Box<dyn PatternFinder>>,
}

impl PasswordAnalyzer {
    pub fn new() -> Self {
        Self {
            finders: Vec::new(),
        }
    }

    pub fn with_finder(mut self, finder: Box<dyn PatternFinder>) -> Self {
        self.finders.push(finder);
        self
    }

    pub fn with_finders(mut self, finders: impl IntoIterator<Item = Box<dyn PatternFinder>>) -> Self {
        self.finders.extend(finders);
        self
    }

    pub fn finder_count(&self) -> usize {
        self.finders.len()
    }

    /// Analyzes a password and returns its cheapest decomposition.
    ///
    /// # Arguments
    /// * `password` - The password to analyze
    /// * `token` - Optional cancellation token (async feature only), checked
    ///   between finder runs
    pub fn analyze(
        &self,
        password: &SecretString,
        #[cfg(feature = "async")] token: Option<CancellationToken>,
    ) -> Result<AnalysisResult, AnalysisError> {
        let pwd = password.expose_secret();
        let mut merged = MatchCollection::new(pwd);

        for finder in &self.finders {
            #[cfg(feature = "async")]
            {
                if let Some(ref t) = token {
                    if t.is_cancelled() {
                        #[cfg(feature = "tracing")]
                        tracing::info!("password analysis cancelled");
                        return Err(AnalysisError::Cancelled);
                    }
                }
            }
            merged.merge(finder.search(pwd));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(candidates = merged.len(), "running path optimizer");

        let result = optimizer::optimize(&merged)?;
        Ok(result)
    }
}

impl Default for PasswordAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Async version that sends the analysis result via channel.
#[cfg(feature = "async")]
pub async fn analyze_tx(
    analyzer: &PasswordAnalyzer,
    password: &SecretString,
    token: CancellationToken,
    tx: mpsc::Sender<Result<AnalysisResult, AnalysisError>>,
) {
    use std::time::Duration;

    #[cfg(feature = "tracing")]
    tracing::info!("analysis is about to start...");

    // debounce rapid re-analysis from interactive callers
    tokio::time::sleep(Duration::from_millis(300)).await;
    let result = analyzer.analyze(password, Some(token));

    if tx.send(result).await.is_err() {
        #[cfg(feature = "tracing")]
        tracing::error!("failed to send analysis result: receiver dropped");
    }
}
