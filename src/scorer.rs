//! Strength scorer - the asynchronous engine that rates a password.

use std::future::Future;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use zxcvbn::{Score, zxcvbn};

use crate::score::StrengthScore;

#[derive(Error, Debug)]
pub enum ScorerError {
    #[error("Scoring task failed: {0}")]
    TaskFailed(String),
    #[error("Scorer rejected the password: {0}")]
    Rejected(String),
}

/// Asynchronous password scorer.
///
/// Implementations must tolerate concurrent calls.
pub trait StrengthScorer: Send + Sync {
    fn score(
        &self,
        password: &SecretString,
    ) -> impl Future<Output = Result<StrengthScore, ScorerError>> + Send;
}

impl<S: StrengthScorer> StrengthScorer for Arc<S> {
    fn score(
        &self,
        password: &SecretString,
    ) -> impl Future<Output = Result<StrengthScore, ScorerError>> + Send {
        (**self).score(password)
    }
}

/// Scorer backed by the `zxcvbn` pattern and dictionary analysis.
#[derive(Debug, Clone, Default)]
pub struct ZxcvbnScorer {
    user_inputs: Arc<[String]>,
}

impl ZxcvbnScorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds words (user name, site name...) that should count as guessable.
    pub fn with_user_inputs<I, W>(inputs: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: Into<String>,
    {
        Self {
            user_inputs: inputs.into_iter().map(Into::into).collect(),
        }
    }

    fn score_blocking(password: &str, user_inputs: &[String]) -> StrengthScore {
        let inputs: Vec<&str> = user_inputs.iter().map(String::as_str).collect();
        let value = match zxcvbn(password, &inputs).score() {
            Score::Zero => 0,
            Score::One => 1,
            Score::Two => 2,
            Score::Three => 3,
            Score::Four => 4,
            _ => 0,
        };
        StrengthScore::new(value)
    }
}

impl StrengthScorer for ZxcvbnScorer {
    async fn score(&self, password: &SecretString) -> Result<StrengthScore, ScorerError> {
        let pwd = password.expose_secret().to_owned();
        if pwd.is_empty() {
            return Ok(StrengthScore::new(0));
        }

        // zxcvbn is CPU bound; keep it off the event loop.
        #[cfg(feature = "async")]
        let score = {
            let user_inputs = Arc::clone(&self.user_inputs);
            tokio::task::spawn_blocking(move || Self::score_blocking(&pwd, &user_inputs))
                .await
                .map_err(|e| ScorerError::TaskFailed(e.to_string()))?
        };

        #[cfg(not(feature = "async"))]
        let score = Self::score_blocking(&pwd, &self.user_inputs);

        #[cfg(feature = "tracing")]
        tracing::trace!("zxcvbn scored {} chars as {}", password.expose_secret().len(), score);

        Ok(score)
    }
}
