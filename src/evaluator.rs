//! Strength evaluator - keeps the published score in step with the current password.
//!
//! Password changes are debounced before reaching the scorer, and a score
//! is only published if its password is still current when scoring ends.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::debounce::Debouncer;
use crate::score::StrengthScore;
use crate::scorer::{ScorerError, StrengthScorer};

/// What happened to one evaluation.
#[derive(Debug)]
pub enum EvaluationOutcome {
    /// Published as the current score.
    Committed(StrengthScore),
    /// Password was superseded before scoring finished; result discarded.
    Stale(StrengthScore),
    /// Scorer failed; the published score is cleared if the password is
    /// still current.
    Failed(ScorerError),
    /// Evaluator was shut down before scoring finished.
    Cancelled,
}

impl EvaluationOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, EvaluationOutcome::Committed(_))
    }
}

struct Shared<S> {
    scorer: S,
    current: Mutex<SecretString>,
    score_tx: watch::Sender<Option<StrengthScore>>,
    token: CancellationToken,
}

fn copy_secret(secret: &SecretString) -> SecretString {
    SecretString::new(secret.expose_secret().into())
}

impl<S: StrengthScorer> Shared<S> {
    fn lock_current(&self) -> MutexGuard<'_, SecretString> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_current(&self, password: &SecretString) -> bool {
        self.lock_current().expose_secret() == password.expose_secret()
    }

    async fn evaluate(&self, password: &SecretString) -> EvaluationOutcome {
        if self.token.is_cancelled() {
            return EvaluationOutcome::Cancelled;
        }

        let result = self.scorer.score(password).await;

        if self.token.is_cancelled() {
            #[cfg(feature = "tracing")]
            tracing::debug!("evaluator shut down while scoring, result dropped");
            return EvaluationOutcome::Cancelled;
        }

        // Held until the score is published so a concurrent password change
        // cannot slip between the comparison and the publish.
        let current = self.lock_current();
        let is_current = current.expose_secret() == password.expose_secret();

        match result {
            Ok(score) if is_current => {
                self.score_tx.send_replace(Some(score));
                #[cfg(feature = "tracing")]
                tracing::debug!("published strength score {}", score);
                EvaluationOutcome::Committed(score)
            }
            Ok(score) => {
                #[cfg(feature = "tracing")]
                tracing::debug!("discarding stale strength score {}", score);
                EvaluationOutcome::Stale(score)
            }
            Err(e) => {
                if is_current {
                    self.score_tx.send_replace(None);
                }
                #[cfg(feature = "tracing")]
                tracing::warn!("password scoring failed: {}", e);
                EvaluationOutcome::Failed(e)
            }
        }
    }
}

/// Publishes the latest strength score of the tracked password.
///
/// Must be created inside a tokio runtime. Dropping it shuts it down.
pub struct StrengthEvaluator<S> {
    shared: Arc<Shared<S>>,
    debouncer: Debouncer,
}

impl<S: StrengthScorer + 'static> StrengthEvaluator<S> {
    /// Starts tracking `initial` and scores it right away, without debounce.
    pub fn start(scorer: S, initial: SecretString, quiet_period: Duration) -> Self {
        let (score_tx, _) = watch::channel(None);
        let shared = Arc::new(Shared {
            scorer,
            current: Mutex::new(copy_secret(&initial)),
            score_tx,
            token: CancellationToken::new(),
        });

        let task_shared = Arc::clone(&shared);
        tokio::spawn(async move {
            #[cfg(feature = "tracing")]
            tracing::info!("initial evaluation is about to start...");
            task_shared.evaluate(&initial).await;
        });

        Self {
            shared,
            debouncer: Debouncer::new(quiet_period),
        }
    }

    /// Makes `password` current and schedules its debounced evaluation.
    pub fn on_password_changed(&self, password: SecretString) {
        if self.shared.token.is_cancelled() {
            return;
        }
        *self.shared.lock_current() = copy_secret(&password);

        let shared = Arc::clone(&self.shared);
        self.debouncer.schedule(async move {
            shared.evaluate(&password).await;
        });
    }

    /// Scores `password` immediately.
    ///
    /// The score is published only if `password` is still the tracked
    /// password when the scorer returns.
    pub async fn evaluate_now(&self, password: &SecretString) -> EvaluationOutcome {
        self.shared.evaluate(password).await
    }

    /// Latest published score, `None` until a first evaluation commits.
    pub fn score(&self) -> Option<StrengthScore> {
        *self.shared.score_tx.borrow()
    }

    /// Receiver notified on every published score.
    pub fn subscribe(&self) -> watch::Receiver<Option<StrengthScore>> {
        self.shared.score_tx.subscribe()
    }

    pub fn is_current(&self, password: &SecretString) -> bool {
        self.shared.is_current(password)
    }

    pub fn quiet_period(&self) -> Duration {
        self.debouncer.quiet_period()
    }

    /// Stops pending timers and prevents in-flight evaluations from publishing.
    pub fn shutdown(&self) {
        if !self.shared.token.is_cancelled() {
            #[cfg(feature = "tracing")]
            tracing::debug!("strength evaluator shutting down");
            self.shared.token.cancel();
        }
        self.debouncer.dispose();
    }

    pub fn is_shut_down(&self) -> bool {
        self.shared.token.is_cancelled()
    }
}

impl<S> Drop for StrengthEvaluator<S> {
    fn drop(&mut self) {
        self.shared.token.cancel();
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{ScriptedScorer, secret};
    use super::*;
    use tokio::time::sleep;

    const QUIET: Duration = Duration::from_millis(300);

    #[tokio::test(start_paused = true)]
    async fn test_initial_evaluation_runs_immediately() {
        let scorer = ScriptedScorer::new();
        scorer.script("first", 2, Duration::from_millis(5));

        let evaluator = StrengthEvaluator::start(Arc::clone(&scorer), secret("first"), QUIET);
        assert_eq!(evaluator.score(), None);

        sleep(Duration::from_millis(10)).await;
        assert_eq!(evaluator.score(), Some(StrengthScore::new(2)));
        assert_eq!(scorer.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_keystrokes_are_debounced() {
        let scorer = ScriptedScorer::new();
        scorer.script("hunter2!", 3, Duration::from_millis(5));
        let evaluator = StrengthEvaluator::start(Arc::clone(&scorer), secret(""), QUIET);
        sleep(Duration::from_millis(50)).await;

        for typed in ["h", "hu", "hun", "hunt", "hunte", "hunter", "hunter2", "hunter2!"] {
            evaluator.on_password_changed(secret(typed));
            sleep(Duration::from_millis(80)).await;
        }
        sleep(QUIET * 2).await;

        assert_eq!(scorer.seen(), vec!["".to_string(), "hunter2!".to_string()]);
        assert_eq!(evaluator.score(), Some(StrengthScore::new(3)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_result_is_discarded() {
        let scorer = ScriptedScorer::new();
        scorer.script("p0", 0, Duration::from_millis(1));
        scorer.script("p1", 1, Duration::from_millis(800));
        scorer.script("p2", 4, Duration::from_millis(10));
        let evaluator = StrengthEvaluator::start(Arc::clone(&scorer), secret("p0"), QUIET);

        evaluator.on_password_changed(secret("p1"));
        // p1 is now being scored and will finish last.
        sleep(QUIET + Duration::from_millis(50)).await;
        evaluator.on_password_changed(secret("p2"));

        sleep(Duration::from_secs(2)).await;
        assert_eq!(scorer.seen(), vec!["p0", "p1", "p2"]);
        assert_eq!(evaluator.score(), Some(StrengthScore::new(4)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_evaluate_now_outcomes() {
        let scorer = ScriptedScorer::new();
        scorer.script("current", 3, Duration::from_millis(1));
        scorer.script("other", 1, Duration::from_millis(1));
        let evaluator = StrengthEvaluator::start(Arc::clone(&scorer), secret("current"), QUIET);

        let outcome = evaluator.evaluate_now(&secret("other")).await;
        assert!(matches!(outcome, EvaluationOutcome::Stale(s) if s.value() == 1));

        let outcome = evaluator.evaluate_now(&secret("current")).await;
        assert!(outcome.is_committed());
        assert_eq!(evaluator.score(), Some(StrengthScore::new(3)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_scorer_failure_clears_score_of_current_password() {
        let scorer = ScriptedScorer::new();
        scorer.script("good", 2, Duration::from_millis(1));
        scorer.fail_on("broken");
        let evaluator = StrengthEvaluator::start(Arc::clone(&scorer), secret("good"), QUIET);
        sleep(Duration::from_millis(10)).await;
        assert_eq!(evaluator.score(), Some(StrengthScore::new(2)));

        evaluator.on_password_changed(secret("broken"));
        sleep(Duration::from_secs(1)).await;
        assert_eq!(evaluator.score(), None);

        let outcome = evaluator.evaluate_now(&secret("broken")).await;
        assert!(matches!(outcome, EvaluationOutcome::Failed(_)));
        assert_eq!(evaluator.score(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scorer_failure_for_superseded_password_changes_nothing() {
        let scorer = ScriptedScorer::new();
        scorer.script("good", 2, Duration::from_millis(1));
        scorer.fail_on("broken");
        let evaluator = StrengthEvaluator::start(Arc::clone(&scorer), secret("good"), QUIET);
        sleep(Duration::from_millis(10)).await;

        let outcome = evaluator.evaluate_now(&secret("broken")).await;
        assert!(matches!(outcome, EvaluationOutcome::Failed(_)));
        assert_eq!(evaluator.score(), Some(StrengthScore::new(2)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_published_score_follows_last_password_across_threads() {
        let scorer = ScriptedScorer::new();
        for round in 0..200u32 {
            let pwd = format!("pwd-{round}");
            scorer.script(&pwd, (round % 5) as u8, Duration::ZERO);
        }
        let evaluator = Arc::new(StrengthEvaluator::start(
            Arc::clone(&scorer),
            secret("pwd-0"),
            Duration::from_secs(3600),
        ));

        for round in 1..200u32 {
            let previous = secret(&format!("pwd-{}", round - 1));
            let next = format!("pwd-{round}");

            let stale = {
                let evaluator = Arc::clone(&evaluator);
                tokio::spawn(async move { evaluator.evaluate_now(&previous).await })
            };
            evaluator.on_password_changed(secret(&next));
            let fresh = evaluator.evaluate_now(&secret(&next)).await;
            stale.await.unwrap();

            assert!(fresh.is_committed(), "round {round}");
            assert_eq!(
                evaluator.score(),
                Some(StrengthScore::new((round % 5) as u8)),
                "round {round}"
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_blocks_in_flight_and_pending_work() {
        let scorer = ScriptedScorer::new();
        scorer.script("slow", 4, Duration::from_millis(500));
        let evaluator = StrengthEvaluator::start(Arc::clone(&scorer), secret("slow"), QUIET);

        evaluator.on_password_changed(secret("slow"));
        sleep(Duration::from_millis(10)).await;
        evaluator.shutdown();
        evaluator.on_password_changed(secret("later"));

        sleep(Duration::from_secs(2)).await;
        assert!(evaluator.is_shut_down());
        assert_eq!(evaluator.score(), None);
        assert_eq!(scorer.seen(), vec!["slow"]);

        let outcome = evaluator.evaluate_now(&secret("slow")).await;
        assert!(matches!(outcome, EvaluationOutcome::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_published_scores() {
        let scorer = ScriptedScorer::new();
        scorer.script("watched", 3, Duration::from_millis(20));
        let evaluator = StrengthEvaluator::start(Arc::clone(&scorer), secret("watched"), QUIET);
        let mut rx = evaluator.subscribe();

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), Some(StrengthScore::new(3)));
    }

    #[tokio::test]
    async fn test_with_zxcvbn_scorer() {
        let evaluator = StrengthEvaluator::start(
            crate::scorer::ZxcvbnScorer::new(),
            secret("password"),
            Duration::from_millis(20),
        );
        evaluator.on_password_changed(secret("q7#Vt!r9Lz@2mWx$Kp4&"));
        let mut rx = evaluator.subscribe();

        loop {
            rx.changed().await.unwrap();
            if *rx.borrow() == Some(StrengthScore::new(4)) {
                break;
            }
        }
        assert!(evaluator.is_current(&secret("q7#Vt!r9Lz@2mWx$Kp4&")));
    }
}
