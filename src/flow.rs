//! User-visible login flow
//!
//! Drives the single actionable control through its four states and ties the
//! token source to the handoff router. The flow owns the only piece of
//! mutable state in the system, the in-flight [`AuthAttempt`]: beginning a
//! new login supersedes any prior attempt rather than queueing behind it.
//!
//! Provider and network errors are recovered locally: the flow alerts the
//! user, logs, and resets to `Ready` so the user can retry by clicking again.
//! There is no automatic retry or backoff.

use crate::handoff::{DeliveryChannel, HandoffError, HandoffReceipt, HandoffRouter};
use crate::models::TargetApp;
use crate::settings::HandoffSettings;
use crate::token_source::{TokenSource, TokenSourceError};
use chrono::{DateTime, Utc};
use tokio::time::{sleep, Duration};

/// User-visible alert surface.
///
/// Preserves the original alert-in-place behavior: failures are shown to the
/// user directly at the point they happen, in addition to being returned as
/// structured errors.
pub trait UserNotifier: Send + Sync {
    fn alert(&self, message: &str);
}

/// Default notifier: surfaces alerts through the log.
pub struct LogNotifier;

impl UserNotifier for LogNotifier {
    fn alert(&self, message: &str) {
        log::warn!("⚠️ {message}");
    }
}

/// States of the single actionable control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    /// No target chosen yet; the control is disabled
    Idle,
    /// Target chosen, awaiting the user's click
    Ready,
    /// Attempt in progress
    Loading,
    /// Channel chosen, handing off
    Success,
}

/// Login flow errors
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    /// `login` was called before any target was selected. Guarded here so an
    /// undeliverable handoff never reaches the router.
    #[error("no handoff target selected")]
    NoTargetSelected,
    #[error("unknown handoff target: {0}")]
    UnknownTarget(String),
    #[error("authorization failed: {0}")]
    Authorization(#[from] TokenSourceError),
    #[error(transparent)]
    Handoff(#[from] HandoffError),
}

/// Handle for one in-flight authentication attempt.
///
/// Created when the user initiates login, dropped when the handoff completes
/// or errors. Replaces the original design's global last-callback-wins
/// mutable state: at most one attempt exists, and beginning a new login
/// explicitly supersedes the previous handle.
#[derive(Debug, Clone)]
pub struct AuthAttempt {
    target: TargetApp,
    started_at: DateTime<Utc>,
}

impl AuthAttempt {
    /// The target application chosen for this attempt.
    #[must_use]
    pub fn target(&self) -> &TargetApp {
        &self.target
    }

    /// When the user initiated this attempt.
    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}

/// The caller-side state machine: select a target, obtain a token, hand off.
pub struct LoginFlow {
    token_source: TokenSource,
    router: HandoffRouter,
    notifier: Box<dyn UserNotifier>,
    timing: HandoffSettings,
    state: ButtonState,
    selected: Option<String>,
    attempt: Option<AuthAttempt>,
}

impl LoginFlow {
    #[must_use]
    pub fn new(token_source: TokenSource, router: HandoffRouter, timing: HandoffSettings) -> Self {
        Self {
            token_source,
            router,
            notifier: Box::new(LogNotifier),
            timing,
            state: ButtonState::Idle,
            selected: None,
            attempt: None,
        }
    }

    /// Replace the default log-backed notifier.
    #[must_use]
    pub fn with_notifier(mut self, notifier: Box<dyn UserNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Current state of the actionable control.
    #[must_use]
    pub fn state(&self) -> ButtonState {
        self.state
    }

    /// Key of the currently selected target, if any.
    #[must_use]
    pub fn selected_target(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// The in-flight attempt, if one exists.
    #[must_use]
    pub fn current_attempt(&self) -> Option<&AuthAttempt> {
        self.attempt.as_ref()
    }

    /// Choose the target application. Unlocks the control on first selection.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` is not in the target registry.
    pub fn select_target(&mut self, key: &str) -> Result<(), FlowError> {
        if self.router.registry().get(key).is_none() {
            return Err(FlowError::UnknownTarget(key.to_string()));
        }
        self.selected = Some(key.to_string());
        if self.state == ButtonState::Idle {
            self.state = ButtonState::Ready;
        }
        Ok(())
    }

    /// Run one complete login: obtain a token, show the success state, and
    /// deliver the record to the selected target.
    ///
    /// After a scheme redirect to a web target the flow resets to `Ready`
    /// once the reset delay elapses, since no external app replaces the page
    /// context. Every other outcome leaves the flow in `Success`.
    ///
    /// # Errors
    ///
    /// Returns an error if no target is selected, authorization fails, or the
    /// handoff cannot be routed. Failures reset the flow to `Ready`; retry is
    /// user-initiated only.
    pub async fn login(&mut self) -> Result<HandoffReceipt, FlowError> {
        let Some(key) = self.selected.clone() else {
            return Err(FlowError::NoTargetSelected);
        };
        let target = self
            .router
            .registry()
            .get(&key)
            .cloned()
            .ok_or_else(|| FlowError::UnknownTarget(key.clone()))?;

        if let Some(stale) = self.attempt.replace(AuthAttempt {
            target: target.clone(),
            started_at: Utc::now(),
        }) {
            log::debug!("Superseding stale login attempt for {}", stale.target.key);
        }
        self.state = ButtonState::Loading;

        let user = match self.token_source.request_token().await {
            Ok(user) => user,
            Err(e) => {
                log::error!("Authorization failed: {e}");
                self.notifier.alert("Authorization error. Please try again.");
                self.reset_to_ready();
                return Err(e.into());
            }
        };

        if let Some(attempt) = &self.attempt {
            let elapsed = Utc::now().signed_duration_since(attempt.started_at);
            log::info!(
                "User authorized: {} <{}> after {}ms",
                user.name,
                user.email,
                elapsed.num_milliseconds()
            );
        }
        self.state = ButtonState::Success;

        // Let the user see the success state before the channel fires
        sleep(Duration::from_millis(self.timing.presentation_delay_ms)).await;

        let receipt = match self.router.deliver(&user, &target.key) {
            Ok(receipt) => receipt,
            Err(e) => {
                log::error!("Handoff failed: {e}");
                self.notifier.alert("Could not return to the application.");
                self.reset_to_ready();
                return Err(e.into());
            }
        };
        self.attempt = None;

        if receipt.channel == DeliveryChannel::SchemeRedirect && target.is_web_target() {
            // A web redirect leaves this page alive, so hand the control back
            sleep(Duration::from_millis(self.timing.reset_delay_ms)).await;
            self.state = ButtonState::Ready;
        }

        Ok(receipt)
    }

    fn reset_to_ready(&mut self) {
        self.attempt = None;
        self.state = ButtonState::Ready;
    }
}
