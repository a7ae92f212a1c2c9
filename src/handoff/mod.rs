//! Handoff routing
//!
//! The [`HandoffRouter`] takes a completed [`UserRecord`] and the key of the
//! target application the user chose, and delivers the record over the first
//! available channel in the fixed priority chain. Lower-priority channels are
//! never attempted once a higher one is chosen, and there is no cross-channel
//! retry: a handoff produces exactly one delivery attempt.

pub mod channels;
pub mod payload;

pub use channels::{DeliveryChannel, HostEnvironment, MessageHandler, NativeBridge};
pub use payload::HandoffPayload;

use crate::models::{TargetRegistry, UserRecord};
use channels::{strategies, Delivery};
use std::sync::Arc;

/// Handoff delivery errors
#[derive(Debug, thiserror::Error)]
pub enum HandoffError {
    /// The caller asked for a target key that is not in the registry. The
    /// registry is static and validated at startup, so this is a caller bug
    /// rather than a runtime condition to recover from.
    #[error("unknown handoff target: {0}")]
    UnknownTarget(String),
    /// The record could not be serialized for transport
    #[error("failed to serialize handoff payload: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Outcome of one completed handoff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandoffReceipt {
    /// The single channel that performed the delivery
    pub channel: DeliveryChannel,
    /// The resolved redirect URI, populated only when the scheme-redirect
    /// channel was used
    pub redirect_uri: Option<String>,
}

/// Routes completed user records to host applications.
pub struct HandoffRouter {
    registry: TargetRegistry,
    env: Arc<dyn HostEnvironment>,
}

impl HandoffRouter {
    #[must_use]
    pub fn new(registry: TargetRegistry, env: Arc<dyn HostEnvironment>) -> Self {
        Self { registry, env }
    }

    /// The target registry this router delivers to.
    #[must_use]
    pub fn registry(&self) -> &TargetRegistry {
        &self.registry
    }

    /// Deliver `user` to the target selected by `target_key` over the highest
    /// priority channel the environment supports.
    ///
    /// The resolved redirect URI is constructed up front but only used when
    /// the chain falls through to the scheme-redirect channel.
    ///
    /// # Errors
    ///
    /// Returns an error if `target_key` is not in the registry (a caller bug)
    /// or the record cannot be serialized.
    pub fn deliver(
        &self,
        user: &UserRecord,
        target_key: &str,
    ) -> Result<HandoffReceipt, HandoffError> {
        let target = self
            .registry
            .get(target_key)
            .ok_or_else(|| HandoffError::UnknownTarget(target_key.to_string()))?;

        let user_json = user.to_json()?;
        let payload = HandoffPayload::new(&user_json, &user.token);
        let redirect_uri = payload.resolve_uri(&target.scheme);

        let delivery = Delivery {
            user_json: &user_json,
            redirect_uri: &redirect_uri,
        };

        let strategy = strategies()
            .into_iter()
            .find(|s| s.is_available(self.env.as_ref()))
            .unwrap_or_else(|| unreachable!("the scheme-redirect strategy is always available"));

        let channel = strategy.channel();
        strategy.deliver(self.env.as_ref(), &delivery);
        log::info!(
            "Delivered handoff to {} ({}) via {channel}",
            target.display_name,
            target.key
        );

        Ok(HandoffReceipt {
            channel,
            redirect_uri: (channel == DeliveryChannel::SchemeRedirect).then_some(redirect_uri),
        })
    }
}
