//! Delivery channels and the capability-probed strategy chain
//!
//! A handoff can reach the host application three ways, tried in a fixed
//! priority order: a native bridge call, a message-handler call, or a URL
//! scheme redirect. Each channel is a capability test (is it present in the
//! current execution environment?) plus a delivery action. Exactly one channel
//! is used per handoff; the priority is environment-driven, never
//! user-selectable.

use std::fmt;

/// Synchronous bridge object injected by an embedding native host
/// (the `window.Android`-style interface of an Android `WebView`).
pub trait NativeBridge: Send + Sync {
    /// Hand the JSON-serialized user record to the host application.
    fn on_login_success(&self, user_json: &str);
}

/// Message handler registered for "login" by an embedding native host
/// (the `WebKit` message-handler interface of an iOS web view).
pub trait MessageHandler: Send + Sync {
    /// Post the JSON-serialized user record to the host application.
    fn post_message(&self, user_json: &str);
}

/// The execution environment a handoff runs in: which host interfaces are
/// present, and how to navigate the current context to a URI.
pub trait HostEnvironment: Send + Sync {
    /// The native bridge object, when the host injected one.
    fn native_bridge(&self) -> Option<&dyn NativeBridge> {
        None
    }

    /// The "login" message handler, when the host registered one.
    fn message_handler(&self) -> Option<&dyn MessageHandler> {
        None
    }

    /// Navigate the current context to the given URI. Fire-and-forget: the
    /// environment does not report whether the destination handled it.
    fn navigate(&self, uri: &str);
}

/// The three delivery mechanisms, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DeliveryChannel {
    NativeBridge,
    MessageHandler,
    SchemeRedirect,
}

impl fmt::Display for DeliveryChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryChannel::NativeBridge => write!(f, "native bridge"),
            DeliveryChannel::MessageHandler => write!(f, "message handler"),
            DeliveryChannel::SchemeRedirect => write!(f, "scheme redirect"),
        }
    }
}

/// Everything a strategy needs to perform one delivery.
pub(crate) struct Delivery<'a> {
    /// Unencoded JSON serialization of the record (bridge/handler channels)
    pub user_json: &'a str,
    /// Fully resolved redirect URI (scheme-redirect channel)
    pub redirect_uri: &'a str,
}

/// One capability-checked delivery mechanism.
pub(crate) trait DeliveryStrategy: Sync {
    fn channel(&self) -> DeliveryChannel;
    fn is_available(&self, env: &dyn HostEnvironment) -> bool;
    fn deliver(&self, env: &dyn HostEnvironment, delivery: &Delivery<'_>);
}

struct NativeBridgeStrategy;

impl DeliveryStrategy for NativeBridgeStrategy {
    fn channel(&self) -> DeliveryChannel {
        DeliveryChannel::NativeBridge
    }

    fn is_available(&self, env: &dyn HostEnvironment) -> bool {
        env.native_bridge().is_some()
    }

    fn deliver(&self, env: &dyn HostEnvironment, delivery: &Delivery<'_>) {
        if let Some(bridge) = env.native_bridge() {
            bridge.on_login_success(delivery.user_json);
        }
    }
}

struct MessageHandlerStrategy;

impl DeliveryStrategy for MessageHandlerStrategy {
    fn channel(&self) -> DeliveryChannel {
        DeliveryChannel::MessageHandler
    }

    fn is_available(&self, env: &dyn HostEnvironment) -> bool {
        env.message_handler().is_some()
    }

    fn deliver(&self, env: &dyn HostEnvironment, delivery: &Delivery<'_>) {
        if let Some(handler) = env.message_handler() {
            handler.post_message(delivery.user_json);
        }
    }
}

struct SchemeRedirectStrategy;

impl DeliveryStrategy for SchemeRedirectStrategy {
    fn channel(&self) -> DeliveryChannel {
        DeliveryChannel::SchemeRedirect
    }

    // The universal fallback: navigation is always possible
    fn is_available(&self, _env: &dyn HostEnvironment) -> bool {
        true
    }

    fn deliver(&self, env: &dyn HostEnvironment, delivery: &Delivery<'_>) {
        env.navigate(delivery.redirect_uri);
    }
}

/// The strategy chain in strict priority order. The last entry is always
/// available, so probing the chain always selects exactly one channel.
pub(crate) fn strategies() -> [&'static dyn DeliveryStrategy; 3] {
    static NATIVE_BRIDGE: NativeBridgeStrategy = NativeBridgeStrategy;
    static MESSAGE_HANDLER: MessageHandlerStrategy = MessageHandlerStrategy;
    static SCHEME_REDIRECT: SchemeRedirectStrategy = SchemeRedirectStrategy;
    [&NATIVE_BRIDGE, &MESSAGE_HANDLER, &SCHEME_REDIRECT]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_order_matches_channel_priority() {
        let channels: Vec<_> = strategies().iter().map(|s| s.channel()).collect();
        assert_eq!(
            channels,
            vec![
                DeliveryChannel::NativeBridge,
                DeliveryChannel::MessageHandler,
                DeliveryChannel::SchemeRedirect,
            ]
        );
        // Enum ordering mirrors the chain
        assert!(DeliveryChannel::NativeBridge < DeliveryChannel::MessageHandler);
        assert!(DeliveryChannel::MessageHandler < DeliveryChannel::SchemeRedirect);
    }

    #[test]
    fn test_channel_display_names() {
        assert_eq!(DeliveryChannel::NativeBridge.to_string(), "native bridge");
        assert_eq!(
            DeliveryChannel::SchemeRedirect.to_string(),
            "scheme redirect"
        );
    }
}
