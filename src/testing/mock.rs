//! Mock host environments and notifiers
//!
//! [`MockEnvironment`] stands in for the execution environment a handoff runs
//! in: the presence of the native bridge and the message handler is toggled
//! per test, and every delivery call is recorded for assertions.

use crate::flow::UserNotifier;
use crate::handoff::{HostEnvironment, MessageHandler, NativeBridge};
use std::sync::{Arc, Mutex};

struct RecordingBridge {
    calls: Mutex<Vec<String>>,
}

impl NativeBridge for RecordingBridge {
    fn on_login_success(&self, user_json: &str) {
        self.calls.lock().unwrap().push(user_json.to_string());
    }
}

struct RecordingHandler {
    messages: Mutex<Vec<String>>,
}

impl MessageHandler for RecordingHandler {
    fn post_message(&self, user_json: &str) {
        self.messages.lock().unwrap().push(user_json.to_string());
    }
}

/// Configurable fake execution environment.
pub struct MockEnvironment {
    bridge: Option<RecordingBridge>,
    handler: Option<RecordingHandler>,
    navigations: Mutex<Vec<String>>,
}

impl Default for MockEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEnvironment {
    /// A bare environment: no bridge, no message handler.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bridge: None,
            handler: None,
            navigations: Mutex::new(Vec::new()),
        }
    }

    /// Expose a native bridge in this environment.
    #[must_use]
    pub fn with_bridge(mut self) -> Self {
        self.bridge = Some(RecordingBridge {
            calls: Mutex::new(Vec::new()),
        });
        self
    }

    /// Register a "login" message handler in this environment.
    #[must_use]
    pub fn with_message_handler(mut self) -> Self {
        self.handler = Some(RecordingHandler {
            messages: Mutex::new(Vec::new()),
        });
        self
    }

    /// Every JSON payload the bridge received, in order.
    ///
    /// # Panics
    ///
    /// Panics if the recording mutex was poisoned by a failed test.
    #[must_use]
    pub fn bridge_calls(&self) -> Vec<String> {
        self.bridge
            .as_ref()
            .map(|b| b.calls.lock().unwrap().clone())
            .unwrap_or_default()
    }

    /// Every JSON payload the message handler received, in order.
    ///
    /// # Panics
    ///
    /// Panics if the recording mutex was poisoned by a failed test.
    #[must_use]
    pub fn posted_messages(&self) -> Vec<String> {
        self.handler
            .as_ref()
            .map(|h| h.messages.lock().unwrap().clone())
            .unwrap_or_default()
    }

    /// Every URI the environment was navigated to, in order.
    ///
    /// # Panics
    ///
    /// Panics if the recording mutex was poisoned by a failed test.
    #[must_use]
    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }
}

impl HostEnvironment for MockEnvironment {
    fn native_bridge(&self) -> Option<&dyn NativeBridge> {
        self.bridge.as_ref().map(|b| b as &dyn NativeBridge)
    }

    fn message_handler(&self) -> Option<&dyn MessageHandler> {
        self.handler.as_ref().map(|h| h as &dyn MessageHandler)
    }

    fn navigate(&self, uri: &str) {
        self.navigations.lock().unwrap().push(uri.to_string());
    }
}

/// Notifier that records every alert for assertions.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    alerts: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every alert raised so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the recording mutex was poisoned by a failed test.
    #[must_use]
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }
}

impl UserNotifier for RecordingNotifier {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}
