#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![deny(warnings)]
#![allow(clippy::multiple_crate_versions)]

/// Version of the authguide application
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod flow;
pub mod handoff;
pub mod models;
pub mod settings;
pub mod token_source;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
pub use flow::{AuthAttempt, ButtonState, FlowError, LoginFlow, UserNotifier};
pub use handoff::{
    DeliveryChannel, HandoffError, HandoffReceipt, HandoffRouter, HostEnvironment,
};
pub use models::{TargetApp, TargetRegistry, UserRecord};
pub use settings::AuthguideSettings;
pub use token_source::{AccessTokenClient, TokenSource, TokenSourceError};
