#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![deny(warnings)]
#![allow(clippy::multiple_crate_versions)]

use anyhow::anyhow;
use authguide::flow::LoginFlow;
use authguide::handoff::{HandoffRouter, HostEnvironment};
use authguide::models::TargetRegistry;
use authguide::settings::AuthguideSettings;
use authguide::token_source::TokenSource;
use std::sync::Arc;
use tokio::time::Duration;

/// Stand-in for a real embedding context: no native bridge, no message
/// handler, and navigation just prints the destination.
struct BrowserlessEnvironment;

impl HostEnvironment for BrowserlessEnvironment {
    fn navigate(&self, uri: &str) {
        println!("→ {uri}");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from Settings.toml and environment variables
    // This also loads .env file and initializes the logger
    let settings = AuthguideSettings::load()
        .map_err(|e| anyhow!("Failed to load settings: {e}"))?;

    let registry = TargetRegistry::new(settings.handoff_targets())
        .map_err(|e| anyhow!("Invalid target registry: {e}"))?;

    let token_source = TokenSource::new(
        settings.provider.clone(),
        Duration::from_millis(settings.handoff.auth_delay_ms),
    );
    // The demo driver carries no interactive provider client; with a real
    // credential configured this still degrades to simulation mode.
    token_source.configure(|_| Err("no interactive provider client in the demo driver".to_string()));

    let router = HandoffRouter::new(registry, Arc::new(BrowserlessEnvironment));
    let mut flow = LoginFlow::new(token_source, router, settings.handoff.clone());

    let target_key = std::env::args().nth(1).unwrap_or_else(|| "testing".to_string());
    println!("✓ authguide {} — handing off to '{target_key}'", authguide::VERSION);

    flow.select_target(&target_key)
        .map_err(|e| anyhow!("Cannot select target: {e}"))?;
    let receipt = flow
        .login()
        .await
        .map_err(|e| anyhow!("Login failed: {e}"))?;

    println!("✓ Delivered via {}", receipt.channel);
    Ok(())
}
