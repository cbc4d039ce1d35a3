//! Non-interactive mode: run the session gate once and report.

use crate::gatekeeper::{SessionApi, SessionGatekeeper};
use crate::structured_logger::StructuredLogger;
use anyhow::Result;
use std::io::Write;
use std::sync::Arc;

/// Checks the session and prints who is signed in, or where to sign in.
/// Returns whether a session exists.
pub async fn run_headless(
    api: Arc<dyn SessionApi>,
    auth_url: &str,
    logger: Arc<StructuredLogger>,
    out: &mut impl Write,
) -> Result<bool> {
    let mut gate = SessionGatekeeper::new(api, logger);
    gate.activate();
    let state = gate.wait_settled().await;

    match &state.identity {
        Some(identity) => {
            writeln!(out, "Welcome, {}!", identity.username)?;
            if let Some(email) = &identity.email {
                writeln!(out, "Signed in as {}", email)?;
            }
            Ok(true)
        }
        None => {
            writeln!(out, "Not signed in.")?;
            writeln!(out, "Continue with Google: {}", auth_url)?;
            Ok(false)
        }
    }
}
