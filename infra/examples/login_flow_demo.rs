//! Example driving a phone login and OTP verification against the real API
//!
//! Run with: cargo run --example login_flow_demo -- +94771234567
//!
//! Reads the OTP digits from stdin once the verification flow is running.
//! `GATEPASS_API_BASE_URL` points the demo at a different backend.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{bail, Context};
use serde_json::Value;

use gp_core::services::auth::{AuthService, AuthServiceConfig};
use gp_core::services::verification::{VerificationConfig, VerificationEvent, VerificationFlow};
use gp_infra::{ApiConfig, FileSessionStore, HttpAuthApi};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let phone = std::env::args()
        .nth(1)
        .context("usage: login_flow_demo <phone number>")?;

    let store = Arc::new(FileSessionStore::open("gatepass-session.json")?);
    let api = Arc::new(HttpAuthApi::new(ApiConfig::from_env()?)?);
    let auth = Arc::new(AuthService::new(
        Arc::clone(&store),
        api,
        AuthServiceConfig::default(),
    ));

    if auth.restore_session().await {
        let state = auth.state().await;
        println!("Restored session for {:?}", state.data);
    }

    println!("Authenticating {phone}...");
    let outcome = auth.authenticate_by_phone_with_fallback(&phone).await;
    if !outcome.success {
        bail!(
            "authentication failed: {}",
            outcome.error_message().unwrap_or("unknown error")
        );
    }
    let sent_otp = match outcome.data {
        Some(Value::String(otp)) => otp,
        other => bail!("unexpected OTP payload: {other:?}"),
    };

    let (flow, mut events) = VerificationFlow::start(
        phone.clone(),
        sent_otp,
        None,
        Arc::clone(&auth),
        VerificationConfig::default(),
    )?;

    print!("Enter the 5-digit OTP: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    for (slot, digit) in line.trim().chars().take(5).enumerate() {
        flow.enter_digit(slot, digit);
    }
    flow.submit().await;

    while let Some(event) = events.recv().await {
        match event {
            VerificationEvent::OtpVerified => println!("OTP verified."),
            VerificationEvent::Completed { phone_number, .. } => {
                println!("Logged in as {phone_number}.");
                break;
            }
            VerificationEvent::InvalidOtp => {
                flow.teardown();
                bail!("the entered OTP did not match");
            }
            VerificationEvent::Expired => {
                flow.teardown();
                bail!("the OTP expired before submission");
            }
            other => println!("{other:?}"),
        }
    }

    flow.teardown();
    Ok(())
}
