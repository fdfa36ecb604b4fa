use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::info;

use client::realtime::{Realtime, RealtimeConfig};
use client::{ApiClient, SosInbox, TokenCell};

/// Terminal monitor for the buddy-support service: logs in, opens the
/// realtime link, and prints every pushed event plus the live SOS inbox.
#[derive(Parser, Debug)]
#[command(name = "buddymon", version, about)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "client.toml")]
    config: String,

    /// Log in with this email (requires --password)
    #[arg(long)]
    email: Option<String>,

    /// Password for --email
    #[arg(long)]
    password: Option<String>,

    /// Use an existing bearer token instead of logging in
    #[arg(long)]
    token: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let cfg = shared::config::load_config(&args.config)
        .with_context(|| format!("failed to load config from {}", args.config))?;

    let token = TokenCell::new();
    let api = ApiClient::new(cfg.server.base_url.clone(), token.clone());

    if let Some(tok) = &args.token {
        token.set(tok.clone());
    } else if let (Some(email), Some(password)) = (&args.email, &args.password) {
        api.login(email, password).await.context("login failed")?;
    } else {
        bail!("provide --token, or --email together with --password");
    }

    let me = api.me().await.context("failed to fetch own profile")?;
    info!("signed in as {} <{}> ({})", me.full_name, me.email, me.role);

    let realtime = Realtime::new(RealtimeConfig::from_app_config(&cfg), token.clone());
    realtime.connect();

    let poll = (cfg.inbox.poll_secs > 0).then(|| Duration::from_secs(cfg.inbox.poll_secs));
    let inbox = Arc::new(SosInbox::new(api.clone(), poll));
    tokio::spawn(Arc::clone(&inbox).run(realtime.clone()));

    let mut events = realtime.subscribe();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            ev = events.recv() => match ev {
                Some(ev) => {
                    info!("event: {} {}", ev.event, ev.data);
                    if ev.is_sos() {
                        for alert in inbox.open_alerts() {
                            info!(
                                "open alert {}: {} ({:?}/{:?}) my_status={:?}",
                                alert.alert_id,
                                alert.veteran_name,
                                alert.severity,
                                alert.alert_status,
                                alert.my_status,
                            );
                        }
                    }
                }
                None => break,
            },
        }
    }

    realtime.disconnect();
    info!("disconnected");
    Ok(())
}
