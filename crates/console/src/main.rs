//! Headless console: restores or opens a session and prints one resource page.
//!
//! Usage: `tallerpro-console [vehicles|clients|technicians|orders|services|payments|marketplace] [filter]`

use std::sync::Arc;

use anyhow::{Context, bail};

use tallerpro_auth::GateDecision;
use tallerpro_client::ResourceClient;
use tallerpro_console::{
    AppState, ConsoleConfig, ListPageController, ListState, SqliteCredentialStore,
};
use tallerpro_core::Entity;
use tallerpro_workshop::Searchable;

async fn show<C: ResourceClient>(page: Arc<ListPageController<C>>, filter: &str) {
    page.mount().await;
    match page.state() {
        ListState::Loaded(_) => {
            for record in page.filter(filter) {
                println!("{}\t{}", record.id(), record.search_fields().join(" | "));
            }
        }
        ListState::Failed(failure) => println!("{}", failure.message),
        ListState::Idle | ListState::Loading => {}
    }
    page.unmount();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = ConsoleConfig::from_env().context("invalid console configuration")?;
    tallerpro_observability::tracing::init_with(config.log_format, None);

    let credentials = SqliteCredentialStore::open(&config.database_path())
        .await
        .with_context(|| format!("failed to open {}", config.database_path().display()))?;
    let state = AppState::new(config, Arc::new(credentials))?;

    if !state.transport.check_connectivity().await {
        tracing::warn!(api_url = %state.config.api_url, "backend health check failed");
    }

    state.session.hydrate().await;
    if !state.session.is_authenticated() {
        if let (Ok(email), Ok(password)) = (
            std::env::var("TALLERPRO_EMAIL"),
            std::env::var("TALLERPRO_PASSWORD"),
        ) {
            if let Err(message) = state.sign_in(&email, &password).await {
                bail!("sign-in failed: {message}");
            }
        }
    }

    let mut args = std::env::args().skip(1);
    let resource = args.next().unwrap_or_else(|| "vehicles".to_string());
    let filter = args.collect::<Vec<_>>().join(" ");

    // The marketplace is public; every other page sits behind the gate.
    if resource != "marketplace" {
        match state.gate().evaluate(&state.session.snapshot()) {
            GateDecision::Render => {}
            GateDecision::Redirect { to, .. } => {
                bail!("not signed in (redirect to {to}); set TALLERPRO_EMAIL and TALLERPRO_PASSWORD")
            }
            GateDecision::Forbidden => bail!("this account may not open {resource}"),
            GateDecision::Loading => bail!("session still loading"),
        }
    }

    match resource.as_str() {
        "vehicles" => show(state.page(&state.vehicles), &filter).await,
        "clients" => show(state.page(&state.clients), &filter).await,
        "technicians" => show(state.page(&state.technicians), &filter).await,
        "orders" => show(state.page(&state.orders), &filter).await,
        "services" => show(state.page(&state.services), &filter).await,
        "payments" => show(state.page(&state.payments), &filter).await,
        "marketplace" => show(state.page(&state.marketplace), &filter).await,
        other => bail!("unknown resource {other:?}"),
    }

    Ok(())
}
