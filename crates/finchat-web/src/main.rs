//! Web chat UI for the finance tool-registry chat bridge
//!
//! Starts the registry connection once, discovers tools and prompts, and
//! serves the chat UI plus the JSON API.

mod routes;
mod state;

use std::sync::Arc;

use anyhow::{Context, Result};

use finchat_core::{
    registry, ChatEngine, ChatOptions, ConsoleLogger, EnvSecretStore, GenaiProvider, Logger,
    PromptRunner, ProviderModelConfig, RegistryEndpoint, Settings, ToolAdapter,
};

use state::AppState;

const SYSTEM_PROMPT: &str = "You are a financial research assistant with access to tools for \
hierarchies, HPL formulas, account numbers, account P&L data, and hypothetical P&L calculation. \
Use these tools to answer user queries about financial data, P&L calculations, and account \
information.";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let settings = Arc::new(Settings::load().context("loading configuration")?);
    let logger: Arc<dyn Logger> = Arc::new(ConsoleLogger::with_prefix("[finchat-web]"));

    let handle = match &settings.registry {
        RegistryEndpoint::Stdio { command, args } => {
            registry::connect_stdio(command, args, Arc::clone(&logger)).await
        }
        RegistryEndpoint::Http { url } => registry::connect_http(url, Arc::clone(&logger)).await,
    }
    .context("connecting to the tool registry")?;

    let adapter = Arc::new(ToolAdapter::new(handle.clone(), Arc::clone(&logger)));
    adapter.discover().await.context("discovering tools")?;

    let prompts = Arc::new(PromptRunner::new(handle, Arc::clone(&logger)));
    prompts.discover().await.context("discovering prompts")?;

    let secrets = Arc::new(EnvSecretStore::new());
    let provider = Arc::new(GenaiProvider::new(secrets, Arc::clone(&logger)));

    let mut options = ChatOptions::new().with_system(SYSTEM_PROMPT);
    if let Some(temperature) = settings.temperature {
        options = options.with_temperature(temperature);
    }

    let engine = Arc::new(
        ChatEngine::new(
            provider,
            Arc::clone(&adapter),
            ProviderModelConfig::new(&settings.model),
            Arc::clone(&logger),
        )
        .with_options(options)
        .with_max_rounds(settings.max_rounds),
    );

    let app = routes::router(AppState {
        adapter,
        prompts,
        engine,
        settings: Arc::clone(&settings),
    });

    logger.info(&format!(
        "Starting finance chat web UI at http://{}",
        settings.web_bind
    ));

    let listener = tokio::net::TcpListener::bind(&settings.web_bind)
        .await
        .with_context(|| format!("binding {}", settings.web_bind))?;
    axum::serve(listener, app).await.context("serving HTTP")?;

    Ok(())
}
