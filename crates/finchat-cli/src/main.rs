//! Finance chat demo
//!
//! Single entry point, no flags. Connects to the finance tool registry, runs
//! two demonstration queries through the chat session, then executes the
//! complete-analysis workflow prompt and prints the resulting transcript.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde_json::json;

use finchat_core::{
    registry, ChatEngine, ChatOptions, ChatSession, ConsoleLogger, ConversationTurn,
    EnvSecretStore, GenaiProvider, Logger, PromptRunner, ProviderModelConfig, RegistryEndpoint,
    RegistryHandle, Settings, ToolAdapter, Transcript,
};

const SYSTEM_PROMPT: &str = "You are a financial research assistant with access to tools for:\n\
- Getting HPL (Hypothetical P&L) formulas for hierarchies (FHC, PRA)\n\
- Getting all available hierarchies\n\
- Getting all account numbers\n\
- Getting account P&L data\n\
- Calculating hypothetical P&L for accounts\n\n\
Use these tools to answer user queries about financial data, P&L calculations, and account \
information. Be thorough and use the appropriate tools to gather the requested information.";

const SEPARATOR: &str = "================================================================================";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let settings = Settings::load().context("loading configuration")?;
    let logger: Arc<dyn Logger> = Arc::new(ConsoleLogger::new());

    println!("{SEPARATOR}");
    println!("CONNECTING TO REGISTRY");
    println!("{SEPARATOR}");

    let handle = connect(&settings, Arc::clone(&logger))
        .await
        .context("connecting to the tool registry")?;

    let adapter = Arc::new(ToolAdapter::new(handle.clone(), Arc::clone(&logger)));
    let tools = adapter.discover().await.context("discovering tools")?;

    println!("\nAvailable tools:");
    for tool in &tools {
        println!("  - {}: {}", tool.name, tool.description);
        for (param_name, spec) in &tool.params {
            let requirement = if spec.required { "required" } else { "optional" };
            println!("      {param_name}: {} ({requirement})", spec.ty);
        }
    }

    let prompts = Arc::new(PromptRunner::new(handle.clone(), Arc::clone(&logger)));
    let prompt_list = prompts.discover().await.context("discovering prompts")?;

    println!("\nAvailable prompts:");
    for prompt in &prompt_list {
        println!("  - {}: {}", prompt.name, prompt.description);
        if !prompt.arguments.is_empty() {
            let names: Vec<&str> = prompt.arguments.iter().map(|a| a.name.as_str()).collect();
            println!("      arguments: {}", names.join(", "));
        }
    }

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

    run_query(&engine, "What are all the available hierarchies?").await?;
    run_query(
        &engine,
        "Calculate the hypothetical P&L for account ACCT-001 using the FHC hierarchy",
    )
    .await?;

    run_complete_workflow(&prompts, &engine, settings.max_rounds).await?;

    println!("\n{SEPARATOR}");
    println!("CLOSING REGISTRY CONNECTION");
    println!("{SEPARATOR}");
    handle.shutdown().await.ok();

    Ok(())
}

async fn connect(settings: &Settings, logger: Arc<dyn Logger>) -> Result<RegistryHandle> {
    let handle = match &settings.registry {
        RegistryEndpoint::Stdio { command, args } => {
            registry::connect_stdio(command, args, logger).await?
        }
        RegistryEndpoint::Http { url } => registry::connect_http(url, logger).await?,
    };
    Ok(handle)
}

async fn run_query(engine: &Arc<ChatEngine>, query: &str) -> Result<()> {
    println!("\n{SEPARATOR}");
    println!("[Query]: {query}");
    println!("{SEPARATOR}");

    let mut session = ChatSession::new(Arc::clone(engine));
    let outcome = session.send(query).await.context("running chat query")?;

    print_transcript(session.transcript());

    println!("\n[Answer]: {}", outcome.answer);
    if outcome.limit_hit {
        println!("(round limit reached; answer is partial)");
    }

    Ok(())
}

async fn run_complete_workflow(
    prompts: &Arc<PromptRunner>,
    engine: &Arc<ChatEngine>,
    max_rounds: usize,
) -> Result<()> {
    println!("\n{SEPARATOR}");
    println!("EXECUTING COMPLETE ANALYSIS WORKFLOW (hierarchy: FHC)");
    println!("{SEPARATOR}");

    if prompts.descriptor("finance_complete_analysis").is_none() {
        println!("Prompt 'finance_complete_analysis' not available; skipping workflow.");
        return Ok(());
    }

    let outcome = prompts
        .run_workflow(
            "finance_complete_analysis",
            &json!({ "hierarchy": "FHC" }),
            engine,
            max_rounds,
        )
        .await
        .context("running complete analysis workflow")?;

    print_transcript(&outcome.transcript);

    println!("\n[Workflow answer after {} round(s)]:", outcome.rounds_used);
    println!("{}", outcome.answer);
    if outcome.limit_hit {
        println!("(round limit reached; answer is partial)");
    }

    Ok(())
}

fn print_transcript(transcript: &Transcript) {
    for turn in transcript.turns() {
        match turn {
            ConversationTurn::User { text } => println!("\n[User]: {text}"),
            ConversationTurn::Assistant { text } => {
                if !text.is_empty() {
                    println!("\n[Assistant]: {text}");
                }
            }
            ConversationTurn::ToolCall { call } => {
                println!("  > {}({})", call.name, call.arguments);
            }
            ConversationTurn::ToolResult { result } => {
                let label = if result.is_error { "error" } else { "result" };
                println!("    {label}: {}", truncate(&result.content, 200));
            }
        }
    }
}

fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        text.to_string()
    } else {
        let cut: String = text.chars().take(limit).collect();
        format!("{cut}...")
    }
}
