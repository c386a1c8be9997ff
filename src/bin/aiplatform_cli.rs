//! aiplatform-cli: MaaS 推理服务的命令行工具
//!
//! Usage:
//!   aiplatform-cli models                   List models served by the platform
//!   aiplatform-cli chat <prompt> [--stream] Single-turn chat completion
//!   aiplatform-cli embed <text>             Embed one text, print the vector size

use aiplatform::models::{ChatCompletionOutput, ChatMessage, ChatOptions, EmbeddingOptions};
use aiplatform::{ClientConfig, ModelService};
use anyhow::{bail, Context};
use futures::StreamExt;
use std::io::Write;
use tracing_subscriber::EnvFilter;

const ENV_MODEL_ID: &str = "AIPLATFORM_MODEL_ID";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let result = match args[1].as_str() {
        "models" => cmd_models().await,
        "chat" => cmd_chat(&args[2..]).await,
        "embed" => cmd_embed(&args[2..]).await,
        "version" | "--version" | "-V" => {
            cmd_version();
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"aiplatform-cli: AI Platform 命令行工具

USAGE:
    aiplatform-cli <COMMAND> [OPTIONS]

COMMANDS:
    models                      List available models
    chat <prompt> [--stream]    Send one user message to the configured model
    embed <text>                Create an embedding and print its dimensions
    version                     Show version information
    help                        Show this help message

ENVIRONMENT:
    AIPLATFORM_API_KEY          API key (required)
    AIPLATFORM_BASE_URL         Service base URL (defaults to the public MaaS endpoint)
    AIPLATFORM_HTTP_TIMEOUT_SECS Request timeout in seconds
    AIPLATFORM_PROXY_URL        HTTP(S) proxy
    AIPLATFORM_MODEL_ID         Model used by chat and embed
    RUST_LOG                    Log filter, e.g. aiplatform=debug"#
    );
}

fn cmd_version() {
    println!("aiplatform-cli {}", env!("CARGO_PKG_VERSION"));
}

fn service() -> anyhow::Result<ModelService> {
    let config = ClientConfig::from_env().context("loading configuration")?;
    let mut builder = ModelService::builder().config(config);
    if let Ok(model) = std::env::var(ENV_MODEL_ID) {
        builder = builder.model_id(model);
    }
    Ok(builder.build()?)
}

async fn cmd_models() -> anyhow::Result<()> {
    let models = service()?.list_models().await?;
    if models.models.is_empty() {
        println!("No models reported.");
        return Ok(());
    }
    for model in &models.models {
        let mut line = format!("{:<40} {:<10}", model.id, model.model_type);
        if let Some(max) = model.max_tokens {
            line.push_str(&format!(" max_tokens={max}"));
        }
        if let Some(dims) = model.dimensions {
            line.push_str(&format!(" dimensions={dims}"));
        }
        println!("{}", line.trim_end());
    }
    Ok(())
}

async fn cmd_chat(args: &[String]) -> anyhow::Result<()> {
    let stream = args.iter().any(|a| a == "--stream");
    let prompt: Vec<&str> = args
        .iter()
        .filter(|a| a.as_str() != "--stream")
        .map(String::as_str)
        .collect();
    if prompt.is_empty() {
        bail!("chat needs a prompt");
    }
    let messages = [ChatMessage::user(prompt.join(" "))];
    let output = service()?
        .chat_completion(&messages, stream, ChatOptions::new())
        .await?;

    match output {
        ChatCompletionOutput::Stream(mut events) => {
            let mut stdout = std::io::stdout();
            while let Some(chunk) = events.next().await {
                if let Some(text) = chunk?.delta_text() {
                    write!(stdout, "{text}")?;
                    stdout.flush()?;
                }
            }
            writeln!(stdout)?;
            let stats = events.stats();
            tracing::debug!(
                frames = stats.frames(),
                malformed = stats.skipped_malformed(),
                "stream finished"
            );
        }
        ChatCompletionOutput::Complete(completion) => {
            println!("{}", completion.content().unwrap_or_default());
            let usage = &completion.usage;
            eprintln!(
                "[tokens: prompt={} completion={} total={}]",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }
    }
    Ok(())
}

async fn cmd_embed(args: &[String]) -> anyhow::Result<()> {
    let text = args.join(" ");
    if text.trim().is_empty() {
        bail!("embed needs some text");
    }
    let resp = service()?
        .create_embeddings(text, EmbeddingOptions::default())
        .await?;
    let Some(first) = resp.data.first() else {
        bail!("service returned no embeddings");
    };
    println!("model: {}", resp.model);
    println!("dimensions: {}", first.embedding.len());
    let preview: Vec<String> = first
        .embedding
        .iter()
        .take(8)
        .map(|x| format!("{x:.6}"))
        .collect();
    println!("head: [{}]", preview.join(", "));
    Ok(())
}
