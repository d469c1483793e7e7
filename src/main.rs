use anyhow::Result;
use clap::{Parser, Subcommand};
use gemini_grounding::app::App;
use gemini_grounding::models::{Config, GroundingKind};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "gemini-grounding")]
#[command(about = "Ask Gemini on Vertex AI with and without grounding")]
struct CliArgs {
    /// Model ID, overriding GEMINI_MODEL.
    #[arg(long, global = true)]
    model: Option<String>,

    /// Append rendered Markdown to this file instead of printing it.
    #[arg(long, global = true, value_name = "FILE")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Ask a single question.
    Ask {
        prompt: String,
        #[arg(long, value_enum, default_value_t = GroundingKind::None)]
        grounding: GroundingKind,
    },
    /// Ask several questions as turns of one conversation.
    Chat {
        #[arg(required = true)]
        prompts: Vec<String>,
        #[arg(long, value_enum, default_value_t = GroundingKind::None)]
        grounding: GroundingKind,
    },
    /// Run the grounding walkthrough.
    Demo,
}

async fn run(args: CliArgs) -> gemini_grounding::Result<()> {
    let mut config = Config::from_env()?;
    if let Some(model) = args.model {
        config.model = model;
    }

    let app = App::new(&config, args.output);

    match args.command {
        Command::Ask { prompt, grounding } => {
            let tool = app.grounding_tool(grounding)?;
            app.ask(&prompt, &tool).await
        }
        Command::Chat { prompts, grounding } => {
            let tool = app.grounding_tool(grounding)?;
            let prompts: Vec<&str> = prompts.iter().map(String::as_str).collect();
            app.chat(&prompts, &tool).await
        }
        Command::Demo => app.run_demo().await,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gemini_grounding=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();

    match run(args).await {
        Ok(()) => {
            info!("Done");
            Ok(())
        }
        Err(e) => {
            error!("Failed: {}", e);
            std::process::exit(1);
        }
    }
}
