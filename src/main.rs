//! Agentry binary entry point

use std::io::Write;

use color_eyre::Result;
use futures::StreamExt;

use agentry::{
    agent::Agent,
    cli::{Cli, Commands},
    config::Settings,
    services::create_backend,
    tools::builtin_tools,
};

fn setup_logging(level: &str, verbose: bool) {
    let filter = if verbose {
        "agentry=debug".to_string()
    } else {
        format!("agentry={level}")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn build_agent(settings: &Settings) -> agentry::error::Result<Agent> {
    let backend = create_backend(settings)?;

    let system_prompt = format!(
        "You are a helpful AI assistant powered by {}. \
         You provide accurate, thoughtful, and concise responses.",
        backend.provider()
    );

    Ok(Agent::new(
        settings.agent.agent_name.clone(),
        backend,
        Some(system_prompt),
        builtin_tools(),
    ))
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    // Seed the environment from a .env file when present
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();
    let settings = Settings::from_env();

    setup_logging(&settings.agent.log_level, cli.verbose);

    match cli.command {
        Some(Commands::Query { query }) => {
            let mut agent = build_agent(&settings)?;
            let response = agent.run(query).await?;
            println!("{response}");
        }
        Some(Commands::Stream { query }) => {
            let mut agent = build_agent(&settings)?;
            let mut stream = agent.run_streaming(query).await?;
            let mut stdout = std::io::stdout();
            while let Some(chunk) = stream.next().await {
                write!(stdout, "{}", chunk?)?;
                stdout.flush()?;
            }
            writeln!(stdout)?;
        }
        Some(Commands::Tools) => {
            for tool in builtin_tools() {
                println!("{:<16} {}", tool.name(), tool.description());
            }
        }
        Some(Commands::Version) => {
            println!("agentry version {}", env!("CARGO_PKG_VERSION"));
        }
        None => {
            // Introduction demo
            let mut agent = build_agent(&settings)?;
            let query = "Hello! Please introduce yourself in 2-3 sentences.";
            println!("Query: {query}");
            let response = agent.run(query).await?;
            println!("Response: {response}");
        }
    }

    Ok(())
}
