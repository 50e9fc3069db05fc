//! MicroFetch MCP Server entry point.

use std::sync::Arc;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use microfetch_mcp::config::ServerConfig;
use microfetch_mcp::context::ServerContext;
use microfetch_mcp::protocol::ProtocolHandler;
use microfetch_mcp::tools::ToolRegistry;
use microfetch_mcp::transport::StdioTransport;

#[derive(Parser)]
#[command(
    name = "microfetch-mcp",
    about = "MCP server for MicroFetch: accelerated fetching, batching, and cached resources",
    version
)]
struct Cli {
    /// Path to the microfetch engine binary.
    /// Also reads from MICROFETCH_BIN env var.
    #[arg(short, long, global = true)]
    engine: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server over stdio (default).
    Serve,

    /// Start MCP server over HTTP.
    #[cfg(feature = "sse")]
    ServeHttp {
        /// Listen address (host:port).
        #[arg(long, default_value = "127.0.0.1:39500")]
        addr: String,

        /// Bearer token for authentication.
        /// Also reads from MICROFETCH_TOKEN env var.
        #[arg(long)]
        token: Option<String>,
    },

    /// Report whether the engine binary is available.
    Check,

    /// Print server capabilities as JSON.
    Info,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   microfetch-mcp completions bash > ~/.local/share/bash-completion/completions/microfetch-mcp
    ///   microfetch-mcp completions zsh > ~/.zfunc/_microfetch-mcp
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },

    /// Launch interactive REPL mode.
    Repl,
}

fn open_context(engine: Option<&str>) -> Arc<ServerContext> {
    let config = ServerConfig::from_env(engine);
    tracing::info!("Engine: {}", config.engine_path.display());
    let context = ServerContext::new(config);
    if !context.binary().is_available() {
        tracing::warn!(
            "Build the engine with 'cargo build --release' or point --engine at it; \
             every tool call will fail until then"
        );
    }
    Arc::new(context)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            tracing::info!("MicroFetch MCP server (stdio)");
            let handler = ProtocolHandler::new(open_context(cli.engine.as_deref()));
            let transport = StdioTransport::new(handler);
            transport.run().await?;
        }

        #[cfg(feature = "sse")]
        Commands::ServeHttp { addr, token } => {
            use microfetch_mcp::transport::sse::{SseTransport, TOKEN_ENV};

            // CLI flag > env var
            let effective_token = token.or_else(|| std::env::var(TOKEN_ENV).ok());

            tracing::info!("MicroFetch MCP server (HTTP)");
            if effective_token.is_some() {
                tracing::info!("Auth: bearer token required on /mcp");
            }

            let handler = ProtocolHandler::new(open_context(cli.engine.as_deref()));
            let transport = SseTransport::with_token(handler, effective_token);
            transport.run(&addr).await?;
        }

        Commands::Check => {
            let config = ServerConfig::from_env(cli.engine.as_deref());
            let context = ServerContext::new(config);
            match context.require_engine() {
                Ok(binary) => {
                    println!("microfetch binary found at {}", binary.path().display());
                    println!("  Working dir: {}", context.config().working_dir.display());
                }
                Err(e) => {
                    eprintln!("{e}");
                    std::process::exit(1);
                }
            }
        }

        Commands::Info => {
            let capabilities = microfetch_mcp::types::InitializeResult::advertised();
            let tools = ToolRegistry::list_tools();
            let mut info = microfetch_mcp::transport::info_document("stdio");
            info["protocol_version"] = serde_json::json!(capabilities.protocol_version);
            info["capabilities"] = serde_json::to_value(&capabilities.capabilities)?;
            info["tools"] = serde_json::json!(tools.iter().map(|t| &t.name).collect::<Vec<_>>());
            info["tool_count"] = serde_json::json!(tools.len());
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "microfetch-mcp", &mut std::io::stdout());
        }

        Commands::Repl => {
            let context = open_context(cli.engine.as_deref());
            let runtime = tokio::runtime::Handle::current();
            tokio::task::spawn_blocking(move || microfetch_mcp::repl::run(context, runtime))
                .await??;
        }
    }

    Ok(())
}
