//! Interactive REPL for poking at the dispatch layer by hand.
//!
//! Launch with `microfetch-mcp repl`. Type `/help` for available commands,
//! Tab for completion.

use std::sync::Arc;

use rustyline::completion::{Completer, Pair};
use rustyline::config::CompletionType;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{
    Cmd, ConditionalEventHandler, Config, Editor, Event, EventContext, EventHandler, Helper,
    KeyEvent, RepeatCount,
};
use serde_json::Value;
use tokio::runtime::Handle;

use crate::context::ServerContext;
use crate::resources::ResourceRegistry;
use crate::tools::ToolRegistry;

/// Available REPL commands.
const COMMANDS: &[(&str, &str)] = &[
    ("/info", "Show server, engine, and cache status"),
    ("/tools", "List available MCP tools"),
    ("/call", "Call a tool: /call <tool> [json-args]"),
    ("/resources", "List cached resources"),
    ("/read", "Print a resource: /read <uri>"),
    ("/clear", "Clear the screen"),
    ("/help", "Show available commands"),
    ("/exit", "Quit the REPL"),
];

/// Tab completion for commands and, after `/call`, tool names.
struct FetchHelper {
    tools: Vec<String>,
}

impl Completer for FetchHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let input = &line[..pos];

        if !input.contains(' ') {
            let matches: Vec<Pair> = COMMANDS
                .iter()
                .filter(|(cmd, _)| cmd.starts_with(input))
                .map(|(cmd, desc)| Pair {
                    display: format!("{cmd:<16} {desc}"),
                    replacement: format!("{cmd} "),
                })
                .collect();
            return Ok((0, matches));
        }

        if let Some(partial) = input.strip_prefix("/call ") {
            if !partial.contains(' ') {
                let matches: Vec<Pair> = self
                    .tools
                    .iter()
                    .filter(|t| t.starts_with(partial))
                    .map(|t| Pair {
                        display: t.clone(),
                        replacement: format!("{t} "),
                    })
                    .collect();
                return Ok(("/call ".len(), matches));
            }
        }

        Ok((pos, Vec::new()))
    }
}

impl Hinter for FetchHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        if pos < line.len() || line.is_empty() {
            return None;
        }
        if line.starts_with('/') && !line.contains(' ') {
            for (cmd, _) in COMMANDS {
                if cmd.starts_with(line) && *cmd != line {
                    return Some(cmd[line.len()..].to_string());
                }
            }
        }
        None
    }
}

impl Highlighter for FetchHelper {}
impl Validator for FetchHelper {}
impl Helper for FetchHelper {}

struct TabCompleteOrAcceptHint;

impl ConditionalEventHandler for TabCompleteOrAcceptHint {
    fn handle(
        &self,
        _evt: &Event,
        _n: RepeatCount,
        _positive: bool,
        ctx: &EventContext<'_>,
    ) -> Option<Cmd> {
        if ctx.has_hint() {
            Some(Cmd::CompleteHint)
        } else {
            Some(Cmd::Complete)
        }
    }
}

/// Run the interactive REPL. Blocks the calling thread; tool calls are
/// driven on `runtime`.
pub fn run(ctx: Arc<ServerContext>, runtime: Handle) -> anyhow::Result<()> {
    eprintln!();
    eprintln!(
        "  \x1b[32m\u{25c9}\x1b[0m \x1b[1mmicrofetch-mcp v{}\x1b[0m \x1b[90m(engine: {})\x1b[0m",
        env!("CARGO_PKG_VERSION"),
        ctx.binary().path().display()
    );
    if !ctx.binary().is_available() {
        eprintln!("    \x1b[33m{}\x1b[0m", ctx.binary().missing_message());
    }
    eprintln!();
    eprintln!(
        "    Press \x1b[36m/\x1b[0m to browse commands, \x1b[90mTab\x1b[0m to complete, \x1b[90m/exit\x1b[0m to quit."
    );
    eprintln!();

    let config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .completion_type(CompletionType::List)
        .completion_prompt_limit(20)
        .build();

    let mut rl: Editor<FetchHelper, rustyline::history::DefaultHistory> =
        Editor::with_config(config)?;
    rl.set_helper(Some(FetchHelper {
        tools: ToolRegistry::tool_names(),
    }));
    rl.bind_sequence(
        KeyEvent::from('\t'),
        EventHandler::Conditional(Box::new(TabCompleteOrAcceptHint)),
    );

    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    let hist_path = std::path::PathBuf::from(&home).join(".microfetch_mcp_history");
    if hist_path.exists() {
        if let Err(e) = rl.load_history(&hist_path) {
            tracing::debug!("Could not load REPL history: {e}");
        }
    }

    let prompt = " \x1b[36mfetch>\x1b[0m ";

    loop {
        match rl.readline(prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let input = line.strip_prefix('/').unwrap_or(line);
                if input.is_empty() {
                    cmd_help();
                    continue;
                }

                let mut parts = input.splitn(2, ' ');
                let cmd = parts.next().unwrap_or("");
                let args = parts.next().unwrap_or("").trim();

                match cmd {
                    "exit" | "quit" => {
                        eprintln!("  Goodbye!");
                        break;
                    }
                    "help" | "h" | "?" => cmd_help(),
                    "clear" | "cls" => eprint!("\x1b[2J\x1b[H"),
                    "info" => cmd_info(&ctx),
                    "tools" => cmd_tools(),
                    "call" => cmd_call(args, &ctx, &runtime),
                    "resources" => cmd_resources(&ctx),
                    "read" => cmd_read(args, &ctx),
                    _ => {
                        eprintln!("  Unknown command '/{cmd}'. Type /help for commands.");
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                eprintln!("  \x1b[90m(Ctrl+C)\x1b[0m Type \x1b[1m/exit\x1b[0m to quit.");
            }
            Err(ReadlineError::Eof) => {
                eprintln!("  Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("  Error: {err}");
                break;
            }
        }
    }

    if let Err(e) = rl.save_history(&hist_path) {
        tracing::debug!("Could not save REPL history: {e}");
    }

    Ok(())
}

fn cmd_help() {
    eprintln!();
    eprintln!("  Commands:");
    eprintln!();
    for (cmd, desc) in COMMANDS {
        eprintln!("    {cmd:<18} {desc}");
    }
    eprintln!();
    eprintln!("  Example: /call fetch {{\"url\": \"https://example.com\", \"cache\": true}}");
    eprintln!();
}

fn cmd_info(ctx: &ServerContext) {
    let capabilities = crate::types::InitializeResult::advertised();
    eprintln!();
    eprintln!(
        "  Server:   {} v{}",
        capabilities.server_info.name, capabilities.server_info.version
    );
    eprintln!("  Protocol: {}", capabilities.protocol_version);
    eprintln!("  Tools:    {}", ToolRegistry::list_tools().len());
    eprintln!(
        "  Engine:   {} ({})",
        ctx.binary().path().display(),
        if ctx.binary().is_available() { "available" } else { "missing" }
    );
    eprintln!("  Cached:   {}", ctx.cache().len());
    eprintln!();
}

fn cmd_tools() {
    let tools = ToolRegistry::list_tools();
    eprintln!();
    eprintln!("  {} MCP tools available:", tools.len());
    eprintln!();
    for tool in &tools {
        let summary = tool
            .description
            .as_deref()
            .and_then(|d| d.lines().next())
            .unwrap_or("");
        eprintln!("    {:<18} {summary}", tool.name);
    }
    eprintln!();
}

fn cmd_call(args: &str, ctx: &ServerContext, runtime: &Handle) {
    let mut parts = args.splitn(2, ' ');
    let name = parts.next().unwrap_or("");
    if name.is_empty() {
        eprintln!("  Usage: /call <tool> [json-args]");
        return;
    }

    let arguments = match parts.next().map(str::trim).filter(|a| !a.is_empty()) {
        None => None,
        Some(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(value) => Some(value),
            Err(e) => {
                eprintln!("  Invalid JSON arguments: {e}");
                return;
            }
        },
    };

    let result = runtime.block_on(ToolRegistry::call(name, arguments, ctx));
    let marker = if result.is_error() { "\x1b[31merror\x1b[0m" } else { "\x1b[32mok\x1b[0m" };
    eprintln!("  [{marker}]");
    println!("{}", result.joined_text());
}

fn cmd_resources(ctx: &ServerContext) {
    let resources = ResourceRegistry::list_resources(ctx);
    eprintln!();
    for resource in &resources {
        eprintln!("    {:<36} {}", resource.uri, resource.name);
    }
    eprintln!();
}

fn cmd_read(args: &str, ctx: &ServerContext) {
    let Some(uri) = args.split_whitespace().next() else {
        eprintln!("  Usage: /read <uri>");
        return;
    };
    match ResourceRegistry::read(uri, ctx) {
        Ok(result) => {
            for content in result.contents {
                println!("{}", content.text.unwrap_or_default());
            }
        }
        Err(e) => eprintln!("  {e}"),
    }
}
