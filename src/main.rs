//! PalmTree CLI
//!
//! Main entry point for the `palmtree` command.

use clap::{Args, Parser, Subcommand};
use miette::Result;
use palmtree::{Config, Interpreter, Scoping, SourceFile, UnknownChars};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "palmtree")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Interpreter for the PalmTree scripting language", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a PalmTree source file
    Run {
        /// Input file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        options: RunOptions,
    },

    /// Run a snippet given on the command line
    Eval {
        /// Source text
        #[arg(value_name = "SOURCE")]
        source: String,

        #[command(flatten)]
        options: RunOptions,
    },

    /// Show information about the interpreter
    Info,
}

#[derive(Args)]
struct RunOptions {
    /// Print an intermediate form instead of running
    #[arg(long, value_enum)]
    emit: Option<EmitType>,

    /// Flat namespace and silent character skipping, as older releases did
    #[arg(long)]
    legacy: bool,

    /// Skip characters the lexer does not recognise
    #[arg(long)]
    skip_unknown: bool,

    /// Maximum nesting of lambda calls
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,

    /// Print the global environment after the run
    #[arg(long)]
    show_env: bool,
}

impl RunOptions {
    fn config(&self) -> Config {
        let mut config = if self.legacy {
            Config::legacy()
        } else {
            Config::default()
        };
        if self.skip_unknown {
            config.unknown_chars = UnknownChars::Skip;
        }
        if let Some(depth) = self.max_depth {
            config.max_call_depth = depth;
        }
        config
    }
}

#[derive(Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum EmitType {
    /// Token stream (JSON)
    Tokens,
    /// Indented syntax tree
    Ast,
    /// Syntax tree (JSON)
    AstJson,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Diagnostics go to stderr; stdout carries program output only
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Commands::Run { input, options } => run(&input, &options),
        Commands::Eval { source, options } => execute(SourceFile::new("<eval>", source), &options),
        Commands::Info => info(),
    }
}

fn run(input: &Path, options: &RunOptions) -> Result<()> {
    tracing::info!("Running {:?}", input);

    let source = std::fs::read_to_string(input)
        .map_err(|e| miette::miette!("Failed to read input file: {}", e))?;

    execute(
        SourceFile::new(input.to_string_lossy().to_string(), source),
        options,
    )
}

fn execute(file: SourceFile, options: &RunOptions) -> Result<()> {
    let config = options.config();
    tracing::debug!(?config, "configuration");

    // 1. Lex
    let tokens = palmtree::lexer::lex_with(&file.content, config.unknown_chars)
        .map_err(|e| file.report(e))?;

    if options.emit == Some(EmitType::Tokens) {
        let json = serde_json::to_string_pretty(&tokens)
            .map_err(|e| miette::miette!("Failed to serialize tokens: {}", e))?;
        println!("{}", json);
        return Ok(());
    }

    // 2. Parse
    let program = palmtree::parser::parse(&tokens).map_err(|e| file.report(e))?;

    match options.emit {
        Some(EmitType::Ast) => {
            print!("{}", program.dump());
            return Ok(());
        }
        Some(EmitType::AstJson) => {
            let json = serde_json::to_string_pretty(&program)
                .map_err(|e| miette::miette!("Failed to serialize AST: {}", e))?;
            println!("{}", json);
            return Ok(());
        }
        Some(EmitType::Tokens) | None => {}
    }

    // 3. Evaluate
    let mut interpreter = Interpreter::with_config(&program, config);
    interpreter.run().map_err(|e| file.report(e))?;

    if options.show_env {
        println!("=== Environment ===");
        for (name, binding) in interpreter.env().globals() {
            let mutability = if binding.mutable { " mut" } else { "" };
            println!(
                "  {}{}: {} = {}",
                name,
                mutability,
                binding.value.type_name(),
                binding.value
            );
        }
    }

    Ok(())
}

fn info() -> Result<()> {
    let config = Config::default();

    println!("PalmTree Interpreter");
    println!("Version: {}", palmtree::VERSION);
    println!();
    println!("Builtins:");
    for name in palmtree::Builtins::standard().names() {
        println!("  - {}", name);
    }
    println!();
    println!("Defaults:");
    match config.scoping {
        Scoping::Stack => println!("  - Scoping: stack (parameters shadow)"),
        Scoping::Flat => println!("  - Scoping: flat (single namespace)"),
    }
    match config.unknown_chars {
        UnknownChars::Reject => println!("  - Unknown characters: rejected"),
        UnknownChars::Skip => println!("  - Unknown characters: skipped"),
    }
    println!("  - Max call depth: {}", config.max_call_depth);

    Ok(())
}
