use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};

use thoth_core::{OutputFormat, RetrievalConfig, ThothConfig};
use thoth_doclens::embedding::EmbeddingClient;
use thoth_doclens::index::DocIndex;
use thoth_doclens::retrieve::DocSearch;

/// Default location of the persisted vector index, relative to the cwd.
const DEFAULT_INDEX_PATH: &str = ".thoth/index.json";

#[derive(Parser)]
#[command(
    name = "thoth",
    version,
    about = "AI documentation updater",
    long_about = "Thoth keeps documentation in sync with code — it matches the intent of a code\n\
                   change against your docs corpus and surfaces the pages that need updating.\n\n\
                   Examples:\n  \
                     thoth init                           Create a .thoth.toml config file\n  \
                     thoth index                          Embed the docs corpus into a vector index\n  \
                     thoth search 'added OAuth device flow'   Find docs relevant to a change\n  \
                     thoth search 'renamed config keys' --full  Include full document content\n  \
                     thoth doctor                         Check setup and environment"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .thoth.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        long_help = "Output format for command results.\n\n\
                       Formats:\n  \
                         text      Human-readable summaries (default)\n  \
                         json      Machine-readable JSON with camelCase keys\n  \
                         markdown  GitHub-flavored Markdown"
    )]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,

    /// When to use colors
    #[arg(long, global = true, default_value = "auto")]
    color: ColorChoice,
}

#[derive(Subcommand)]
enum Command {
    /// Build the vector index for the documentation corpus
    #[command(long_about = "Build the vector index for the documentation corpus.\n\n\
        Scans the docs directory, splits each document into overlapping word windows,\n\
        embeds every chunk through the configured provider, and writes the index to\n\
        .thoth/index.json. The index is always rebuilt from scratch; rerun after\n\
        documentation changes.\n\n\
        Examples:\n  thoth index\n  thoth index --docs documentation")]
    Index {
        /// Documentation directory (default: from config, usually ./docs)
        #[arg(long)]
        docs: Option<PathBuf>,

        /// Where to write the index (default: .thoth/index.json)
        #[arg(long)]
        index_file: Option<PathBuf>,
    },
    /// Find documentation relevant to a described code change
    #[command(
        long_about = "Find documentation relevant to a described code change.\n\n\
        Embeds the change summary with the same provider that built the index, ranks\n\
        every indexed chunk by cosine similarity, and returns the best match per\n\
        document above the relevance threshold.\n\n\
        Examples:\n  thoth search 'added OAuth device flow to the login service'\n  \
        thoth search 'renamed retry config keys' --limit 5 --threshold 0.3\n  \
        thoth search 'dropped the v1 ingest endpoint' --full"
    )]
    Search {
        /// Natural-language summary of the code change
        query: String,

        /// Maximum documents to return (default: from config)
        #[arg(long)]
        limit: Option<usize>,

        /// Minimum similarity for a match (default: from config)
        #[arg(long)]
        threshold: Option<f64>,

        /// Documentation directory, used with --full (default: from config)
        #[arg(long)]
        docs: Option<PathBuf>,

        /// Where to read the index from (default: .thoth/index.json)
        #[arg(long)]
        index_file: Option<PathBuf>,

        /// Include full document content in the output, not just snippets
        #[arg(long)]
        full: bool,
    },
    /// Create a default .thoth.toml configuration file
    #[command(long_about = "Create a default .thoth.toml configuration file.\n\n\
        Generates a commented-out template with all available options.\n\
        Fails if .thoth.toml already exists.")]
    Init,
    /// Check your Thoth setup and environment
    #[command(long_about = "Check your Thoth setup and environment.\n\n\
        Runs diagnostics for the config file, docs directory, embedding API key,\n\
        chunking parameters, and the persisted index. Use --format json for\n\
        machine-readable output.")]
    Doctor,
    /// Generate shell completion scripts
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Clone, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    /// Auto-detect based on terminal
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

fn print_welcome(use_color: bool) {
    let version = env!("CARGO_PKG_VERSION");

    if use_color {
        println!(
            "\x1b[1m\x1b[33m\u{1fab6}\x1b[0m \x1b[1mthoth\x1b[0m v{version} — docs that keep up with your code\n"
        );

        println!("Quick start:");
        println!("  \x1b[36mthoth init\x1b[0m                    Create a .thoth.toml config file");
        println!("  \x1b[36mthoth index\x1b[0m                   Embed your docs into a vector index");
        println!("  \x1b[36mthoth search '<change>'\x1b[0m       Find docs affected by a change\n");

        println!("All commands:");
        println!("  \x1b[32mindex\x1b[0m     Build the docs vector index");
        println!("  \x1b[32msearch\x1b[0m    Semantic search over the docs corpus");
        println!("  \x1b[32mdoctor\x1b[0m    Check your setup and environment");
        println!("  \x1b[32minit\x1b[0m      Create default configuration\n");
    } else {
        println!("thoth v{version} — docs that keep up with your code\n");

        println!("Quick start:");
        println!("  thoth init                    Create a .thoth.toml config file");
        println!("  thoth index                   Embed your docs into a vector index");
        println!("  thoth search '<change>'       Find docs affected by a change\n");

        println!("All commands:");
        println!("  index     Build the docs vector index");
        println!("  search    Semantic search over the docs corpus");
        println!("  doctor    Check your setup and environment");
        println!("  init      Create default configuration\n");
    }

    println!("Run 'thoth <command> --help' for details.");
}

#[derive(serde::Serialize)]
struct CheckResult {
    name: &'static str,
    status: &'static str,
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
}

impl CheckResult {
    fn pass(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            status: "pass",
            detail: detail.into(),
            hint: None,
        }
    }

    fn fail(name: &'static str, detail: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            name,
            status: "fail",
            detail: detail.into(),
            hint: Some(hint.into()),
        }
    }

    fn info(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            status: "info",
            detail: detail.into(),
            hint: None,
        }
    }

    fn symbol(&self) -> &'static str {
        match self.status {
            "pass" => "\u{2713}",
            "fail" => "\u{2717}",
            _ => "~",
        }
    }

    fn colored_symbol(&self) -> String {
        match self.status {
            "pass" => "\x1b[32m\u{2713}\x1b[0m".into(),
            "fail" => "\x1b[31m\u{2717}\x1b[0m".into(),
            _ => "\x1b[33m~\x1b[0m".into(),
        }
    }
}

fn run_doctor(config: &ThothConfig, format: OutputFormat, use_color: bool) -> Result<()> {
    let mut checks: Vec<CheckResult> = Vec::new();

    // 1. Config file
    let config_path = Path::new(".thoth.toml");
    if config_path.exists() {
        checks.push(CheckResult::pass("config_file", ".thoth.toml found"));
    } else {
        checks.push(CheckResult::fail(
            "config_file",
            ".thoth.toml not found",
            "run 'thoth init' to create a default config",
        ));
    }

    // 2. Docs directory
    let docs_dir = &config.corpus.docs_dir;
    match thoth_corpus::scan_docs(docs_dir, &config.corpus.extensions) {
        Ok(docs) => checks.push(CheckResult::pass(
            "docs_directory",
            format!("{} ({} documents)", docs_dir.display(), docs.len()),
        )),
        Err(_) => checks.push(CheckResult::fail(
            "docs_directory",
            format!("{} not found", docs_dir.display()),
            "set corpus.docs_dir in .thoth.toml or create the directory",
        )),
    }

    // 3. Embedding provider + API key
    checks.push(CheckResult::pass(
        "embedding_provider",
        format!("{} (model: {})", config.embedding.provider, config.embedding.model),
    ));
    if config.embedding.api_key.is_some() || std::env::var("OPENAI_API_KEY").is_ok() {
        checks.push(CheckResult::pass("embedding_api_key", "OPENAI_API_KEY set"));
    } else {
        checks.push(CheckResult::fail(
            "embedding_api_key",
            "OPENAI_API_KEY not set",
            "export OPENAI_API_KEY=... or set api_key in .thoth.toml [embedding]",
        ));
    }

    // 4. Chunking parameters
    match config.chunking.validate() {
        Ok(()) => checks.push(CheckResult::pass(
            "chunking",
            format!(
                "chunk_size {} / overlap {}",
                config.chunking.chunk_size, config.chunking.overlap
            ),
        )),
        Err(e) => checks.push(CheckResult::fail(
            "chunking",
            e.to_string(),
            "lower chunking.overlap below chunking.chunk_size in .thoth.toml",
        )),
    }

    // 5. Persisted index
    let index_path = Path::new(DEFAULT_INDEX_PATH);
    match DocIndex::load(index_path) {
        Ok(index) => {
            if index.model == config.embedding.model {
                checks.push(CheckResult::pass(
                    "doc_index",
                    format!(
                        "{} documents, {} chunks (model: {}, generated: {})",
                        index.document_count(),
                        index.chunk_count(),
                        index.model,
                        index.generated_at,
                    ),
                ));
            } else {
                checks.push(CheckResult::fail(
                    "doc_index",
                    format!(
                        "index built with '{}' but config uses '{}'",
                        index.model, config.embedding.model
                    ),
                    "run 'thoth index' to rebuild with the configured model",
                ));
            }
        }
        Err(thoth_core::ThothError::IndexNotFound(_)) => {
            checks.push(CheckResult::info(
                "doc_index",
                "not found (run 'thoth index' to create)",
            ));
        }
        Err(e) => {
            checks.push(CheckResult::fail(
                "doc_index",
                format!("unreadable: {e}"),
                "delete the file and run 'thoth index' to rebuild",
            ));
        }
    }

    // Output
    match format {
        OutputFormat::Json => {
            let version = env!("CARGO_PKG_VERSION");
            let json = serde_json::json!({
                "version": version,
                "checks": checks,
            });
            println!("{}", serde_json::to_string_pretty(&json).into_diagnostic()?);
        }
        _ => {
            let version = env!("CARGO_PKG_VERSION");
            println!("Thoth v{version} — Environment Check\n");

            for check in &checks {
                let sym = if use_color {
                    check.colored_symbol()
                } else {
                    check.symbol().to_string()
                };
                let label = check.name.replace('_', " ");
                println!("  {sym} {label:<20} {}", check.detail);
                if let Some(hint) = &check.hint {
                    println!("    hint: {hint}");
                }
            }

            let passed = checks.iter().filter(|c| c.status == "pass").count();
            let failed = checks.iter().filter(|c| c.status == "fail").count();
            let info = checks.iter().filter(|c| c.status == "info").count();
            println!("\n{passed} checks passed, {failed} failed, {info} info");
        }
    }

    Ok(())
}

fn embedding_spinner(message: &str) -> Option<indicatif::ProgressBar> {
    if !std::io::stderr().is_terminal() {
        return None;
    }
    let pb = indicatif::ProgressBar::new_spinner();
    pb.set_style(
        indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})")
            .expect("static spinner template"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(120));
    Some(pb)
}

/// Bail with a help-annotated diagnostic when no embedding API key is
/// reachable, before constructing the client.
fn check_api_key(config: &ThothConfig) -> Result<()> {
    if config.embedding.api_key.is_none() && std::env::var("OPENAI_API_KEY").is_err() {
        miette::bail!(miette::miette!(
            help = "Set OPENAI_API_KEY or add api_key in your .thoth.toml under [embedding]",
            "No API key configured for embedding provider '{}'",
            config.embedding.provider
        ));
    }
    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# Thoth Configuration
# See: https://github.com/calder-hayes/thoth

[embedding]
# Any OpenAI-compatible embeddings endpoint works via base_url
# provider = "openai"
# model = "text-embedding-3-small"
# base_url = "https://api.openai.com/v1"
# dimensions = 1536

[chunking]
# Words per chunk, and words shared between adjacent chunks.
# overlap must stay below chunk_size.
# chunk_size = 500
# overlap = 50

[retrieval]
# top_n = 15
# threshold = 0.15

[corpus]
# docs_dir = "docs"
# extensions = ["md", "mdx", "markdown", "rst", "adoc", "txt"]
"#;

#[tokio::main]
async fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ThothConfig::from_file(path)?,
        None => {
            let default_path = Path::new(".thoth.toml");
            if default_path.exists() {
                ThothConfig::from_file(default_path)?
            } else {
                ThothConfig::default()
            }
        }
    };

    let use_color = match cli.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => std::io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    };

    if cli.verbose {
        eprintln!("format: {}", cli.format);
        eprintln!(
            "embedding: {} (model: {})",
            config.embedding.provider, config.embedding.model
        );
    }

    match cli.command {
        None => {
            print_welcome(use_color);
            return Ok(());
        }
        Some(Command::Index {
            ref docs,
            ref index_file,
        }) => {
            config.chunking.validate()?;

            let docs_dir = docs.clone().unwrap_or_else(|| config.corpus.docs_dir.clone());
            let index_path = index_file
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_INDEX_PATH));

            let documents = thoth_corpus::scan_docs(&docs_dir, &config.corpus.extensions)?;
            if documents.is_empty() {
                miette::bail!(miette::miette!(
                    help = "Point corpus.docs_dir (or --docs) at a directory of markdown files",
                    "No documentation files found under {}",
                    docs_dir.display()
                ));
            }
            eprintln!(
                "Found {} documents under {}",
                documents.len(),
                docs_dir.display()
            );

            check_api_key(&config)?;
            let client = EmbeddingClient::with_config(&config.embedding)?;

            let spinner = embedding_spinner("Embedding documentation chunks...");
            let index = DocIndex::build(&documents, &config.chunking, &client)
                .await
                .inspect_err(|_e| {
                    if let Some(pb) = &spinner {
                        pb.finish_with_message("Failed");
                    }
                })?;
            if let Some(pb) = spinner {
                pb.finish_with_message("Done");
            }

            index.save(&index_path)?;
            eprintln!(
                "Indexed {} chunks from {} documents with {} -> {}",
                index.chunk_count(),
                index.document_count(),
                index.model,
                index_path.display(),
            );
        }
        Some(Command::Search {
            ref query,
            limit,
            threshold,
            ref docs,
            ref index_file,
            full,
        }) => {
            let index_path = index_file
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_INDEX_PATH));

            // Load before touching the provider so a missing index fails
            // fast, offline, with rebuild guidance.
            let index = DocIndex::load(&index_path)?;

            check_api_key(&config)?;
            let client = EmbeddingClient::with_config(&config.embedding)?;
            let engine = DocSearch::new(index, client)?;

            let opts = RetrievalConfig {
                top_n: limit.unwrap_or(config.retrieval.top_n),
                threshold: threshold.unwrap_or(config.retrieval.threshold),
            };

            if cli.verbose {
                eprintln!(
                    "searching {} chunks across {} documents (top_n: {}, threshold: {})",
                    engine.index().chunk_count(),
                    engine.index().document_count(),
                    opts.top_n,
                    opts.threshold,
                );
            }

            if full {
                let docs_dir = docs.clone().unwrap_or_else(|| config.corpus.docs_dir.clone());
                let corpus = thoth_corpus::scan_docs(&docs_dir, &config.corpus.extensions)?;
                let retrieved = engine.retrieve(query, &corpus, &opts).await?;

                match cli.format {
                    OutputFormat::Json => {
                        let matched = retrieved.unwrap_or_default();
                        println!(
                            "{}",
                            serde_json::to_string_pretty(&matched).into_diagnostic()?
                        );
                    }
                    OutputFormat::Markdown => match retrieved {
                        None => println!("No documents matched."),
                        Some(docs) => {
                            println!("# Relevant Documentation\n");
                            for (i, d) in docs.iter().enumerate() {
                                println!(
                                    "## {}. `{}` (score: {:.4})\n\n{}\n",
                                    i + 1,
                                    d.path.display(),
                                    d.score,
                                    d.content,
                                );
                            }
                        }
                    },
                    OutputFormat::Text => match retrieved {
                        None => println!("No documents matched."),
                        Some(docs) => {
                            for (i, d) in docs.iter().enumerate() {
                                println!("{}. {} (score: {:.4})", i + 1, d.path.display(), d.score);
                                println!("{}\n", d.content);
                            }
                        }
                    },
                }
            } else {
                let results = engine.search(query, &opts).await?;

                match cli.format {
                    OutputFormat::Json => {
                        println!(
                            "{}",
                            serde_json::to_string_pretty(&results).into_diagnostic()?
                        );
                    }
                    OutputFormat::Markdown => {
                        if results.is_empty() {
                            println!("No documents matched.");
                        } else {
                            println!("# Relevant Documentation\n");
                            for (i, r) in results.iter().enumerate() {
                                println!(
                                    "## {}. `{}` (score: {:.4})\n\n> {}\n",
                                    i + 1,
                                    r.path.display(),
                                    r.score,
                                    r.snippet,
                                );
                            }
                        }
                    }
                    OutputFormat::Text => {
                        if results.is_empty() {
                            println!("No documents matched.");
                        } else {
                            for (i, r) in results.iter().enumerate() {
                                println!("{}. {} (score: {:.4})", i + 1, r.path.display(), r.score);
                                // Show a snippet preview (first 3 lines)
                                let preview: String = r
                                    .snippet
                                    .lines()
                                    .take(3)
                                    .map(|l| format!("   {l}"))
                                    .collect::<Vec<_>>()
                                    .join("\n");
                                println!("{preview}\n");
                            }
                        }
                    }
                }
            }
        }
        Some(Command::Init) => {
            let path = Path::new(".thoth.toml");
            if path.exists() {
                miette::bail!(".thoth.toml already exists");
            }
            std::fs::write(path, DEFAULT_CONFIG).into_diagnostic()?;
            println!("Created .thoth.toml with default configuration");
        }
        Some(Command::Doctor) => {
            run_doctor(&config, cli.format, use_color)?;
        }
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "thoth", &mut std::io::stdout());
        }
    }

    Ok(())
}
