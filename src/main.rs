use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use miette::{Context, IntoDiagnostic, Result};
use tracing_subscriber::EnvFilter;

use wikigraph_build::export::GraphDocument;
use wikigraph_core::{OutputFormat, SizingMode, WikigraphConfig};

const DEFAULT_CONFIG_FILE: &str = ".wikigraph.toml";

#[derive(Parser)]
#[command(
    name = "wikigraph",
    version,
    about = "Knowledge-graph builder for wiki-linked documentation sites",
    long_about = "wikigraph turns a folder of markdown pages that reference each other with\n\
                   [[wiki-links]] into a graph.json for a force-directed graph view.\n\n\
                   Examples:\n  \
                     wikigraph build                       Build site/assets/js/graph.json from docs/\n  \
                     wikigraph build --site-name Wiki/     Add a site-root node named Wiki\n  \
                     wikigraph local --url /cs/sorting/    Show the neighbourhood of one page\n  \
                     wikigraph init                        Write a default .wikigraph.toml"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .wikigraph.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        long_help = "Output format for command results.\n\n\
                       Formats:\n  \
                         text      Human-readable summary (default)\n  \
                         json      Machine-readable JSON\n  \
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
    /// Build the graph document for a docs directory
    #[command(long_about = "Build the graph document for a docs directory.\n\n\
        Walks the docs directory, resolves [[wiki-links]] between pages, backfills\n\
        directory nodes, sizes and categorises every node, and writes graph.json\n\
        under the site directory. Prints a build report.\n\n\
        Examples:\n  wikigraph build\n  wikigraph build --docs content --site-dir public\n  wikigraph build --sizing link-count --format json")]
    Build {
        /// Docs directory (default: from config, else docs)
        #[arg(long)]
        docs: Option<PathBuf>,

        /// Site output directory (default: from config, else site)
        #[arg(long)]
        site_dir: Option<PathBuf>,

        /// Site name, used as base path for page keys and as root node
        #[arg(long)]
        site_name: Option<String>,

        /// Sizing policy: depth or link-count
        #[arg(long)]
        sizing: Option<SizingMode>,
    },
    /// Show the local graph of one page
    #[command(long_about = "Show the local graph of one page.\n\n\
        Prints the links touching the page whose URL is given, and the nodes they\n\
        connect. Reads an existing graph.json, or builds the graph in memory when\n\
        none has been written yet.\n\n\
        Examples:\n  wikigraph local --url /cs/sorting/\n  wikigraph local --url /cs/ --graph public/assets/js/graph.json")]
    Local {
        /// Page URL, as it appears in the graph's `value` field
        #[arg(long)]
        url: String,

        /// Graph document to read (default: the configured output path)
        #[arg(long)]
        graph: Option<PathBuf>,
    },
    /// Create a default .wikigraph.toml configuration file
    #[command(long_about = "Create a default .wikigraph.toml configuration file.\n\n\
        Generates a commented template with all available options.\n\
        Fails if .wikigraph.toml already exists.")]
    Init,
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
        println!("\x1b[1mwikigraph\x1b[0m v{version} - knowledge graphs for wiki-linked docs\n");

        println!("Quick start:");
        println!("  \x1b[36mwikigraph init\x1b[0m               Create a .wikigraph.toml config file");
        println!("  \x1b[36mwikigraph build\x1b[0m              Build graph.json from your docs\n");

        println!("All commands:");
        println!("  \x1b[32mbuild\x1b[0m   Walk docs, resolve links, write graph.json");
        println!("  \x1b[32mlocal\x1b[0m   Neighbourhood of a single page");
        println!("  \x1b[32minit\x1b[0m    Create default configuration\n");
    } else {
        println!("wikigraph v{version} - knowledge graphs for wiki-linked docs\n");

        println!("Quick start:");
        println!("  wikigraph init               Create a .wikigraph.toml config file");
        println!("  wikigraph build              Build graph.json from your docs\n");

        println!("All commands:");
        println!("  build   Walk docs, resolve links, write graph.json");
        println!("  local   Neighbourhood of a single page");
        println!("  init    Create default configuration\n");
    }

    println!("Run 'wikigraph <command> --help' for details.");
}

fn load_config(path: Option<&Path>) -> Result<WikigraphConfig> {
    match path {
        Some(path) => WikigraphConfig::from_file(path)
            .wrap_err_with(|| format!("loading {}", path.display())),
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                Ok(WikigraphConfig::from_file(default_path)?)
            } else {
                Ok(WikigraphConfig::default())
            }
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn spinner(message: &'static str) -> Option<indicatif::ProgressBar> {
    if !std::io::stderr().is_terminal() {
        return None;
    }
    let pb = indicatif::ProgressBar::new_spinner();
    let template = "{spinner:.cyan} {msg} ({elapsed})";
    if let Ok(style) = indicatif::ProgressStyle::with_template(template) {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(120));
    Some(pb)
}

fn print_local(doc: &GraphDocument, url: &str, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", doc.to_json()?),
        OutputFormat::Markdown => {
            println!("# Local graph of `{url}`\n");
            if doc.nodes.is_empty() {
                println!("_No links._");
                return Ok(());
            }
            println!("| Id | Name | URL | Size |");
            println!("|----|------|-----|------|");
            for n in &doc.nodes {
                println!("| {} | {} | {} | {} |", n.id, n.name, n.value, n.symbol_size);
            }
            println!("\n**Links:** {}", doc.links.len());
        }
        OutputFormat::Text => {
            if doc.nodes.is_empty() {
                println!("No links touch {url}");
                return Ok(());
            }
            let name_of = |id: &str| {
                doc.nodes
                    .iter()
                    .find(|n| n.id == id)
                    .map_or(id.to_string(), |n| n.name.clone())
            };
            println!("Local graph of {url}: {} nodes, {} links", doc.nodes.len(), doc.links.len());
            for link in &doc.links {
                println!("  {} -> {}", name_of(&link.source), name_of(&link.target));
            }
        }
    }
    Ok(())
}

const DEFAULT_CONFIG: &str = r#"# wikigraph configuration

[site]
# Site name. Used as the base path page keys are joined onto and as the key
# of the root node. "Wiki/" gives keys like "Wiki/cs/page"; "" adds no root.
# name = ""
# docs_dir = "docs"
# site_dir = "site"
# base_url = "/"
# use_directory_urls = true

[graph]
# "depth" sizes nodes by nesting and groups them by section;
# "link-count" sizes nodes by their number of links, without categories.
# sizing = "depth"
# output = "assets/js/graph.json"
# extensions = ["md", "markdown"]
# exclude = ["drafts/**"]
"#;

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .into_diagnostic()?;
    human_panic::setup_panic!();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let use_color = match cli.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => std::io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    };

    match cli.command {
        None => {
            print_welcome(use_color);
        }
        Some(Command::Build {
            docs,
            site_dir,
            site_name,
            sizing,
        }) => {
            let mut config = load_config(cli.config.as_deref())?;
            if let Some(docs) = docs {
                config.site.docs_dir = docs;
            }
            if let Some(site_dir) = site_dir {
                config.site.site_dir = site_dir;
            }
            if let Some(name) = site_name {
                config.site.name = name;
            }
            if let Some(sizing) = sizing {
                config.graph.sizing = sizing;
            }
            tracing::debug!(
                docs = %config.site.docs_dir.display(),
                site_dir = %config.site.site_dir.display(),
                sizing = %config.graph.sizing,
                "building graph"
            );

            let pb = spinner("Building graph...");
            let report = wikigraph_build::plugin::build_site(&config).inspect_err(|_e| {
                if let Some(pb) = &pb {
                    pb.finish_with_message("Failed");
                }
            })?;
            if let Some(pb) = pb {
                pb.finish_and_clear();
            }

            match cli.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&report).into_diagnostic()?);
                }
                OutputFormat::Markdown => print!("{}", report.to_markdown()),
                OutputFormat::Text => print!("{report}"),
            }
        }
        Some(Command::Local { url, graph }) => {
            let config = load_config(cli.config.as_deref())?;
            let path = graph.unwrap_or_else(|| config.output_path());
            let document = if path.exists() {
                GraphDocument::read_from(&path)
                    .wrap_err_with(|| format!("reading {}", path.display()))?
            } else {
                tracing::info!(path = %path.display(), "no graph written yet, building in memory");
                let pages = wikigraph_build::walker::walk_docs(&config)?;
                wikigraph_build::generate_graph(&config, &pages)
            };
            print_local(&document.local_graph(&url), &url, cli.format)?;
        }
        Some(Command::Init) => {
            let path = Path::new(DEFAULT_CONFIG_FILE);
            if path.exists() {
                miette::bail!("{DEFAULT_CONFIG_FILE} already exists");
            }
            std::fs::write(path, DEFAULT_CONFIG).into_diagnostic()?;
            println!("Created {DEFAULT_CONFIG_FILE} with default configuration");
        }
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "wikigraph", &mut std::io::stdout());
        }
    }

    Ok(())
}
