use anyhow::Result;
use book_finder::app::{parse_command, visible_docs, App, Command, Outcome};
use book_finder::config::{
    default_config_path, find_config_file, get_config, load_config, write_config_file, Config,
    LOCAL_CONFIG_FILE,
};
use book_finder::fetch::Fetcher;
use book_finder::models::BookDoc;
use book_finder::pagination::page_count;
use book_finder::ui::{self, status_line, Status, ERROR_MESSAGE, LOADING_MESSAGE};
use book_finder::utils::{is_terminal, terminal_width, truncate_with_ellipsis, HttpClient};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Book Finder - Search the Open Library catalog by author
#[derive(Parser, Debug)]
#[command(name = "book-finder")]
#[command(version = book_finder::VERSION)]
#[command(about = "Search the Open Library catalog by author, one page at a time", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Output format for one-shot searches
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Search API host (default: https://openlibrary.org)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Show all environment variables
    #[arg(long)]
    env: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format
    Plain,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search once and print a single page of results
    #[command(alias = "s")]
    Search {
        /// Author to search for (default: from config)
        query: Option<String>,

        /// Page to print
        #[arg(long, short, default_value_t = 1)]
        page: usize,

        /// Results per page
        #[arg(long)]
        page_size: Option<NonZeroUsize>,

        /// Sort mode sent to the API
        #[arg(long)]
        sort: Option<String>,
    },

    /// Interactive search with paging commands
    #[command(alias = "i")]
    Shell {
        /// Author searched at startup (default: from config)
        query: Option<String>,

        /// Results per page
        #[arg(long)]
        page_size: Option<NonZeroUsize>,
    },

    /// Write a default configuration file
    InitConfig {
        /// Destination (default: user config directory)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Print all available environment variables
fn print_env_vars() {
    println!("Book Finder - Environment Variables");
    println!();
    println!("API Settings:");
    println!("  BOOK_FINDER_API__BASE_URL          Search API host (default: https://openlibrary.org)");
    println!("  BOOK_FINDER_API__SORT              Sort mode sent with searches (default: new)");
    println!("  BOOK_FINDER_API__USER_AGENT        User agent for HTTP requests");
    println!("  BOOK_FINDER_API__TIMEOUT_SECONDS   Request timeout in seconds (default: 30)");
    println!();
    println!("Display Settings:");
    println!("  BOOK_FINDER_DISPLAY__PAGE_SIZE     Results per page (default: 10)");
    println!("  BOOK_FINDER_DISPLAY__DEFAULT_QUERY Author searched at startup (default: tolkien)");
    println!();
    println!("Global Proxy Settings:");
    println!("  HTTP_PROXY                  HTTP proxy URL (e.g., http://proxy:8080)");
    println!("  HTTPS_PROXY                 HTTPS proxy URL (e.g., https://proxy:8080)");
    println!("  NO_PROXY                    Comma-separated list of hosts to bypass proxy");
    println!();
    println!("Other Settings:");
    println!("  RUST_LOG                    Rust logging level (e.g., debug, info, warn, error)");
    println!();
    println!("Example:");
    println!("  export BOOK_FINDER_DISPLAY__PAGE_SIZE=\"20\"");
    std::process::exit(0);
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.env {
        print_env_vars();
    }

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("book_finder={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(Commands::InitConfig { path, force }) = &cli.command {
        return init_config(path.clone(), *force);
    }

    let config = resolve_config(&cli)?;
    let styled = is_terminal() && !cli.no_color;
    let fetcher: Arc<dyn Fetcher> = Arc::new(HttpClient::new(
        config.api.user_agent(),
        config.api.timeout(),
    )?);

    match cli.command {
        Some(Commands::Search {
            query,
            page,
            page_size,
            sort,
        }) => {
            let mut config = config;
            if let Some(sort) = sort {
                config.api.sort = sort;
            }
            let query = query.unwrap_or_else(|| config.display.default_query.clone());
            let page_size = page_size.unwrap_or_else(|| config.display.page_size());
            run_search(&config, &query, page, page_size, cli.output, cli.quiet, fetcher).await
        }
        Some(Commands::Shell { query, page_size }) => {
            let query = query.unwrap_or_else(|| config.display.default_query.clone());
            let page_size = page_size.unwrap_or_else(|| config.display.page_size());
            let app = App::with_query(&config, &query, page_size, fetcher)?;
            run_shell(app, styled).await
        }
        Some(Commands::InitConfig { .. }) => Ok(()),
        None => run_shell(App::new(&config, fetcher)?, styled).await,
    }
}

/// Load config from `--config`, a discovered file, or the environment,
/// then apply command-line overrides.
fn resolve_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(path) = &cli.config {
        load_config(path)?
    } else if let Some(path) = find_config_file() {
        tracing::info!("Using config file: {}", path.display());
        load_config(&path)?
    } else {
        get_config()?
    };

    if let Some(timeout) = cli.timeout {
        config.api.timeout_seconds = timeout;
    }
    if let Some(base_url) = &cli.base_url {
        config.api.base_url = base_url.clone();
    }

    Ok(config)
}

fn init_config(path: Option<PathBuf>, force: bool) -> Result<()> {
    let path = path
        .or_else(default_config_path)
        .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE));

    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    write_config_file(&Config::default(), &path)?;
    println!(
        "{}",
        status_line(
            Status::Success,
            &format!("Wrote {}", path.display()),
            is_terminal()
        )
    );
    Ok(())
}

async fn run_search(
    config: &Config,
    query: &str,
    page: usize,
    page_size: NonZeroUsize,
    format: OutputFormat,
    quiet: bool,
    fetcher: Arc<dyn Fetcher>,
) -> Result<()> {
    let mut app = App::with_query(config, query, page_size, fetcher)?;

    let spinner = (!quiet && is_terminal()).then(|| ui::loading_spinner(LOADING_MESSAGE));
    let state = app.settled().await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    if state.is_error {
        anyhow::bail!(ERROR_MESSAGE);
    }

    if page > 1 {
        if let Outcome::Message(message) = app.handle(Command::Page(page)) {
            anyhow::bail!(message);
        }
    }

    let docs = visible_docs(&state.data.docs, app.page_state());
    let summary = PageSummary {
        query,
        page: app.page_state().current_page(),
        pages: page_count(state.data.docs.len(), page_size.get()).max(1),
        total: state.data.docs.len(),
    };
    output_books(docs, &summary, format)
}

/// Where a printed page sits in the full result list
struct PageSummary<'a> {
    query: &'a str,
    page: usize,
    pages: usize,
    total: usize,
}

fn output_books(docs: &[BookDoc], summary: &PageSummary<'_>, format: OutputFormat) -> Result<()> {
    let actual_format = if format == OutputFormat::Auto {
        if is_terminal() {
            OutputFormat::Table
        } else {
            OutputFormat::Json
        }
    } else {
        format
    };

    match actual_format {
        OutputFormat::Json => {
            let links: Vec<String> = docs.iter().map(BookDoc::google_link).collect();
            let value = serde_json::json!({
                "query": summary.query,
                "page": summary.page,
                "pages": summary.pages,
                "total": summary.total,
                "docs": docs,
                "links": links,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Plain => {
            for doc in docs {
                println!("{} - {}", doc.title, doc.authors());
                println!("  {}", doc.google_link());
            }
            println!(
                "Page {} of {}, {} results",
                summary.page, summary.pages, summary.total
            );
        }
        OutputFormat::Table => {
            use comfy_table::{Attribute, Cell, Table};
            let mut table = Table::new();
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.set_header(vec!["#", "Title", "Authors", "Year"]);

            let title_width = (terminal_width() / 2).max(20);
            for (row, doc) in docs.iter().enumerate() {
                let year = doc
                    .first_publish_year
                    .map(|y| y.to_string())
                    .unwrap_or_default();

                table.add_row(vec![
                    Cell::new(row + 1),
                    Cell::new(truncate_with_ellipsis(&doc.title, title_width))
                        .add_attribute(Attribute::Bold),
                    Cell::new(truncate_with_ellipsis(&doc.authors(), 30)),
                    Cell::new(year),
                ]);
            }
            println!("{table}");
            println!(
                "Page {} of {}, {} results",
                summary.page, summary.pages, summary.total
            );
        }
        OutputFormat::Auto => unreachable!(),
    }

    Ok(())
}

async fn run_shell(mut app: App, styled: bool) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut updates = app.subscribe();
    let width = terminal_width();

    println!(
        "{}",
        status_line(Status::Info, "Type an author to search, `help` for commands", styled)
    );
    updates.borrow_and_update();
    redraw(&app, styled, width);
    prompt()?;

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                updates.borrow_and_update();
                println!();
                redraw(&app, styled, width);
                prompt()?;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_command(&line) {
                    Ok(None) => {}
                    Ok(Some(command)) => match app.handle(command) {
                        Outcome::Render => {
                            updates.borrow_and_update();
                            redraw(&app, styled, width);
                        }
                        Outcome::Message(message) => println!("{}", message),
                        Outcome::Quit => break,
                    },
                    Err(err) => {
                        println!("{}", status_line(Status::Error, &err.to_string(), styled));
                    }
                }
                prompt()?;
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        }
    }

    Ok(())
}

fn redraw(app: &App, styled: bool, width: usize) {
    let state = app.state();
    println!(
        "{}",
        ui::render_view(&state, app.page_state(), styled, width)
    );
}

fn prompt() -> Result<()> {
    print!("> ");
    std::io::stdout().flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["book-finder"]);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        assert_eq!(cli.output, OutputFormat::Auto);
        assert!(cli.timeout.is_none());
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::parse_from(["book-finder", "-vv"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_search_command() {
        let cli = Cli::parse_from([
            "book-finder",
            "search",
            "le guin",
            "--page",
            "2",
            "--page-size",
            "5",
            "-o",
            "json",
        ]);
        assert_eq!(cli.output, OutputFormat::Json);
        match cli.command {
            Some(Commands::Search {
                query,
                page,
                page_size,
                sort,
            }) => {
                assert_eq!(query.as_deref(), Some("le guin"));
                assert_eq!(page, 2);
                assert_eq!(page_size.map(NonZeroUsize::get), Some(5));
                assert!(sort.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_rejects_zero_page_size() {
        let result = Cli::try_parse_from(["book-finder", "search", "x", "--page-size", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_shell_alias() {
        let cli = Cli::parse_from(["book-finder", "i", "pratchett"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Shell { query: Some(ref q), .. }) if q == "pratchett"
        ));
    }

    #[test]
    fn test_cli_missing_config_file_is_error() {
        let cli = Cli::parse_from([
            "book-finder",
            "--config",
            "/nonexistent/book-finder.toml",
            "--timeout",
            "5",
        ]);
        assert!(resolve_config(&cli).is_err());
    }

    #[test]
    fn test_cli_overrides_apply() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book-finder.toml");
        std::fs::write(
            &path,
            "[api]\nbase_url = \"http://from-file\"\ntimeout_seconds = 60\n\n[display]\npage_size = 7\n",
        )
        .unwrap();
        let path = path.to_str().unwrap();

        let cli = Cli::parse_from(["book-finder", "--config", path]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.api.base_url, "http://from-file");
        assert_eq!(config.api.timeout_seconds, 60);
        assert_eq!(config.display.page_size, 7);

        let cli = Cli::parse_from([
            "book-finder",
            "--config",
            path,
            "--timeout",
            "5",
            "--base-url",
            "http://x",
        ]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.api.timeout_seconds, 5);
        assert_eq!(config.api.base_url, "http://x");
        assert_eq!(config.display.page_size, 7);
    }

    #[test]
    fn test_cli_version_matches_crate() {
        use clap::CommandFactory;
        assert_eq!(Cli::command().get_version(), Some(book_finder::VERSION));
    }

    #[test]
    fn test_init_config_writes_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config").join("book-finder.toml");

        init_config(Some(path.clone()), false).unwrap();
        let written = book_finder::config::read_config_file(&path).unwrap();
        assert_eq!(written, Config::default());

        assert!(init_config(Some(path.clone()), false).is_err());
        assert!(init_config(Some(path), true).is_ok());
    }
}
