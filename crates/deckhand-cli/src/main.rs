//! Deckhand - product template resolver
//!
//! Usage:
//!   deckhand resolve <product-dir>         # Print the resolved templates
//!   deckhand list <product-dir> [kind]     # List template names
//!   deckhand hash <product-dir>            # Print the content key

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use deckhand_core::config::{ConfigStore, DeckhandConfig};
use deckhand_core::product::{NoCache, ProductTemplates, ResultCache, content_key};
use deckhand_core::template::ResolvedBundle;

#[derive(Parser)]
#[command(name = "deckhand")]
#[command(about = "Resolve product instance and application templates", long_about = None)]
struct Cli {
    /// Path to deckhand.toml (default: user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve all templates of a product and print the result
    Resolve {
        /// Product directory containing the template folders
        product_dir: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,

        /// Resolve even if a cached result exists
        #[arg(long)]
        no_cache: bool,
    },

    /// List the names of resolved templates
    #[command(alias = "ls")]
    List {
        /// Product directory containing the template folders
        product_dir: PathBuf,

        /// Only list this kind of template
        kind: Option<TemplateKind>,
    },

    /// Print the content key a product resolves under
    Hash {
        /// Product directory containing the template folders
        product_dir: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// YAML, in the same layout as the template files
    Yaml,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TemplateKind {
    /// Instance templates
    Instance,
    /// Application templates
    Application,
    /// Parameter templates
    Parameter,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "deckhand=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Resolve {
            product_dir,
            format,
            no_cache,
        } => run_resolve(&config, &product_dir, format, no_cache),
        Commands::List { product_dir, kind } => run_list(&config, &product_dir, kind),
        Commands::Hash { product_dir } => run_hash(&config, &product_dir),
    }
}

fn load_config(path: Option<&Path>) -> Result<DeckhandConfig> {
    let store = match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            ConfigStore::from_path(path)
        }
        None => ConfigStore::from_default_location()?,
    };
    store
        .load()
        .with_context(|| format!("Failed to load config: {}", store.config_path().display()))
}

fn load_product(
    config: &DeckhandConfig,
    product_dir: &Path,
    no_cache: bool,
) -> Result<ProductTemplates> {
    let cache: Box<dyn ResultCache> = if no_cache {
        debug!("Result cache disabled on the command line");
        Box::new(NoCache)
    } else {
        match config.cache_dir()? {
            Some(dir) => debug!(dir = %dir.display(), "Using result cache"),
            None => debug!("Result cache disabled in config"),
        }
        config.result_cache()?
    };

    let templates =
        ProductTemplates::load(product_dir, cache.as_ref(), &config.resolve_options())?;
    info!(
        product = %product_dir.display(),
        key = templates.key(),
        "Loaded product templates"
    );
    Ok(templates)
}

fn run_resolve(
    config: &DeckhandConfig,
    product_dir: &Path,
    format: OutputFormat,
    no_cache: bool,
) -> Result<()> {
    let templates = load_product(config, product_dir, no_cache)?;
    print_bundle(templates.bundle(), format)
}

fn print_bundle(bundle: &ResolvedBundle, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(bundle)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(bundle)?),
    }
    Ok(())
}

fn run_list(config: &DeckhandConfig, product_dir: &Path, kind: Option<TemplateKind>) -> Result<()> {
    let templates = load_product(config, product_dir, false)?;
    let wanted = |k: TemplateKind| kind.is_none_or(|only| only == k);

    if wanted(TemplateKind::Instance) {
        println!("Instance Templates ({}):", templates.instance_templates().len());
        for itd in templates.instance_templates() {
            let apps: usize = itd.groups.iter().map(|g| g.applications.len()).sum();
            println!(
                "  {:<40} {:>3} group(s) {:>3} application(s)",
                itd.name,
                itd.groups.len(),
                apps
            );
        }
        println!();
    }

    if wanted(TemplateKind::Application) {
        println!(
            "Application Templates ({}):",
            templates.application_templates().len()
        );
        for atd in templates.application_templates() {
            println!(
                "  {:<30} {:<40} {}",
                atd.id,
                atd.display_name(),
                atd.app.application.as_deref().unwrap_or("-")
            );
        }
        println!();
    }

    if wanted(TemplateKind::Parameter) {
        println!(
            "Parameter Templates ({}):",
            templates.parameter_templates().len()
        );
        for ptd in templates.parameter_templates() {
            println!(
                "  {:<30} {}",
                ptd.id,
                ptd.name.as_deref().unwrap_or("-")
            );
        }
        println!();
    }

    Ok(())
}

fn run_hash(config: &DeckhandConfig, product_dir: &Path) -> Result<()> {
    if !product_dir.is_dir() {
        anyhow::bail!("Product directory not found: {}", product_dir.display());
    }
    println!("{}", content_key(product_dir, &config.resolve_options())?);
    Ok(())
}
