//! `purbeurre` command-line front end.
//!
//! # Responsibility
//! - Map subcommands onto catalog core services.
//! - Print results as pretty JSON on stdout.

use anyhow::{anyhow, Context, Result};
use clap::{ArgGroup, Parser, Subcommand};
use log::info;
use purbeurre_core::db::open_db;
use purbeurre_core::import::{import_catalog, parse_categories, parse_products};
use purbeurre_core::{
    core_version, default_log_level, init_logging, CatalogConfig, ElementKind, ProductDraft,
    ProfileService, QuotaService, SqliteCategoryRepository, SqliteProductRepository,
    SqliteProfileRepository, StorageQuota, SubstituteService,
};
use rusqlite::Connection;
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "purbeurre", version, about = "Find healthier food substitutes")]
struct Cli {
    /// SQLite catalog file.
    #[arg(long, global = true, default_value = "purbeurre.sqlite3")]
    db: PathBuf,

    /// JSON file overriding catalog limits.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Absolute directory for rotating log files; logging is off without it.
    #[arg(long, global = true)]
    log_dir: Option<String>,

    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Look up categories, else products, matching a free-text query.
    Search {
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// List healthy substitutes of a category or a product.
    #[command(group(ArgGroup::new("target").required(true).args(["category", "product"])))]
    Substitutes {
        /// Category api id, e.g. `en:beverages`.
        #[arg(long)]
        category: Option<String>,
        /// Product ref (barcode).
        #[arg(long)]
        product: Option<String>,
    },
    /// Load Open Food Facts category and product dumps.
    Import {
        #[arg(long)]
        categories: PathBuf,
        #[arg(long)]
        products: Option<PathBuf>,
    },
    /// Create a profile owner.
    UserAdd {
        username: String,
        #[arg(long)]
        email: Option<String>,
    },
    /// Register a stored product to a user.
    Save { username: String, reference: String },
    /// Register a product described by a JSON draft, storing it if needed.
    Register {
        username: String,
        #[arg(long)]
        draft: PathBuf,
    },
    /// Show the products a user registered.
    Saved { username: String },
    /// Remove a product from a user's profile.
    Remove { username: String, reference: String },
    /// Count billed rows against the configured cap.
    Rows,
    /// Print the core version.
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).map_err(|err| anyhow!(err))?;
    }

    let config = match cli.config.as_deref() {
        Some(path) => CatalogConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => CatalogConfig::default(),
    };

    if let Command::Version = cli.command {
        println!("{}", core_version());
        return Ok(());
    }

    let conn = open_db(&cli.db).with_context(|| format!("opening {}", cli.db.display()))?;
    run(&conn, &config, cli.command)
}

fn run(conn: &Connection, config: &CatalogConfig, command: Command) -> Result<()> {
    let lookups = || {
        SubstituteService::new(
            SqliteCategoryRepository::new(conn),
            SqliteProductRepository::new(conn),
            config.clone(),
        )
    };
    let profiles = || {
        ProfileService::new(
            SqliteProductRepository::new(conn),
            SqliteProfileRepository::new(conn),
        )
    };
    let quota = || {
        QuotaService::new(
            SqliteCategoryRepository::new(conn),
            SqliteProductRepository::new(conn),
            SqliteProfileRepository::new(conn),
            config.row_cap,
        )
    };

    match command {
        Command::Search { query } => print_json(&lookups().get_search_selection(&query.join(" "))?),
        Command::Substitutes { category, product } => {
            let (kind, id) = match (category, product) {
                (Some(category), _) => (ElementKind::Category, category),
                (None, Some(product)) => (ElementKind::Product, product),
                (None, None) => return Err(anyhow!("either --category or --product is required")),
            };
            print_json(&lookups().get_substitutes(kind, &id)?)
        }
        Command::Import {
            categories,
            products,
        } => {
            let categories = parse_categories(&read_file(&categories)?)?;
            let products = match products {
                Some(path) => parse_products(&read_file(&path)?)?,
                None => Vec::new(),
            };
            let report = import_catalog(
                &SqliteCategoryRepository::new(conn),
                &SqliteProductRepository::new(conn),
                &categories,
                &products,
            )?;
            print_json(&report)
        }
        Command::UserAdd { username, email } => {
            let id = profiles().create_user(&username, email.as_deref())?;
            print_json(&json!({ "user_id": id }))
        }
        Command::Save {
            username,
            reference,
        } => {
            profiles().save_product_for_user(&username, &reference)?;
            print_json(&json!({ "status": "success" }))
        }
        Command::Register { username, draft } => {
            let draft: ProductDraft = serde_json::from_str(&read_file(&draft)?)
                .context("decoding product draft")?;
            let outcome = profiles().register_product_for_user(&username, &draft, &quota())?;
            print_json(&json!({ "outcome": outcome }))
        }
        Command::Saved { username } => print_json(&profiles().get_products_registered(&username)?),
        Command::Remove {
            username,
            reference,
        } => {
            let status = profiles().delete_product_registered(&username, &reference)?;
            print_json(&json!({ "status": status }))
        }
        Command::Rows => {
            let quota = quota();
            let rows = quota.count_global_rows()?;
            info!("event=rows module=cli status=ok rows={rows}");
            print_json(&json!({ "rows": rows, "row_cap": quota.row_cap() }))
        }
        Command::Version => {
            println!("{}", core_version());
            Ok(())
        }
    }
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
