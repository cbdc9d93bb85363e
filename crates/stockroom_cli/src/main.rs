//! Stockroom command-line front end.
//!
//! Usage:
//! ```bash
//! stockroom add "Hex Bolt" 120 0.35
//! stockroom list --search bolt
//! stockroom restock 3 50
//! stockroom low-stock --threshold 10
//! stockroom report --out-dir reports --theme dark
//! stockroom import stock.csv
//! stockroom import counts.xlsx
//! stockroom export --output inventory.xlsx
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use log::warn;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use stockroom_core::db::open_db;
use stockroom_core::{
    init_logging, ChartTheme, ConfigOverrides, InventoryService, ItemId, SqliteItemRepository,
    StoreConfig,
};

mod commands;
mod output;

use commands::FileFormat;

/// Single-user inventory tracker backed by a local SQLite file
#[derive(Parser)]
#[command(name = "stockroom")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Database file path [env: STOCKROOM_DB_PATH, default: inventory.db]
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Quantity below which an item counts as low stock [env: STOCKROOM_LOW_STOCK_THRESHOLD]
    #[arg(long, global = true)]
    threshold: Option<i64>,

    /// trace|debug|info|warn|error [env: STOCKROOM_LOG_LEVEL]
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Directory for rolling log files [env: STOCKROOM_LOG_DIR]
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the inventory table if it does not exist
    Init,

    /// Show current inventory
    List {
        /// Case-insensitive name filter
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        json: bool,
    },

    /// Show total units, total value and low-stock count
    Summary {
        #[arg(long)]
        json: bool,
    },

    /// Show items below the low-stock threshold
    LowStock {
        #[arg(long)]
        json: bool,
    },

    /// Add a new item
    Add {
        name: String,
        quantity: i64,
        price: f64,
    },

    /// Set quantity and price of an item
    Update {
        id: i64,
        quantity: i64,
        price: f64,
    },

    /// Add units to an item's quantity
    Restock { id: i64, amount: i64 },

    /// Permanently remove an item
    Delete { id: i64 },

    /// Render SVG charts of the inventory
    Report {
        #[arg(long, default_value = "reports")]
        out_dir: PathBuf,
        #[arg(long, value_enum, default_value_t = ThemeArg::Light)]
        theme: ThemeArg,
    },

    /// Import items from a CSV or XLSX file with Name, Quantity and Price columns
    Import {
        file: PathBuf,
        /// File format [default: from the file extension, else csv]
        #[arg(long, value_enum)]
        format: Option<FileFormat>,
    },

    /// Export inventory as CSV or XLSX (stdout unless --output is given)
    Export {
        #[arg(long)]
        output: Option<PathBuf>,
        /// File format [default: from the output extension, else csv]
        #[arg(long, value_enum)]
        format: Option<FileFormat>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for ChartTheme {
    fn from(value: ThemeArg) -> Self {
        match value {
            ThemeArg::Light => ChartTheme::Light,
            ThemeArg::Dark => ChartTheme::Dark,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = StoreConfig::from_env(ConfigOverrides {
        db_path: cli.db,
        low_stock_threshold: cli.threshold,
        log_level: cli.log_level,
        log_dir: cli.log_dir,
    })?;

    // The store stays usable without file logs.
    if let Err(err) = init_logging(&config) {
        eprintln!("warning: logging disabled: {err}");
    }

    let conn = open_db(&config.db_path).map_err(|err| {
        anyhow::anyhow!(
            "cannot open inventory database `{}`: {err}",
            config.db_path.display()
        )
    })?;
    let service = InventoryService::new(SqliteItemRepository::new(&conn));

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let threshold = config.low_stock_threshold;

    let result = match cli.command {
        Command::Init => {
            writeln!(out, "Inventory ready at {}", config.db_path.display())?;
            Ok(())
        }
        Command::List { search, json } => {
            commands::list(&service, search.as_deref(), json, &mut out)
        }
        Command::Summary { json } => commands::summary(&service, threshold, json, &mut out),
        Command::LowStock { json } => commands::low_stock(&service, threshold, json, &mut out),
        Command::Add {
            name,
            quantity,
            price,
        } => commands::add(&service, &name, quantity, price, &mut out),
        Command::Update {
            id,
            quantity,
            price,
        } => commands::update(&service, ItemId(id), quantity, price, &mut out),
        Command::Restock { id, amount } => {
            commands::restock(&service, ItemId(id), amount, &mut out)
        }
        Command::Delete { id } => commands::delete(&service, ItemId(id), &mut out),
        Command::Report { out_dir, theme } => {
            commands::report(&service, &out_dir, theme.into(), &mut out)
        }
        Command::Import { file, format } => {
            let format = FileFormat::resolve(format, Some(file.as_path()));
            commands::import(&service, &file, format, &mut out)
        }
        Command::Export { output, format } => {
            let format = FileFormat::resolve(format, output.as_deref());
            commands::export(&service, output.as_deref(), format, &mut out)
        }
    };

    if let Err(err) = &result {
        warn!("event=command module=cli status=error error={err}");
    }
    result
}
