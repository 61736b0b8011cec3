use clap::{Parser, Subcommand, ValueEnum};

use std::path::PathBuf;

use super::constants::{
    ENV_DATABASE_URL, ENV_DAYS_BACK, ENV_DB_HOST, ENV_DB_NAME, ENV_DB_PASSWORD, ENV_DB_PORT,
    ENV_DB_USER, ENV_HOST, ENV_LOG_DIR, ENV_N_CUSTOMERS, ENV_N_ORDER_LINES, ENV_N_PRODUCTS,
    ENV_PORT, ENV_RAW_DIR, ENV_RETURN_RATE, ENV_SEED,
};

#[derive(Parser)]
#[command(name = "demodw")]
#[command(version, about = "E-commerce analytics demo warehouse", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Full warehouse connection string (takes precedence over DB_* parts)
    #[arg(long, global = true, env = ENV_DATABASE_URL)]
    pub database_url: Option<String>,

    /// Warehouse host (used when no DATABASE_URL is set)
    #[arg(long, global = true, env = ENV_DB_HOST)]
    pub db_host: Option<String>,

    /// Warehouse port
    #[arg(long, global = true, env = ENV_DB_PORT)]
    pub db_port: Option<u16>,

    /// Warehouse database name
    #[arg(long, global = true, env = ENV_DB_NAME)]
    pub db_name: Option<String>,

    /// Warehouse user
    #[arg(long, global = true, env = ENV_DB_USER)]
    pub db_user: Option<String>,

    /// Warehouse password
    #[arg(long, global = true, env = ENV_DB_PASSWORD)]
    pub db_password: Option<String>,

    /// Directory for raw source files
    #[arg(long, global = true, env = ENV_RAW_DIR)]
    pub raw_dir: Option<PathBuf>,

    /// Directory for the pipeline log file
    #[arg(long, global = true, env = ENV_LOG_DIR)]
    pub log_dir: Option<PathBuf>,

    /// API server host address
    #[arg(long, short = 'H', global = true, env = ENV_HOST)]
    pub host: Option<String>,

    /// API server port
    #[arg(long, short = 'p', global = true, env = ENV_PORT)]
    pub port: Option<u16>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Generate the synthetic raw source files
    Generate {
        /// RNG seed (same seed reproduces the same files)
        #[arg(long, env = ENV_SEED)]
        seed: Option<u64>,

        /// Number of products
        #[arg(long, env = ENV_N_PRODUCTS)]
        products: Option<usize>,

        /// Number of customers
        #[arg(long, env = ENV_N_CUSTOMERS)]
        customers: Option<usize>,

        /// Number of order lines (fact-table grain)
        #[arg(long, env = ENV_N_ORDER_LINES)]
        order_lines: Option<usize>,

        /// Generate orders in the last N days
        #[arg(long, env = ENV_DAYS_BACK)]
        days_back: Option<i64>,

        /// Share of order lines that are returned (0.0 - 1.0)
        #[arg(long, env = ENV_RETURN_RATE)]
        return_rate: Option<f64>,
    },
    /// Run one loader stage against the warehouse
    Load {
        /// Which raw file to load
        #[arg(value_enum)]
        stage: LoadStage,
    },
    /// Run all five loaders in order as child processes
    Pipeline,
    /// Run the post-load validation checks
    Validate,
    /// Print per-table row counts
    Counts,
    /// Start the reporting API and dashboard
    Serve,
}

/// Loader stages, in pipeline order
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
#[clap(rename_all = "lowercase")]
pub enum LoadStage {
    Products,
    Customers,
    Orders,
    Marketing,
    Returns,
}

impl LoadStage {
    /// The five stages in the fixed pipeline order. Later stages assume the
    /// earlier tables are already populated.
    pub const PIPELINE_ORDER: [LoadStage; 5] = [
        LoadStage::Products,
        LoadStage::Customers,
        LoadStage::Orders,
        LoadStage::Marketing,
        LoadStage::Returns,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LoadStage::Products => "products",
            LoadStage::Customers => "customers",
            LoadStage::Orders => "orders",
            LoadStage::Marketing => "marketing",
            LoadStage::Returns => "returns",
        }
    }
}

impl std::fmt::Display for LoadStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration derived from CLI arguments (env-backed via clap)
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub database_url: Option<String>,
    pub db_host: Option<String>,
    pub db_port: Option<u16>,
    pub db_name: Option<String>,
    pub db_user: Option<String>,
    pub db_password: Option<String>,
    pub raw_dir: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Parse CLI arguments and return config with command
pub fn parse() -> (CliConfig, Commands) {
    let cli = Cli::parse();
    let config = CliConfig {
        database_url: cli.database_url,
        db_host: cli.db_host,
        db_port: cli.db_port,
        db_name: cli.db_name,
        db_user: cli.db_user,
        db_password: cli.db_password,
        raw_dir: cli.raw_dir,
        log_dir: cli.log_dir,
        host: cli.host,
        port: cli.port,
    };
    (config, cli.command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_order_is_fixed() {
        // Orders depends on products/customers, returns depends on orders.
        assert_eq!(
            LoadStage::PIPELINE_ORDER.map(|s| s.as_str()),
            ["products", "customers", "orders", "marketing", "returns"]
        );
    }

    #[test]
    fn test_stage_display_matches_value_enum() {
        assert_eq!(LoadStage::Marketing.to_string(), "marketing");
        assert_eq!(LoadStage::Orders.to_string(), "orders");
    }

    #[test]
    fn test_cli_parses_load_stage() {
        let cli = Cli::try_parse_from(["demodw", "load", "returns"]).unwrap();
        match cli.command {
            Commands::Load { stage } => assert_eq!(stage, LoadStage::Returns),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
