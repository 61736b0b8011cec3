//! Core application: CLI dispatch and process lifecycle

use anyhow::Result;

use crate::api::ApiServer;
use crate::core::cli::{self, Commands};
use crate::core::config::{AppConfig, GeneratorConfig};
use crate::core::constants::{APP_NAME_LOWER, ENV_LOG};
use crate::data::{Warehouse, loaders};
use crate::domain;

pub struct CoreApp;

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();
        Self::init_logging();

        let (cli_config, command) = cli::parse();
        tracing::trace!(command = ?command, "Parsed command");

        let config = AppConfig::load(&cli_config)?;

        match command {
            Commands::Generate {
                seed,
                products,
                customers,
                order_lines,
                days_back,
                return_rate,
            } => {
                let defaults = GeneratorConfig::default();
                let generator = GeneratorConfig {
                    seed: seed.unwrap_or(defaults.seed),
                    n_products: products.unwrap_or(defaults.n_products),
                    n_customers: customers.unwrap_or(defaults.n_customers),
                    n_order_lines: order_lines.unwrap_or(defaults.n_order_lines),
                    days_back: days_back.unwrap_or(defaults.days_back),
                    return_rate: return_rate.unwrap_or(defaults.return_rate),
                };
                domain::generate(&generator, &config.paths.raw_dir)?;
                Ok(())
            }
            Commands::Load { stage } => {
                let warehouse = Warehouse::connect(&config.database).await?;
                loaders::run(stage, &config.paths.raw_dir, warehouse.pool()).await?;
                warehouse.close().await;
                Ok(())
            }
            Commands::Pipeline => {
                domain::pipeline::run(&config).await?;
                Ok(())
            }
            Commands::Validate => {
                let warehouse = Warehouse::connect(&config.database).await?;
                let outcome = domain::validate(warehouse.pool()).await;
                warehouse.close().await;
                outcome?;
                Ok(())
            }
            Commands::Counts => {
                let warehouse = Warehouse::connect(&config.database).await?;
                let counts = domain::table_counts(warehouse.pool()).await?;
                warehouse.close().await;
                for (table, count) in counts {
                    println!("{table:<16} {count}");
                }
                Ok(())
            }
            Commands::Serve => {
                let warehouse = Warehouse::connect(&config.database).await?;
                ApiServer::new(config.server.clone(), warehouse.pool().clone())
                    .start()
                    .await?;
                warehouse.close().await;
                Ok(())
            }
        }
    }

    fn init_logging() {
        let default_filter = format!("info,{APP_NAME_LOWER}=info");

        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or(default_filter);

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .compact()
            .with_env_filter(filter)
            .init();
    }
}
