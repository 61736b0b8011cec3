// =============================================================================
// Application Identity
// =============================================================================

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "demodw";

// =============================================================================
// Environment Variables - Server
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "DEMODW_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "DEMODW_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "DEMODW_LOG";

// =============================================================================
// Environment Variables - Database
// =============================================================================

/// Full connection string; takes precedence over the DB_* parts
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";

pub const ENV_DB_HOST: &str = "DB_HOST";
pub const ENV_DB_PORT: &str = "DB_PORT";
pub const ENV_DB_NAME: &str = "DB_NAME";
pub const ENV_DB_USER: &str = "DB_USER";
pub const ENV_DB_PASSWORD: &str = "DB_PASSWORD";

// =============================================================================
// Environment Variables - Paths
// =============================================================================

/// Directory holding the generated raw source files
pub const ENV_RAW_DIR: &str = "RAW_DIR";

/// Directory the pipeline runner writes its log file into
pub const ENV_LOG_DIR: &str = "LOG_DIR";

// =============================================================================
// Environment Variables - Generator
// =============================================================================

pub const ENV_SEED: &str = "SEED";
pub const ENV_N_PRODUCTS: &str = "N_PRODUCTS";
pub const ENV_N_CUSTOMERS: &str = "N_CUSTOMERS";
pub const ENV_N_ORDER_LINES: &str = "N_ORDER_LINES";
pub const ENV_DAYS_BACK: &str = "DAYS_BACK";
pub const ENV_RETURN_RATE: &str = "RETURN_RATE";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port (matches the original reporting API)
pub const DEFAULT_PORT: u16 = 5000;

// =============================================================================
// Database Defaults (local demo warehouse)
// =============================================================================

pub const DEFAULT_DB_HOST: &str = "localhost";
pub const DEFAULT_DB_PORT: u16 = 5432;
pub const DEFAULT_DB_NAME: &str = "demo_dw";
pub const DEFAULT_DB_USER: &str = "demo_user";
pub const DEFAULT_DB_PASSWORD: &str = "demo_pass";

/// Maximum number of pooled connections
pub const DB_MAX_CONNECTIONS: u32 = 5;

/// Connection acquire timeout in seconds
pub const DB_ACQUIRE_TIMEOUT_SECS: u64 = 30;

// =============================================================================
// Path Defaults
// =============================================================================

pub const DEFAULT_RAW_DIR: &str = "data/raw";
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Pipeline runner log file name (inside the log directory)
pub const PIPELINE_LOG_FILE: &str = "pipeline.log";

// =============================================================================
// Generator Defaults
// =============================================================================

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_N_PRODUCTS: usize = 200;
pub const DEFAULT_N_CUSTOMERS: usize = 500;
/// Each row is one product line (fact-style grain)
pub const DEFAULT_N_ORDER_LINES: usize = 8000;
/// Generate orders in the last N days
pub const DEFAULT_DAYS_BACK: i64 = 180;
/// Share of order lines that are returned/refunded
pub const DEFAULT_RETURN_RATE: f64 = 0.08;

/// Marketing channels, one spend row per day per channel
pub const CHANNELS: [&str; 5] = [
    "google_ads",
    "meta_ads",
    "tiktok_ads",
    "email",
    "affiliate",
];

// =============================================================================
// Raw File Names (generator output / loader input)
// =============================================================================

pub const FILE_PRODUCTS: &str = "products_api.json";
pub const FILE_CUSTOMERS: &str = "customers.json";
pub const FILE_ORDERS: &str = "orders_api.json";
pub const FILE_RETURNS: &str = "returns.xlsx";
pub const FILE_MARKETING: &str = "marketing.csv";

/// Sheet name inside returns.xlsx
pub const RETURNS_SHEET: &str = "returns";

// =============================================================================
// Warehouse Tables (schema `public`)
// =============================================================================

pub const TABLE_PRODUCTS: &str = "products";
pub const TABLE_CUSTOMERS: &str = "customers";
pub const TABLE_ORDER_LINES: &str = "order_lines";
pub const TABLE_RETURNS: &str = "returns";
pub const TABLE_MARKETING: &str = "marketing_spend";
