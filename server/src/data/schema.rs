//! Warehouse schema definitions
//!
//! Integrity rules (non-negative money, positive quantities, no orphan
//! order lines) are intentionally NOT database constraints: they are
//! checked post-load by the validator. There are no PRIMARY KEY or UNIQUE
//! constraints either, so the append-only customers loader can accumulate
//! duplicate rows across runs.

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Complete warehouse schema
pub const SCHEMA: &str = r#"
-- =============================================================================
-- Infrastructure: schema version tracking
-- =============================================================================
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    version INTEGER NOT NULL,
    applied_at BIGINT NOT NULL,
    description TEXT
);

-- =============================================================================
-- 1. Products (dimension, referenced by order_lines.product_id)
-- =============================================================================
CREATE TABLE IF NOT EXISTS products (
    product_id BIGINT NOT NULL,
    name TEXT NOT NULL,
    category TEXT NOT NULL,
    price DOUBLE PRECISION NOT NULL,
    is_active BOOLEAN NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_products_product_id ON products(product_id);

-- =============================================================================
-- 2. Customers (dimension, append-only across runs)
-- =============================================================================
CREATE TABLE IF NOT EXISTS customers (
    customer_id BIGINT NOT NULL,
    full_name TEXT NOT NULL,
    email TEXT NOT NULL,
    country TEXT NOT NULL,
    segment TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_customers_customer_id ON customers(customer_id);

-- =============================================================================
-- 3. Order lines (fact table, one row per product line of an order)
-- =============================================================================
CREATE TABLE IF NOT EXISTS order_lines (
    order_line_id BIGINT NOT NULL,
    order_id BIGINT NOT NULL,
    order_timestamp TIMESTAMPTZ NOT NULL,
    customer_id BIGINT NOT NULL,
    product_id BIGINT NOT NULL,
    qty BIGINT NOT NULL,
    gross_revenue DOUBLE PRECISION NOT NULL,
    discount_amount DOUBLE PRECISION NOT NULL,
    net_revenue DOUBLE PRECISION NOT NULL,
    currency TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_order_lines_timestamp ON order_lines(order_timestamp);
CREATE INDEX IF NOT EXISTS idx_order_lines_product_id ON order_lines(product_id);
CREATE INDEX IF NOT EXISTS idx_order_lines_customer_id ON order_lines(customer_id);

-- =============================================================================
-- 4. Returns (zero-or-one per order line)
-- =============================================================================
CREATE TABLE IF NOT EXISTS returns (
    order_line_id BIGINT NOT NULL,
    order_id BIGINT NOT NULL,
    customer_id BIGINT NOT NULL,
    product_id BIGINT NOT NULL,
    order_timestamp TIMESTAMPTZ NOT NULL,
    refund_timestamp TIMESTAMPTZ NOT NULL,
    refund_amount DOUBLE PRECISION NOT NULL,
    reason TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_returns_order_line_id ON returns(order_line_id);

-- =============================================================================
-- 5. Marketing spend (one row per day per channel)
-- =============================================================================
CREATE TABLE IF NOT EXISTS marketing_spend (
    date DATE NOT NULL,
    channel TEXT NOT NULL,
    spend_eur DOUBLE PRECISION NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_marketing_spend_date ON marketing_spend(date);
"#;
