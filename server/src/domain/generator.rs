//! Synthetic raw-data generator
//!
//! Produces the five raw source files the loaders consume, shaped like
//! exports from real systems: a product API dump, a CRM customer export, an
//! order-line API dump, a returns workbook, and a daily marketing spend CSV.
//! All randomness flows from one seeded RNG, so the same seed and knobs
//! reproduce the same rows (timestamps are anchored to the current day).

use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::core::config::GeneratorConfig;
use crate::core::constants::{
    CHANNELS, FILE_CUSTOMERS, FILE_MARKETING, FILE_ORDERS, FILE_PRODUCTS, FILE_RETURNS,
    RETURNS_SHEET,
};
use crate::data::error::DataError;
use crate::data::raw::returns::RETURNS_COLUMNS;
use crate::data::raw::{ApiEnvelope, RawCustomer, RawMarketing, RawOrderLine, RawProduct, format_timestamp};

pub const CATEGORIES: [&str; 6] = ["electronics", "fashion", "home", "beauty", "sports", "books"];

/// Catalog mix (how many products land in each category)
const CATEGORY_WEIGHTS: [f64; 6] = [0.18, 0.22, 0.20, 0.12, 0.16, 0.12];

/// Demand mix (electronics/fashion sell a little more than their share)
const CATEGORY_POPULARITY: [f64; 6] = [0.22, 0.26, 0.18, 0.10, 0.14, 0.10];

const COUNTRIES: [&str; 7] = ["FR", "DE", "ES", "IT", "NL", "BE", "UK"];
const COUNTRY_WEIGHTS: [f64; 7] = [0.22, 0.18, 0.14, 0.14, 0.10, 0.08, 0.14];

const SEGMENTS: [&str; 3] = ["consumer", "small_business", "enterprise"];
const SEGMENT_WEIGHTS: [f64; 3] = [0.78, 0.18, 0.04];

const RETURN_REASONS: [&str; 5] = [
    "damaged",
    "wrong_size",
    "not_as_expected",
    "late_delivery",
    "changed_mind",
];
const REASON_WEIGHTS: [f64; 5] = [0.18, 0.22, 0.24, 0.12, 0.24];

const PRODUCT_ADJECTIVES: [&str; 20] = [
    "Quiet", "Bold", "Nimble", "Amber", "Coastal", "Urban", "Velvet", "Polar", "Rustic", "Swift",
    "Lucid", "Mellow", "Copper", "Nordic", "Vivid", "Gentle", "Prime", "Solar", "Misty", "Brisk",
];

const PRODUCT_NOUNS: [&str; 20] = [
    "Lantern", "Satchel", "Compass", "Kettle", "Journal", "Speaker", "Blanket", "Racket", "Serum",
    "Tripod", "Hoodie", "Grinder", "Monitor", "Sandal", "Novel", "Dumbbell", "Mirror", "Charger",
    "Teapot", "Backpack",
];

const FIRST_NAMES: [&str; 20] = [
    "Emma", "Lucas", "Mia", "Hugo", "Lena", "Noah", "Clara", "Louis", "Sofia", "Finn", "Julia",
    "Arthur", "Nora", "Milan", "Alice", "Jonas", "Elena", "Theo", "Marta", "Ruben",
];

const LAST_NAMES: [&str; 20] = [
    "Martin", "Fischer", "Garcia", "Rossi", "Visser", "Peeters", "Smith", "Dubois", "Wagner",
    "Moreno", "Conti", "Bakker", "Claes", "Taylor", "Lefevre", "Becker", "Serrano", "Greco",
    "Jansen", "Maes",
];

const EMAIL_DOMAINS: [&str; 4] = ["example.com", "example.org", "mail.example", "inbox.example"];

/// Row counts of the generated files, for logging and assertions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratedCounts {
    pub products: usize,
    pub customers: usize,
    pub order_lines: usize,
    pub returns: usize,
    pub marketing_rows: usize,
}

/// Generate all five raw source files into `raw_dir`
pub fn generate(config: &GeneratorConfig, raw_dir: &Path) -> Result<GeneratedCounts, DataError> {
    let mut rng = StdRng::seed_from_u64(config.seed);

    std::fs::create_dir_all(raw_dir).map_err(|source| DataError::RawFile {
        path: raw_dir.to_path_buf(),
        source,
    })?;

    let now = Utc::now();
    let today = now.date_naive();
    let start_day = today - Duration::days(config.days_back);

    let products = gen_products(&mut rng, config.n_products, now)?;
    write_json(
        &raw_dir.join(FILE_PRODUCTS),
        &ApiEnvelope::new(products.clone()),
    )?;

    let customers = gen_customers(&mut rng, config.n_customers, config.days_back, now)?;
    write_json(&raw_dir.join(FILE_CUSTOMERS), &customers)?;

    let (order_lines, order_times) = gen_order_lines(
        &mut rng,
        config.n_order_lines,
        &products,
        customers.len(),
        config.days_back,
        now,
    )?;
    write_json(
        &raw_dir.join(FILE_ORDERS),
        &ApiEnvelope::new(order_lines.clone()),
    )?;

    let returns = gen_returns(&mut rng, &order_lines, &order_times, config.return_rate)?;
    write_returns_xlsx(&raw_dir.join(FILE_RETURNS), &returns)?;

    let marketing = gen_marketing(&mut rng, start_day, today)?;
    write_marketing_csv(&raw_dir.join(FILE_MARKETING), &marketing)?;

    let counts = GeneratedCounts {
        products: products.len(),
        customers: customers.len(),
        order_lines: order_lines.len(),
        returns: returns.len(),
        marketing_rows: marketing.len(),
    };
    tracing::info!(
        dir = %raw_dir.display(),
        products = counts.products,
        customers = counts.customers,
        order_lines = counts.order_lines,
        returns = counts.returns,
        marketing_rows = counts.marketing_rows,
        "Generated raw source files"
    );
    Ok(counts)
}

fn gen_products(
    rng: &mut StdRng,
    count: usize,
    now: DateTime<Utc>,
) -> Result<Vec<RawProduct>, DataError> {
    let category_dist = weighted(&CATEGORY_WEIGHTS)?;

    let mut products = Vec::with_capacity(count);
    for pid in 1..=count {
        let category = CATEGORIES[category_dist.sample(rng)];
        let (low, high) = price_range(category);
        let price = round2(rng.gen_range(low..high));

        // Products touched within the last 30 days, 3% inactive
        let updated_at = now - Duration::seconds(rng.gen_range(0..30 * 86_400));
        products.push(RawProduct {
            product_id: pid as i64,
            name: format!(
                "{} {}",
                pick(rng, &PRODUCT_ADJECTIVES),
                pick(rng, &PRODUCT_NOUNS)
            ),
            category: category.to_string(),
            price,
            is_active: rng.r#gen::<f64>() > 0.03,
            updated_at: format_timestamp(&updated_at),
        });
    }
    Ok(products)
}

fn gen_customers(
    rng: &mut StdRng,
    count: usize,
    days_back: i64,
    now: DateTime<Utc>,
) -> Result<Vec<RawCustomer>, DataError> {
    let country_dist = weighted(&COUNTRY_WEIGHTS)?;
    let segment_dist = weighted(&SEGMENT_WEIGHTS)?;

    let mut customers = Vec::with_capacity(count);
    for cid in 1..=count {
        let first = pick(rng, &FIRST_NAMES);
        let last = pick(rng, &LAST_NAMES);
        let created_at = now - Duration::seconds(rng.gen_range(0..days_back.max(1) * 86_400));
        customers.push(RawCustomer {
            customer_id: cid as i64,
            full_name: format!("{first} {last}"),
            email: format!(
                "{}.{}{}@{}",
                first.to_lowercase(),
                last.to_lowercase(),
                cid,
                pick(rng, &EMAIL_DOMAINS)
            ),
            country: pick_weighted(rng, &COUNTRIES, &country_dist).to_string(),
            segment: pick_weighted(rng, &SEGMENTS, &segment_dist).to_string(),
            created_at: format_timestamp(&created_at),
        });
    }
    Ok(customers)
}

fn gen_order_lines(
    rng: &mut StdRng,
    count: usize,
    products: &[RawProduct],
    n_customers: usize,
    days_back: i64,
    now: DateTime<Utc>,
) -> Result<(Vec<RawOrderLine>, Vec<DateTime<Utc>>), DataError> {
    // Demand is weighted by category, not uniform over the catalog
    let popularity: Vec<f64> = products
        .iter()
        .map(|p| {
            CATEGORIES
                .iter()
                .position(|c| *c == p.category)
                .map(|i| CATEGORY_POPULARITY[i])
                .unwrap_or(0.0)
        })
        .collect();
    let product_dist = weighted(&popularity)?;

    let mut lines = Vec::with_capacity(count);
    let mut times = Vec::with_capacity(count);
    for line_id in 1..=count {
        let order_ts = now - Duration::seconds(rng.gen_range(0..days_back.max(1) * 86_400));
        let product = &products[product_dist.sample(rng)];
        let customer_id = rng.gen_range(1..=n_customers as i64);

        let qty = match rng.r#gen::<f64>() {
            r if r < 0.55 => 1,
            r if r < 0.95 => 2,
            _ => 3,
        };
        let gross = round2(product.price * qty as f64);

        // Discounts cluster in fashion and home
        let discount_pct = if matches!(product.category.as_str(), "fashion" | "home")
            && rng.r#gen::<f64>() < 0.25
        {
            *pick(rng, &[0.05, 0.10, 0.15, 0.20])
        } else if rng.r#gen::<f64>() < 0.10 {
            *pick(rng, &[0.03, 0.05, 0.08])
        } else {
            0.0
        };
        let discount = round2(gross * discount_pct);
        let net = round2(gross - discount);

        lines.push(RawOrderLine {
            order_line_id: line_id as i64,
            // Two consecutive lines share an order id
            order_id: ((line_id - 1) / 2 + 1) as i64,
            order_timestamp: format_timestamp(&order_ts),
            customer_id,
            product_id: product.product_id,
            qty,
            gross_revenue: gross,
            discount_amount: discount,
            net_revenue: net,
            currency: "EUR".to_string(),
        });
        times.push(order_ts);
    }
    Ok((lines, times))
}

/// A returned order line, pre-serialization (timestamps still typed so the
/// output can be sorted by refund time)
struct ReturnEntry {
    line: RawOrderLine,
    refund_timestamp: DateTime<Utc>,
    refund_amount: f64,
    reason: &'static str,
}

fn gen_returns(
    rng: &mut StdRng,
    order_lines: &[RawOrderLine],
    order_times: &[DateTime<Utc>],
    return_rate: f64,
) -> Result<Vec<ReturnEntry>, DataError> {
    let n_returns = ((order_lines.len() as f64 * return_rate) as usize).min(order_lines.len());
    let reason_dist = weighted(&REASON_WEIGHTS)?;

    let sampled = rand::seq::index::sample(rng, order_lines.len(), n_returns);
    let mut entries = Vec::with_capacity(n_returns);
    for idx in sampled {
        let line = order_lines[idx].clone();
        // Refund lands 1-21 days after purchase
        let refund_timestamp = order_times[idx] + Duration::days(rng.gen_range(1..22));
        // Mostly full refunds, sometimes partial
        let factor = match rng.r#gen::<f64>() {
            r if r < 0.70 => 1.0,
            r if r < 0.85 => 0.5,
            _ => 0.8,
        };
        entries.push(ReturnEntry {
            refund_amount: round2(line.net_revenue * factor),
            reason: *pick_weighted(rng, &RETURN_REASONS, &reason_dist),
            line,
            refund_timestamp,
        });
    }
    entries.sort_by_key(|e| e.refund_timestamp);
    Ok(entries)
}

fn gen_marketing(
    rng: &mut StdRng,
    start_day: NaiveDate,
    end_day: NaiveDate,
) -> Result<Vec<RawMarketing>, DataError> {
    let mut rows = Vec::new();
    let mut day = start_day;
    while day <= end_day {
        let weekend = day.weekday().number_from_monday() >= 6;
        for channel in CHANNELS {
            let (low, high) = spend_range(channel);
            let mut spend = round2(rng.gen_range(low..high));
            // Paid social and search dip on weekends
            if weekend && matches!(channel, "google_ads" | "meta_ads") {
                spend = round2(spend * rng.gen_range(0.75..0.95));
            }
            rows.push(RawMarketing {
                date: day.format("%Y-%m-%d").to_string(),
                channel: channel.to_string(),
                spend_eur: spend,
            });
        }
        day += Duration::days(1);
    }
    Ok(rows)
}

fn price_range(category: &str) -> (f64, f64) {
    match category {
        "electronics" => (30.0, 1200.0),
        "fashion" => (10.0, 250.0),
        "home" => (8.0, 400.0),
        "beauty" => (5.0, 150.0),
        "sports" => (10.0, 600.0),
        _ => (5.0, 60.0), // books
    }
}

fn spend_range(channel: &str) -> (f64, f64) {
    match channel {
        "google_ads" => (200.0, 1200.0),
        "meta_ads" => (150.0, 900.0),
        "tiktok_ads" => (60.0, 500.0),
        "email" => (10.0, 120.0),
        _ => (20.0, 250.0), // affiliate
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn pick<'a, T>(rng: &mut StdRng, items: &'a [T]) -> &'a T {
    &items[rng.gen_range(0..items.len())]
}

fn pick_weighted<'a, T>(rng: &mut StdRng, items: &'a [T], dist: &WeightedIndex<f64>) -> &'a T {
    &items[dist.sample(rng)]
}

fn weighted(weights: &[f64]) -> Result<WeightedIndex<f64>, DataError> {
    WeightedIndex::new(weights.iter().copied())
        .map_err(|e| DataError::Config(format!("invalid generator weights: {e}")))
}

fn write_json<T: Serialize>(path: &PathBuf, value: &T) -> Result<(), DataError> {
    let content = serde_json::to_string_pretty(value).map_err(|source| DataError::Json {
        path: path.clone(),
        source,
    })?;
    std::fs::write(path, content).map_err(|source| DataError::RawFile {
        path: path.clone(),
        source,
    })
}

fn write_returns_xlsx(path: &PathBuf, entries: &[ReturnEntry]) -> Result<(), DataError> {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    let workbook_err = |e: rust_xlsxwriter::XlsxError| DataError::Workbook {
        path: path.clone(),
        message: e.to_string(),
    };

    let sheet = workbook.add_worksheet();
    sheet.set_name(RETURNS_SHEET).map_err(workbook_err)?;
    for (col, name) in RETURNS_COLUMNS.iter().enumerate() {
        sheet
            .write_string(0, col as u16, *name)
            .map_err(workbook_err)?;
    }
    for (i, entry) in entries.iter().enumerate() {
        let row = i as u32 + 1;
        let line = &entry.line;
        sheet
            .write_number(row, 0, line.order_line_id as f64)
            .map_err(workbook_err)?;
        sheet
            .write_number(row, 1, line.order_id as f64)
            .map_err(workbook_err)?;
        sheet
            .write_number(row, 2, line.customer_id as f64)
            .map_err(workbook_err)?;
        sheet
            .write_number(row, 3, line.product_id as f64)
            .map_err(workbook_err)?;
        sheet
            .write_string(row, 4, &line.order_timestamp)
            .map_err(workbook_err)?;
        sheet
            .write_string(row, 5, format_timestamp(&entry.refund_timestamp))
            .map_err(workbook_err)?;
        sheet
            .write_number(row, 6, entry.refund_amount)
            .map_err(workbook_err)?;
        sheet
            .write_string(row, 7, entry.reason)
            .map_err(workbook_err)?;
    }
    workbook.save(path).map_err(workbook_err)
}

fn write_marketing_csv(path: &PathBuf, rows: &[RawMarketing]) -> Result<(), DataError> {
    let mut writer = csv::Writer::from_path(path).map_err(|source| DataError::Csv {
        path: path.clone(),
        source,
    })?;
    for row in rows {
        writer.serialize(row).map_err(|source| DataError::Csv {
            path: path.clone(),
            source,
        })?;
    }
    writer.flush().map_err(|source| DataError::RawFile {
        path: path.clone(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::raw::{read_customers, read_marketing, read_orders, read_products, read_returns};

    fn small_config(seed: u64) -> GeneratorConfig {
        GeneratorConfig {
            seed,
            n_products: 25,
            n_customers: 40,
            n_order_lines: 300,
            days_back: 30,
            return_rate: 0.1,
        }
    }

    #[test]
    fn test_generates_all_five_files_with_expected_counts() {
        let dir = tempfile::tempdir().unwrap();
        let counts = generate(&small_config(42), dir.path()).unwrap();

        assert_eq!(counts.products, 25);
        assert_eq!(counts.customers, 40);
        assert_eq!(counts.order_lines, 300);
        assert_eq!(counts.returns, 30);
        // One row per day per channel, days_back inclusive of today
        assert_eq!(counts.marketing_rows, 31 * CHANNELS.len());

        // Every file parses back through the loaders' readers
        assert_eq!(read_products(&dir.path().join(FILE_PRODUCTS)).unwrap().len(), 25);
        assert_eq!(read_customers(&dir.path().join(FILE_CUSTOMERS)).unwrap().len(), 40);
        assert_eq!(read_orders(&dir.path().join(FILE_ORDERS)).unwrap().len(), 300);
        assert_eq!(read_returns(&dir.path().join(FILE_RETURNS)).unwrap().len(), 30);
        assert_eq!(
            read_marketing(&dir.path().join(FILE_MARKETING)).unwrap().len(),
            31 * CHANNELS.len()
        );
    }

    #[test]
    fn test_order_lines_are_consistent() {
        let dir = tempfile::tempdir().unwrap();
        generate(&small_config(7), dir.path()).unwrap();

        let lines = read_orders(&dir.path().join(FILE_ORDERS)).unwrap();
        for line in &lines {
            assert!(line.qty >= 1 && line.qty <= 3);
            assert!(line.customer_id >= 1 && line.customer_id <= 40);
            assert!(line.product_id >= 1 && line.product_id <= 25);
            assert_eq!(line.order_id, (line.order_line_id - 1) / 2 + 1);
            assert!((line.net_revenue - (line.gross_revenue - line.discount_amount)).abs() < 0.011);
            assert_eq!(line.currency, "EUR");
        }
    }

    #[test]
    fn test_returns_reference_real_lines_and_refund_after_order() {
        let dir = tempfile::tempdir().unwrap();
        generate(&small_config(7), dir.path()).unwrap();

        let lines = read_orders(&dir.path().join(FILE_ORDERS)).unwrap();
        let returns = read_returns(&dir.path().join(FILE_RETURNS)).unwrap();
        for ret in &returns {
            let line = lines
                .iter()
                .find(|l| l.order_line_id == ret.order_line_id)
                .expect("return references a generated order line");
            assert_eq!(ret.product_id, line.product_id);
            assert!(ret.refund_timestamp > ret.order_timestamp);
            assert!(ret.refund_amount <= line.net_revenue + 0.011);
        }
        // Sorted by refund time
        assert!(
            returns
                .windows(2)
                .all(|w| w[0].refund_timestamp <= w[1].refund_timestamp)
        );
    }

    #[test]
    fn test_same_seed_reproduces_same_rows() {
        let dir_a = tempfile::tempdir().unwrap();
        let dir_b = tempfile::tempdir().unwrap();
        generate(&small_config(99), dir_a.path()).unwrap();
        generate(&small_config(99), dir_b.path()).unwrap();

        let a = read_products(&dir_a.path().join(FILE_PRODUCTS)).unwrap();
        let b = read_products(&dir_b.path().join(FILE_PRODUCTS)).unwrap();
        for (pa, pb) in a.iter().zip(&b) {
            assert_eq!(pa.name, pb.name);
            assert_eq!(pa.category, pb.category);
            assert!((pa.price - pb.price).abs() < 1e-9);
        }
    }

    #[test]
    fn test_different_seed_changes_rows() {
        let dir_a = tempfile::tempdir().unwrap();
        let dir_b = tempfile::tempdir().unwrap();
        generate(&small_config(1), dir_a.path()).unwrap();
        generate(&small_config(2), dir_b.path()).unwrap();

        let a = read_products(&dir_a.path().join(FILE_PRODUCTS)).unwrap();
        let b = read_products(&dir_b.path().join(FILE_PRODUCTS)).unwrap();
        assert!(
            a.iter()
                .zip(&b)
                .any(|(pa, pb)| pa.name != pb.name || (pa.price - pb.price).abs() > 1e-9)
        );
    }

    #[test]
    fn test_prices_stay_in_category_range() {
        let dir = tempfile::tempdir().unwrap();
        generate(&small_config(5), dir.path()).unwrap();

        for product in read_products(&dir.path().join(FILE_PRODUCTS)).unwrap() {
            let (low, high) = price_range(&product.category);
            assert!(
                product.price >= low && product.price <= high,
                "{} {} out of range",
                product.category,
                product.price
            );
        }
    }
}
