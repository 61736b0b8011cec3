//! Post-load data quality checks
//!
//! One declarative list of checks covers presence, sanity rules, and
//! referential integrity. Every check runs inside a single read transaction
//! so the report describes one consistent snapshot, and every check is
//! evaluated even after a failure so one run reports everything wrong.

use sqlx::PgPool;
use thiserror::Error;

/// How a check's actual value relates to its expected value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Actual must be >= expected
    Min,
    /// Actual must equal expected
    Eq,
}

pub struct Check {
    pub name: &'static str,
    pub comparison: Comparison,
    pub expected: i64,
    pub sql: &'static str,
}

/// The canonical check list. Order is the report order.
pub const CHECKS: [Check; 11] = [
    Check {
        name: "products_count",
        comparison: Comparison::Min,
        expected: 1,
        sql: "SELECT COUNT(*) FROM public.products",
    },
    Check {
        name: "customers_count",
        comparison: Comparison::Min,
        expected: 1,
        sql: "SELECT COUNT(*) FROM public.customers",
    },
    Check {
        name: "order_lines_count",
        comparison: Comparison::Min,
        expected: 1,
        sql: "SELECT COUNT(*) FROM public.order_lines",
    },
    Check {
        name: "marketing_count",
        comparison: Comparison::Min,
        expected: 1,
        sql: "SELECT COUNT(*) FROM public.marketing_spend",
    },
    // An empty returns table is legitimate (zero return rate)
    Check {
        name: "returns_count",
        comparison: Comparison::Min,
        expected: 0,
        sql: "SELECT COUNT(*) FROM public.returns",
    },
    Check {
        name: "no_negative_net_revenue",
        comparison: Comparison::Eq,
        expected: 0,
        sql: "SELECT COUNT(*) FROM public.order_lines WHERE net_revenue < 0",
    },
    Check {
        name: "no_negative_qty",
        comparison: Comparison::Eq,
        expected: 0,
        sql: "SELECT COUNT(*) FROM public.order_lines WHERE qty <= 0",
    },
    Check {
        name: "no_negative_spend",
        comparison: Comparison::Eq,
        expected: 0,
        sql: "SELECT COUNT(*) FROM public.marketing_spend WHERE spend_eur < 0",
    },
    Check {
        name: "refund_not_negative",
        comparison: Comparison::Eq,
        expected: 0,
        sql: "SELECT COUNT(*) FROM public.returns WHERE refund_amount < 0",
    },
    // The warehouse carries no FK constraints; orphans are caught here
    Check {
        name: "no_orphan_products",
        comparison: Comparison::Eq,
        expected: 0,
        sql: "SELECT COUNT(*) FROM public.order_lines ol \
              LEFT JOIN public.products p ON p.product_id = ol.product_id \
              WHERE p.product_id IS NULL",
    },
    Check {
        name: "no_orphan_customers",
        comparison: Comparison::Eq,
        expected: 0,
        sql: "SELECT COUNT(*) FROM public.order_lines ol \
              LEFT JOIN public.customers c ON c.customer_id = ol.customer_id \
              WHERE c.customer_id IS NULL",
    },
];

/// Outcome of one check
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: &'static str,
    pub comparison: Comparison,
    pub expected: i64,
    pub actual: i64,
    pub passed: bool,
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation failed: {}", summarize(.failures))]
    Failed { failures: Vec<CheckResult> },
}

fn summarize(failures: &[CheckResult]) -> String {
    failures
        .iter()
        .map(|f| {
            let op = match f.comparison {
                Comparison::Min => ">=",
                Comparison::Eq => "==",
            };
            format!("{} (got {}, want {} {})", f.name, f.actual, op, f.expected)
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Whether an actual value satisfies a check
pub fn holds(comparison: Comparison, expected: i64, actual: i64) -> bool {
    match comparison {
        Comparison::Min => actual >= expected,
        Comparison::Eq => actual == expected,
    }
}

/// Run every check in [`CHECKS`] against one snapshot of the warehouse
pub async fn run_checks(pool: &PgPool) -> Result<Vec<CheckResult>, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let mut results = Vec::with_capacity(CHECKS.len());
    for check in &CHECKS {
        let actual: i64 = sqlx::query_scalar(check.sql).fetch_one(&mut *tx).await?;
        results.push(CheckResult {
            name: check.name,
            comparison: check.comparison,
            expected: check.expected,
            actual,
            passed: holds(check.comparison, check.expected, actual),
        });
    }
    tx.commit().await?;
    Ok(results)
}

/// Run all checks, log each outcome, and fail if any check failed
pub async fn validate(pool: &PgPool) -> Result<(), ValidationError> {
    let results = run_checks(pool).await?;

    for result in &results {
        if result.passed {
            tracing::info!(check = result.name, value = result.actual, "OK");
        } else {
            tracing::error!(
                check = result.name,
                value = result.actual,
                expected = result.expected,
                "FAIL"
            );
        }
    }

    let failures: Vec<CheckResult> = results.into_iter().filter(|r| !r.passed).collect();
    if failures.is_empty() {
        tracing::info!("All validation checks passed");
        Ok(())
    } else {
        Err(ValidationError::Failed { failures })
    }
}

/// Per-table row counts, alphabetical by table name
pub async fn table_counts(pool: &PgPool) -> Result<Vec<(String, i64)>, sqlx::Error> {
    sqlx::query_as(
        "SELECT 'products' AS table_name, COUNT(*) AS row_count FROM public.products \
         UNION ALL SELECT 'customers', COUNT(*) FROM public.customers \
         UNION ALL SELECT 'order_lines', COUNT(*) FROM public.order_lines \
         UNION ALL SELECT 'marketing_spend', COUNT(*) FROM public.marketing_spend \
         UNION ALL SELECT 'returns', COUNT(*) FROM public.returns \
         ORDER BY table_name",
    )
    .fetch_all(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_min_holds_at_and_above_threshold() {
        assert!(holds(Comparison::Min, 1, 1));
        assert!(holds(Comparison::Min, 1, 8000));
        assert!(!holds(Comparison::Min, 1, 0));
        // Empty returns table is acceptable
        assert!(holds(Comparison::Min, 0, 0));
    }

    #[test]
    fn test_eq_holds_only_on_exact_match() {
        assert!(holds(Comparison::Eq, 0, 0));
        assert!(!holds(Comparison::Eq, 0, 3));
        assert!(!holds(Comparison::Eq, 0, -1));
    }

    #[test]
    fn test_check_list_covers_presence_sanity_and_integrity() {
        let names: Vec<_> = CHECKS.iter().map(|c| c.name).collect();
        assert_eq!(names.len(), 11);
        assert!(names.contains(&"no_orphan_products"));
        assert!(names.contains(&"no_orphan_customers"));
        assert!(names.contains(&"no_negative_net_revenue"));
        // Every presence check except returns requires at least one row
        for check in CHECKS.iter().filter(|c| c.name.ends_with("_count")) {
            let expected_min = if check.name == "returns_count" { 0 } else { 1 };
            assert_eq!(check.comparison, Comparison::Min, "{}", check.name);
            assert_eq!(check.expected, expected_min, "{}", check.name);
        }
    }

    #[test]
    fn test_failure_summary_names_each_failed_check() {
        let err = ValidationError::Failed {
            failures: vec![
                CheckResult {
                    name: "no_orphan_products",
                    comparison: Comparison::Eq,
                    expected: 0,
                    actual: 12,
                    passed: false,
                },
                CheckResult {
                    name: "products_count",
                    comparison: Comparison::Min,
                    expected: 1,
                    actual: 0,
                    passed: false,
                },
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("no_orphan_products (got 12, want == 0)"), "{msg}");
        assert!(msg.contains("products_count (got 0, want >= 1)"), "{msg}");
    }
}
