//! `GET /health`: ready only when the database answers and both catalog
//! tables exist, so an unmigrated database reports as degraded.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use cadastro_db::DbPool;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::warn;

const CATALOG_TABLES: [&str; 2] = ["customer", "product"];

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub database: &'static str,
    pub tables: Vec<TableStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub checked_at: String,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct TableStatus {
    pub table: &'static str,
    pub present: bool,
}

pub fn router(db_pool: DbPool) -> Router {
    Router::new().route("/health", get(health)).with_state(db_pool)
}

async fn health(State(pool): State<DbPool>) -> (StatusCode, Json<HealthReport>) {
    let checked_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

    let report = match existing_tables(&pool).await {
        Ok(existing) => {
            let tables: Vec<TableStatus> = CATALOG_TABLES
                .into_iter()
                .map(|table| TableStatus { table, present: existing.iter().any(|t| t == table) })
                .collect();
            let ready = tables.iter().all(|table| table.present);
            HealthReport {
                status: if ready { "ready" } else { "degraded" },
                database: "reachable",
                tables,
                error: None,
                checked_at,
            }
        }
        Err(error) => HealthReport {
            status: "degraded",
            database: "unreachable",
            tables: Vec::new(),
            error: Some(error.to_string()),
            checked_at,
        },
    };

    if report.status == "ready" {
        (StatusCode::OK, Json(report))
    } else {
        warn!(
            event_name = "system.health.degraded",
            database = report.database,
            "health check found the catalog unavailable"
        );
        (StatusCode::SERVICE_UNAVAILABLE, Json(report))
    }
}

async fn existing_tables(pool: &DbPool) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('customer', 'product')",
    )
    .fetch_all(pool)
    .await
}
