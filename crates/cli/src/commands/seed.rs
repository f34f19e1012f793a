use cadastro_core::config::LoadOptions;
use cadastro_db::repositories::{SqlCustomerRepository, SqlProductRepository};
use cadastro_db::{DemoCatalog, SeedResult};
use serde_json::json;

use crate::commands::{with_migrated_pool, CommandResult, EXIT_SEED};

pub fn run(options: &LoadOptions) -> CommandResult {
    let outcome = with_migrated_pool("seed", options, |pool| async move {
        let customers = SqlCustomerRepository::new(pool.clone());
        let products = SqlProductRepository::new(pool);
        DemoCatalog::load(&customers, &products)
            .await
            .map_err(|error| ("seed_execution", error.to_string(), EXIT_SEED))
    });

    match outcome {
        Ok(result) => CommandResult::success_with(
            "seed",
            summary(&result),
            Some(json!({
                "customers_inserted": result.customers_inserted,
                "customers_skipped": result.customers_skipped,
                "products_inserted": result.products_inserted,
                "products_skipped": result.products_skipped,
            })),
        ),
        Err(failure) => failure,
    }
}

fn summary(result: &SeedResult) -> String {
    if result.customers_inserted == 0 && result.products_inserted == 0 {
        return "demo catalog already present".to_string();
    }
    format!(
        "demo catalog loaded: {} customers, {} products",
        result.customers_inserted, result.products_inserted
    )
}
