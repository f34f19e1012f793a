use cadastro_core::config::LoadOptions;

use crate::commands::{with_migrated_pool, CommandResult};

pub fn run(options: &LoadOptions) -> CommandResult {
    match with_migrated_pool("migrate", options, |_pool| async { Ok(()) }) {
        Ok(()) => CommandResult::success("migrate", "applied pending migrations"),
        Err(failure) => failure,
    }
}
