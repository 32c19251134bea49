pub mod cli;
pub mod core;

pub use crate::core::engine::{Engine, ExecuteResult, QueryResult};
pub use crate::core::error::DbError;

use std::path::Path;

/// Runs one command against the database stored at `db_path`, saving the
/// store afterwards when the command mutated anything. Convenience surface
/// for embedding or scripting; the interactive shell keeps a long-lived
/// [`Engine`] instead.
pub fn execute_command(command: &str, db_path: &Path) -> Result<String, DbError> {
    let mut engine = Engine::new();
    engine.load_from_store(db_path);
    let result = engine.dispatch(command)?;
    if result.is_mutation() {
        engine.save_to_store(db_path);
    }
    Ok(result.to_string())
}
