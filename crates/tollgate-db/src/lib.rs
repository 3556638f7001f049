pub mod pool;
pub mod repos;

// Re-export commonly used items
pub use pool::{create_pool, is_unique_violation, run_migrations};
pub use repos::user::{UserRepo, UserRow};
