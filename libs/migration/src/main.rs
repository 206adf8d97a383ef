//! `cargo run -p migration -- up` against `DATABASE_URL`.
//!
//! The API applies the same migrations at startup unless `RUN_MIGRATIONS=false`.

use migration::Migrator;
use sea_orm_migration::cli;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
