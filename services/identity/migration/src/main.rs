use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    cli::run_cli(biovault_identity_migration::Migrator).await;
}
