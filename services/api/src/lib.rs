mod cli;
mod infra;
mod report;
mod routes;
mod server;

use supplier_rank::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
