mod cli;
mod infra;
mod routes;
mod server;
mod tools;

use locum_match::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
