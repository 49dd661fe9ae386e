use log::{error, info};

use dionysus::seed::{self, SeedData};
use dionysus::{connect, Config};

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let pool = match connect::connect(&config).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("failed to connect to database: {e}");
            std::process::exit(1);
        }
    };

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| String::from("seed_data.json"));

    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) => {
            error!("failed to read {path}: {e}");
            std::process::exit(1);
        }
    };

    let data: SeedData = match serde_json::from_str(&raw) {
        Ok(data) => data,
        Err(e) => {
            error!("failed to parse {path}: {e}");
            std::process::exit(1);
        }
    };

    info!("starting database seeding from {path}");
    seed::run(&data, &pool).await;
}
