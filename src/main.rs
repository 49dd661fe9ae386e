use log::{error, info, warn};

use dionysus::{connect, routes, Config};

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

    // Schema bootstrap is best effort; a failure here usually means the
    // schema already exists or the file moved, neither of which should
    // keep the API down.
    if let Err(e) = connect::apply_schema(&config.schema_path, &pool).await {
        warn!("schema bootstrap failed: {e}");
    }

    let api = routes::routes(pool);

    info!("server starting on port {}", config.port);
    warp::serve(api).run(([0, 0, 0, 0], config.port)).await;
}
