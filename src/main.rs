use log::info;
use recipe_extractor::{api, config::AppConfig, state::AppState};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = AppConfig::load()?;
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = AppState::init(config).await?;
    sqlx::migrate!("./migrations").run(&state.db).await?;

    let app = api::router(state);

    info!("listening on {addr}");
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
