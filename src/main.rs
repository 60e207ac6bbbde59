use std::sync::Arc;
use clap::Parser;
use tower_http::services::ServeDir;

use hairtype_detect::{
    adapters::{
        http::{router, state::HttpState},
        onnx::{model_catalog::OnnxModelCatalog, yolo_engine::OnnxYoloEngine},
    },
    application::{
        reducer::ResultReducer,
        services::{DetectionService, ModelService},
    },
    config::AppConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Logs (RUST_LOG=info by default)
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let config = AppConfig::parse();
    tracing::info!("🔧 Loading hair type model from {}", config.model);

    // 2. Validate and load the detector
    let model = config.model_id();
    ModelService::new(Arc::new(OnnxModelCatalog::new()))
        .validate(&model)
        .await?;
    let engine = OnnxYoloEngine::load(&model, config.class_names(), config.yolo_params())?;

    // 3. Caption font is optional; boxes are still drawn without it
    let font = match &config.font {
        Some(path) => match ResultReducer::load_font(path) {
            Ok(font) => Some(font),
            Err(e) => {
                tracing::warn!("Captions disabled: {:#}", e);
                None
            }
        },
        None => {
            tracing::warn!("No --font given, captions disabled");
            None
        }
    };

    // 4. Services and HTTP state
    let detection = Arc::new(DetectionService::new(Arc::new(engine), ResultReducer::new(font)));
    let state = HttpState { detection };

    let app = router(state)
        .fallback_service(ServeDir::new(&config.static_dir));

    // 5. Serve
    tracing::info!("🚀 Hair type server listening on http://{}", config.bind);
    tracing::info!("📂 Static files served from {}", config.static_dir.display());

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
