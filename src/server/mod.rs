mod routes;

use crate::core::pipeline::CurationPipeline;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

pub use routes::AppState;

pub fn build_router(pipeline: CurationPipeline) -> Router {
    routes::build_router(Arc::new(pipeline))
}

pub async fn serve(listener: TcpListener, pipeline: CurationPipeline) -> std::io::Result<()> {
    axum::serve(listener, build_router(pipeline)).await
}
