//! 靜態頁面服務：`/` 與 `/adr2/0000001` 回同一份 HTML，另提供 favicon。
//!
//! 與匯出流程無任何資料往來。每個請求只讀取啟動時載入的內容。

use crate::utils::error::Result;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::Router;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

const INDEX_HTML: &str = include_str!("../../assets/index.html");
const FAVICON: &[u8] = include_bytes!("../../assets/favicon.ico");

#[derive(Debug, Clone)]
pub struct PageAssets {
    index_html: Bytes,
    favicon: Bytes,
}

impl PageAssets {
    pub fn new(index_html: impl Into<Bytes>, favicon: impl Into<Bytes>) -> Self {
        Self {
            index_html: index_html.into(),
            favicon: favicon.into(),
        }
    }

    /// 編譯時內嵌的頁面
    pub fn embedded() -> Self {
        Self::new(Bytes::from_static(INDEX_HTML.as_bytes()), Bytes::from_static(FAVICON))
    }

    /// 從目錄讀取 `index.html` 與 `favicon.ico`，啟動時讀一次
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let index_html = std::fs::read(dir.join("index.html"))?;
        let favicon = std::fs::read(dir.join("favicon.ico"))?;
        Ok(Self::new(index_html, favicon))
    }
}

impl Default for PageAssets {
    fn default() -> Self {
        Self::embedded()
    }
}

pub fn router(assets: PageAssets) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/adr2/0000001", get(index))
        .route("/favicon.ico", get(favicon))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(assets))
}

pub async fn serve<F>(listener: TcpListener, assets: PageAssets, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("🌐 Serving landing page on http://{}", addr);
    }
    axum::serve(listener, router(assets))
        .with_graceful_shutdown(shutdown)
        .await?;
    tracing::info!("Page server stopped");
    Ok(())
}

async fn index(State(assets): State<Arc<PageAssets>>) -> Html<Bytes> {
    Html(assets.index_html.clone())
}

async fn favicon(State(assets): State<Arc<PageAssets>>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/x-icon")], assets.favicon.clone())
}
