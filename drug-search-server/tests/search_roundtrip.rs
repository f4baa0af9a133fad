use std::sync::Arc;

use async_trait::async_trait;
use drug_search::{
    Activation, ClientConfig, HttpTransport, InMemoryPage, RenderTarget, SearchHandler,
};
use drug_search_server::{AppState, GenericInfoGenerator, InMemoryDrugIndex, build_router};
use tokio::net::TcpListener;

struct CannedGenerator;

#[async_trait]
impl GenericInfoGenerator for CannedGenerator {
    async fn generate(&self, brand_drug: &str, _drug_info: &str) -> anyhow::Result<String> {
        Ok(format!("Generic equivalent of {}: atorvastatin", brand_drug))
    }
}

/// Serve the search router on an ephemeral port and return the search endpoint
async fn spawn_server() -> String {
    let index = InMemoryDrugIndex::new();
    index.insert_info("Lipitor", "Lipitor <10mg> tablets");
    let router = build_router(AppState {
        index: Arc::new(index),
        generator: Arc::new(CannedGenerator),
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}/search", addr)
}

#[tokio::test]
async fn test_handler_renders_server_reply() {
    let endpoint = spawn_server().await;
    let page = Arc::new(InMemoryPage::with_query(" Lipitor "));
    let handler = SearchHandler::new(
        page.clone(),
        Arc::new(HttpTransport::new(&ClientConfig::new(endpoint))),
    );

    assert!(matches!(handler.activate().await, Activation::Rendered));

    let markup = page.target().markup().unwrap().to_string();
    assert!(markup.contains("Lipitor"));
    assert!(markup.contains("Generic equivalent of Lipitor: atorvastatin"));
    assert!(markup.contains("Lipitor &lt;10mg&gt; tablets"));

    // Same query, same reply, same page.
    handler.activate().await;
    assert_eq!(page.target().markup(), Some(markup.as_str()));
}

#[tokio::test]
async fn test_handler_shows_fetch_error_for_rejected_request() {
    let endpoint = spawn_server().await;
    let page = Arc::new(InMemoryPage::with_query("Lipitor"));
    let handler = SearchHandler::new(
        page.clone(),
        // Unknown route: the server answers 404.
        Arc::new(HttpTransport::new(&ClientConfig::new(format!("{}/missing", endpoint)))),
    );

    handler.activate().await;

    assert_eq!(
        page.target(),
        RenderTarget::Text("Error fetching drug information.".to_string())
    );
}
