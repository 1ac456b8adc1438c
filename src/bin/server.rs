//! Document gateway server binary
//!
//! Run with: cargo run --bin docgate-server -- [config.toml]

use docgate::config::Settings;
use docgate::server::ApiServer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "docgate=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());
    let settings = Settings::load(&config_path)?;

    tracing::info!("Configuration loaded from {}", config_path);
    tracing::info!("  - Elasticsearch: {}", settings.elasticsearch.base_url());
    tracing::info!("  - XML index: {}", settings.elasticsearch.xml_index);
    tracing::info!("  - DOCX index: {}", settings.elasticsearch.docx_index);
    tracing::info!("  - PDF index: {}", settings.elasticsearch.pdf_index);
    tracing::info!(
        "  - Uploads directory: {}",
        settings.server.uploads_dir.display()
    );

    let server = ApiServer::new(settings)?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST /upload                  - Upload XML/DOCX/PDF files");
    println!("  GET  /xml-index               - List indexed XML documents");
    println!("  GET  /xml-index/:term         - Search XML documents");
    println!("  GET  /docx-attachments        - List DOCX attachments");
    println!("  GET  /docx-attachments/:term  - Search DOCX attachments");
    println!("  GET  /pdf-attachments         - List PDF attachments");
    println!("  GET  /pdf-attachments/:term   - Search PDF attachments");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
