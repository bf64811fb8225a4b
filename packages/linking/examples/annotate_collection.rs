//! Annotate a document collection against live services.
//!
//! Reads a JSON `DocumentCollection` from a file, runs the pipeline
//! against a local Spotlight service and the public DBpedia SPARQL
//! endpoint, writes the augmented collection back out, and prints a
//! per-layer summary.
//!
//! ```bash
//! cargo run --example annotate_collection -- input.json output.json [spotlight-address]
//! ```
//!
//! The Spotlight address defaults to `localhost:2222`.

use std::time::Duration;

use linking::{
    annotate_collection, DocumentCollection, PipelineConfig, SparqlResolver, SpotlightLinker,
};
use spotlight_client::SpotlightClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,linking=debug".into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let input = args.next().ok_or("usage: annotate_collection <input.json> <output.json> [address]")?;
    let output = args.next().ok_or("usage: annotate_collection <input.json> <output.json> [address]")?;
    let address = args.next().unwrap_or_else(|| "localhost:2222".to_string());

    let mut collection: DocumentCollection =
        serde_json::from_str(&std::fs::read_to_string(&input)?)?;
    tracing::info!(
        documents = collection.documents.len(),
        input = %input,
        "loaded collection"
    );

    let linker = SpotlightLinker::new(SpotlightClient::new(&address))
        .with_ready_timeout(Duration::from_secs(60));
    let resolver = SparqlResolver::new();

    let report = annotate_collection(
        &mut collection,
        &PipelineConfig::default(),
        &linker,
        &resolver,
    )
    .await?;

    std::fs::write(&output, serde_json::to_string_pretty(&collection)?)?;

    for layer in &collection.layers {
        println!(
            "layer id={} document={} annotations={} app={}",
            layer.id,
            layer.document_id,
            layer.len(),
            layer.app
        );
    }
    println!(
        "processed={} skipped={} failed={} mentions={}",
        report.documents_processed,
        report.documents_skipped,
        report.failed_documents.len(),
        report.mentions_emitted
    );

    Ok(())
}
