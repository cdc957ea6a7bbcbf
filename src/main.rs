use std::error::Error;
use std::sync::Arc;

use grant_answering::{
    Grant, GrantAnswering, InnovatorProfileProvider, StoreProfileSource, cfg::AnsweringConfig,
};
use llm_service::{OpenAiService, config::default_config};
use profile_store::{ProfileStore, embed::openai::OpenAiEmbedder};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = std::env::args().skip(1);
    let (entity_id, grant_path) = match (args.next(), args.next()) {
        (Some(entity_id), Some(grant_path)) => (entity_id, grant_path),
        _ => {
            eprintln!("usage: catalyzator-backend <entity_id> <grant.json>");
            std::process::exit(2);
        }
    };

    let grant: Grant = serde_json::from_str(&std::fs::read_to_string(&grant_path)?)?;
    tracing::info!(
        "Answering {} questions for entity '{}' from '{}'",
        grant.questions.len(),
        entity_id,
        grant_path
    );

    let cfg = AnsweringConfig::from_env();
    let completion = Arc::new(OpenAiService::new(default_config::config_completion()?)?);
    let embedding = Arc::new(OpenAiService::new(default_config::config_embedding()?)?);
    let embedder = Arc::new(OpenAiEmbedder::new(embedding, cfg.embedding_dim));

    let store = ProfileStore::new(cfg.make_store_config())?;
    let source = Arc::new(StoreProfileSource::new(store, embedder));
    let provider = InnovatorProfileProvider::new(source, completion.clone(), cfg.search_config());
    let answering = GrantAnswering::new(completion, provider);

    let response = answering.process_grant_application(&entity_id, &grant).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
