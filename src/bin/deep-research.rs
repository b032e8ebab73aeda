use std::env;

use deep_research_core::adapters::context7::Context7Adapter;
use deep_research_core::adapters::duckduckgo::DuckDuckGoAdapter;
use deep_research_core::adapters::google::GoogleAdapter;
use deep_research_core::adapters::langsearch::LangSearchAdapter;
use deep_research_core::adapters::tavily::TavilyAdapter;
use deep_research_core::adapters::SearchAdapter;
use deep_research_core::core::config::{OpenAiCompatibleConfig, ResearchAggregatorConfig};
use deep_research_core::core::types::DeepResearchConfig;
use deep_research_core::lm::OpenAiCompatibleLm;
use deep_research_core::search::UnifiedSearchAggregator;
use deep_research_core::conduct_deep_research;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let query = env::args().skip(1).collect::<Vec<_>>().join(" ");
    if query.trim().is_empty() {
        eprintln!("usage: deep-research <research question>");
        std::process::exit(2);
    }

    let http_client = reqwest::Client::new();
    let aggregator_config = ResearchAggregatorConfig::from_env();
    let lm_config = OpenAiCompatibleConfig::from_env();

    let adapters: Vec<Box<dyn SearchAdapter>> = vec![
        Box::new(GoogleAdapter::new(
            aggregator_config.google_api_key.clone(),
            aggregator_config.google_cse_id.clone(),
            http_client.clone(),
        )),
        Box::new(DuckDuckGoAdapter::new(http_client.clone())),
        Box::new(TavilyAdapter::new(aggregator_config.tavily_api_key.clone(), http_client.clone())),
        Box::new(LangSearchAdapter::new(aggregator_config.langsearch_api_key.clone(), http_client.clone())),
        Box::new(Context7Adapter::new(aggregator_config.context7_base_url_or_default(), http_client.clone())),
    ];

    let aggregator = UnifiedSearchAggregator::new(adapters);
    let lm = OpenAiCompatibleLm::new(lm_config, http_client);
    let config = DeepResearchConfig::default();

    let result = conduct_deep_research(&query, &config, &lm, &aggregator).await;
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
