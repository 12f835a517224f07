use std::env;

use devgenius::{
    agent::{AgentClient, AgentTarget, BedrockAgentClient},
    aws,
    config::{self, DEFAULT_FRONTEND_REGION},
    knowledge_base::{BedrockKnowledgeBase, KnowledgeBase},
    storage::{ObjectStore, S3ObjectStore},
};
use futures_util::StreamExt;

fn require_env(key: &str) -> String {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| panic!("{key} must be set for live validation"))
}

#[tokio::test]
#[ignore = "Requires AWS credentials and PDF_BUCKET"]
async fn live_bucket_listing_returns_keys() {
    let _ = dotenvy::dotenv();
    let bucket = require_env("PDF_BUCKET");
    let sdk_config = aws::load_sdk_config(None, None).await;
    let store = S3ObjectStore::from_conf(&sdk_config);

    let mut keys = store.list_keys(&bucket);
    let first = keys.next().await;
    if let Some(result) = first {
        let key = result.expect("listing should succeed");
        assert!(!key.is_empty(), "listed key must not be empty");
    }
}

#[tokio::test]
#[ignore = "Requires AWS credentials and a Bedrock knowledge base"]
async fn live_knowledge_base_has_data_sources() {
    let _ = dotenvy::dotenv();
    let knowledge_base_id = require_env("BEDROCK_KB_ID");
    let sdk_config = aws::load_sdk_config(None, Some(DEFAULT_FRONTEND_REGION)).await;
    let knowledge_base = BedrockKnowledgeBase::from_conf(&sdk_config);

    let count = knowledge_base
        .count_data_sources(&knowledge_base_id)
        .await
        .expect("list data sources");
    assert!(count > 0, "knowledge base should have at least one data source");
}

#[tokio::test]
#[ignore = "Requires AWS credentials and a Bedrock agent"]
async fn live_agent_answers_query() {
    let config = config::init_frontend_config().expect("front end config");
    let sdk_config = aws::load_sdk_config(
        config.aws_region.as_deref(),
        Some(DEFAULT_FRONTEND_REGION),
    )
    .await;
    let agent = BedrockAgentClient::from_conf(
        &sdk_config,
        AgentTarget {
            agent_id: config.agent_id,
            agent_alias_id: config.agent_alias_id,
        },
    );

    let answer = agent
        .invoke("Describe a serverless architecture for a static website.")
        .await
        .expect("agent invocation");
    assert!(!answer.trim().is_empty(), "agent should return text");
}
