use anyhow::{Context, Result};
use devgenius::{
    agent::{AgentTarget, BedrockAgentClient},
    aws, config, frontend,
    knowledge_base::BedrockKnowledgeBase,
    logging,
};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_tracing();
    let config = config::init_frontend_config().context("failed to load front end config")?;
    let sdk_config = aws::load_sdk_config(
        config.aws_region.as_deref(),
        Some(config::DEFAULT_FRONTEND_REGION),
    )
    .await;

    let agent = BedrockAgentClient::from_conf(
        &sdk_config,
        AgentTarget {
            agent_id: config.agent_id.clone(),
            agent_alias_id: config.agent_alias_id.clone(),
        },
    );
    let knowledge_base = BedrockKnowledgeBase::from_conf(&sdk_config);
    let state = frontend::FrontEndState::new(
        Arc::new(agent),
        Arc::new(knowledge_base),
        config.knowledge_base_id.clone(),
    );
    let app = frontend::create_router(Arc::new(state));

    let (listener, port) = bind_listener(config.server_port)
        .await
        .context("failed to bind listener")?;
    tracing::info!("Listening on http://0.0.0.0:{}", port);
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

async fn bind_listener(server_port: Option<u16>) -> Result<(TcpListener, u16), std::io::Error> {
    use std::net::Ipv4Addr;

    if let Some(port) = server_port {
        return TcpListener::bind((Ipv4Addr::UNSPECIFIED, port))
            .await
            .map(|listener| (listener, port));
    }

    const PORT_RANGE: std::ops::RangeInclusive<u16> = 4100..=4199;
    for port in PORT_RANGE {
        match TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).await {
            Ok(listener) => {
                tracing::debug!(port, "Bound server port");
                return Ok((listener, port));
            }
            Err(err) if err.kind() == std::io::ErrorKind::AddrInUse => {
                tracing::debug!(port, "Port already in use; trying next");
                continue;
            }
            Err(err) => return Err(err),
        }
    }

    Err(std::io::Error::new(
        std::io::ErrorKind::AddrNotAvailable,
        "No available port found in range 4100-4199",
    ))
}
