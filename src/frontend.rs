//! HTTP front end for asking the agent questions.
//!
//! This module exposes a compact Axum router:
//!
//! - `GET /` – Single page with a question box, a "Generate Solution" button, and a
//!   "Check PDF Ingestion" checkbox.
//! - `POST /query` – Forward the query text verbatim to the agent. Always answers `200` with
//!   `{ "answer": ... }`; a failed invocation yields `Error: <message>` as the answer.
//! - `GET /ingestion-status` – Report whether the knowledge base has any data source.
//! - `GET /commands` – Machine-readable command catalog for quick discovery by tools/hosts.

use crate::agent::{AgentClient, answer_or_error};
use crate::knowledge_base::KnowledgeBase;
use axum::{
    Json, Router,
    extract::State,
    response::Html,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Message shown when the knowledge base has at least one data source.
pub const READY_MESSAGE: &str = "PDFs are ready for semantic search.";
/// Message shown when the knowledge base has no data source or the check failed.
pub const NOT_READY_MESSAGE: &str = "PDFs not found in Knowledge Base.";

/// Shared handles used by the request handlers.
pub struct FrontEndState {
    agent: Arc<dyn AgentClient>,
    knowledge_base: Arc<dyn KnowledgeBase>,
    knowledge_base_id: String,
}

impl FrontEndState {
    /// Bundle the agent, the knowledge base client, and the knowledge base to check.
    pub fn new(
        agent: Arc<dyn AgentClient>,
        knowledge_base: Arc<dyn KnowledgeBase>,
        knowledge_base_id: impl Into<String>,
    ) -> Self {
        Self {
            agent,
            knowledge_base,
            knowledge_base_id: knowledge_base_id.into(),
        }
    }

    /// Ask the agent and render the answer, or the error, as display text.
    pub async fn ask(&self, query: &str) -> String {
        let result = self.agent.invoke(query).await;
        if let Err(error) = &result {
            tracing::warn!(error = %error, "Agent invocation failed");
        }
        answer_or_error(result)
    }

    /// True when the knowledge base lists at least one data source; false on any failure.
    pub async fn ingestion_ready(&self) -> bool {
        match self
            .knowledge_base
            .count_data_sources(&self.knowledge_base_id)
            .await
        {
            Ok(count) => {
                tracing::debug!(knowledge_base = %self.knowledge_base_id, data_sources = count, "Checked ingestion status");
                count > 0
            }
            Err(error) => {
                tracing::warn!(knowledge_base = %self.knowledge_base_id, error = %error, "Ingestion status check failed");
                false
            }
        }
    }
}

/// Build the HTTP router exposing the query surface.
pub fn create_router(state: Arc<FrontEndState>) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/query", post(query_agent))
        .route("/ingestion-status", get(ingestion_status))
        .route("/commands", get(get_commands))
        .with_state(state)
}

/// Request body for `POST /query`.
#[derive(Deserialize)]
struct QueryRequest {
    /// Question forwarded verbatim; missing means empty.
    #[serde(default)]
    query: String,
}

/// Response body for `POST /query`.
#[derive(Serialize)]
struct QueryResponse {
    answer: String,
}

/// Forward a question to the agent.
async fn query_agent(
    State(state): State<Arc<FrontEndState>>,
    Json(request): Json<QueryRequest>,
) -> Json<QueryResponse> {
    let answer = state.ask(&request.query).await;
    tracing::info!(chars = answer.chars().count(), "Query request completed");
    Json(QueryResponse { answer })
}

/// Response body for `GET /ingestion-status`.
#[derive(Serialize)]
struct IngestionStatusResponse {
    ready: bool,
    message: &'static str,
}

/// Report knowledge base readiness.
async fn ingestion_status(State(state): State<Arc<FrontEndState>>) -> Json<IngestionStatusResponse> {
    let ready = state.ingestion_ready().await;
    Json(IngestionStatusResponse {
        ready,
        message: if ready { READY_MESSAGE } else { NOT_READY_MESSAGE },
    })
}

async fn index_page() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands.
async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "query",
                method: "POST",
                path: "/query",
                description: "Forward a question to the Bedrock agent. Response returns { \"answer\": string }.",
                request_example: Some(json!({
                    "query": "How do I design a highly available web tier?"
                })),
            },
            CommandDescriptor {
                name: "ingestion_status",
                method: "GET",
                path: "/ingestion-status",
                description: "Report whether the knowledge base has registered data sources.",
                request_example: None,
            },
        ],
    })
}

const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>DevGenius Mini Test</title>
<style>
body { font-family: sans-serif; max-width: 46rem; margin: 2rem auto; padding: 0 1rem; }
input[type=text] { width: 100%; padding: .5rem; box-sizing: border-box; }
#answer { white-space: pre-wrap; margin-top: 1rem; }
.ok { color: #1b7f3b; } .err { color: #b00020; }
</style>
</head>
<body>
<h1>DevGenius Mini Test</h1>
<label for="query">Enter your AWS architecture question:</label>
<input id="query" type="text">
<p><button id="submit">Generate Solution</button></p>
<div id="answer"></div>
<p><label><input id="check" type="checkbox"> Check PDF Ingestion</label></p>
<div id="status"></div>
<script>
document.getElementById("submit").addEventListener("click", async () => {
  const out = document.getElementById("answer");
  out.textContent = "…";
  try {
    const res = await fetch("/query", {
      method: "POST",
      headers: { "content-type": "application/json" },
      body: JSON.stringify({ query: document.getElementById("query").value })
    });
    out.textContent = (await res.json()).answer;
  } catch (e) {
    out.textContent = "Error: " + e;
  }
});
document.getElementById("check").addEventListener("change", async (event) => {
  const status = document.getElementById("status");
  status.textContent = "";
  if (!event.target.checked) return;
  try {
    const body = await (await fetch("/ingestion-status")).json();
    status.className = body.ready ? "ok" : "err";
    status.textContent = body.message;
  } catch (e) {
    status.className = "err";
    status.textContent = "PDFs not found in Knowledge Base.";
  }
});
</script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentError;
    use crate::knowledge_base::{
        Document, IngestReceipt, KnowledgeBaseError, KnowledgeBaseHandle,
    };
    use async_trait::async_trait;
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode},
    };
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    struct StubAgent {
        queries: Mutex<Vec<String>>,
        fail: bool,
    }

    impl StubAgent {
        fn new(fail: bool) -> Self {
            Self {
                queries: Mutex::new(Vec::new()),
                fail,
            }
        }
    }

    #[async_trait]
    impl AgentClient for StubAgent {
        async fn invoke(&self, query: &str) -> Result<String, AgentError> {
            self.queries.lock().await.push(query.to_string());
            if self.fail {
                Err(AgentError::Invocation("ThrottlingException".into()))
            } else {
                Ok(format!("answer to [{query}]"))
            }
        }
    }

    struct StubKnowledgeBase {
        data_sources: Result<usize, String>,
    }

    #[async_trait]
    impl KnowledgeBase for StubKnowledgeBase {
        async fn ingest_documents(
            &self,
            _handle: &KnowledgeBaseHandle,
            _documents: Vec<Document>,
        ) -> Result<Vec<IngestReceipt>, KnowledgeBaseError> {
            Ok(Vec::new())
        }

        async fn count_data_sources(&self, _id: &str) -> Result<usize, KnowledgeBaseError> {
            self.data_sources
                .clone()
                .map_err(KnowledgeBaseError::Request)
        }
    }

    fn app(agent: Arc<StubAgent>, data_sources: Result<usize, String>) -> Router {
        let state = FrontEndState::new(
            agent,
            Arc::new(StubKnowledgeBase { data_sources }),
            "KB123",
        );
        create_router(Arc::new(state))
    }

    async fn post_query(app: Router, body: &str) -> serde_json::Value {
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/query")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .expect("request"),
            )
            .await
            .expect("router response");
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&bytes).expect("json body")
    }

    async fn get_json(app: Router, uri: &str) -> serde_json::Value {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("router response");
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn query_is_forwarded_verbatim() {
        let agent = Arc::new(StubAgent::new(false));
        let json = post_query(
            app(agent.clone(), Ok(1)),
            r#"{"query":"  What is a landing zone?  "}"#,
        )
        .await;

        assert_eq!(json["answer"], "answer to [  What is a landing zone?  ]");
        assert_eq!(
            *agent.queries.lock().await,
            vec!["  What is a landing zone?  ".to_string()]
        );
    }

    #[tokio::test]
    async fn empty_query_still_invokes_agent() {
        let agent = Arc::new(StubAgent::new(false));
        let json = post_query(app(agent.clone(), Ok(1)), r#"{"query":""}"#).await;

        assert_eq!(json["answer"], "answer to []");
        assert_eq!(agent.queries.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn agent_failure_is_displayed_as_error_text() {
        let agent = Arc::new(StubAgent::new(true));
        let json = post_query(app(agent, Ok(1)), r#"{"query":"hi"}"#).await;
        assert_eq!(json["answer"], "Error: ThrottlingException");
    }

    #[tokio::test]
    async fn ingestion_status_reflects_data_sources() {
        let ready = get_json(app(Arc::new(StubAgent::new(false)), Ok(2)), "/ingestion-status").await;
        assert_eq!(ready["ready"], true);
        assert_eq!(ready["message"], READY_MESSAGE);

        let empty = get_json(app(Arc::new(StubAgent::new(false)), Ok(0)), "/ingestion-status").await;
        assert_eq!(empty["ready"], false);
        assert_eq!(empty["message"], NOT_READY_MESSAGE);
    }

    #[tokio::test]
    async fn ingestion_status_is_false_when_listing_fails() {
        let json = get_json(
            app(Arc::new(StubAgent::new(false)), Err("AccessDenied".into())),
            "/ingestion-status",
        )
        .await;
        assert_eq!(json["ready"], false);
    }

    #[tokio::test]
    async fn commands_catalog_exposes_query_endpoint() {
        let commands = get_commands().await.0.commands;
        let query = commands
            .iter()
            .find(|cmd| cmd.name == "query")
            .expect("query command present");
        assert_eq!(query.method, "POST");
        assert_eq!(query.path, "/query");
    }

    #[tokio::test]
    async fn index_page_has_input_button_and_checkbox() {
        let response = app(Arc::new(StubAgent::new(false)), Ok(1))
            .oneshot(Request::builder().uri("/").body(Body::empty()).expect("request"))
            .await
            .expect("router response");
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let html = String::from_utf8(bytes.to_vec()).expect("utf8");
        assert!(html.contains("Generate Solution"));
        assert!(html.contains("type=\"checkbox\""));
        assert!(html.contains("type=\"text\""));
    }
}
