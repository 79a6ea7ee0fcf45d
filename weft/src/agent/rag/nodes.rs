//! RAG nodes: retrieve, grade documents, web search, generate.
//!
//! Each node reads the question (and documents) from [`RagState`] and calls one
//! injected capability. Capability failures here fail the node: unlike the tool node,
//! these calls are part of the graph's control flow, not data for a reasoning model.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::capability::{parse_binary_score, Capability, CapabilityError};
use crate::channels::Patch;
use crate::error::NodeError;
use crate::graph::Node;
use crate::llm::LlmClient;
use crate::message::Message;

use super::state::{Document, RagState};

pub const GENERATION_PROMPT: &str = "You are an assistant for question-answering tasks. \
Use the following pieces of retrieved context to answer the question. If you don't know the \
answer, just say that you don't know. Use three sentences maximum and keep the answer concise.";

/// External collaborators shared by the RAG nodes.
#[derive(Clone)]
pub struct RagCapabilities {
    /// `{"question"}` → array of documents (strings or `{page_content}` objects).
    pub retriever: Arc<dyn Capability>,
    /// `{"question", "document"}` → binary relevance score.
    pub retrieval_grader: Arc<dyn Capability>,
    /// `{"query"}` → `{"results": [{"content"}]}` or an array of results.
    pub web_search: Arc<dyn Capability>,
    pub generator: Arc<dyn LlmClient>,
}

/// Parses a retriever answer into documents.
pub fn documents_from_value(value: &Value) -> Result<Vec<Document>, CapabilityError> {
    let items = value.as_array().ok_or_else(|| {
        CapabilityError::InvalidInput(format!("expected an array of documents, got {}", value))
    })?;
    items
        .iter()
        .map(|item| match item {
            Value::String(s) => Ok(Document::new(s.clone())),
            other => serde_json::from_value::<Document>(other.clone())
                .map_err(|e| CapabilityError::InvalidInput(format!("bad document: {}", e))),
        })
        .collect()
}

/// Text contents of a web-search answer, in result order.
pub fn search_contents(value: &Value) -> Vec<String> {
    let results = match value {
        Value::Object(map) => map.get("results").and_then(Value::as_array),
        Value::Array(items) => Some(items),
        _ => None,
    };
    results
        .into_iter()
        .flatten()
        .filter_map(|r| match r {
            Value::String(s) => Some(s.clone()),
            other => other.get("content").and_then(Value::as_str).map(str::to_string),
        })
        .collect()
}

/// Fetches documents for the question from the retriever.
pub struct RetrieveNode {
    retriever: Arc<dyn Capability>,
}

impl RetrieveNode {
    pub fn new(retriever: Arc<dyn Capability>) -> Self {
        Self { retriever }
    }
}

#[async_trait]
impl Node<RagState> for RetrieveNode {
    async fn run(&self, state: &RagState) -> Result<Patch, NodeError> {
        let answer = self
            .retriever
            .invoke(json!({ "question": state.question }))
            .await?;
        let documents = documents_from_value(&answer)?;
        debug!(count = documents.len(), "Retrieved documents");
        Ok(Patch::new().set("documents", &documents)?)
    }
}

/// Keeps only documents the relevance grader accepts; flags web search if any was dropped.
pub struct GradeDocumentsNode {
    grader: Arc<dyn Capability>,
}

impl GradeDocumentsNode {
    pub fn new(grader: Arc<dyn Capability>) -> Self {
        Self { grader }
    }
}

#[async_trait]
impl Node<RagState> for GradeDocumentsNode {
    async fn run(&self, state: &RagState) -> Result<Patch, NodeError> {
        let documents = state.documents.as_deref().unwrap_or_default();
        let mut relevant = Vec::with_capacity(documents.len());
        for doc in documents {
            let score = self
                .grader
                .invoke(json!({ "question": state.question, "document": doc.page_content }))
                .await?;
            if parse_binary_score(&score)? {
                debug!("Document relevant");
                relevant.push(doc.clone());
            } else {
                debug!("Document not relevant");
            }
        }
        let web_search = relevant.len() < documents.len();
        Ok(Patch::new()
            .set("documents", &relevant)?
            .set("web_search", &web_search)?)
    }
}

/// Searches the web for the question and adds the joined results as one document.
pub struct WebSearchNode {
    search: Arc<dyn Capability>,
}

impl WebSearchNode {
    pub fn new(search: Arc<dyn Capability>) -> Self {
        Self { search }
    }
}

#[async_trait]
impl Node<RagState> for WebSearchNode {
    async fn run(&self, state: &RagState) -> Result<Patch, NodeError> {
        let answer = self
            .search
            .invoke(json!({ "query": state.question }))
            .await?;
        let web_results = Document::new(search_contents(&answer).join("\n")).with_source("web");
        let documents = match &state.documents {
            Some(existing) => {
                let mut docs = existing.clone();
                docs.push(web_results);
                docs
            }
            None => vec![web_results],
        };
        Ok(Patch::new().set("documents", &documents)?)
    }
}

/// Answers the question from the documents with the generator LLM.
pub struct GenerateNode {
    llm: Arc<dyn LlmClient>,
}

impl GenerateNode {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    fn prompt(state: &RagState) -> Vec<Message> {
        vec![
            Message::system(GENERATION_PROMPT),
            Message::human(format!(
                "Question: {}\nContext: {}\nAnswer:",
                state.question,
                state.joined_documents()
            )),
        ]
    }
}

#[async_trait]
impl Node<RagState> for GenerateNode {
    async fn run(&self, state: &RagState) -> Result<Patch, NodeError> {
        let response = self.llm.invoke(&Self::prompt(state)).await?;
        Ok(Patch::new().set("generation", &response.content)?)
    }
}
