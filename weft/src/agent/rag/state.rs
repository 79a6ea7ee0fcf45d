//! RAG state: question, retrieved documents, generation and the web-search flag.

use serde::{Deserialize, Serialize};

use crate::channels::StateSchema;
use crate::state::GraphState;

/// A retrieved or searched text chunk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub page_content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Document {
    pub fn new(page_content: impl Into<String>) -> Self {
        Self {
            page_content: page_content.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// State shared by the agentic and adaptive RAG graphs.
///
/// `documents` distinguishes "never set" (`None`) from "set but empty"; web search
/// creates the list in the first case and appends to it in the second.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RagState {
    pub question: String,
    #[serde(default)]
    pub generation: String,
    #[serde(default)]
    pub web_search: bool,
    #[serde(default)]
    pub documents: Option<Vec<Document>>,
}

impl RagState {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            ..Self::default()
        }
    }

    pub fn with_documents(mut self, documents: Vec<Document>) -> Self {
        self.documents = Some(documents);
        self
    }

    /// Documents as one context string, separated by blank lines.
    pub fn joined_documents(&self) -> String {
        self.documents
            .iter()
            .flatten()
            .map(|d| d.page_content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl GraphState for RagState {
    fn schema() -> StateSchema {
        StateSchema::new()
            .replace("question")
            .replace("generation")
            .replace("web_search")
            .replace("documents")
    }
}
