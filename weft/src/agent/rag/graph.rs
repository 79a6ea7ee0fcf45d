//! Agentic and adaptive RAG graphs.
//!
//! Agentic: `retrieve` → `grade_documents` → (web_search ? `websearch` : `generate`);
//! `websearch` → `generate` → end.
//!
//! Adaptive: a question router picks `retrieve` or `websearch` as the entry; after
//! `generate`, a hallucination grader and an answer grader decide: useful → end,
//! not useful → `websearch`, not supported → `generate` again.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::agent::routing::ClassifierRouter;
use crate::capability::{parse_binary_score, Capability};
use crate::config::EngineConfig;
use crate::error::NodeError;
use crate::graph::{CompilationError, CompiledStateGraph, NodeKey, Route, Router, StateGraph};

use super::nodes::{GenerateNode, GradeDocumentsNode, RagCapabilities, RetrieveNode, WebSearchNode};
use super::state::RagState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RagNode {
    Retrieve,
    GradeDocuments,
    Websearch,
    Generate,
}

impl NodeKey for RagNode {
    fn name(&self) -> &str {
        match self {
            RagNode::Retrieve => "retrieve",
            RagNode::GradeDocuments => "grade_documents",
            RagNode::Websearch => "websearch",
            RagNode::Generate => "generate",
        }
    }
}

/// After grading: search the web if any document was dropped, else generate.
pub fn decide_to_generate(state: &RagState) -> Route<RagNode> {
    if state.web_search {
        Route::Node(RagNode::Websearch)
    } else {
        Route::Node(RagNode::Generate)
    }
}

/// Verdict on a generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationGrade {
    /// Grounded in the documents and answers the question.
    Useful,
    /// Grounded but does not answer the question.
    NotUseful,
    /// Not grounded in the documents.
    NotSupported,
}

/// Grades the latest generation with the hallucination and answer graders.
pub struct GenerationGrader {
    hallucination_grader: Arc<dyn Capability>,
    answer_grader: Arc<dyn Capability>,
}

impl GenerationGrader {
    pub fn new(hallucination_grader: Arc<dyn Capability>, answer_grader: Arc<dyn Capability>) -> Self {
        Self {
            hallucination_grader,
            answer_grader,
        }
    }

    pub async fn grade(&self, state: &RagState) -> Result<GenerationGrade, NodeError> {
        let grounded = self
            .hallucination_grader
            .invoke(json!({
                "documents": state.joined_documents(),
                "generation": state.generation,
            }))
            .await?;
        if !parse_binary_score(&grounded)? {
            tracing::debug!("Generation is not grounded in documents");
            return Ok(GenerationGrade::NotSupported);
        }
        let answers = self
            .answer_grader
            .invoke(json!({
                "question": state.question,
                "generation": state.generation,
            }))
            .await?;
        Ok(if parse_binary_score(&answers)? {
            GenerationGrade::Useful
        } else {
            GenerationGrade::NotUseful
        })
    }
}

#[async_trait]
impl Router<RagState, RagNode> for GenerationGrader {
    async fn route(&self, state: &RagState) -> Result<Route<RagNode>, NodeError> {
        Ok(match self.grade(state).await? {
            GenerationGrade::Useful => Route::End,
            GenerationGrade::NotUseful => Route::Node(RagNode::Websearch),
            GenerationGrade::NotSupported => Route::Node(RagNode::Generate),
        })
    }
}

/// Extra classifiers used by the adaptive graph.
#[derive(Clone)]
pub struct AdaptiveRagGraders {
    /// `{"question"}` → `{"datasource": "vectorstore" | "websearch"}`.
    pub question_router: Arc<dyn Capability>,
    /// `{"documents", "generation"}` → binary grounding score.
    pub hallucination_grader: Arc<dyn Capability>,
    /// `{"question", "generation"}` → binary usefulness score.
    pub answer_grader: Arc<dyn Capability>,
}

fn add_rag_nodes(graph: &mut StateGraph<RagState, RagNode>, caps: &RagCapabilities) {
    graph
        .add_node(
            RagNode::Retrieve,
            Arc::new(RetrieveNode::new(Arc::clone(&caps.retriever))),
        )
        .add_node(
            RagNode::GradeDocuments,
            Arc::new(GradeDocumentsNode::new(Arc::clone(&caps.retrieval_grader))),
        )
        .add_node(
            RagNode::Websearch,
            Arc::new(WebSearchNode::new(Arc::clone(&caps.web_search))),
        )
        .add_node(
            RagNode::Generate,
            Arc::new(GenerateNode::new(Arc::clone(&caps.generator))),
        )
        .add_edge(RagNode::Retrieve, RagNode::GradeDocuments)
        .add_conditional_edges(
            RagNode::GradeDocuments,
            decide_to_generate,
            [Route::Node(RagNode::Websearch), Route::Node(RagNode::Generate)],
        )
        .add_edge(RagNode::Websearch, RagNode::Generate);
}

pub fn build_agentic_rag_graph(
    caps: &RagCapabilities,
    config: &EngineConfig,
) -> Result<CompiledStateGraph<RagState, RagNode>, CompilationError> {
    let mut graph = StateGraph::<RagState, RagNode>::new().with_max_steps(config.max_steps);
    add_rag_nodes(&mut graph, caps);
    graph
        .set_entry_point(RagNode::Retrieve)
        .add_edge(RagNode::Generate, Route::End);
    graph.compile()
}

pub fn build_adaptive_rag_graph(
    caps: &RagCapabilities,
    graders: &AdaptiveRagGraders,
    config: &EngineConfig,
) -> Result<CompiledStateGraph<RagState, RagNode>, CompilationError> {
    let question_router = ClassifierRouter::new(
        Arc::clone(&graders.question_router),
        |s: &RagState| json!({ "question": s.question }),
    )
    .with_label_field("datasource")
    .on("vectorstore", RagNode::Retrieve)
    .on("websearch", RagNode::Websearch);
    let entry_targets = question_router.targets();
    let generation_grader = GenerationGrader::new(
        Arc::clone(&graders.hallucination_grader),
        Arc::clone(&graders.answer_grader),
    );

    let mut graph = StateGraph::<RagState, RagNode>::new().with_max_steps(config.max_steps);
    add_rag_nodes(&mut graph, caps);
    graph
        .set_conditional_entry_point(Arc::new(question_router), entry_targets)
        .add_router(
            RagNode::Generate,
            Arc::new(generation_grader),
            [
                Route::End,
                Route::Node(RagNode::Websearch),
                Route::Node(RagNode::Generate),
            ],
        );
    graph.compile()
}
