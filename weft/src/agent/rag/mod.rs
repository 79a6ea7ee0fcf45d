//! Retrieval-augmented generation graphs with document and generation grading.

mod graph;
mod nodes;
mod state;

pub use graph::{
    build_adaptive_rag_graph, build_agentic_rag_graph, decide_to_generate, AdaptiveRagGraders,
    GenerationGrade, GenerationGrader, RagNode,
};
pub use nodes::{
    documents_from_value, search_contents, GenerateNode, GradeDocumentsNode, RagCapabilities,
    RetrieveNode, WebSearchNode, GENERATION_PROMPT,
};
pub use state::{Document, RagState};
