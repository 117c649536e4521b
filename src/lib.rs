pub mod advisor;
pub mod analytics;
pub mod autotagger;
pub mod config;
pub mod display;
pub mod gemini;
pub mod models;
pub mod ranker;
pub mod service;
pub mod store;

pub use advisor::{AdvisorReply, Answer, ContextScope, NoteAdvisor};
pub use config::Config;
pub use gemini::{GeminiClient, GeminiClientBuilder, GeminiClientTrait, GeminiError};
pub use models::{Note, NoteBuilder, NoteId, NoteMetadata, NoteUpdate};
pub use ranker::{Relevance, RelevanceRanker};
pub use service::{NewNote, NoteService, ServiceError};
pub use store::{ListFilter, NoteStore, StoreError};
