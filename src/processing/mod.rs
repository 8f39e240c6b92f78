//! Text processing and ranking module

pub mod document;
pub mod keywords;
pub mod embeddings;
pub mod embedding_manager;
pub mod highlighter;
pub mod ranking;

pub use document::{Document, DocumentFailure, ScoreEntry, TextRecord};
pub use embeddings::{Embedder, LexicalEmbedder, SimilarityScorer, StaticModelEmbedder};
pub use highlighter::Highlighter;
pub use keywords::{extract_keywords, KeywordSet};
pub use ranking::{RankingPipeline, RankingRun};
