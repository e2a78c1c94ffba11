//! Embeddings and their column schema

pub mod metadata;
pub mod record;

pub use metadata::EmbeddingMetaData;
pub use record::Embedding;
