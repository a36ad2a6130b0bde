// ─────────────────────────────────────────────────────────────────────
// Ontoguard — Collaborator Provider Interfaces
// ─────────────────────────────────────────────────────────────────────
//! Seams for the two out-of-process collaborators: the embedding model
//! (pure text → vector) and the generation model used for corrective
//! rewrites.
//!
//! Production deployments plug real models in behind these traits,
//! ONNX embedded in Rust or gRPC/HTTP to an inference server. The
//! hash-feature embedding gives deterministic vectors for tests and
//! benchmarks without a model.

use serde::{Deserialize, Serialize};

use ontoguard_types::OntoguardResult;

/// Embedding collaborator: text → fixed-dimension state vector.
///
/// Must be effectively deterministic for identical input; the cache
/// relies on that. Failure propagates; metrics are meaningless
/// without valid vectors, so there is no fallback.
pub trait EmbeddingProvider: Send + Sync {
    fn embed(&self, text: &str) -> OntoguardResult<Vec<f64>>;
}

/// Role of one message in a generation conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One message in a generation conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

/// Generation collaborator: conversation → rewritten text.
///
/// May fail or time out; `deadline_ms` is the caller-imposed bound so
/// implementations never block a turn indefinitely. Only the control
/// supervisor calls this, and it treats every `Err` (and empty output)
/// as a signal to fail open.
pub trait GenerationProvider: Send + Sync {
    fn generate(&self, messages: &[ChatMessage], deadline_ms: u64) -> OntoguardResult<String>;
}

/// Deterministic hash-feature embedding (no model required).
///
/// Each word contributes a sine of its byte sum to one slot; the
/// result is L2-normalized. Collisions abound, but identical text
/// always maps to the identical vector, which is all the kernel's
/// tests and benchmarks need.
pub struct HashEmbedding {
    dimension: usize,
}

impl HashEmbedding {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

impl Default for HashEmbedding {
    fn default() -> Self {
        Self { dimension: 384 }
    }
}

impl EmbeddingProvider for HashEmbedding {
    fn embed(&self, text: &str) -> OntoguardResult<Vec<f64>> {
        let mut embedding = vec![0.0f64; self.dimension];

        for (i, word) in text.to_lowercase().split_whitespace().enumerate() {
            let hash: u32 = word.bytes().map(u32::from).sum();
            embedding[i % self.dimension] += (hash as f64).sin() * 0.1;
        }

        let norm: f64 = embedding.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for v in &mut embedding {
                *v /= norm;
            }
        }
        Ok(embedding)
    }
}

/// Embedding backend that calls a function pointer, for deployments
/// that keep the model out of process.
type EmbedFn = Box<dyn Fn(&str) -> OntoguardResult<Vec<f64>> + Send + Sync>;

pub struct ExternalEmbedding {
    embed_fn: EmbedFn,
}

impl ExternalEmbedding {
    pub fn new(embed_fn: impl Fn(&str) -> OntoguardResult<Vec<f64>> + Send + Sync + 'static) -> Self {
        Self {
            embed_fn: Box::new(embed_fn),
        }
    }
}

impl EmbeddingProvider for ExternalEmbedding {
    fn embed(&self, text: &str) -> OntoguardResult<Vec<f64>> {
        (self.embed_fn)(text)
    }
}

/// Generation backend that calls a function pointer.
type GenerateFn = Box<dyn Fn(&[ChatMessage], u64) -> OntoguardResult<String> + Send + Sync>;

pub struct ExternalGeneration {
    generate_fn: GenerateFn,
}

impl ExternalGeneration {
    pub fn new(
        generate_fn: impl Fn(&[ChatMessage], u64) -> OntoguardResult<String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            generate_fn: Box::new(generate_fn),
        }
    }
}

impl GenerationProvider for ExternalGeneration {
    fn generate(&self, messages: &[ChatMessage], deadline_ms: u64) -> OntoguardResult<String> {
        (self.generate_fn)(messages, deadline_ms)
    }
}
