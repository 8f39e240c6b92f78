//! Embedding backends and cosine similarity scoring

use crate::error::{Result, ResumeScreenerError};
use log::{debug, info};
use model2vec_rs::model::StaticModel;
use std::collections::HashMap;
use std::path::Path;
use std::time::Instant;

/// Anything that maps text to a fixed-length vector.
pub trait Embedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Human-readable backend name for reports.
    fn name(&self) -> &str;
}

impl<E: Embedder + ?Sized> Embedder for Box<E> {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        (**self).embed(text)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Model2Vec static embeddings.
pub struct StaticModelEmbedder {
    model: StaticModel,
    model_name: String,
}

impl StaticModelEmbedder {
    /// Load from a local model folder or a HuggingFace repo id.
    pub fn load(repo_or_path: &Path, model_name: &str) -> Result<Self> {
        let start_time = Instant::now();
        info!("Loading Model2Vec embedding model from: {}", repo_or_path.display());

        let model = StaticModel::from_pretrained(
            repo_or_path,
            None, // token
            None, // normalize
            None, // subfolder
        )
        .map_err(|e| ResumeScreenerError::ModelLoading(format!("Failed to load model: {}", e)))?;

        info!("Model loaded successfully in {:.2?}", start_time.elapsed());

        Ok(Self {
            model,
            model_name: model_name.to_string(),
        })
    }
}

impl Embedder for StaticModelEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embedding = self.model.encode_single(text);
        if embedding.is_empty() {
            return Err(ResumeScreenerError::Embedding(format!(
                "Model '{}' returned an empty embedding",
                self.model_name
            )));
        }
        Ok(embedding)
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}

/// Hashed bag-of-words vectors. Deterministic and model-free.
#[derive(Debug, Clone)]
pub struct LexicalEmbedder {
    dimension: usize,
}

impl Default for LexicalEmbedder {
    fn default() -> Self {
        Self::new(256)
    }
}

impl LexicalEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    // FNV-1a, stable across runs and platforms
    fn bucket(&self, token: &str) -> usize {
        let mut hash: u64 = 0xcbf29ce484222325;
        for byte in token.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(0x100000001b3);
        }
        (hash % self.dimension as u64) as usize
    }
}

impl Embedder for LexicalEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vector = vec![0.0f32; self.dimension];

        for word in text.split_whitespace() {
            let token: String = word
                .chars()
                .filter(|c| c.is_alphanumeric() || *c == '_')
                .flat_map(char::to_lowercase)
                .collect();
            if !token.is_empty() {
                vector[self.bucket(&token)] += 1.0;
            }
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        Ok(vector)
    }

    fn name(&self) -> &str {
        "lexical"
    }
}

/// Cosine similarity; 0 when either vector has zero magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32> {
    if a.len() != b.len() {
        return Err(ResumeScreenerError::Embedding(format!(
            "Embedding dimensions don't match: {} vs {}",
            a.len(),
            b.len()
        )));
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        Ok(0.0)
    } else {
        Ok(dot_product / (norm_a * norm_b))
    }
}

/// Scores resume text against a job description with one embedder for the
/// whole run, caching vectors per distinct text.
pub struct SimilarityScorer<E: Embedder> {
    embedder: E,
    cache: HashMap<String, Vec<f32>>,
    max_cached: usize,
    hits: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub cache_size: usize,
    pub max_cached: usize,
    pub hits: usize,
}

impl<E: Embedder> SimilarityScorer<E> {
    pub fn new(embedder: E) -> Self {
        Self::with_cache_limit(embedder, 256)
    }

    pub fn with_cache_limit(embedder: E, max_cached: usize) -> Self {
        Self {
            embedder,
            cache: HashMap::new(),
            max_cached,
            hits: 0,
        }
    }

    pub fn embedder_name(&self) -> &str {
        self.embedder.name()
    }

    /// Cosine similarity between the two texts, nominally in [-1, 1].
    pub fn similarity(&mut self, resume_text: &str, job_text: &str) -> Result<f32> {
        let resume_vec = self.embed_cached(resume_text)?;
        let job_vec = self.embed_cached(job_text)?;
        cosine_similarity(&resume_vec, &job_vec)
    }

    fn embed_cached(&mut self, text: &str) -> Result<Vec<f32>> {
        if let Some(cached) = self.cache.get(text).cloned() {
            debug!("Embedding cache hit ({} chars)", text.len());
            self.hits += 1;
            return Ok(cached);
        }

        let embedding = self.embedder.embed(text)?;
        if self.cache.len() < self.max_cached {
            self.cache.insert(text.to_string(), embedding.clone());
        }
        Ok(embedding)
    }

    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            cache_size: self.cache.len(),
            max_cached: self.max_cached,
            hits: self.hits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingEmbedder {
        calls: Cell<usize>,
    }

    impl Embedder for CountingEmbedder {
        fn embed(&self, text: &str) -> Result<Vec<f32>> {
            self.calls.set(self.calls.get() + 1);
            Ok(vec![text.len() as f32, 1.0])
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    struct FailingEmbedder;

    impl Embedder for FailingEmbedder {
        fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Err(ResumeScreenerError::Embedding("out of memory".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    #[test]
    fn test_cosine_similarity_basics() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]).unwrap() - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap().abs() < 1e-6);
        assert!((cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]).unwrap() + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_zero_magnitude_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&[], &[]).unwrap(), 0.0);
    }

    #[test]
    fn test_cosine_similarity_dimension_mismatch() {
        assert!(cosine_similarity(&[1.0], &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_both_empty_texts_score_zero() {
        let mut scorer = SimilarityScorer::new(LexicalEmbedder::default());
        assert_eq!(scorer.similarity("", "").unwrap(), 0.0);
        assert_eq!(scorer.similarity("   ", "\n").unwrap(), 0.0);
    }

    #[test]
    fn test_identical_text_scores_near_one() {
        let mut scorer = SimilarityScorer::new(LexicalEmbedder::default());
        let text = "Experienced Python developer, AWS certified";
        assert!((scorer.similarity(text, text).unwrap() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_related_text_scores_higher_than_unrelated() {
        let mut scorer = SimilarityScorer::new(LexicalEmbedder::default());
        let job = "Looking for a Python developer with AWS experience";

        let related = scorer.similarity("Experienced Python developer, AWS certified", job).unwrap();
        let unrelated = scorer.similarity("Pastry chef baking sourdough bread", job).unwrap();

        assert!(related > unrelated);
        assert!(related > 0.3);
    }

    #[test]
    fn test_job_description_embedded_once() {
        let embedder = CountingEmbedder { calls: Cell::new(0) };
        let mut scorer = SimilarityScorer::new(embedder);

        scorer.similarity("resume one", "the job").unwrap();
        scorer.similarity("resume two", "the job").unwrap();

        assert_eq!(scorer.embedder.calls.get(), 3);
        assert_eq!(scorer.cache_stats().cache_size, 3);
        assert_eq!(scorer.cache_stats().hits, 1);
    }

    #[test]
    fn test_cache_limit_is_respected() {
        let embedder = CountingEmbedder { calls: Cell::new(0) };
        let mut scorer = SimilarityScorer::with_cache_limit(embedder, 1);

        scorer.similarity("a", "b").unwrap();
        scorer.similarity("c", "d").unwrap();

        assert_eq!(scorer.cache_stats().cache_size, 1);
    }

    #[test]
    fn test_embedding_failure_propagates() {
        let mut scorer = SimilarityScorer::new(FailingEmbedder);
        let err = scorer.similarity("resume", "job").unwrap_err();
        assert!(matches!(err, ResumeScreenerError::Embedding(_)));
    }

    #[test]
    fn test_lexical_embedder_is_normalized() {
        let vector = LexicalEmbedder::new(64).embed("rust rust tokio").unwrap();
        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert_eq!(vector.len(), 64);
        assert!((norm - 1.0).abs() < 1e-5);
    }
}
