//! Embedding model catalogue, download, and local cache management

use crate::error::{Result, ResumeScreenerError};
use hf_hub::api::tokio::Api;
use log::{info, warn};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tokio::fs;

/// A model2vec model the screener knows how to fetch.
#[derive(Debug, Clone, Serialize)]
pub struct EmbeddingModelInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub repo_id: &'static str,
    pub size_mb: u64,
    pub dimensions: u32,
    pub description: &'static str,
}

const CATALOGUE: &[EmbeddingModelInfo] = &[
    EmbeddingModelInfo {
        id: "potion-base-8M",
        name: "Potion Base 8M",
        repo_id: "minishlab/potion-base-8M",
        size_mb: 33,
        dimensions: 256,
        description: "Small general-purpose static embeddings, the default",
    },
    EmbeddingModelInfo {
        id: "m2v-base",
        name: "Model2Vec Base",
        repo_id: "minishlab/M2V_base_output",
        size_mb: 90,
        dimensions: 256,
        description: "Original Model2Vec base distillation",
    },
    EmbeddingModelInfo {
        id: "m2v-large",
        name: "Model2Vec Large",
        repo_id: "minishlab/M2V_large_output",
        size_mb: 250,
        dimensions: 512,
        description: "Larger Model2Vec distillation for higher accuracy",
    },
];

const REQUIRED_FILES: &[&str] = &["model.safetensors", "tokenizer.json", "config.json"];
const OPTIONAL_FILES: &[&str] = &["README.md"];

pub struct EmbeddingModelManager {
    models_dir: PathBuf,
    downloaded_models: BTreeSet<String>,
}

impl EmbeddingModelManager {
    /// Open the models directory, creating it if needed, and scan what is already there.
    pub async fn new(models_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&models_dir).await.map_err(|e| {
            ResumeScreenerError::ModelLoading(format!("Failed to create models directory: {}", e))
        })?;

        let mut manager = Self {
            models_dir,
            downloaded_models: BTreeSet::new(),
        };
        manager.scan_downloaded_models().await?;
        Ok(manager)
    }

    async fn scan_downloaded_models(&mut self) -> Result<()> {
        let mut entries = fs::read_dir(&self.models_dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            if Self::is_complete_model_dir(&entry.path()).await {
                self.downloaded_models
                    .insert(entry.file_name().to_string_lossy().to_string());
            }
        }

        Ok(())
    }

    async fn is_complete_model_dir(path: &Path) -> bool {
        for file in REQUIRED_FILES {
            if fs::metadata(path.join(file)).await.is_err() {
                return false;
            }
        }
        true
    }

    pub fn list_available_models(&self) -> &'static [EmbeddingModelInfo] {
        CATALOGUE
    }

    pub fn list_downloaded_models(&self) -> Vec<String> {
        self.downloaded_models.iter().cloned().collect()
    }

    pub fn get_model_info(&self, model: &str) -> Option<&'static EmbeddingModelInfo> {
        let id = self.resolve_model_id(model)?;
        CATALOGUE.iter().find(|info| info.id == id)
    }

    pub fn is_model_downloaded(&self, model: &str) -> bool {
        self.resolve_model_id(model)
            .map(|id| self.downloaded_models.contains(id))
            .unwrap_or(false)
    }

    pub fn get_model_path(&self, model: &str) -> Option<PathBuf> {
        let id = self.resolve_model_id(model)?;
        self.downloaded_models
            .contains(id)
            .then(|| self.models_dir.join(id))
    }

    /// Resolve a catalogue id from an id, a repo id, or a display name (case-insensitive).
    pub fn resolve_model_id(&self, input: &str) -> Option<&'static str> {
        let lowered = input.to_lowercase();
        CATALOGUE
            .iter()
            .find(|info| {
                info.id == input || info.repo_id == input || info.name.to_lowercase() == lowered
            })
            .map(|info| info.id)
    }

    /// Download a catalogue model into the models directory.
    pub async fn download_model(&mut self, model: &str) -> Result<PathBuf> {
        let info = self
            .get_model_info(model)
            .ok_or_else(|| ResumeScreenerError::ModelNotFound(model.to_string()))?;
        let model_dir = self.models_dir.join(info.id);

        info!("Downloading embedding model {} ({} MB) from {}", info.name, info.size_mb, info.repo_id);
        fs::create_dir_all(&model_dir).await?;

        let api = Api::new()
            .map_err(|e| ResumeScreenerError::ModelLoading(format!("Failed to initialize HF API: {}", e)))?;
        let repo = api.model(info.repo_id.to_string());

        for file in REQUIRED_FILES {
            let cached = repo.get(file).await.map_err(|e| {
                ResumeScreenerError::ModelLoading(format!("Failed to download required file {}: {}", file, e))
            })?;
            fs::copy(&cached, model_dir.join(file)).await?;
            info!("Downloaded {}", file);
        }
        for file in OPTIONAL_FILES {
            match repo.get(file).await {
                Ok(cached) => {
                    fs::copy(&cached, model_dir.join(file)).await?;
                }
                Err(e) => warn!("Optional file {} not found: {}", file, e),
            }
        }

        self.downloaded_models.insert(info.id.to_string());
        Ok(model_dir)
    }

    /// Path of a usable model, downloading it first when missing.
    pub async fn ensure_model_available(&mut self, model: &str) -> Result<PathBuf> {
        match self.get_model_path(model) {
            Some(path) => Ok(path),
            None => self.download_model(model).await,
        }
    }

    pub async fn remove_model(&mut self, model: &str) -> Result<PathBuf> {
        let path = self
            .get_model_path(model)
            .ok_or_else(|| ResumeScreenerError::ModelNotFound(format!("{} is not downloaded", model)))?;

        fs::remove_dir_all(&path).await?;
        if let Some(id) = self.resolve_model_id(model) {
            self.downloaded_models.remove(id);
        }
        Ok(path)
    }
}
