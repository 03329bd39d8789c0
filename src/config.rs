use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub sampling: SamplingConfig,
    #[serde(default)]
    pub output: OutputConfig,
    pub generation: GenerationConfig,
}

/// Dataset location and layout
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    /// Directory holding the triple splits and the text mappings.
    pub folder: PathBuf,
    #[serde(default = "default_entity_text")]
    pub entity_text: String,
    #[serde(default = "default_relation_text")]
    pub relation_text: String,
    /// Triple split files, loaded in order and merged into one graph.
    #[serde(default = "default_splits")]
    pub splits: Vec<String>,
}

/// Subgraph sampling configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SamplingConfig {
    #[serde(default = "default_max_nodes")]
    pub max_nodes: usize,
    /// Sample this many start entities at random instead of using every node.
    #[serde(default)]
    pub sample_size: Option<usize>,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            max_nodes: default_max_nodes(),
            sample_size: None,
            seed: default_seed(),
        }
    }
}

/// Output artifact paths
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_relations_path")]
    pub relations_path: PathBuf,
    #[serde(default = "default_descriptions_path")]
    pub descriptions_path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            relations_path: default_relations_path(),
            descriptions_path: default_descriptions_path(),
        }
    }
}

/// Text generation service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    pub base_url: String,
    pub model: String,
    pub api_key_env: String,
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
}

fn default_entity_text() -> String {
    "entity2text.txt".to_string()
}

fn default_relation_text() -> String {
    "relation2text.txt".to_string()
}

fn default_splits() -> Vec<String> {
    vec![
        "train.tsv".to_string(),
        "dev.tsv".to_string(),
        "test.tsv".to_string(),
    ]
}

fn default_max_nodes() -> usize {
    5
}

fn default_seed() -> u64 {
    42
}

fn default_relations_path() -> PathBuf {
    PathBuf::from("entity_relations.txt")
}

fn default_descriptions_path() -> PathBuf {
    PathBuf::from("entity_descriptions.csv")
}

fn default_concurrency() -> usize {
    5
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    300
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_retries() -> usize {
    2
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for config file in this order:
    /// 1. Path specified in KGDESC_CONFIG environment variable
    /// 2. ./config.toml in current directory
    pub fn load() -> Result<Self> {
        // .env is optional
        let _ = dotenv::dotenv();

        let config_path = std::env::var("KGDESC_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        Self::from_path(&config_path)
    }

    /// Load and validate configuration from an explicit path
    pub fn from_path(config_path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if !self.dataset.folder.is_dir() {
            anyhow::bail!(
                "dataset.folder must be an existing directory: {}",
                self.dataset.folder.display()
            );
        }

        if self.dataset.splits.is_empty() {
            anyhow::bail!("dataset.splits must name at least one triple file");
        }

        if self.sampling.max_nodes == 0 {
            anyhow::bail!("sampling.max_nodes must be greater than 0");
        }

        if self.generation.concurrency == 0 {
            anyhow::bail!("generation.concurrency must be greater than 0");
        }

        if !(0.0..=2.0).contains(&self.generation.temperature) {
            anyhow::bail!("generation.temperature must be between 0.0 and 2.0");
        }

        url::Url::parse(&self.generation.base_url).with_context(|| {
            format!("generation.base_url is not a valid URL: {}", self.generation.base_url)
        })?;

        Ok(())
    }

    /// Read the generation API key from the configured environment variable
    pub fn api_key(&self) -> Result<String> {
        std::env::var(&self.generation.api_key_env).with_context(|| {
            format!(
                "Environment variable {} not set. Set it in your .env file or as an environment variable.",
                self.generation.api_key_env
            )
        })
    }

    pub fn entity_text_path(&self) -> PathBuf {
        self.dataset.folder.join(&self.dataset.entity_text)
    }

    pub fn relation_text_path(&self) -> PathBuf {
        self.dataset.folder.join(&self.dataset.relation_text)
    }
}
