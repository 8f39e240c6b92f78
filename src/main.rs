//! Resume screener: rank resumes against a job description

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use resume_screener::cli::{self, Cli, Commands, ConfigAction, ModelAction};
use resume_screener::config::{Config, FailurePolicy, OutputFormat};
use resume_screener::error::{Result, ResumeScreenerError};
use resume_screener::input::{AutoExtractor, InputManager};
use resume_screener::output::formatter::{resolve_save_path, save_report_to_file, ReportGenerator};
use resume_screener::output::RankingReport;
use resume_screener::processing::embedding_manager::EmbeddingModelManager;
use resume_screener::processing::ranking::INSUFFICIENT_INPUT_MESSAGE;
use resume_screener::processing::{
    Embedder, Highlighter, LexicalEmbedder, RankingPipeline, SimilarityScorer, StaticModelEmbedder,
};
use std::path::{Path, PathBuf};
use std::process;

/// Backend name that skips model loading entirely
const LEXICAL_BACKEND: &str = "lexical";

struct RankOptions {
    resumes: Vec<PathBuf>,
    job: Option<PathBuf>,
    job_text: Option<String>,
    embedding: Option<String>,
    detailed: bool,
    output: Option<String>,
    save: Option<PathBuf>,
    top: Option<usize>,
    fail_fast: bool,
    no_color: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = match Config::load_from(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, &config_path).await {
        match &e {
            ResumeScreenerError::InsufficientInput(message) => eprintln!("⚠️  {}", message),
            other => error!("Command failed: {}", other),
        }
        process::exit(e.exit_code());
    }
}

async fn run_command(command: Commands, config: Config, config_path: &Path) -> Result<()> {
    match command {
        Commands::Rank {
            resumes,
            job,
            job_text,
            embedding,
            detailed,
            output,
            save,
            top,
            fail_fast,
            no_color,
        } => {
            let options = RankOptions {
                resumes,
                job,
                job_text,
                embedding,
                detailed,
                output,
                save,
                top,
                fail_fast,
                no_color,
            };
            run_rank(options, &config).await
        }
        Commands::Models { action } => run_models(action, &config).await,
        Commands::Config { action } => run_config(action, config, config_path),
    }
}

async fn run_rank(options: RankOptions, config: &Config) -> Result<()> {
    if let Some(job) = &options.job {
        cli::validate_file_extension(job, &["txt", "md"])
            .map_err(|e| ResumeScreenerError::InvalidInput(format!("Job description file: {}", e)))?;
    }

    let output_format = match &options.output {
        Some(format) => cli::parse_output_format(format).map_err(ResumeScreenerError::InvalidInput)?,
        None => config.output.format,
    };

    let input_manager = InputManager::new();
    let job_description = input_manager
        .load_job_description(options.job.as_deref(), options.job_text.as_deref())
        .await?;

    // check before any model is loaded or downloaded
    if job_description.is_empty() || options.resumes.is_empty() {
        return Err(ResumeScreenerError::InsufficientInput(INSUFFICIENT_INPUT_MESSAGE.to_string()));
    }

    let documents = input_manager.load_documents(&options.resumes).await?;

    let embedder = build_embedder(config, options.embedding.as_deref()).await?;
    let scorer = SimilarityScorer::with_cache_limit(embedder, config.ranking.max_cached_embeddings);
    let failure_policy = if options.fail_fast {
        FailurePolicy::Abort
    } else {
        config.ranking.failure_policy
    };
    let mut pipeline = RankingPipeline::new(AutoExtractor::new(), scorer).with_failure_policy(failure_policy);

    let progress = if output_format == OutputFormat::Console {
        ProgressBar::new(documents.len() as u64)
    } else {
        ProgressBar::hidden()
    };
    progress.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    let run = pipeline.rank_with_progress(&job_description, documents, |index, filename| {
        progress.set_position(index as u64);
        progress.set_message(filename.to_string());
    });
    progress.finish_and_clear();
    let run = run?;

    let stats = pipeline.scorer().cache_stats();
    debug!(
        "Embedding cache: {} entries (limit {}), {} hits",
        stats.cache_size, stats.max_cached, stats.hits
    );
    info!(
        "Ranked {} resume(s), {} skipped, in {}ms",
        run.entries.len(),
        run.failures.len(),
        run.processing_time_ms
    );

    let use_colors = config.output.color_output && !options.no_color && options.save.is_none();
    if !use_colors {
        colored::control::set_override(false);
    }

    let highlighter = Highlighter::new(config.highlight.marker);
    let report = RankingReport::from_run(&run, &highlighter, options.top);
    let generator = ReportGenerator::new(
        use_colors,
        options.detailed || config.output.detailed,
        config.output.chart_width,
    );
    let content = generator.generate_report(&report, output_format)?;

    match &options.save {
        Some(path) => {
            let path = resolve_save_path(path, output_format);
            save_report_to_file(&content, &path)?;
            println!("✅ Report saved to {}", path.display());
        }
        None => println!("{}", content),
    }

    Ok(())
}

/// Resolve the embedding backend, falling back to the lexical embedder when allowed.
async fn build_embedder(config: &Config, requested: Option<&str>) -> Result<Box<dyn Embedder>> {
    let model = requested.unwrap_or(config.models.default_embedding_model.as_str());
    if model.eq_ignore_ascii_case(LEXICAL_BACKEND) {
        return Ok(Box::new(LexicalEmbedder::default()));
    }

    match load_static_model(config, model).await {
        Ok(embedder) => Ok(Box::new(embedder)),
        Err(e) if config.models.allow_lexical_fallback => {
            warn!("Could not load embedding model '{}': {}", model, e);
            warn!("Falling back to the lexical embedder; scores will reflect word overlap only");
            Ok(Box::new(LexicalEmbedder::default()))
        }
        Err(e) => Err(e),
    }
}

async fn load_static_model(config: &Config, model: &str) -> Result<StaticModelEmbedder> {
    let mut manager = EmbeddingModelManager::new(config.models_dir().clone()).await?;
    let path = manager.ensure_model_available(model).await?;
    StaticModelEmbedder::load(&path, model)
}

async fn run_models(action: ModelAction, config: &Config) -> Result<()> {
    config.ensure_models_dir()?;
    let mut manager = EmbeddingModelManager::new(config.models_dir().clone()).await?;

    match action {
        ModelAction::List => {
            println!("📚 Embedding Models\n");
            for model in manager.list_available_models() {
                let status = if manager.is_model_downloaded(model.id) {
                    "✅ Downloaded"
                } else {
                    "⬇️  Available"
                };
                println!("  • {} ({}) - {} MB [{}]", model.name, model.id, model.size_mb, status);
                println!("    {}", model.description);
            }

            if manager.list_downloaded_models().is_empty() {
                println!("\n💡 No models downloaded yet. Get started with:");
                println!("   resume-screener models download {}", config.models.default_embedding_model);
            }
        }

        ModelAction::Download { model, force } => {
            if manager.is_model_downloaded(&model) {
                if !force {
                    println!("✅ Model '{}' is already downloaded!", model);
                    println!("💡 Use --force to re-download");
                    return Ok(());
                }
                manager.remove_model(&model).await?;
            }

            println!("⬇️  Downloading model: {}", model);
            let path = manager.download_model(&model).await?;
            println!("✅ Model '{}' downloaded successfully!", model);
            println!("📁 Location: {}", path.display());
        }

        ModelAction::Remove { model } => {
            if !manager.is_model_downloaded(&model) {
                println!("⚠️  Model '{}' is not downloaded", model);
                return Ok(());
            }
            let path = manager.remove_model(&model).await?;
            println!("✅ Model '{}' removed ({})", model, path.display());
        }

        ModelAction::Info { model } => {
            let info = manager
                .get_model_info(&model)
                .ok_or_else(|| ResumeScreenerError::ModelNotFound(model.clone()))?;

            println!("📋 Model Information for '{}'\n", info.id);
            println!("Name: {}", info.name);
            println!("Repository: {}", info.repo_id);
            println!("Dimensions: {}", info.dimensions);
            println!("Size: {} MB", info.size_mb);
            println!("Description: {}", info.description);

            match manager.get_model_path(&model) {
                Some(path) => println!("Status: ✅ Downloaded ({})", path.display()),
                None => {
                    println!("Status: ⬇️  Available for download");
                    println!("\n💡 To download this model, run:");
                    println!("   resume-screener models download {}", info.id);
                }
            }
        }
    }

    Ok(())
}

fn run_config(action: Option<ConfigAction>, config: Config, config_path: &Path) -> Result<()> {
    match action {
        Some(ConfigAction::Show) | None => {
            println!("⚙️  Current Configuration\n");
            println!("Models Directory: {}", config.models_dir().display());
            println!("Default Embedding Model: {}", config.models.default_embedding_model);
            println!("Lexical Fallback: {}", config.models.allow_lexical_fallback);
            println!("\nRanking:");
            println!("  Failure Policy: {:?}", config.ranking.failure_policy);
            println!("  Max Cached Embeddings: {}", config.ranking.max_cached_embeddings);
            println!("\nOutput:");
            println!("  Format: {:?}", config.output.format);
            println!("  Highlight Marker: {:?}", config.highlight.marker);
            println!("  Chart Width: {}", config.output.chart_width);
        }

        Some(ConfigAction::Reset) => {
            Config::default().save_to(config_path)?;
            println!("✅ Configuration reset: {}", config_path.display());
        }

        Some(ConfigAction::Path) => println!("{}", config_path.display()),
    }

    Ok(())
}
