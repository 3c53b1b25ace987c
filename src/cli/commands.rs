//! Command implementations for the genre-rank CLI.

use std::fs;
use std::io::Read;
use std::path::Path;
use std::time::Instant;

use log::info;
use rand::prelude::*;

use crate::classifier::{NGramClassifier, sanitize_category};
use crate::classifier::config::{ClassifierConfig, ClassifierConfigBuilder};
use crate::cli::args::*;
use crate::cli::corpus::{
    check_fraction, discover, load_stoplist, read_text, sample_windows, split_at_fraction,
};
use crate::cli::output::*;
use crate::error::Result;

/// Execute a CLI command.
pub fn execute_command(args: GenreRankArgs) -> Result<()> {
    match &args.command {
        Command::Train(train_args) => train(train_args, &args),
        Command::Finalize(finalize_args) => finalize(finalize_args, &args),
        Command::Classify(classify_args) => classify(classify_args, &args),
        Command::Categories(categories_args) => categories(categories_args, &args),
        Command::Evaluate(evaluate_args) => evaluate(evaluate_args, &args),
    }
}

/// Build a classifier configuration from a config file and flag overrides.
pub fn build_config(args: &ConfigArgs) -> Result<ClassifierConfig> {
    let base = match &args.config {
        Some(path) => ClassifierConfig::from_json(&fs::read_to_string(path)?)?,
        None => ClassifierConfig::default(),
    };

    let mut builder = ClassifierConfigBuilder::from_config(base);
    if let Some(orders) = &args.orders {
        builder = builder.orders(orders.clone());
    }
    if args.stem {
        builder = builder.stem(true);
    }
    if let Some(path) = &args.stoplist {
        builder = builder.stoplist(load_stoplist(path)?);
    }
    if args.strict {
        builder = builder.auto_finalize(false);
    }
    builder.build()
}

/// Train one category per corpus file.
fn train(args: &TrainArgs, cli_args: &GenreRankArgs) -> Result<()> {
    check_fraction(args.fraction)?;
    let start_time = Instant::now();

    let files = discover(&args.corpus_dir)?;
    let config = build_config(&args.config)?;
    let mut classifier = NGramClassifier::open_with_config(&args.data_dir, config)?;

    let mut trained = Vec::with_capacity(files.len());
    for file in &files {
        let text = read_text(&file.path)?;
        let (head, _) = split_at_fraction(&text, args.fraction);
        info!("training {} from {}", file.category, file.path.display());
        classifier.train(&file.category, head)?;
        trained.push(TrainedCategory {
            category: file.category.clone(),
            characters: head.chars().count(),
        });
    }

    if !args.no_finalize {
        classifier.finalize()?;
    }
    classifier.close()?;

    output_result(
        &TrainResult {
            data_dir: args.data_dir.to_string_lossy().to_string(),
            categories: trained,
            finalized: !args.no_finalize,
            duration_ms: start_time.elapsed().as_millis() as u64,
        },
        cli_args,
    )
}

/// Rebuild the rank tables.
fn finalize(args: &FinalizeArgs, cli_args: &GenreRankArgs) -> Result<()> {
    let start_time = Instant::now();
    let mut classifier = NGramClassifier::open(&args.data_dir)?;
    classifier.finalize()?;

    let result = FinalizeResult {
        categories: classifier.categories().len(),
        state: classifier.state(),
        duration_ms: start_time.elapsed().as_millis() as u64,
    };
    classifier.close()?;
    output_result(&result, cli_args)
}

/// Read the text to classify from a file or standard input.
fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) if path != Path::new("-") => read_text(path),
        _ => {
            let mut buffer = Vec::new();
            std::io::stdin().read_to_end(&mut buffer)?;
            Ok(String::from_utf8_lossy(&buffer).into_owned())
        }
    }
}

/// Classify a text.
fn classify(args: &ClassifyArgs, cli_args: &GenreRankArgs) -> Result<()> {
    let text = read_input(args.input.as_deref())?;
    let config = ClassifierConfig::builder()
        .auto_finalize(!args.strict)
        .build()?;
    let mut classifier = NGramClassifier::open_with_config(&args.data_dir, config)?;

    let scores = classifier.classify_scores(&text, args.threshold)?;
    classifier.close()?;

    let category = scores
        .last()
        .map(|(category, _)| category.clone())
        .unwrap_or_default();
    let scores = args.scores.then(|| {
        scores
            .into_iter()
            .map(|(category, score)| CategoryScore { category, score })
            .collect()
    });

    output_result(&ClassifyResult { category, scores }, cli_args)
}

/// List the trained categories.
fn categories(args: &CategoriesArgs, cli_args: &GenreRankArgs) -> Result<()> {
    let classifier = NGramClassifier::open(&args.data_dir)?;
    let result = CategoriesResult {
        state: classifier.state(),
        categories: classifier.categories().to_vec(),
    };
    classifier.close()?;
    output_result(&result, cli_args)
}

/// Classify random windows of held-out text and report accuracy.
fn evaluate(args: &EvaluateArgs, cli_args: &GenreRankArgs) -> Result<()> {
    check_fraction(args.fraction)?;
    let files = discover(&args.corpus_dir)?;
    let mut classifier = NGramClassifier::open(&args.data_dir)?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut results = Vec::with_capacity(files.len());
    for file in &files {
        let text = read_text(&file.path)?;
        let (_, tail) = split_at_fraction(&text, args.fraction);
        let words: Vec<&str> = tail.split_whitespace().collect();
        let samples = sample_windows(&words, args.sample_words, args.repeats, &mut rng);

        // train() sanitizes names the same way
        let expected = sanitize_category(&file.category)?;
        let mut correct = 0;
        for sample in &samples {
            if classifier.classify(sample, args.threshold)? == expected {
                correct += 1;
            }
        }
        info!("{}: {}/{} correct", file.category, correct, samples.len());

        results.push(CategoryAccuracy {
            category: file.category.clone(),
            correct,
            total: samples.len(),
            accuracy: accuracy(correct, samples.len()),
        });
    }
    classifier.close()?;

    let correct = results.iter().map(|r| r.correct).sum();
    let total = results.iter().map(|r| r.total).sum();
    output_result(
        &EvaluationResult {
            categories: results,
            correct,
            total,
            accuracy: accuracy(correct, total),
        },
        cli_args,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_build_config_defaults() {
        let config = build_config(&ConfigArgs::default()).unwrap();
        assert_eq!(config, ClassifierConfig::default());
    }

    #[test]
    fn test_build_config_overrides_file() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.json");
        fs::write(&config_path, r#"{"orders": [1, 2, 3], "flush_threshold": 10}"#).unwrap();
        let stoplist_path = dir.path().join("stop.txt");
        fs::write(&stoplist_path, "the\nand\n").unwrap();

        let config = build_config(&ConfigArgs {
            config: Some(config_path),
            orders: Some(vec![2]),
            stem: true,
            stoplist: Some(stoplist_path),
            strict: true,
        })
        .unwrap();

        assert_eq!(config.orders, vec![2]);
        assert_eq!(config.flush_threshold, 10);
        assert!(config.stem);
        assert_eq!(config.stoplist, vec!["the", "and"]);
        assert!(!config.auto_finalize);
    }
}
