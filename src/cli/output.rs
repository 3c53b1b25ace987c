//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::classifier::state::ClassifierState;
use crate::cli::args::{GenreRankArgs, OutputFormat};
use crate::error::Result;

/// Results that know how to print themselves for a human reader.
pub trait HumanOutput: Serialize {
    fn print_human(&self);
}

/// Result structure for training.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainResult {
    pub data_dir: String,
    pub categories: Vec<TrainedCategory>,
    pub finalized: bool,
    pub duration_ms: u64,
}

/// One trained category.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainedCategory {
    pub category: String,
    pub characters: usize,
}

/// Result structure for finalization.
#[derive(Debug, Serialize, Deserialize)]
pub struct FinalizeResult {
    pub categories: usize,
    pub state: ClassifierState,
    pub duration_ms: u64,
}

/// Result structure for classification.
#[derive(Debug, Serialize, Deserialize)]
pub struct ClassifyResult {
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scores: Option<Vec<CategoryScore>>,
}

/// Correlation of the input with one category.
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryScore {
    pub category: String,
    pub score: f64,
}

/// Result structure for listing categories.
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoriesResult {
    pub state: ClassifierState,
    pub categories: Vec<String>,
}

/// Result structure for evaluation.
#[derive(Debug, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub categories: Vec<CategoryAccuracy>,
    pub correct: usize,
    pub total: usize,
    pub accuracy: f64,
}

/// Accuracy on one category's held-out text.
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryAccuracy {
    pub category: String,
    pub correct: usize,
    pub total: usize,
    pub accuracy: f64,
}

/// Fraction of `correct` in `total`, 0 when nothing was tried.
pub fn accuracy(correct: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64
    }
}

impl HumanOutput for TrainResult {
    fn print_human(&self) {
        for trained in &self.categories {
            println!(
                "{}: {} characters",
                trained.category, trained.characters
            );
        }
        println!();
        println!(
            "Trained {} categories in {}ms{}",
            self.categories.len(),
            self.duration_ms,
            if self.finalized { ", finalized" } else { "" }
        );
    }
}

impl HumanOutput for FinalizeResult {
    fn print_human(&self) {
        println!(
            "Finalized {} categories in {}ms (state: {})",
            self.categories, self.duration_ms, self.state
        );
    }
}

impl HumanOutput for ClassifyResult {
    fn print_human(&self) {
        println!("{}", self.category);
        if let Some(scores) = &self.scores {
            println!();
            let width = scores.iter().map(|s| s.category.len()).max().unwrap_or(0);
            for score in scores.iter().rev() {
                println!("  {:<width$}  {:+.6}", score.category, score.score);
            }
        }
    }
}

impl HumanOutput for CategoriesResult {
    fn print_human(&self) {
        for category in &self.categories {
            println!("{category}");
        }
    }
}

impl HumanOutput for EvaluationResult {
    fn print_human(&self) {
        println!("Evaluation Results:");
        println!("═══════════════════");
        let width = self
            .categories
            .iter()
            .map(|c| c.category.len())
            .max()
            .unwrap_or(0);
        for c in &self.categories {
            println!(
                "{:<width$}  {:>3}/{:<3}  {:5.1}%",
                c.category,
                c.correct,
                c.total,
                c.accuracy * 100.0
            );
        }
        println!();
        println!(
            "Overall: {}/{} correct ({:.1}%)",
            self.correct,
            self.total,
            self.accuracy * 100.0
        );
    }
}

/// Output a result in the specified format.
pub fn output_result<T: HumanOutput>(result: &T, args: &GenreRankArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            result.print_human();
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &GenreRankArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy() {
        assert_eq!(accuracy(0, 0), 0.0);
        assert_eq!(accuracy(3, 4), 0.75);
    }

    #[test]
    fn test_classify_result_json() {
        let result = ClassifyResult {
            category: "news".to_string(),
            scores: None,
        };
        assert_eq!(
            serde_json::to_string(&result).unwrap(),
            r#"{"category":"news"}"#
        );

        let result = CategoriesResult {
            state: ClassifierState::Finalized,
            categories: vec!["a".to_string()],
        };
        assert_eq!(
            serde_json::to_string(&result).unwrap(),
            r#"{"state":"finalized","categories":["a"]}"#
        );
    }
}
