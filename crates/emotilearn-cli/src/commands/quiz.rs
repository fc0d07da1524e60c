use std::path::PathBuf;

use clap::Args;
use emotilearn_core::quiz::{self, Catalog};
use emotilearn_core::EmotionLabel;

#[derive(Args)]
pub struct QuizArgs {
    /// Emotion label to select questions for
    #[arg(long)]
    emotion: EmotionLabel,
    /// TOML question catalog to use instead of the built-in one
    #[arg(long)]
    catalog: Option<PathBuf>,
}

pub fn run(args: QuizArgs) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = match args.catalog {
        Some(path) => Catalog::from_toml_str(&std::fs::read_to_string(&path)?)?,
        None => Catalog::builtin(),
    };
    let selection = quiz::select(args.emotion, &catalog.questions);

    let output = serde_json::json!({
        "emotion": args.emotion,
        "encouragement": quiz::encouragement_for(args.emotion),
        "fell_back": selection.fell_back,
        "questions": selection.questions,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
