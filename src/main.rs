//! Animal Classifier command line
//!
//! Reads one JSON request `{"image": "<base64>"}` from standard input and writes one
//! JSON response envelope to standard output. Diagnostics go to standard error.
//!
//! Usage:
//! ```text
//! echo '{"image": "..."}' | animal-classifier
//! animal-classifier --weights models/animal_mobilenet.pth --image dog.jpg --pretty
//! ```

use animal_classifier::core::{ClassifierConfig, ClassifierResult, init_tracing};
use animal_classifier::domain::ResponseEnvelope;
use animal_classifier::predictor::AnimalClassifier;
use animal_classifier::service::{classify, read_and_handle, render};
use animal_classifier::utils::encode_image_file;
use clap::Parser;
use clap::error::ErrorKind;
use std::io::Write;
use std::path::PathBuf;
use tracing::{error, info};

/// Command-line arguments for the classifier
#[derive(Parser)]
#[command(name = "animal-classifier")]
#[command(about = "Classifies a base64-encoded animal image read as JSON from stdin")]
struct Args {
    /// Path to the MobileNetV2 weights file (.pth)
    #[arg(short, long)]
    weights: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Compute device: auto, cpu, cuda or cuda:N
    #[arg(short, long)]
    device: Option<String>,

    /// Classify this image file instead of reading a request from stdin
    #[arg(short, long)]
    image: Option<PathBuf>,

    /// Indent the JSON output
    #[arg(long)]
    pretty: bool,
}

/// Builds the configuration from the optional JSON file, then applies flag overrides.
fn build_config(args: &Args) -> ClassifierResult<ClassifierConfig> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            ClassifierConfig::from_json_file(path)?
        }
        None => ClassifierConfig::new(),
    };
    if let Some(weights) = &args.weights {
        config = config.with_weights_path(weights);
    }
    if let Some(device) = &args.device {
        config = config.with_device(device);
    }
    Ok(config)
}

fn init_classifier(args: &Args) -> Option<AnimalClassifier> {
    match build_config(args).and_then(AnimalClassifier::new) {
        Ok(classifier) => {
            info!(
                "Classifier ready: {} with {} classes",
                classifier.state().architecture(),
                classifier.labels().len()
            );
            Some(classifier)
        }
        Err(e) => {
            error!("Failed to initialize classifier: {}", e);
            None
        }
    }
}

fn respond(args: &Args) -> ResponseEnvelope {
    let classifier = init_classifier(args);

    match &args.image {
        Some(path) => match encode_image_file(path) {
            Ok(payload) => classify(classifier.as_ref(), &payload),
            Err(e) => {
                error!("Failed to read {}: {}", path.display(), e);
                ResponseEnvelope::failure(format!("Processing error: {e}"))
            }
        },
        None => read_and_handle(std::io::stdin().lock(), classifier.as_ref()),
    }
}

/// First line of a clap error without its `error: ` prefix.
fn usage_error_summary(err: &clap::Error) -> String {
    let rendered = err.to_string();
    let first = rendered.lines().next().unwrap_or_default();
    first.strip_prefix("error: ").unwrap_or(first).to_string()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let (response, pretty) = match Args::try_parse() {
        Ok(args) => (respond(&args), args.pretty),
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => e.exit(),
            _ => {
                let summary = usage_error_summary(&e);
                error!("Invalid arguments: {}", summary);
                (
                    ResponseEnvelope::failure(format!("Processing error: {summary}")),
                    false,
                )
            }
        },
    };

    let text = render(&response, pretty)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", text)?;
    stdout.flush()?;
    Ok(())
}
