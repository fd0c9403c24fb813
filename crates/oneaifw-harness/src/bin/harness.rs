//! CLI entrypoint for the OneAIFW conformance harness.

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use oneaifw_core::entity::NerRecognizerKind;
use oneaifw_core::Pipeline;
use oneaifw_harness::{hex_encode, run_fixture_file};

/// Conformance tooling for the OneAIFW masking engine.
#[derive(Debug, Parser)]
#[command(name = "oneaifw-harness")]
#[command(about = "Conformance testing harness for the OneAIFW masking engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Mask a single line of text with no NER entries and print the masked
    /// text plus the hex-encoded metadata blob.
    Mask {
        /// Text to mask.
        text: String,
        /// Use the sequence-classification NER mode instead of token
        /// classification (affects only the span's `description` tag).
        #[arg(long)]
        sequence_mode: bool,
    },
    /// Restore masked text given its hex-encoded metadata blob.
    Restore {
        /// Previously masked text.
        masked: String,
        /// Hex-encoded metadata blob, as printed by `mask`.
        #[arg(long)]
        meta_hex: String,
    },
    /// Run every scenario in a fixture JSON file and report whether each
    /// one round-trips.
    RunFixture {
        /// Path to a fixture file (array of scenario objects).
        #[arg(long)]
        fixture: PathBuf,
        /// Exit non-zero if any scenario fails to round-trip.
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    match cli.command {
        Command::Mask { text, sequence_mode } => {
            let mode = if sequence_mode {
                NerRecognizerKind::SequenceClassification
            } else {
                NerRecognizerKind::TokenClassification
            };
            let pipeline = Pipeline::new(mode)?;
            let result = pipeline.mask(&text, &[]);
            println!("masked: {}", result.masked_text);
            println!("meta_hex: {}", hex_encode(&result.metadata_blob));
        }
        Command::Restore { masked, meta_hex } => {
            let blob = hex_decode(&meta_hex)?;
            let pipeline = Pipeline::new(NerRecognizerKind::TokenClassification)?;
            let restored = pipeline.restore(&masked, &blob);
            println!("{restored}");
        }
        Command::RunFixture { fixture, strict } => {
            let contents = fs::read_to_string(&fixture)?;
            let reports = run_fixture_file(&contents)?;
            let mut any_failed = false;
            for report in &reports {
                let status = if report.restored_matches_original { "OK" } else { "FAIL" };
                if !report.restored_matches_original {
                    any_failed = true;
                }
                println!("[{status}] {}: {}", report.name, report.masked_text);
            }
            if strict && any_failed {
                return Err("one or more scenarios failed to round-trip".into());
            }
        }
    }
    Ok(())
}

fn hex_decode(s: &str) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    if s.len() % 2 != 0 {
        return Err("hex string must have even length".into());
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).map_err(|e| e.into()))
        .collect()
}
