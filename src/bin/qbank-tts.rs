//! Command-line front end: narrate an XML question bank into WAV files.
//!
//! A missing bank or voice sample is a fatal startup error; questions
//! that fail individually are logged and skipped without affecting the
//! exit code.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use qbank_tts::config::{NarrationConfigBuilder, DEFAULT_INTRO, DEFAULT_PAUSE_SECONDS};
use qbank_tts::engines::chatterbox::ChatterboxEngine;
use qbank_tts::narrator::Narrator;
use qbank_tts::speech::RenderingMode;
use qbank_tts::voices::VoiceSource;
use qbank_tts::SynthesisEngine;

#[derive(Debug, Parser)]
#[command(name = "qbank-tts", version)]
#[command(about = "Narrate an XML question bank as WAV audio with a cloned voice")]
struct Cli {
    /// Path to the question bank XML file
    #[arg(long)]
    bank: PathBuf,

    /// Output directory for generated WAV files
    #[arg(long, default_value = "tts_out")]
    out: PathBuf,

    /// Single voice sample WAV used for every question
    #[arg(long)]
    voice: Option<PathBuf>,

    /// Directory of per-lecturer voice samples (<LecturerID>.wav)
    #[arg(long, default_value = "voices")]
    voices_dir: PathBuf,

    /// Lecturer id used when a question names none or its sample is missing
    #[arg(long, default_value = "default")]
    default_lecturer: String,

    /// Chatterbox model directory
    #[arg(long, default_value = "models/chatterbox")]
    model: PathBuf,

    /// Symbol rendering: natural or literal
    #[arg(long, default_value_t = RenderingMode::Natural)]
    mode: RenderingMode,

    /// Phrase spoken before each question
    #[arg(long, default_value = DEFAULT_INTRO)]
    intro: String,

    /// Silence between question and options audio, in seconds
    #[arg(long, default_value_t = DEFAULT_PAUSE_SECONDS)]
    pause: f32,

    /// Also narrate the correct answer
    #[arg(long)]
    include_answer: bool,

    /// Also narrate the explanation
    #[arg(long)]
    include_explanation: bool,

    /// Fold answer/explanation into one combined file instead of separate files
    #[arg(long)]
    combined: bool,
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = NarrationConfigBuilder::default()
        .mode(cli.mode)
        .intro_phrase(cli.intro)
        .pause_seconds(cli.pause)
        .include_answer(cli.include_answer)
        .include_explanation(cli.include_explanation)
        .explanation_separate_file(!cli.combined)
        .output_dir(cli.out)
        .build()?;

    let voices = match cli.voice {
        Some(sample) => VoiceSource::Single(sample),
        None => VoiceSource::PerLecturer {
            dir: cli.voices_dir,
            default_lecturer: cli.default_lecturer,
        },
    };

    let mut engine = ChatterboxEngine::new();
    engine.load_model(&cli.model)?;

    let summary = Narrator::new(&mut engine, &config).narrate_bank_file(&cli.bank, &voices)?;

    println!(
        "Done. Narrated {} question(s), wrote {} file(s), skipped {}.",
        summary.questions, summary.files_written, summary.skipped
    );
    Ok(())
}
