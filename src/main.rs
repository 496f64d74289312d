//! Voice Scribe CLI
//!
//! Capture audio from a file or stdin, transcribe it with Deepgram, extract
//! action items, and create a Notion page from the result.

use anyhow::Context;
use clap::{ArgGroup, Parser};
use std::io::Read;
use std::path::PathBuf;
use voice_scribe::adapters::{build_page_payload, DeepgramClient, DeepgramConfig, NotionClient, OpenAISummarizer};
use voice_scribe::domain::extract_action_items;
use voice_scribe::ports::documents::DocumentSinkPort;
use voice_scribe::ports::llm::{PassthroughSummarizer, SummarizerPort};
use voice_scribe::ports::transcription::{TranscribeOptions, TranscriptionServicePort};
use voice_scribe::utils::FileAudioStore;
use voice_scribe::Settings;

#[derive(Parser, Debug)]
#[command(
    name = "voice-scribe",
    about = "Capture audio, transcribe it with Deepgram, extract action items, and send them to Notion."
)]
#[command(group(ArgGroup::new("source").required(true).args(["file", "stdin"])))]
struct Cli {
    /// Path to a local audio file to process
    #[arg(long)]
    file: Option<PathBuf>,

    /// Read audio bytes from standard input
    #[arg(long)]
    stdin: bool,

    /// Filename to use when storing audio captured from stdin
    #[arg(long, default_value = "stdin_audio.wav")]
    stdin_filename: String,

    /// Optional path to a .env file containing configuration overrides
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Directory used to store captured audio files
    #[arg(long)]
    storage_dir: Option<PathBuf>,

    /// MIME type of the provided audio
    #[arg(long, default_value = "audio/wav")]
    mimetype: String,

    /// Title for the Notion page created from the transcript
    #[arg(long, default_value = "Meeting Notes")]
    title: String,

    /// Deepgram model to request
    #[arg(long)]
    model: Option<String>,

    /// Transcription language code (e.g. "en")
    #[arg(long)]
    language: Option<String>,

    /// Print the Notion payload instead of sending it to the API
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose logging output for troubleshooting
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let settings = match Settings::from_env_file(cli.env_file.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let default_level = if cli.debug || settings.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    if let Err(e) = run(cli, settings).await {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, settings: Settings) -> anyhow::Result<()> {
    let storage_dir = cli
        .storage_dir
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("voice-scribe-audio"));
    let store = FileAudioStore::new(&storage_dir).context("Failed to prepare audio storage")?;

    let (audio, mimetype, stored_path) = capture_audio(&store, &cli).context("Audio capture failed")?;
    log::debug!("Stored audio at {}", stored_path.display());

    let deepgram = DeepgramClient::new(DeepgramConfig::new(&settings.deepgram_api_key))?;

    let mut options = TranscribeOptions::new();
    if let Some(model) = &cli.model {
        options = options.model(model);
    }
    if let Some(language) = &cli.language {
        options = options.language(language);
    }

    let transcription = deepgram
        .transcribe_file(&audio, &mimetype, &options)
        .await
        .context("Transcription request failed")?;
    log::info!(
        "Transcription complete with {} characters",
        transcription.text.len()
    );

    let summarizer: Box<dyn SummarizerPort> = match &settings.openai_api_key {
        Some(api_key) => Box::new(OpenAISummarizer::new(api_key)?),
        None => Box::new(PassthroughSummarizer),
    };

    let actions = extract_action_items(&transcription, summarizer.as_ref()).await?;
    if actions.is_empty() {
        log::warn!("No action items detected in transcript");
    } else {
        log::info!("Extracted {} action items", actions.len());
    }

    let payload = build_page_payload(
        &settings.notion_database_id,
        &cli.title,
        &transcription,
        &actions,
    );

    if cli.dry_run {
        log::info!("Dry run enabled; printing Notion payload");
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let notion = NotionClient::new(&settings.notion_api_key)?;
    let page_id = notion
        .submit(&payload)
        .await
        .context("Failed to create Notion page")?;
    log::info!("Successfully created Notion page {}", page_id);

    Ok(())
}

/// Load audio from disk or stdin through the audio store
fn capture_audio(
    store: &FileAudioStore,
    cli: &Cli,
) -> anyhow::Result<(Vec<u8>, String, PathBuf)> {
    if let Some(file) = &cli.file {
        let stored = store.add_existing_file(file, Some(&cli.mimetype), true)?;
        let mimetype = stored.mime_type.clone().unwrap_or_else(|| cli.mimetype.clone());
        let audio = stored.read()?;
        return Ok((audio, mimetype, stored.path));
    }

    let mut data = Vec::new();
    std::io::stdin()
        .read_to_end(&mut data)
        .context("Failed to read audio from stdin")?;
    if data.is_empty() {
        anyhow::bail!("No audio data received from stdin");
    }

    let stored = store.store(&data, &cli.stdin_filename, Some(&cli.mimetype), true)?;
    let mimetype = stored.mime_type.clone().unwrap_or_else(|| cli.mimetype.clone());
    Ok((data, mimetype, stored.path))
}
