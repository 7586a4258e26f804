//! CLI entrypoint for Legal Clarity
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser};
use clarity_application::{
    FlowExecutor, FlowProgressNotifier, FlowRegistry, LegalFlows, NoFlowProgress, SessionOrchestrator,
};
use clarity_domain::{DocumentSession, DraftContractInput};
use clarity_infrastructure::{
    ConfigLoader, FileConfig, GeminiGateway, JsonlFlowLogger, WavFileAudioOutput, expand_home,
};
use clarity_presentation::{
    AnalysisReport, AnalyzeArgs, ChatRepl, Cli, Command, ConsoleFormatter, DocumentArgs, DraftArgs,
    Obligations, OutputFormat, ProgressReporter, read_document_file,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        return Ok(());
    }

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };

    let problems = config.validate();
    if !problems.is_empty() {
        for problem in &problems {
            eprintln!("config: {}", problem);
        }
        bail!("Invalid configuration ({} problem(s))", problems.len());
    }

    info!("Starting Legal Clarity");

    // === Dependency Injection ===
    let (session, audio) = build_session(&config, cli.quiet)?;

    match command {
        Command::Analyze(args) => analyze(&session, &audio, args).await,
        Command::Chat(args) => {
            let document = read_document(&args)?;
            let initial = session.load_document(document).await;
            if let Err(err) = &initial.summary {
                println!("{}", ConsoleFormatter::format_error(err));
            }

            let repl = ChatRepl::new(session)
                .with_audio_note(format!("Clips are saved in {}", audio.output_dir().display()));
            repl.run().await?;
            Ok(())
        }
        Command::Draft(args) => draft(&session, args).await,
    }
}

fn build_session(
    config: &FileConfig,
    quiet: bool,
) -> Result<(Arc<SessionOrchestrator>, Arc<WavFileAudioOutput>)> {
    let registry = Arc::new(FlowRegistry::builtin()?);
    let gateway = Arc::new(GeminiGateway::from_config(&config.model)?);

    let progress: Arc<dyn FlowProgressNotifier> = if quiet {
        Arc::new(NoFlowProgress)
    } else {
        Arc::new(ProgressReporter::new())
    };

    let mut executor = FlowExecutor::new(registry, gateway).with_progress(progress);
    if let Some(path) = &config.logging.conversation_log {
        let path = expand_home(path);
        match JsonlFlowLogger::new(&path) {
            Some(logger) => {
                info!("Conversation log: {}", path.display());
                executor = executor.with_conversation_logger(Arc::new(logger));
            }
            None => warn!("Could not open conversation log {}", path.display()),
        }
    }

    let mut audio = WavFileAudioOutput::new(audio_dir(config));
    if let Some(player) = &config.audio.player {
        audio = audio.with_player(player);
    }
    let audio = Arc::new(audio);

    let flows = LegalFlows::new(Arc::new(executor));
    let session = SessionOrchestrator::new(flows, audio.clone())
        .with_config(config.session.to_session_config());

    Ok((Arc::new(session), audio))
}

fn audio_dir(config: &FileConfig) -> PathBuf {
    match &config.audio.output_dir {
        Some(dir) => expand_home(dir),
        None => dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("legal-clarity")
            .join("audio"),
    }
}

fn read_document(args: &DocumentArgs) -> Result<DocumentSession> {
    match &args.file {
        Some(path) => {
            read_document_file(path).with_context(|| format!("Failed to read {}", path.display()))
        }
        None => Ok(DocumentSession::sample()),
    }
}

async fn analyze(
    session: &SessionOrchestrator,
    audio: &WavFileAudioOutput,
    args: AnalyzeArgs,
) -> Result<()> {
    let document = read_document(&args.document)?;
    let mut report = AnalysisReport::new(&document.file_name);

    let initial = session.load_document(document).await;
    match initial.summary {
        Ok(summary) => report.summary = Some(summary),
        Err(err) => report.record_error("Summary", &err),
    }
    match initial.risks {
        Ok(risks) => report.risks = risks,
        Err(err) => report.record_error("Risks", &err),
    }

    if let Some(language) = args.language
        && report.summary.is_some()
    {
        match session.translate_summary(language).await {
            Ok(text) => report.translation = Some((language, text)),
            Err(err) => report.record_error("Translation", &err),
        }
    }

    if args.tips {
        for index in 0..report.risks.len() {
            match session.suggest_negotiation(index).await {
                Ok(tip) => report.risks[index].suggestion = Some(tip),
                Err(err) => report.record_error(&format!("Tip #{}", index + 1), &err),
            }
        }
    }

    if args.obligations {
        let defaults = session.config();
        let user_party = args.user_party.unwrap_or_else(|| defaults.user_party.clone());
        let other_party = args.other_party.unwrap_or_else(|| defaults.other_party.clone());
        match session.extract_obligations(&user_party, &other_party).await {
            Ok(lists) => {
                report.obligations = Some(Obligations {
                    user_party,
                    other_party,
                    lists,
                })
            }
            Err(err) => report.record_error("Obligations", &err),
        }
    }

    if args.speak && report.summary.is_some() {
        match session.play_summary_audio().await {
            Ok(_) => {
                report.audio_file = session
                    .playing()
                    .map(|key| audio.clip_path(&key).display().to_string());
            }
            Err(err) => report.record_error("Audio", &err),
        }
    }

    let output = match args.output {
        OutputFormat::Text => ConsoleFormatter::format_report(&report),
        OutputFormat::Json => ConsoleFormatter::format_json(&report),
    };
    println!("{}", output);

    // Let a configured player finish before exiting
    session.sync_playback();
    while session.playing().is_some() {
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        session.sync_playback();
    }

    Ok(())
}

async fn draft(session: &SessionOrchestrator, args: DraftArgs) -> Result<()> {
    let input = DraftContractInput {
        client_name: args.client,
        freelancer_name: args.freelancer,
        project_scope: args.scope,
        payment_amount: args.amount,
        payment_terms: args.terms,
        deadline: args.deadline,
    };

    let contract = session.draft_contract(&input).await?;

    match args.out {
        Some(path) => {
            std::fs::write(&path, &contract)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Agreement written to {}", path.display());
        }
        None => println!("{}", contract),
    }
    Ok(())
}
