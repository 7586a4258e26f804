//! REPL (Read-Eval-Print Loop) for asking questions about a document

use super::command::ReplCommand;
use crate::ConsoleFormatter;
use crate::cli::document::read_document_file;
use crate::output::report::Obligations;
use clarity_application::{PlayOutcome, SessionError, SessionOrchestrator};
use clarity_domain::{Language, Role};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::Path;
use std::sync::Arc;

/// Interactive chat REPL over the active document
pub struct ChatRepl {
    session: Arc<SessionOrchestrator>,
    audio_note: Option<String>,
}

impl ChatRepl {
    pub fn new(session: Arc<SessionOrchestrator>) -> Self {
        Self {
            session,
            audio_note: None,
        }
    }

    /// Line shown after a clip starts, e.g. where the file was written
    pub fn with_audio_note(mut self, note: impl Into<String>) -> Self {
        self.audio_note = Some(note.into());
        self
    }

    /// Run the interactive REPL
    pub async fn run(&self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = dirs::data_dir().map(|p| p.join("legal-clarity").join("history.txt"));

        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        loop {
            match rl.readline(">>> ") {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(line.trim());

                    self.session.sync_playback();
                    if self.execute(ReplCommand::parse(&line)).await {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        self.session.stop_audio();

        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│          Legal Clarity - Chat Mode          │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        if let Some(document) = self.session.document() {
            println!(
                "Document: {} ({} characters)",
                document.file_name,
                document.char_count()
            );
        }
        println!("Ask anything about the document, or /help for commands.");
        println!();
    }

    fn print_help() {
        println!();
        println!("Commands:");
        println!("  /summary                  - Show the summary");
        println!("  /risks                    - Show risky clauses");
        println!("  /tip N                    - Negotiation tip for risk N");
        println!("  /obligations [YOU OTHER]  - Who must do what");
        println!("  /translate LANG           - Translate the summary");
        println!("  /speak [N]                - Read the summary (or answer N) aloud");
        println!("  /stop                     - Stop audio");
        println!("  /load FILE                - Open another document");
        println!("  /reset                    - Close the document and start over");
        println!("  /help, /h, /?             - Show this help");
        println!("  /quit, /exit, /q          - Exit chat");
        println!();
    }

    /// Execute one input line. Returns true if the REPL should exit.
    async fn execute(&self, command: ReplCommand) -> bool {
        let result = match command {
            ReplCommand::Quit => {
                println!("Bye!");
                return true;
            }
            ReplCommand::Help => {
                Self::print_help();
                Ok(())
            }
            ReplCommand::Usage(usage) => {
                println!("Usage: {}", usage);
                Ok(())
            }
            ReplCommand::Unknown(input) => {
                println!("Unknown command: {}", input);
                println!("Type /help for available commands");
                Ok(())
            }
            ReplCommand::Ask(question) => self.ask(&question).await,
            ReplCommand::Summary => self.show_summary().await,
            ReplCommand::Risks => self.show_risks().await,
            ReplCommand::Tip(number) => self.show_tip(number).await,
            ReplCommand::Obligations(parties) => self.show_obligations(parties).await,
            ReplCommand::Translate(language) => self.translate(language).await,
            ReplCommand::Speak(answer) => self.speak(answer).await,
            ReplCommand::Stop => {
                self.session.stop_audio();
                Ok(())
            }
            ReplCommand::Reset => {
                self.session.reset();
                println!("Session closed. /load <file> to open another document.");
                Ok(())
            }
            ReplCommand::Load(path) => self.load(&path).await,
        };

        if let Err(err) = result {
            println!("{}", ConsoleFormatter::format_error(&err));
        }
        false
    }

    async fn load(&self, path: &Path) -> Result<(), SessionError> {
        let document = match read_document_file(path) {
            Ok(document) => document,
            Err(err) => {
                println!("{} could not read {}: {}", "Error:".red().bold(), path.display(), err);
                return Ok(());
            }
        };
        println!(
            "Loaded {} ({} characters)",
            document.file_name,
            document.char_count()
        );

        let initial = self.session.load_document(document).await;
        println!();
        match initial.summary {
            Ok(summary) => print!("{}", ConsoleFormatter::format_summary(Language::En, &summary)),
            Err(err) => println!("{}", ConsoleFormatter::format_error(&err)),
        }
        match initial.risks {
            Ok(risks) => print!("{}", ConsoleFormatter::format_risks(&risks)),
            Err(err) => println!("{}", ConsoleFormatter::format_error(&err)),
        }
        println!();
        Ok(())
    }

    async fn ask(&self, question: &str) -> Result<(), SessionError> {
        let answer = self.session.ask_question(question).await?;
        let number = self.answer_count();
        println!();
        print!("{}", ConsoleFormatter::format_answer(number, &answer));
        println!("{}", format!("(/speak {} to listen)", number).dimmed());
        println!();
        Ok(())
    }

    async fn show_summary(&self) -> Result<(), SessionError> {
        let (language, text) = match self.session.displayed_summary() {
            Some(shown) => shown,
            None => (Language::En, self.session.refresh_summary().await?),
        };
        println!();
        print!("{}", ConsoleFormatter::format_summary(language, &text));
        Ok(())
    }

    async fn show_risks(&self) -> Result<(), SessionError> {
        let risks = match self.session.risks().value() {
            Some(risks) => risks.clone(),
            None => self.session.refresh_risks().await?,
        };
        print!("{}", ConsoleFormatter::format_risks(&risks));
        println!();
        Ok(())
    }

    async fn show_tip(&self, number: usize) -> Result<(), SessionError> {
        let tip = self.session.suggest_negotiation(number - 1).await?;
        println!();
        println!("{} {}", format!("Tip for risk #{}:", number).green().bold(), tip);
        println!();
        Ok(())
    }

    async fn show_obligations(&self, parties: Option<(String, String)>) -> Result<(), SessionError> {
        let (user_party, other_party, lists) = match parties {
            Some((user, other)) => {
                let lists = self.session.extract_obligations(&user, &other).await?;
                (user, other, lists)
            }
            None => {
                let config = self.session.config();
                let (user, other) = (config.user_party.clone(), config.other_party.clone());
                let lists = self.session.extract_default_obligations().await?;
                (user, other, lists)
            }
        };
        print!(
            "{}",
            ConsoleFormatter::format_obligations(&Obligations {
                user_party,
                other_party,
                lists,
            })
        );
        println!();
        Ok(())
    }

    async fn translate(&self, language: Language) -> Result<(), SessionError> {
        let text = self.session.translate_summary(language).await?;
        println!();
        print!("{}", ConsoleFormatter::format_summary(language, &text));
        Ok(())
    }

    async fn speak(&self, answer: Option<usize>) -> Result<(), SessionError> {
        let outcome = match answer {
            None => self.session.play_summary_audio().await?,
            Some(number) => {
                let index = self
                    .turn_of_answer(number)
                    .ok_or(SessionError::TurnNotFound(number))?;
                self.session.play_turn_audio(index).await?
            }
        };

        match outcome {
            PlayOutcome::Playing => {
                println!("{}", "Playing (/stop to stop)".dimmed());
                if let Some(note) = &self.audio_note {
                    println!("{}", note.dimmed());
                }
            }
            PlayOutcome::Stopped => println!("{}", "Stopped".dimmed()),
            PlayOutcome::Abandoned => println!("{}", "Audio ready".dimmed()),
        }
        Ok(())
    }

    fn answer_count(&self) -> usize {
        self.session
            .conversation()
            .iter()
            .filter(|turn| turn.role == Role::Assistant)
            .count()
    }

    /// Transcript index of the `number`th answer (1-based)
    fn turn_of_answer(&self, number: usize) -> Option<usize> {
        answer_turn_index(
            self.session.conversation().iter().map(|turn| turn.role),
            number,
        )
    }
}

fn answer_turn_index(roles: impl Iterator<Item = Role>, number: usize) -> Option<usize> {
    roles
        .enumerate()
        .filter(|(_, role)| *role == Role::Assistant)
        .nth(number.checked_sub(1)?)
        .map(|(index, _)| index)
}
