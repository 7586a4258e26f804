//! Chat input parsing

use clarity_domain::Language;
use std::path::PathBuf;

/// One line of chat input
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    /// A question about the document
    Ask(String),
    Summary,
    Risks,
    /// Negotiation tip for risk number n (1-based)
    Tip(usize),
    /// Obligations, optionally for explicit parties
    Obligations(Option<(String, String)>),
    Translate(Language),
    /// Read the summary (no number) or answer number n aloud
    Speak(Option<usize>),
    Stop,
    /// Close the document and drop everything derived from it
    Reset,
    /// Replace the document with the file at this path
    Load(PathBuf),
    Help,
    Quit,
    /// Recognized command with bad arguments
    Usage(&'static str),
    Unknown(String),
}

impl ReplCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(rest) = line.strip_prefix('/') else {
            return ReplCommand::Ask(line.to_string());
        };

        let (name, args) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        let args = args.trim();
        match name {
            "quit" | "exit" | "q" => ReplCommand::Quit,
            "help" | "h" | "?" => ReplCommand::Help,
            "summary" => ReplCommand::Summary,
            "risks" => ReplCommand::Risks,
            "stop" => ReplCommand::Stop,
            "reset" => ReplCommand::Reset,
            "load" if args.is_empty() => ReplCommand::Usage("/load <file>"),
            "load" => ReplCommand::Load(PathBuf::from(args)),
            "tip" => match positive(args) {
                Some(n) => ReplCommand::Tip(n),
                None => ReplCommand::Usage("/tip <risk number>"),
            },
            "translate" => match args.parse() {
                Ok(language) => ReplCommand::Translate(language),
                Err(_) => ReplCommand::Usage("/translate <en|Hindi|Tamil|Telugu|Kannada|Bengali|Marathi>"),
            },
            "speak" if args.is_empty() => ReplCommand::Speak(None),
            "speak" => match positive(args) {
                Some(n) => ReplCommand::Speak(Some(n)),
                None => ReplCommand::Usage("/speak [answer number]"),
            },
            "obligations" => {
                let parties: Vec<&str> = args.split_whitespace().collect();
                match parties.as_slice() {
                    [] => ReplCommand::Obligations(None),
                    [user, other] => {
                        ReplCommand::Obligations(Some((user.to_string(), other.to_string())))
                    }
                    _ => ReplCommand::Usage("/obligations [<your party> <other party>]"),
                }
            }
            _ => ReplCommand::Unknown(line.to_string()),
        }
    }
}

fn positive(arg: &str) -> Option<usize> {
    arg.parse().ok().filter(|n| *n > 0)
}
