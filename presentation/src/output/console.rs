//! Console output formatter for analysis results

use super::report::{AnalysisReport, Obligations};
use clarity_application::SessionError;
use clarity_domain::{Language, RiskItem, Severity};
use colored::{ColoredString, Colorize};

/// Formats session results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete analysis report
    pub fn format_report(report: &AnalysisReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Document Analysis"));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Document:".cyan().bold(), report.file_name));

        if let Some(summary) = &report.summary {
            output.push_str(&Self::section_header("Summary"));
            output.push_str(&format!("\n{}\n", summary));
        }

        if let Some((language, text)) = &report.translation {
            output.push_str(&Self::section_header(&format!("Summary ({})", language.display_name())));
            output.push_str(&format!("\n{}\n", text));
        }

        output.push_str(&Self::section_header("Potential Risks"));
        output.push_str(&Self::format_risks(&report.risks));

        if let Some(obligations) = &report.obligations {
            output.push_str(&Self::section_header("Obligations"));
            output.push_str(&Self::format_obligations(obligations));
        }

        if let Some(path) = &report.audio_file {
            output.push_str(&format!("\n{} {}\n", "Audio:".cyan().bold(), path));
        }

        if !report.errors.is_empty() {
            output.push_str(&Self::section_header("Incomplete"));
            for err in &report.errors {
                let hint = if err.retryable { " (try again)" } else { "" };
                output.push_str(&format!(
                    "  {} {}: {}{}\n",
                    "x".red(),
                    err.section.bold(),
                    err.message,
                    hint.dimmed()
                ));
            }
        }

        output.push_str(&Self::footer());
        output
    }

    /// Format as JSON
    pub fn format_json(report: &AnalysisReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    /// Numbered risk list, highest severity first
    pub fn format_risks(risks: &[RiskItem]) -> String {
        if risks.is_empty() {
            return format!("\n{}\n", "No risky clauses found.".green());
        }

        let mut ordered: Vec<(usize, &RiskItem)> = risks.iter().enumerate().collect();
        ordered.sort_by_key(|(_, risk)| risk.severity);

        let mut output = String::new();
        for (index, risk) in ordered {
            output.push_str(&format!(
                "\n{:>3}. {} {}\n",
                index + 1,
                Self::severity_badge(risk.severity),
                risk.description
            ));
            if let Some(tip) = &risk.suggestion {
                output.push_str(&format!(
                    "     {} {}\n",
                    "Tip:".green().bold(),
                    Self::indent(tip, "     ").trim_start()
                ));
            }
        }
        output
    }

    pub fn format_obligations(obligations: &Obligations) -> String {
        let mut output = String::new();
        let sides = [
            (&obligations.user_party, &obligations.lists.user_obligations),
            (&obligations.other_party, &obligations.lists.other_party_obligations),
        ];
        for (party, items) in sides {
            output.push_str(&format!("\n{}\n", format!("{} must:", party).yellow().bold()));
            if items.is_empty() {
                output.push_str(&format!("  {}\n", "(nothing stated)".dimmed()));
            }
            for item in items {
                output.push_str(&format!("  * {}\n", item));
            }
        }
        output
    }

    pub fn format_summary(language: Language, text: &str) -> String {
        format!(
            "{}\n{}\n",
            format!("Summary ({})", language.display_name()).cyan().bold(),
            text
        )
    }

    pub fn format_answer(answer_number: usize, text: &str) -> String {
        format!("{} {}\n", format!("A{}:", answer_number).green().bold(), text)
    }

    pub fn format_error(err: &SessionError) -> String {
        let mut line = format!("{} {}", "Error:".red().bold(), err);
        if err.is_retryable() {
            line.push_str(&format!(" {}", "(try again)".dimmed()));
        }
        line
    }

    pub fn severity_badge(severity: Severity) -> ColoredString {
        let label = format!("[{}]", severity);
        match severity {
            Severity::High => label.red().bold(),
            Severity::Medium => label.yellow().bold(),
            Severity::Low => label.green(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
