//! Built-in capability catalogue
//!
//! Declares the schemas, prompts and output modes of the eight legal-document
//! capabilities. The application layer registers these at startup.

use super::language::Language;
use super::name::CapabilityName;
use super::spec::{CapabilitySpec, OutputMode};
use crate::prompt::{PromptTemplate, TemplateError};
use crate::risk::Severity;
use crate::schema::{FieldKind, FieldSchema, ObjectSchema};

const SUMMARIZE_PROMPT: &str = r#"You are a legal expert who explains documents to ordinary people in India.

Write a plain-language summary of the legal document below. Avoid legal jargon,
use Indian terminology (INR, lakh, notice period) where it helps, and assume the
reader has no legal training. Cover who the parties are, what each side gets,
what each side must do, money involved and how the agreement ends.

Document:
{{documentText}}"#;

const DETECT_RISKS_PROMPT: &str = r#"You are a legal assistant reviewing a document under Indian law.

Identify every clause in the document below that could hurt the reader: hidden
fees, one-sided terms, unclear obligations, harsh penalties, missing protections.
For each one write a short description and rate its severity as High, Medium or
Low. Return an empty list if nothing stands out.

Document:
{{documentText}}"#;

const EXTRACT_OBLIGATIONS_PROMPT: &str = r#"You are a legal assistant analysing a document under Indian law.

List what "{{userParty}}" must do and what "{{otherParty}}" must do according to
the document below. Each obligation is one short sentence. Put the obligations of
{{userParty}} in userObligations and those of {{otherParty}} in
otherPartyObligations. Use an empty list when a party has none.

Document:
{{documentText}}"#;

const ANSWER_QUESTION_PROMPT: &str = r#"You are a legal expert in Indian law answering questions about one document.

Base your answer on the document first and on general Indian law second. Say so
plainly when the document does not address the question.

Document:
{{documentText}}

Question: {{question}}"#;

const SUGGEST_NEGOTIATION_PROMPT: &str = r#"You are a negotiation adviser familiar with Indian contract practice.

Given the risk below, suggest one concrete point the reader can raise with the
other party to reduce it. Keep it to two or three sentences.

Example risk: "Termination needs only 7 days notice."
Example suggestion: "Ask for the notice period to be raised to 30 days so you
have time to find a new place."

Risk: {{riskDescription}}"#;

const TRANSLATE_PROMPT: &str = r#"Translate the text below into {{targetLanguage}}.

Keep names, amounts and dates unchanged. Return only the translation.

Text:
{{text}}"#;

const SYNTHESIZE_SPEECH_PROMPT: &str = "{{text}}";

const DRAFT_CONTRACT_PROMPT: &str = r#"You are a legal assistant experienced in Indian contract law.

Draft a fair freelancer agreement that protects both sides and is easy to read.

Client: {{clientName}}
Freelancer: {{freelancerName}}
Scope and deliverables: {{projectScope}}
Total payment: INR {{paymentAmount}}
Payment terms: {{paymentTerms}}
Deadline: {{deadline}}

Include sections for parties, services, payment, timeline, intellectual
property, confidentiality, termination, governing law (India) and signatures.
Return the full contract as formatted plain text."#;

fn document_input() -> ObjectSchema {
    ObjectSchema::new().with_field(FieldSchema::required(
        "documentText",
        "Full text of the legal document",
        FieldKind::text(1),
    ))
}

fn text_output(name: &str, description: &str) -> ObjectSchema {
    ObjectSchema::new().with_field(FieldSchema::required(name, description, FieldKind::text(1)))
}

fn risk_item() -> ObjectSchema {
    ObjectSchema::new()
        .with_field(FieldSchema::required(
            "description",
            "What the risk is and why it matters",
            FieldKind::text(1),
        ))
        .with_field(FieldSchema::required(
            "severity",
            "How serious the risk is",
            FieldKind::one_of(Severity::ALL.iter().map(|s| s.as_str())),
        ))
}

pub fn summarize() -> Result<CapabilitySpec, TemplateError> {
    Ok(CapabilitySpec::new(
        CapabilityName::Summarize,
        "Plain-language summary of a legal document",
    )
    .with_input(document_input())
    .with_output(text_output("summary", "Plain-language summary"))
    .with_prompt(PromptTemplate::parse(SUMMARIZE_PROMPT)?))
}

pub fn detect_risks() -> Result<CapabilitySpec, TemplateError> {
    Ok(CapabilitySpec::new(
        CapabilityName::DetectRisks,
        "Risky or unfavourable clauses with a severity rating",
    )
    .with_input(document_input())
    .with_output(ObjectSchema::new().with_field(FieldSchema::required(
        "risks",
        "Risks found in the document",
        FieldKind::list_of(FieldKind::object(risk_item())),
    )))
    .with_prompt(PromptTemplate::parse(DETECT_RISKS_PROMPT)?))
}

pub fn extract_obligations() -> Result<CapabilitySpec, TemplateError> {
    let obligations = || FieldKind::list_of(FieldKind::text(1));
    Ok(CapabilitySpec::new(
        CapabilityName::ExtractObligations,
        "Obligations of each party",
    )
    .with_input(
        document_input()
            .with_field(FieldSchema::required(
                "userParty",
                "Party the reader represents",
                FieldKind::text(1),
            ))
            .with_field(FieldSchema::required(
                "otherParty",
                "The counterparty",
                FieldKind::text(1),
            )),
    )
    .with_output(
        ObjectSchema::new()
            .with_field(FieldSchema::required(
                "userObligations",
                "Obligations of the user party",
                obligations(),
            ))
            .with_field(FieldSchema::required(
                "otherPartyObligations",
                "Obligations of the other party",
                obligations(),
            )),
    )
    .with_prompt(PromptTemplate::parse(EXTRACT_OBLIGATIONS_PROMPT)?))
}

pub fn answer_question() -> Result<CapabilitySpec, TemplateError> {
    Ok(CapabilitySpec::new(
        CapabilityName::AnswerQuestion,
        "Answer a question about the document",
    )
    .with_input(document_input().with_field(FieldSchema::required(
        "question",
        "The user's question",
        FieldKind::text(1),
    )))
    .with_output(text_output("answer", "Answer grounded in the document"))
    .with_prompt(PromptTemplate::parse(ANSWER_QUESTION_PROMPT)?))
}

pub fn suggest_negotiation() -> Result<CapabilitySpec, TemplateError> {
    Ok(CapabilitySpec::new(
        CapabilityName::SuggestNegotiation,
        "Negotiation point for one risk",
    )
    .with_input(ObjectSchema::new().with_field(FieldSchema::required(
        "riskDescription",
        "The risk to negotiate around",
        FieldKind::text(1),
    )))
    .with_output(text_output("suggestion", "Actionable negotiation point"))
    .with_prompt(PromptTemplate::parse(SUGGEST_NEGOTIATION_PROMPT)?))
}

pub fn translate() -> Result<CapabilitySpec, TemplateError> {
    Ok(CapabilitySpec::new(CapabilityName::Translate, "Translate text")
        .with_input(
            ObjectSchema::new()
                .with_field(FieldSchema::required(
                    "text",
                    "Text to translate",
                    FieldKind::text(1),
                ))
                .with_field(FieldSchema::required(
                    "targetLanguage",
                    "Language to translate into",
                    FieldKind::one_of(Language::translation_targets().map(|l| l.as_str())),
                )),
        )
        .with_output(text_output("translatedText", "The translation"))
        .with_prompt(PromptTemplate::parse(TRANSLATE_PROMPT)?))
}

pub fn synthesize_speech() -> Result<CapabilitySpec, TemplateError> {
    Ok(CapabilitySpec::new(
        CapabilityName::SynthesizeSpeech,
        "Spoken rendition of text",
    )
    .with_input(ObjectSchema::new().with_field(FieldSchema::required(
        "text",
        "Text to speak",
        FieldKind::text(1),
    )))
    .with_output(text_output("audioRef", "Playable audio reference"))
    .with_prompt(PromptTemplate::parse(SYNTHESIZE_SPEECH_PROMPT)?)
    .with_output_mode(OutputMode::Speech))
}

pub fn draft_contract() -> Result<CapabilitySpec, TemplateError> {
    Ok(CapabilitySpec::new(
        CapabilityName::DraftContract,
        "Freelancer agreement from a few key terms",
    )
    .with_input(
        ObjectSchema::new()
            .with_field(FieldSchema::required(
                "clientName",
                "Client's full name",
                FieldKind::text(2),
            ))
            .with_field(FieldSchema::required(
                "freelancerName",
                "Freelancer's full name",
                FieldKind::text(2),
            ))
            .with_field(FieldSchema::required(
                "projectScope",
                "Work and deliverables",
                FieldKind::text(10),
            ))
            .with_field(FieldSchema::required(
                "paymentAmount",
                "Total payment in INR",
                FieldKind::positive_number(),
            ))
            .with_field(FieldSchema::required(
                "paymentTerms",
                "When and how payment is made",
                FieldKind::text(5),
            ))
            .with_field(FieldSchema::required(
                "deadline",
                "Completion date",
                FieldKind::text(1),
            )),
    )
    .with_output(text_output("contractText", "The drafted contract"))
    .with_prompt(PromptTemplate::parse(DRAFT_CONTRACT_PROMPT)?))
}

/// All eight built-in capabilities
pub fn builtin_specs() -> Result<Vec<CapabilitySpec>, TemplateError> {
    Ok(vec![
        summarize()?,
        detect_risks()?,
        extract_obligations()?,
        answer_question()?,
        suggest_negotiation()?,
        translate()?,
        synthesize_speech()?,
        draft_contract()?,
    ])
}
