use anyhow::Result;
use log::info;

use crate::domain::email::{Criterion, Email};
use crate::llm::ChatModel;
use crate::llm::prompts::{THINK_END, classify_prompt};

/// The model's answer for one email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub matched: bool,
    /// Text after the reasoning block, as the model wrote it.
    pub verdict: String,
}

pub struct Classifier<'a> {
    model: &'a dyn ChatModel,
    model_name: String,
}

impl<'a> Classifier<'a> {
    pub fn new(model: &'a dyn ChatModel, model_name: impl Into<String>) -> Self {
        Self {
            model,
            model_name: model_name.into(),
        }
    }

    /// Ask the model whether `email` matches `criterion`. Errors only when the
    /// model call itself fails; unclear answers are a plain `false`.
    pub fn classify(&self, email: &Email, criterion: &Criterion) -> Result<Classification> {
        let prompt = classify_prompt(email, criterion);
        let response = self.model.chat(&self.model_name, &prompt)?;
        let matched = decision(&response);
        let verdict = verdict_text(&response).to_string();
        info!("{} -> {matched}: {verdict:?}", email.id);
        Ok(Classification { matched, verdict })
    }
}

/// The part of a response that carries the verdict: everything after the last
/// reasoning block, or the whole response when there is none.
pub fn verdict_text(response: &str) -> &str {
    match response.rfind(THINK_END) {
        Some(i) => response[i + THINK_END.len()..].trim(),
        None => response.trim(),
    }
}

/// The last standalone `YES` or `NO` in the verdict text decides; neither
/// means no. A `YES` directly preceded by "not" is a no.
pub fn decision(response: &str) -> bool {
    let words: Vec<&str> = verdict_text(response)
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    match words.iter().rposition(|w| *w == "YES" || *w == "NO") {
        Some(i) if words[i] == "YES" => !(i > 0 && words[i - 1].eq_ignore_ascii_case("not")),
        _ => false,
    }
}
