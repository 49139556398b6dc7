use crate::domain::email::{Criterion, Email};

/// Reasoning models wrap their chain of thought in `<think>...</think>`.
pub const THINK_END: &str = "</think>";

pub fn classify_prompt(email: &Email, criterion: &Criterion) -> String {
    format!(
        r#"You help a user clean up their inbox. They want to pick out received emails that match a rule so they can trash or delete them.

<Email Start>
Subject: {subject}
From: {sender}
Body: {body}
<Email End>

The rule is: "{criterion}"
Apply the rule strictly and decide whether this email matches it.

You may reason step by step first, one thought at a time:
Thought: what to check next
Observation: what the email shows about it

Your final line must be exactly one word: YES if the email matches, NO otherwise."#,
        subject = email.subject,
        sender = email.sender,
        body = email.body,
        criterion = criterion.as_str(),
    )
}
