//! In-memory stand-ins for the mailbox and the model.

use anyhow::{Result, anyhow};
use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::email::Email;
use crate::llm::ChatModel;
use crate::mail::MailProvider;

pub fn email(i: usize) -> Email {
    Email {
        id: format!("m{i}"),
        subject: format!("Subject {i}"),
        sender: format!("sender{i}@example.com"),
        body: format!("Body of message {i}"),
    }
}

pub fn emails(n: usize) -> Vec<Email> {
    (0..n).map(email).collect()
}

#[derive(Default)]
pub struct FakeMailbox {
    emails: Vec<Email>,
    list_limits: RefCell<Vec<usize>>,
    failing: RefCell<HashSet<String>>,
    calls: RefCell<usize>,
    raise_after: Option<(usize, Arc<AtomicBool>)>,
    pub trashed: RefCell<Vec<String>>,
    pub deleted: RefCell<Vec<String>>,
}

impl FakeMailbox {
    pub fn with_count(n: usize) -> Self {
        Self {
            emails: emails(n),
            ..Self::default()
        }
    }

    /// Raise `flag` once `calls` get/trash/delete requests have succeeded.
    pub fn raise_after(mut self, calls: usize, flag: Arc<AtomicBool>) -> Self {
        self.raise_after = Some((calls, flag));
        self
    }

    fn count_call(&self) {
        let mut calls = self.calls.borrow_mut();
        *calls += 1;
        if let Some((n, flag)) = &self.raise_after
            && *calls >= *n
        {
            flag.store(true, Ordering::SeqCst);
        }
    }

    pub fn list_limits(&self) -> Vec<usize> {
        self.list_limits.borrow().clone()
    }

    /// Every call touching `id` fails from now on.
    pub fn fail_get(&self, id: &str) {
        self.failing.borrow_mut().insert(id.to_string());
    }

    pub fn fail_action(&self, id: &str) {
        self.fail_get(id);
    }

    fn check(&self, id: &str) -> Result<()> {
        if self.failing.borrow().contains(id) {
            return Err(anyhow!("provider rejected {id}"));
        }
        Ok(())
    }
}

impl MailProvider for FakeMailbox {
    fn list_message_ids(&self, limit: usize) -> Result<Vec<String>> {
        self.list_limits.borrow_mut().push(limit);
        Ok(self.emails.iter().take(limit).map(|e| e.id.clone()).collect())
    }

    fn get_message(&self, id: &str) -> Result<Email> {
        self.check(id)?;
        let email = self
            .emails
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| anyhow!("no such message {id}"))?;
        self.count_call();
        Ok(email)
    }

    fn trash_message(&self, id: &str) -> Result<()> {
        self.check(id)?;
        self.trashed.borrow_mut().push(id.to_string());
        self.count_call();
        Ok(())
    }

    fn delete_message(&self, id: &str) -> Result<()> {
        self.check(id)?;
        self.deleted.borrow_mut().push(id.to_string());
        self.count_call();
        Ok(())
    }
}

/// Replies with queued responses in order; an `Err` entry simulates an
/// unreachable model.
pub struct ScriptedModel {
    replies: RefCell<VecDeque<Result<String>>>,
    pub prompts: RefCell<Vec<String>>,
    cancel_after: Option<(usize, Arc<AtomicBool>)>,
}

impl ScriptedModel {
    pub fn new<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: RefCell::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            prompts: RefCell::new(Vec::new()),
            cancel_after: None,
        }
    }

    pub fn then(self, reply: &str) -> Self {
        self.replies.borrow_mut().push_back(Ok(reply.to_string()));
        self
    }

    pub fn push_error(self) -> Self {
        self.replies
            .borrow_mut()
            .push_back(Err(anyhow!("connection refused")));
        self
    }

    /// Raise `flag` once `calls` requests have been answered, the way a user
    /// pressing stop mid-scan would.
    pub fn cancel_after(mut self, calls: usize, flag: Arc<AtomicBool>) -> Self {
        self.cancel_after = Some((calls, flag));
        self
    }

    pub fn calls(&self) -> usize {
        self.prompts.borrow().len()
    }
}

impl ChatModel for ScriptedModel {
    fn chat(&self, _model: &str, prompt: &str) -> Result<String> {
        self.prompts.borrow_mut().push(prompt.to_string());
        let reply = self
            .replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok("NO".to_string()));
        if let Some((n, flag)) = &self.cancel_after
            && self.calls() >= *n
        {
            flag.store(true, Ordering::SeqCst);
        }
        reply
    }
}
