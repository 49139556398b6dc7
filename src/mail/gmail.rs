//! Gmail REST v1 client over blocking reqwest.

use anyhow::{Context, Result, bail};
use log::debug;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;

use crate::domain::email::Email;
use crate::mail::MailProvider;
use crate::mail::decoders::to_email;

const MESSAGES_URL: &str = "https://gmail.googleapis.com/gmail/v1/users/me/messages";
/// Largest page `messages.list` will return.
const MAX_LIST_PAGE: usize = 500;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse {
    #[serde(default)]
    messages: Vec<MessageRef>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageRef {
    id: String,
}

#[derive(Debug, Deserialize)]
pub struct GmailMessage {
    pub id: String,
    pub payload: Option<MessagePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePart {
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub headers: Vec<Header>,
    pub body: Option<PartBody>,
    #[serde(default)]
    pub parts: Vec<MessagePart>,
}

#[derive(Debug, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct PartBody {
    pub data: Option<String>,
}

pub struct GmailClient {
    http: Client,
    access_token: String,
}

impl GmailClient {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            access_token: access_token.into(),
        }
    }

    fn send(&self, req: RequestBuilder, what: &str) -> Result<Response> {
        let resp = req
            .bearer_auth(&self.access_token)
            .send()
            .with_context(|| format!("Gmail {what} request failed"))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            bail!("Gmail {what} returned {status}: {body}");
        }
        Ok(resp)
    }
}

/// Follow `nextPageToken` until `limit` ids are collected or the listing runs
/// out. `fetch_page` gets the page size to ask for and the token, if any.
fn collect_ids(
    limit: usize,
    mut fetch_page: impl FnMut(usize, Option<&str>) -> Result<ListResponse>,
) -> Result<Vec<String>> {
    let mut ids = Vec::with_capacity(limit);
    let mut page_token: Option<String> = None;

    while ids.len() < limit {
        let want = (limit - ids.len()).min(MAX_LIST_PAGE);
        let page = fetch_page(want, page_token.as_deref())?;
        debug!("listed {} message ids", page.messages.len());
        if page.messages.is_empty() {
            break;
        }
        ids.extend(page.messages.into_iter().map(|m| m.id).take(want));

        match page.next_page_token {
            Some(t) => page_token = Some(t),
            None => break,
        }
    }
    Ok(ids)
}

impl MailProvider for GmailClient {
    fn list_message_ids(&self, limit: usize) -> Result<Vec<String>> {
        collect_ids(limit, |want, token| {
            let mut req = self
                .http
                .get(MESSAGES_URL)
                .query(&[("maxResults", want.to_string())]);
            if let Some(t) = token {
                req = req.query(&[("pageToken", t)]);
            }
            Ok(self.send(req, "list")?.json()?)
        })
    }

    fn get_message(&self, id: &str) -> Result<Email> {
        let req = self
            .http
            .get(format!("{MESSAGES_URL}/{id}"))
            .query(&[("format", "full")]);
        let msg: GmailMessage = self.send(req, "get")?.json()?;
        Ok(to_email(msg))
    }

    fn trash_message(&self, id: &str) -> Result<()> {
        self.send(self.http.post(format!("{MESSAGES_URL}/{id}/trash")), "trash")?;
        Ok(())
    }

    fn delete_message(&self, id: &str) -> Result<()> {
        self.send(self.http.delete(format!("{MESSAGES_URL}/{id}")), "delete")?;
        Ok(())
    }
}
