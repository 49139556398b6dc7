pub mod auth;
pub mod cleanup;
pub mod config;
pub mod domain;
pub mod error;
pub mod llm;
pub mod mail;
pub mod review;
pub mod scan;
pub mod session;
pub mod terminal;

#[cfg(test)]
pub(crate) mod testing;
