use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8080/callback";
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "deepseek-r1:7b";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub client_id: String,
    pub user_email: Option<String>,
    pub redirect_uri: Option<String>,
    pub ollama_url: Option<String>,
    pub model: Option<String>,
    /// Unset means the model call may block for as long as the model thinks.
    pub llm_timeout_secs: Option<u64>,
}

impl Config {
    fn template() -> Self {
        Self {
            client_id: "YOUR_CLIENT_ID.apps.googleusercontent.com".to_string(),
            user_email: Some("you@example.com".to_string()),
            redirect_uri: Some(DEFAULT_REDIRECT_URI.to_string()),
            ollama_url: Some(DEFAULT_OLLAMA_URL.to_string()),
            model: Some(DEFAULT_MODEL.to_string()),
            llm_timeout_secs: None,
        }
    }

    pub fn ollama_url(&self) -> &str {
        self.ollama_url.as_deref().unwrap_or(DEFAULT_OLLAMA_URL)
    }

    pub fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }
}

pub(crate) fn config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("no config dir available"))?
        .join("inboxpert"))
}

pub fn config_path() -> Result<PathBuf> {
    let mut p = config_dir()?;
    fs::create_dir_all(&p)?;
    p.push("config.toml");
    Ok(p)
}

pub fn load_config() -> Result<Config> {
    let path = config_path()?;
    if !path.exists() {
        // write a template for users to edit
        let tom = toml::to_string_pretty(&Config::template())?;
        fs::write(&path, tom)?;
        return Err(anyhow::anyhow!(
            "Created template config at {}; edit it and run again",
            path.display()
        ));
    }
    let s = fs::read_to_string(path)?;
    parse_config(&s)
}

fn parse_config(s: &str) -> Result<Config> {
    let cfg: Config = toml::from_str(s)?;
    Ok(cfg)
}
