use anyhow::{Result, anyhow};
use log::{info, warn};
use oauth2::basic::{BasicClient, BasicTokenResponse};
use oauth2::reqwest::http_client;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, PkceCodeChallenge, RedirectUrl,
    RefreshToken, Scope, TokenResponse, TokenUrl,
};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::{Duration, Instant};
use tiny_http::{Response, Server};
use url::Url;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const CONSENT_TIMEOUT: Duration = Duration::from_secs(120);

/// Tokens returned by the oauth flow (in-memory)
pub struct Tokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<u64>,
}

impl From<BasicTokenResponse> for Tokens {
    fn from(token: BasicTokenResponse) -> Self {
        Self {
            access_token: token.access_token().secret().to_string(),
            refresh_token: token.refresh_token().map(|r| r.secret().to_string()),
            expires_in: token.expires_in().map(|d| d.as_secs()),
        }
    }
}

fn google_client(client_id: &str, client_secret: Option<&str>) -> Result<BasicClient> {
    Ok(BasicClient::new(
        ClientId::new(client_id.to_string()),
        client_secret.map(|s| ClientSecret::new(s.to_string())),
        AuthUrl::new(GOOGLE_AUTH_URL.to_string())?,
        Some(TokenUrl::new(GOOGLE_TOKEN_URL.to_string())?),
    ))
}

/// Exchange a refresh token for a new access token
pub fn refresh_access_token(
    client_id: &str,
    client_secret: Option<&str>,
    refresh_token: &str,
) -> Result<Tokens> {
    let token = google_client(client_id, client_secret)?
        .exchange_refresh_token(&RefreshToken::new(refresh_token.to_string()))
        .request(http_client)?;
    Ok(token.into())
}

/// Resolve the loopback address the redirect URI points at.
fn callback_addr(redirect: &Url) -> Result<SocketAddr> {
    let host = redirect
        .host_str()
        .ok_or_else(|| anyhow!("redirect_uri missing host: {redirect}"))?;
    let port = redirect
        .port_or_known_default()
        .ok_or_else(|| anyhow!("redirect_uri missing/unknown port: {redirect}"))?;

    let ip: IpAddr = match host {
        "localhost" | "127.0.0.1" => IpAddr::V4(Ipv4Addr::LOCALHOST),
        other => other.parse::<IpAddr>().map_err(|_| {
            anyhow!("redirect_uri host must be localhost/127.0.0.1 or an IP: {other}")
        })?,
    };
    Ok(SocketAddr::new(ip, port))
}

/// What the browser redirect carried back.
#[derive(Debug, PartialEq, Eq)]
enum Callback {
    Code(String),
    Denied(String),
    Nothing,
}

/// `path` is the request target, e.g. "/callback?code=...&state=...".
fn parse_callback(redirect: &Url, path: &str, expected_state: &str) -> Callback {
    let Ok(full) = redirect.join(path) else {
        return Callback::Nothing;
    };

    let mut code = None;
    let mut state = None;
    for (k, v) in full.query_pairs() {
        match k.as_ref() {
            "code" => code = Some(v.into_owned()),
            "state" => state = Some(v.into_owned()),
            "error" => return Callback::Denied(v.into_owned()),
            _ => {}
        }
    }

    match (code, state) {
        (Some(c), Some(s)) if s == expected_state => Callback::Code(c),
        (Some(_), _) => {
            warn!("ignoring OAuth callback with mismatched state");
            Callback::Nothing
        }
        _ => Callback::Nothing,
    }
}

/// Perform Authorization Code + PKCE flow. Opens the system browser and
/// captures the code on a loopback listener.
pub fn perform_pkce_flow(
    client_id: &str,
    client_secret: Option<&str>,
    redirect_uri: &str,
    scope: &str,
) -> Result<Tokens> {
    let redirect = Url::parse(redirect_uri)
        .map_err(|e| anyhow!("Invalid redirect_uri '{redirect_uri}': {e}"))?;
    let bind_addr = callback_addr(&redirect)?;

    // listen before the browser can redirect
    let server = Server::http(bind_addr)
        .map_err(|e| anyhow!("Failed to bind OAuth callback server on {bind_addr}: {e:?}"))?;

    let oauth_client = google_client(client_id, client_secret)?
        .set_redirect_uri(RedirectUrl::new(redirect_uri.to_string())?);

    let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();
    let (auth_url, csrf) = oauth_client
        .authorize_url(CsrfToken::new_random)
        .add_scope(Scope::new(scope.to_string()))
        // offline + consent so Google hands back a refresh token every time
        .add_extra_param("access_type", "offline")
        .add_extra_param("prompt", "consent")
        .set_pkce_challenge(pkce_challenge)
        .url();

    println!("Open this URL in your browser:\n{auth_url}");
    if let Err(e) = open::that(auth_url.as_str()) {
        warn!("could not open browser automatically: {e}");
    }

    let mut code = None;
    let wait_until = Instant::now() + CONSENT_TIMEOUT;
    while Instant::now() < wait_until {
        let Ok(Some(request)) = server.recv_timeout(Duration::from_millis(500)) else {
            continue;
        };
        match parse_callback(&redirect, request.url(), csrf.secret()) {
            Callback::Code(c) => {
                let _ = request.respond(Response::from_string(
                    "Authorization received. You can close this tab.",
                ));
                code = Some(c);
                break;
            }
            Callback::Denied(reason) => {
                let _ = request.respond(Response::from_string("Authorization denied."));
                return Err(anyhow!("consent denied: {reason}"));
            }
            Callback::Nothing => {
                let _ = request.respond(Response::from_string(
                    "No code found in redirect. You can close this tab.",
                ));
            }
        }
    }

    let code = code.ok_or_else(|| anyhow!("No code received within timeout"))?;

    let token = oauth_client
        .exchange_code(AuthorizationCode::new(code))
        .set_pkce_verifier(pkce_verifier)
        .request(http_client)
        .map_err(|e| anyhow!("Token exchange failed: {e:?}"))?;

    info!("OAuth consent completed");
    Ok(token.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn redirect() -> Url {
        Url::parse("http://127.0.0.1:8080/callback").unwrap()
    }

    #[test]
    fn callback_addr_binds_loopback() {
        let addr = callback_addr(&Url::parse("http://localhost:9000/cb").unwrap()).unwrap();
        assert_eq!(addr, "127.0.0.1:9000".parse().unwrap());
        assert!(callback_addr(&Url::parse("http://example.com/cb").unwrap()).is_err());
    }

    #[test]
    fn callback_with_matching_state_yields_code() {
        let cb = parse_callback(&redirect(), "/callback?code=4%2Fabc&state=xyz", "xyz");
        assert_eq!(cb, Callback::Code("4/abc".to_string()));
    }

    #[test]
    fn callback_with_wrong_state_is_ignored() {
        let cb = parse_callback(&redirect(), "/callback?code=abc&state=other", "xyz");
        assert_eq!(cb, Callback::Nothing);
        assert_eq!(
            parse_callback(&redirect(), "/favicon.ico", "xyz"),
            Callback::Nothing
        );
    }

    #[test]
    fn callback_reports_denied_consent() {
        let cb = parse_callback(&redirect(), "/callback?error=access_denied&state=xyz", "xyz");
        assert_eq!(cb, Callback::Denied("access_denied".to_string()));
    }
}
