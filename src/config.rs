use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Public Stratus API endpoint, used when no URL is configured.
pub(crate) const DEFAULT_API_URL: &str = "https://api.stratus.earth/";

/// Resolved client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base API URL, typically `https://api.stratus.earth/`.
    pub url: String,
    /// API key attached as `authorization: api-key <key>` when present.
    ///
    /// Bearer tokens are set on the client's [`crate::AuthStore`] instead;
    /// they do not come from configuration files.
    pub key: Option<String>,
    /// Whether to verify TLS certificates.
    pub verify: bool,
}

#[derive(Debug, Default)]
struct RcConfig {
    url: Option<String>,
    key: Option<String>,
    verify: Option<bool>,
}

/// Builds a [`ClientConfig`] using (in order of precedence):
/// - explicit `url`/`key` arguments
/// - environment variables `STRATUS_API_URL` / `STRATUS_API_KEY`
/// - config file from `STRATUS_RC`, `./.stratusrc`, or `~/.stratusrc`
/// - the public endpoint, for the URL
pub(crate) fn load_config(
    url: Option<String>,
    key: Option<String>,
    verify: Option<bool>,
) -> Result<ClientConfig> {
    let mut url = url.or_else(|| std::env::var("STRATUS_API_URL").ok());
    let mut key = key.or_else(|| std::env::var("STRATUS_API_KEY").ok());

    let mut file_verify: Option<bool> = None;

    if url.is_none() || key.is_none() || verify.is_none() {
        for rc_path in rc_candidates() {
            if rc_path.exists() {
                let cfg = read_rc(&rc_path).map_err(|e| {
                    Error::Config(format!(
                        "failed to read configuration file {}: {e}",
                        rc_path.display()
                    ))
                })?;

                if url.is_none() {
                    url = cfg.url;
                }
                if key.is_none() {
                    key = cfg.key;
                }
                file_verify = cfg.verify;
                break;
            }
        }
    }

    Ok(ClientConfig {
        url: url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        key,
        verify: verify.or(file_verify).unwrap_or(true),
    })
}

fn read_rc(path: &Path) -> std::io::Result<RcConfig> {
    Ok(parse_rc(&std::fs::read_to_string(path)?))
}

fn parse_rc(text: &str) -> RcConfig {
    let mut cfg = RcConfig::default();

    // Support formatting where `key:` is on one line and the value is on the
    // next line.
    let mut pending_key: Option<&str> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(pk) = pending_key {
            // Continuation value line (no colon)
            if !line.contains(':') {
                let v = strip_quotes(line);
                match pk {
                    "url" => cfg.url = Some(v.to_string()),
                    "key" => cfg.key = Some(v.to_string()),
                    _ => {}
                }
                pending_key = None;
                continue;
            }
            pending_key = None;
        }

        if let Some((k, v)) = line.split_once(':') {
            let k = k.trim();
            let v = strip_quotes(v.trim());
            match k {
                "url" => {
                    if !v.is_empty() {
                        cfg.url = Some(v.to_string());
                    } else {
                        pending_key = Some("url");
                    }
                }
                "key" => {
                    if !v.is_empty() {
                        cfg.key = Some(v.to_string());
                    } else {
                        pending_key = Some("key");
                    }
                }
                "verify" => {
                    if !v.is_empty() {
                        cfg.verify = Some(v != "0");
                    }
                }
                _ => {}
            }
        }
    }

    cfg
}

fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    if (s.starts_with('"') && s.ends_with('"') && s.len() >= 2)
        || (s.starts_with('\'') && s.ends_with('\'') && s.len() >= 2)
    {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

fn rc_candidates() -> Vec<PathBuf> {
    // Search order:
    // 1) STRATUS_RC (explicit)
    // 2) ./.stratusrc (current working directory)
    // 3) ~/.stratusrc
    if let Ok(p) = std::env::var("STRATUS_RC") {
        return vec![PathBuf::from(p)];
    }

    let mut v = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        v.push(cwd.join(".stratusrc"));
    }
    if let Some(home) = dirs::home_dir() {
        v.push(home.join(".stratusrc"));
    }
    v
}
