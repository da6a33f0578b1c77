use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::{API_BASE_URL, ClientConfig, DEFAULT_TIMEOUT};

#[derive(Debug, Default, PartialEq)]
struct RcConfig {
    url: Option<String>,
    token: Option<String>,
    timeout: Option<Duration>,
}

pub(crate) fn load_config(
    url: Option<String>,
    token: Option<String>,
    timeout: Option<Duration>,
) -> Result<ClientConfig> {
    let mut url = url.or_else(|| std::env::var("ELECTRICITYMAPS_URL").ok());
    let mut token = token.or_else(|| std::env::var("ELECTRICITYMAPS_TOKEN").ok());
    let mut timeout = match timeout {
        Some(t) => Some(t),
        None => match std::env::var("ELECTRICITYMAPS_TIMEOUT") {
            Ok(v) => Some(parse_timeout(&v).context("invalid ELECTRICITYMAPS_TIMEOUT")?),
            Err(_) => None,
        },
    };

    let rc_candidates = rc_candidates();

    if url.is_none() || token.is_none() || timeout.is_none() {
        for rc_path in &rc_candidates {
            if rc_path.exists() {
                let cfg = read_rc(rc_path).with_context(|| {
                    format!("failed to read configuration file {}", rc_path.display())
                })?;

                if url.is_none() {
                    url = cfg.url;
                }
                if token.is_none() {
                    token = cfg.token;
                }
                if timeout.is_none() {
                    timeout = cfg.timeout;
                }
                break;
            }
        }
    }

    let token = match token {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => {
            if !rc_candidates.is_empty() {
                bail!(
                    "Missing configuration: token (set ELECTRICITYMAPS_TOKEN or put `token:` in one of: {})",
                    rc_candidates
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }
            bail!("Missing configuration: token (set ELECTRICITYMAPS_TOKEN or create .electricitymapsrc)");
        }
    };

    Ok(ClientConfig {
        url: url.unwrap_or_else(|| API_BASE_URL.to_string()),
        token,
        timeout: timeout.unwrap_or(DEFAULT_TIMEOUT),
    })
}

fn read_rc(path: &Path) -> Result<RcConfig> {
    let text = std::fs::read_to_string(path)?;
    parse_rc(&text)
}

fn parse_rc(text: &str) -> Result<RcConfig> {
    let mut cfg = RcConfig::default();

    // Support formatting where `token:` is on one line and the value is on the next line.
    let mut pending_key: Option<&str> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(pk) = pending_key.take() {
            // Continuation value line. URLs contain a colon, so only a known
            // key prefix ends the continuation.
            if !starts_with_key(line) {
                apply(&mut cfg, pk, strip_quotes(line))?;
                continue;
            }
        }

        if let Some((k, v)) = line.split_once(':') {
            let k = k.trim();
            let v = strip_quotes(v.trim());
            if !matches!(k, "url" | "token" | "timeout") {
                continue;
            }
            if v.is_empty() {
                pending_key = Some(k);
            } else {
                apply(&mut cfg, k, v)?;
            }
        }
    }

    Ok(cfg)
}

fn starts_with_key(line: &str) -> bool {
    line.split_once(':')
        .is_some_and(|(k, _)| matches!(k.trim(), "url" | "token" | "timeout"))
}

fn apply(cfg: &mut RcConfig, key: &str, value: &str) -> Result<()> {
    match key {
        "url" => cfg.url = Some(value.to_string()),
        "token" => cfg.token = Some(value.to_string()),
        "timeout" => cfg.timeout = Some(parse_timeout(value)?),
        _ => {}
    }
    Ok(())
}

fn parse_timeout(value: &str) -> Result<Duration> {
    let secs: f64 = value
        .trim()
        .parse()
        .with_context(|| format!("timeout must be a number of seconds, got {value:?}"))?;
    if !secs.is_finite() || secs <= 0.0 {
        bail!("timeout must be positive, got {value:?}");
    }
    Duration::try_from_secs_f64(secs)
        .with_context(|| format!("timeout out of range, got {value:?}"))
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
    // 1) ELECTRICITYMAPS_RC (explicit)
    // 2) ./.electricitymapsrc
    // 3) ~/.electricitymapsrc
    if let Ok(p) = std::env::var("ELECTRICITYMAPS_RC") {
        return vec![PathBuf::from(p)];
    }

    let mut v = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        v.push(cwd.join(".electricitymapsrc"));
    }
    if let Some(home) = dirs::home_dir() {
        v.push(home.join(".electricitymapsrc"));
    }
    v
}
