use anyhow::{Context, Result};
use dompet_core::Cif;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// `$DOMPET_HOME`, or `~/.dompet`
pub fn dompet_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("DOMPET_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".dompet"))
}

pub fn ensure_dompet_home() -> Result<PathBuf> {
    let dir = dompet_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Logged-in customer, written after a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub cif: Cif,
    pub username: String,
    pub logged_in_at_utc: String,
}

fn session_path() -> Result<PathBuf> {
    Ok(ensure_dompet_home()?.join("session.json"))
}

pub fn load_session() -> Result<Option<Session>> {
    let p = session_path()?;
    if !p.exists() {
        return Ok(None);
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(Some(serde_json::from_str(&s).with_context(|| format!("parse {}", p.display()))?))
}

pub fn save_session(session: &Session) -> Result<()> {
    let p = session_path()?;
    let s = serde_json::to_string_pretty(session)?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn clear_session() -> Result<()> {
    let p = session_path()?;
    if p.exists() {
        fs::remove_file(&p).with_context(|| format!("remove {}", p.display()))?;
    }
    Ok(())
}
