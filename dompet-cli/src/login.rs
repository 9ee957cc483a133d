use anyhow::{bail, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use dompet_client::{login, logout, BankApi, FetchError};
use dompet_core::view_state::INVALID_CREDENTIALS;
use dompet_core::LoginView;
use std::io::{self, IsTerminal, Write};
use tracing::warn;

use crate::render::render_login;
use crate::state::{clear_session, load_session, save_session, Session};

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

/// Read a password without echoing it. Typed characters show as `*`, or in
/// clear when `visible`. Piped stdin falls back to a plain line read.
fn prompt_secret(label: &str, visible: bool) -> Result<String> {
    if !io::stdin().is_terminal() {
        return prompt(label);
    }
    print!("{}: ", label);
    io::stdout().flush().ok();

    enable_raw_mode()?;
    let typed = read_secret_keys(visible);
    disable_raw_mode()?;
    println!();
    typed
}

fn read_secret_keys(visible: bool) -> Result<String> {
    let mut secret = String::new();
    let mut stdout = io::stdout();
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match key.code {
            KeyCode::Enter => return Ok(secret),
            KeyCode::Esc => bail!("login cancelled"),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                bail!("login cancelled")
            }
            KeyCode::Backspace => {
                if secret.pop().is_some() {
                    write!(stdout, "\x08 \x08")?;
                }
            }
            KeyCode::Char(c) => {
                secret.push(c);
                if visible {
                    write!(stdout, "{c}")?;
                } else {
                    write!(stdout, "*")?;
                }
            }
            _ => {}
        }
        stdout.flush()?;
    }
}

pub async fn run_login(
    api: &dyn BankApi,
    username: Option<String>,
    show_password: bool,
) -> Result<()> {
    let mut view = LoginView::new();
    if show_password {
        view.toggle_password_visibility();
    }
    let username = match username {
        Some(u) => u,
        None => prompt("Username")?,
    };
    view.set_username(username);
    view.set_password(prompt_secret("Password", view.password_visible())?);
    print!("{}", render_login(&view));

    let Some((username, password)) = view.begin_submit() else {
        bail!("username and password are both required");
    };

    match login(api, &username, &password).await {
        Ok(cif) => {
            view.finish_success();
            save_session(&Session {
                cif: cif.clone(),
                username,
                logged_in_at_utc: chrono::Utc::now().to_rfc3339(),
            })?;
            println!("Logged in. Next: dompet home");
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "login failed");
            match e {
                FetchError::Auth(_) => view.finish_failure(INVALID_CREDENTIALS),
                other => view.finish_failure(format!("Could not reach the bank: {other}")),
            }
            bail!("{}", view.error().unwrap_or(INVALID_CREDENTIALS))
        }
    }
}

pub async fn run_logout(api: &dyn BankApi) -> Result<()> {
    if load_session()?.is_none() {
        println!("Not logged in.");
        return Ok(());
    }
    match logout(api).await {
        Ok(message) if !message.is_empty() => println!("{message}"),
        Ok(_) => println!("Logged out."),
        Err(e) => warn!(error = %e, "backend logout failed; clearing local session anyway"),
    }
    clear_session()
}
