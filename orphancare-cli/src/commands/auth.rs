//! Login, logout and whoami

use std::io::{self, BufRead};

use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::{Input, Password};
use orphancare_core::{Credentials, Error, User};

use super::{get_authenticated_context, get_context, with_spinner};
use crate::output;

fn prompt_email(email: Option<String>) -> Result<String> {
    if let Some(email) = email {
        return Ok(email);
    }
    Ok(Input::<String>::new().with_prompt("Email").interact_text()?)
}

/// Password from the flag, piped stdin, or an interactive prompt
fn password_or_prompt(password: Option<String>) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }

    if atty::isnt(atty::Stream::Stdin) {
        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .context("Failed to read password from stdin")?;
        return Ok(line.trim_end_matches(['\r', '\n']).to_string());
    }

    Ok(Password::new().with_prompt("Password").interact()?)
}

fn user_json(user: &User) -> serde_json::Value {
    serde_json::json!({
        "id": user.id,
        "email": user.email,
    })
}

pub async fn login(email: Option<String>, password: Option<String>, json: bool) -> Result<()> {
    let email = prompt_email(email)?;
    let password = password_or_prompt(password)?;
    let credentials = Credentials::new(email, password);
    credentials.validate()?;

    let ctx = get_context("login")?;
    let user = with_spinner("Signing in...", json, ctx.session.login(&credentials)).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&user_json(&user))?);
    } else {
        output::success(&format!("Signed in as {}", user.email));
    }
    Ok(())
}

pub async fn logout(json: bool) -> Result<()> {
    let ctx = get_context("logout")?;
    let state = ctx.session.restore().await;
    ctx.session.logout().await;

    if json {
        println!(
            "{}",
            serde_json::json!({ "signed_out": true, "was_signed_in": state.is_authenticated })
        );
    } else if state.is_authenticated {
        output::success("Signed out.");
    } else {
        output::info("No active session.");
    }
    Ok(())
}

pub async fn whoami(json: bool) -> Result<()> {
    let ctx = get_authenticated_context("whoami").await?;
    let user = ctx.session.current_user().ok_or(Error::NoSession)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&user_json(&user))?);
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["Field", "Value"]);
    table.add_row(vec!["Email".to_string(), user.email.clone()]);
    table.add_row(vec!["User ID".to_string(), user.id.clone()]);
    if let Some(role) = user.extra.get("role").and_then(|v| v.as_str()) {
        table.add_row(vec!["Role".to_string(), role.to_string()]);
    }
    println!("{}", "Session".bold());
    println!("{}", table);
    println!("API: {}", ctx.config.api_base_url.dimmed());
    Ok(())
}
