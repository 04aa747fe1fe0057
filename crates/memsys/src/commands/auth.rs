//! Sign-in commands.

use anyhow::Result;
use colored::Colorize;
use dialoguer::{Input, Password};
use memsys_core::guard::LOGIN_PATH;
use tracing::warn;

use super::Context;
use crate::error::ApiError;

/// Sign in and persist principal and token
pub async fn login(ctx: &Context, email: Option<String>, password: Option<String>) -> Result<()> {
    if !ctx.navigate(LOGIN_PATH) {
        return Ok(());
    }

    let email = match email {
        Some(email) => email,
        None => Input::<String>::new().with_prompt("Email").interact_text()?,
    };
    let password = match password {
        Some(password) => password,
        None => Password::new().with_prompt("Password").interact()?,
    };

    let api = ctx.api()?;
    let response = match api.login(&email, &password).await {
        Ok(response) => response,
        Err(ApiError::Status { status: 401, .. }) => {
            println!("{} Invalid email or password.", "✗".red());
            return Ok(());
        }
        Err(e) => return ctx.handle_api_error(e),
    };

    ctx.store_login(response.principal.clone(), &response.token)?;

    println!(
        "{} Signed in as {} ({})",
        "✓".green(),
        response.principal.name.bold(),
        response.principal.role.to_string().cyan()
    );
    println!("  Start at {}", response.redirect_to.cyan());
    Ok(())
}

/// Revoke the server session (best effort) and clear the local one
pub async fn logout(ctx: &Context) -> Result<()> {
    if !ctx.session.is_authenticated() {
        println!("{} Not signed in.", "✗".red());
        return Ok(());
    }

    if let Err(e) = ctx.api()?.logout().await {
        warn!("Server logout failed: {}", e);
    }

    let next = ctx.clear_session()?;
    println!("{} Signed out. Next: {}", "✓".green(), next.cyan());
    Ok(())
}

/// Print the persisted principal
pub fn whoami(ctx: &Context) -> Result<()> {
    let Some(principal) = ctx.session.current_principal() else {
        println!("{} Not signed in.", "✗".red());
        return Ok(());
    };

    println!("{}", "Current Session".bold());
    println!("{}", "─".repeat(40));
    println!("  Name:    {}", principal.name);
    println!("  Email:   {}", principal.email);
    println!("  Role:    {}", principal.role.to_string().cyan());
    println!("  Home:    {}", principal.landing_path());
    println!(
        "  Session: {}",
        ctx.session.storage().dir().display().to_string().dimmed()
    );
    Ok(())
}
