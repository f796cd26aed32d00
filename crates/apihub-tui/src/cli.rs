//! One-shot commands run without the TUI.

use std::io::{self, Write};

use anyhow::{bail, Result};

use apihub_core::utils::mask_key;
use apihub_core::{Config, GuardDecision, Route};

use crate::app::build_session;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login { email: Option<String> },
    Register,
    Logout,
    Status,
    Routes,
}

impl Command {
    /// Parse the arguments after the program name. `None` means start the TUI.
    pub fn parse(args: &[String]) -> Result<Option<Self>> {
        let Some(first) = args.first() else {
            return Ok(None);
        };
        let command = match first.as_str() {
            "--login" => Command::Login {
                email: args.get(1).cloned(),
            },
            "--register" => Command::Register,
            "--logout" => Command::Logout,
            "--status" => Command::Status,
            "--routes" => Command::Routes,
            other => bail!(
                "Unknown argument: {}. Expected one of: {}",
                other,
                "--login [email], --register, --logout, --status, --routes"
            ),
        };
        Ok(Some(command))
    }
}

pub async fn run(command: Command, mut config: Config) -> Result<()> {
    let session = build_session(&config)?;

    match command {
        Command::Login { email } => {
            let email = match email {
                Some(email) => email,
                None => prompt_with_default("Email", config.last_email.as_deref())?,
            };
            let password = rpassword::prompt_password("Password: ")?;

            println!("\nAuthenticating...");
            let result = session.login(&email, &password).await;
            if !result.success {
                bail!(result.message);
            }
            config.last_email = Some(email.trim().to_string());
            if let Err(e) = config.save() {
                tracing::warn!(error = %e, "Failed to save config");
            }
            println!("{}", result.message);
        }
        Command::Register => {
            let name = prompt("Name")?;
            let email = prompt("Email")?;
            let password = rpassword::prompt_password("Password: ")?;

            let result = session.register(&name, &email, &password).await;
            if !result.success {
                bail!(result.message);
            }
            println!("{}", result.message);
        }
        Command::Logout => {
            if !session.is_authenticated() {
                println!("Not logged in");
                return Ok(());
            }
            session.logout().await;
            println!("Logged out");
        }
        Command::Status => {
            match session.user() {
                Some(user) => println!("Logged in as {} <{}>", user.display_name(), user.email),
                None if session.is_authenticated() => println!("Logged in"),
                None => println!("Not logged in"),
            }
            match config.api_key() {
                Some(key) => println!("API key: {}", mask_key(key)),
                None => println!("API key: not configured"),
            }
            println!("Auth service: {}", config.auth_base_url());
        }
        Command::Routes => {
            for route in Route::all() {
                let decision = match session.guard(route) {
                    GuardDecision::Allow => "allow".to_string(),
                    GuardDecision::Redirect(to) => format!("redirect -> {}", to),
                };
                println!("{:<18} {}", route.path(), decision);
            }
        }
    }
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

fn prompt_with_default(label: &str, default: Option<&str>) -> Result<String> {
    let Some(default) = default else {
        return prompt(label);
    };
    let input = prompt(&format!("{} [{}]", label, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}
