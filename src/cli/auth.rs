use anyhow::{Result, anyhow};
use std::io::{self, Write};

use super::http_service;
use crate::client::{ChatService, Credentials, Registration};
use crate::core::{AppConfig, CredentialStore, FileCredentialStore};

fn prompt_password(password: Option<String>) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }
    print!("Password: ");
    io::stdout().flush()?;
    let mut password = String::new();
    io::stdin().read_line(&mut password)?;
    let password = password.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        return Err(anyhow!("A password is required"));
    }
    Ok(password)
}

pub async fn register(
    config: &AppConfig,
    username: String,
    email: Option<String>,
    password: Option<String>,
) -> Result<()> {
    let password = prompt_password(password)?;
    let service = http_service(config)?;

    let registration = Registration {
        username,
        email,
        password,
    };
    match service.register_user(&registration).await {
        Ok(()) => {
            println!("Account created. Log in with `nafas login`.");
            Ok(())
        }
        Err(err) => Err(anyhow!(
            "Registration failed: {}",
            err.detail_text().unwrap_or_else(|| err.to_string())
        )),
    }
}

pub async fn login(config: &AppConfig, username: String, password: Option<String>) -> Result<()> {
    let password = prompt_password(password)?;
    let service = http_service(config)?;

    let credentials = Credentials { username, password };
    let token = service.login_user(&credentials).await.map_err(|err| {
        anyhow!(
            "Login failed: {}",
            err.detail_text().unwrap_or_else(|| err.to_string())
        )
    })?;

    FileCredentialStore::new(&config.storage_path).save(&token.access_token)?;
    tracing::info!("Stored access token in {}", config.storage_path);
    println!("Logged in as {}", credentials.username);

    Ok(())
}

pub fn logout(config: &AppConfig) -> Result<()> {
    FileCredentialStore::new(&config.storage_path).clear()?;
    println!("Logged out");
    Ok(())
}
