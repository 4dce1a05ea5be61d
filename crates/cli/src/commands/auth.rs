use std::path::Path;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Subcommand};
use jira_rest_auth::{token_key, CredentialStore};
use jira_rest_config::Config;
use jira_rest_output::OutputRenderer;
use serde::Serialize;
use url::Url;

#[derive(Subcommand, Debug, Clone)]
pub enum AuthCommand {
    /// Add or update a profile and store its password or API token
    Login(LoginArgs),
    /// Remove stored credentials (and optionally the profile)
    Logout(LogoutArgs),
    /// List configured profiles
    List,
}

#[derive(Args, Debug, Clone)]
pub struct LoginArgs {
    /// Profile name to create or update.
    #[arg(long)]
    pub profile: String,
    /// REST API root (e.g. https://jira.example.com/rest/api/2/).
    #[arg(long)]
    pub base_url: String,
    /// User name sent with Basic authentication.
    #[arg(long)]
    pub user: String,
    /// Password or API token (falls back to JIRA_API_TOKEN env or interactive prompt).
    #[arg(long, env = "JIRA_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
    /// Seconds allowed for establishing the connection.
    #[arg(long)]
    pub dial_timeout: Option<u64>,
    /// Mark this profile as the default one.
    #[arg(long)]
    pub default: bool,
}

#[derive(Args, Debug, Clone)]
pub struct LogoutArgs {
    /// Profile to remove credentials for.
    #[arg(long)]
    pub profile: String,
    /// Remove the profile from config entirely (not just the stored token).
    #[arg(long)]
    pub remove_profile: bool,
}

pub fn handle(
    command: AuthCommand,
    config: &mut Config,
    config_path: Option<&Path>,
    store: &CredentialStore,
    renderer: &OutputRenderer,
) -> Result<()> {
    match command {
        AuthCommand::Login(args) => login(args, config, config_path, store),
        AuthCommand::Logout(args) => logout(args, config, config_path, store),
        AuthCommand::List => list_profiles(config, store, renderer),
    }
}

fn login(
    args: LoginArgs,
    config: &mut Config,
    config_path: Option<&Path>,
    store: &CredentialStore,
) -> Result<()> {
    if args.profile.trim().is_empty() {
        return Err(anyhow!("Profile name cannot be empty"));
    }

    let base_url = normalize_base_url(&args.base_url)?;

    let token = match args.token {
        Some(token) if !token.trim().is_empty() => token.trim().to_owned(),
        _ => rpassword::prompt_password("Enter password or API token: ")
            .context("Failed to read token from prompt")?
            .trim()
            .to_owned(),
    };
    if token.is_empty() {
        return Err(anyhow!("Password or API token cannot be empty"));
    }

    let profile_entry = config.profiles.entry(args.profile.clone()).or_default();
    profile_entry.base_url = Some(base_url.clone());
    profile_entry.user = Some(args.user.clone());
    if args.dial_timeout.is_some() {
        profile_entry.dial_timeout_secs = args.dial_timeout;
    }

    if args.default || config.default_profile.is_none() {
        config.default_profile = Some(args.profile.clone());
    }

    store
        .set_secret(&token_key(&base_url, &args.profile), &token)
        .context("Failed to store token")?;

    config
        .save(config_path)
        .context("Unable to persist configuration file")?;

    tracing::info!(
        profile = %args.profile,
        base_url = %base_url,
        "Profile saved and token stored"
    );
    Ok(())
}

fn logout(
    args: LogoutArgs,
    config: &mut Config,
    config_path: Option<&Path>,
    store: &CredentialStore,
) -> Result<()> {
    let profile = config
        .profiles
        .get(&args.profile)
        .ok_or_else(|| anyhow!("Profile '{}' does not exist", args.profile))?;

    let base_url = profile
        .base_url
        .as_deref()
        .ok_or_else(|| anyhow!("Profile '{}' is missing a base_url", args.profile))?;

    store
        .delete_secret(&token_key(base_url, &args.profile))
        .context("Failed to delete stored token")?;

    if args.remove_profile {
        config.profiles.remove(&args.profile);
        if config.default_profile.as_deref() == Some(args.profile.as_str()) {
            config.default_profile = config.profiles.keys().next().cloned();
        }
    }

    config
        .save(config_path)
        .context("Unable to persist configuration file")?;
    tracing::info!(profile = %args.profile, "Credentials removed");
    Ok(())
}

fn list_profiles(
    config: &Config,
    store: &CredentialStore,
    renderer: &OutputRenderer,
) -> Result<()> {
    #[derive(Serialize)]
    struct Row<'a> {
        name: &'a str,
        base_url: &'a str,
        user: &'a str,
        dial_timeout_secs: u64,
        has_token: bool,
        is_default: bool,
    }

    let mut names: Vec<&String> = config.profiles.keys().collect();
    names.sort();

    let mut rows = Vec::with_capacity(names.len());
    for name in names {
        let profile = &config.profiles[name];
        let base_url = profile.base_url.as_deref().unwrap_or("");
        rows.push(Row {
            name,
            base_url,
            user: profile.user.as_deref().unwrap_or(""),
            dial_timeout_secs: profile.dial_timeout().as_secs(),
            has_token: store.get_secret(&token_key(base_url, name))?.is_some(),
            is_default: config.default_profile.as_deref() == Some(name.as_str()),
        });
    }

    if rows.is_empty() {
        tracing::info!("No profiles configured yet. Use `jira-rest auth login` to add one.");
    }

    renderer.render(&rows)
}

/// Request paths are appended to the base URL verbatim, so the stored URL
/// always ends with `/`.
fn normalize_base_url(raw: &str) -> Result<String> {
    let url = Url::parse(raw.trim()).with_context(|| format!("Invalid Jira URL: {raw}"))?;
    let mut base = url.to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    Ok(base)
}
