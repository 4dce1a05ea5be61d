mod commands;

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use commands::auth::{self, AuthCommand};
use commands::issues::{CommentArgs, IssueArgs};
use jira_rest_api::JiraClient;
use jira_rest_auth::{token_key, CredentialStore};
use jira_rest_config::Config;
use jira_rest_output::{OutputFormat, OutputRenderer};
use tracing_subscriber::{fmt, EnvFilter};

/// Generic API token variable, consulted after the per-profile one.
const TOKEN_ENV: &str = "JIRA_API_TOKEN";

#[derive(Parser, Debug)]
#[command(name = "jira-rest", version, about = "Minimal Jira REST client", long_about = None)]
struct Cli {
    /// Profile to use from config file
    #[arg(short, long)]
    profile: Option<String>,

    /// Path to config file (defaults to ~/.jira-rest/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format for command results
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,

    /// Enable verbose logging
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Fetch a single issue
    Issue(IssueArgs),
    /// Print the title of a project
    Project {
        /// Project key (e.g. ABC)
        key: String,
    },
    /// Add a comment to an issue
    Comment(CommentArgs),
    /// Manage profiles and stored credentials
    #[command(subcommand)]
    Auth(AuthCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug)?;

    let config_path = cli.config.clone();
    let mut config = Config::load(config_path.as_ref())?;
    let renderer = OutputRenderer::new(cli.output);
    let store = CredentialStore::default_location()?;
    let profile = cli.profile.as_deref();

    match cli.command {
        Command::Issue(args) => {
            let client = build_client(&config, profile, &store)?;
            commands::issues::show(&client, &renderer, args).await?
        }
        Command::Project { key } => {
            let client = build_client(&config, profile, &store)?;
            commands::projects::title(&client, &renderer, &key).await?
        }
        Command::Comment(args) => {
            let client = build_client(&config, profile, &store)?;
            commands::issues::comment(&client, &renderer, args).await?
        }
        Command::Auth(command) => auth::handle(
            command,
            &mut config,
            config_path.as_deref(),
            &store,
            &renderer,
        )?,
    }

    Ok(())
}

fn init_tracing(debug: bool) -> Result<()> {
    let default = if debug {
        "info,jira_rest=debug,jira_rest_api=debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!("failed to initialize logger: {err}"))
}

fn build_client(
    config: &Config,
    requested: Option<&str>,
    store: &CredentialStore,
) -> Result<JiraClient> {
    let (name, profile) = config
        .resolve_profile(requested)
        .ok_or_else(|| anyhow!("No profile configured. Run `jira-rest auth login` first."))?;

    let base_url = profile
        .base_url
        .as_deref()
        .ok_or_else(|| anyhow!("Profile '{name}' is missing a base_url."))?;
    let user = profile
        .user
        .as_deref()
        .ok_or_else(|| anyhow!("Profile '{name}' is missing a user."))?;

    let token = resolve_token(name, base_url, store, |var| std::env::var(var).ok())?;

    tracing::debug!(profile = %name, %base_url, "Using profile");
    Ok(JiraClient::new(
        base_url,
        user,
        token,
        profile.dial_timeout(),
    )?)
}

/// `JIRA_REST_TOKEN_<PROFILE>`, then `JIRA_API_TOKEN`, then the credential store.
/// Variables are read through `env`.
fn resolve_token(
    profile: &str,
    base_url: &str,
    store: &CredentialStore,
    env: impl Fn(&str) -> Option<String>,
) -> Result<String> {
    let profile_env = profile_token_env(profile);
    let from_env = [profile_env.as_str(), TOKEN_ENV]
        .into_iter()
        .filter_map(&env)
        .find(|token| !token.trim().is_empty());

    if let Some(token) = from_env {
        return Ok(token);
    }

    store
        .get_secret(&token_key(base_url, profile))?
        .ok_or_else(|| {
            anyhow!(
                "No token found for profile '{profile}'. Set {profile_env} or run `jira-rest auth login --profile {profile}`"
            )
        })
}

fn profile_token_env(profile: &str) -> String {
    format!(
        "JIRA_REST_TOKEN_{}",
        profile.to_uppercase().replace(['-', '.', ' '], "_")
    )
}
