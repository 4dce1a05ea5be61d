use std::io::{self, Read};

use anyhow::{Context, Result};
use clap::Args;
use jira_rest_api::{Issue, JiraClient};
use jira_rest_output::{OutputFormat, OutputRenderer};
use serde_json::{Map, Value};

#[derive(Args, Debug, Clone)]
pub struct IssueArgs {
    /// Issue key (e.g. ABC-123)
    pub key: String,

    /// Comma-separated list of fields to request
    #[arg(long, value_delimiter = ',', default_value = "summary")]
    pub fields: Vec<String>,
}

#[derive(Args, Debug, Clone)]
pub struct CommentArgs {
    /// Issue key (e.g. ABC-123)
    pub key: String,

    /// Comment text; `-` reads it from stdin
    pub message: String,
}

pub async fn show(client: &JiraClient, renderer: &OutputRenderer, args: IssueArgs) -> Result<()> {
    let issue = client
        .get_issue(&args.key, args.fields.as_slice())
        .await
        .with_context(|| format!("Failed to fetch issue {}", args.key))?;

    match renderer.format() {
        OutputFormat::Table => renderer.render(&issue_view(&issue)),
        _ => renderer.render(&issue),
    }
}

pub async fn comment(
    client: &JiraClient,
    renderer: &OutputRenderer,
    args: CommentArgs,
) -> Result<()> {
    let message = if args.message == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read comment from stdin")?;
        buf
    } else {
        args.message
    };

    client
        .comment(&args.key, &message)
        .await
        .with_context(|| format!("Failed to add comment to {}", args.key))?;

    tracing::info!(key = %args.key, "Comment added");
    renderer.success(&format!("Added comment to {}", args.key));
    Ok(())
}

/// Flat view for table output: promoted fields first, then whatever else the
/// server returned under `fields`.
fn issue_view(issue: &Issue) -> Map<String, Value> {
    let mut view = Map::new();
    view.insert("id".to_string(), Value::String(issue.id.clone()));
    view.insert("key".to_string(), Value::String(issue.key.clone()));
    view.insert("project".to_string(), Value::String(issue.project.clone()));
    view.insert("summary".to_string(), Value::String(issue.summary.clone()));

    for (name, value) in &issue.data {
        view.entry(name.clone()).or_insert_with(|| value.clone());
    }
    view
}
