use anyhow::{Context, Result};
use jira_rest_api::JiraClient;
use jira_rest_output::{OutputFormat, OutputRenderer};
use serde::Serialize;

#[derive(Serialize)]
struct ProjectView<'a> {
    key: &'a str,
    name: &'a str,
}

pub async fn title(client: &JiraClient, renderer: &OutputRenderer, key: &str) -> Result<()> {
    let name = client
        .get_project_title(key)
        .await
        .with_context(|| format!("Failed to fetch project {key}"))?;

    match renderer.format() {
        OutputFormat::Quiet => renderer.render(&name),
        _ => renderer.render(&ProjectView { key, name: &name }),
    }
}
