use crate::decode::{parse_object, take_string};
use crate::error::Result;
use crate::JiraClient;

impl JiraClient {
    /// Returns the display name of project `key`.
    pub async fn get_project_title(&self, key: &str) -> Result<String> {
        let body = self.get(&format!("project/{key}")).await?;
        let mut project = parse_object(&body)?;
        take_string(&mut project, "name")
    }
}
