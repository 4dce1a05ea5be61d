use serde::Serialize;
use serde_json::{Map, Value};

use crate::decode::{parse_object, take_object, take_string};
use crate::error::Result;
use crate::JiraClient;

/// An issue as returned by `GET issue/<key>`.
///
/// Only `id`, `key` and `summary` are promoted; everything else the server sent
/// under `fields` is kept verbatim in `data`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub id: String,
    pub key: String,
    pub project: String,
    pub summary: String,
    pub data: Map<String, Value>,
}

impl Issue {
    /// Projects a decoded issue payload. `id`, `key` and `fields` are required;
    /// a missing or non-string `summary` leaves it empty.
    pub fn from_json(mut raw: Map<String, Value>) -> Result<Self> {
        let id = take_string(&mut raw, "id")?;
        let key = take_string(&mut raw, "key")?;
        let data = take_object(&mut raw, "fields")?;

        let summary = data
            .get("summary")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Ok(Self {
            project: project_from_key(&key),
            id,
            key,
            summary,
            data,
        })
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }
}

/// Lower-cased project prefix of an issue key (`ABC-123` -> `abc`).
///
/// A key without `-` is treated as a bare project key and lower-cased whole.
pub fn project_from_key(key: &str) -> String {
    key.split_once('-')
        .map_or(key, |(project, _)| project)
        .to_lowercase()
}

impl JiraClient {
    /// Fetches issue `key` restricted to `fields`. The field list is joined with
    /// commas and appended unescaped.
    pub async fn get_issue<S: AsRef<str>>(&self, key: &str, fields: &[S]) -> Result<Issue> {
        let fields = fields
            .iter()
            .map(AsRef::<str>::as_ref)
            .collect::<Vec<_>>()
            .join(",");

        let body = self
            .get(&format!("issue/{key}/?fields={fields}"))
            .await?;

        Issue::from_json(parse_object(&body)?)
    }
}
