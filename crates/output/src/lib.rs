use std::collections::BTreeSet;
use std::io::{self, Write};

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;
use serde_json::Value;
use tabled::builder::Builder;
use tabled::settings::Style;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Yaml,
    Quiet,
}

pub struct OutputRenderer {
    format: OutputFormat,
}

impl OutputRenderer {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn render<T: Serialize>(&self, value: &T) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.render_to(&mut out, value)
    }

    pub fn render_to<W: Write, T: Serialize>(&self, out: &mut W, value: &T) -> Result<()> {
        let json_value = serde_json::to_value(value)?;

        match self.format {
            OutputFormat::Table => match Self::table(&json_value) {
                Some(table) => writeln!(out, "{table}")?,
                None => writeln!(out, "{}", serde_json::to_string_pretty(&json_value)?)?,
            },
            OutputFormat::Json => {
                writeln!(out, "{}", serde_json::to_string_pretty(&json_value)?)?;
            }
            OutputFormat::Yaml => {
                write!(out, "{}", serde_yaml::to_string(&json_value)?)?;
            }
            OutputFormat::Quiet => {
                for line in Self::quiet_lines(&json_value) {
                    writeln!(out, "{line}")?;
                }
            }
        }

        Ok(())
    }

    /// Prints a confirmation line. Suppressed in quiet mode.
    pub fn success(&self, message: &str) {
        if self.format != OutputFormat::Quiet {
            println!("{} {}", "✓".green().bold(), message);
        }
    }

    fn table(value: &Value) -> Option<String> {
        let (headers, rows) = match value {
            Value::Object(obj) if !obj.is_empty() => Self::field_rows(obj),
            _ => Self::coerce_rows(value)?,
        };

        let mut builder = Builder::default();
        builder.push_record(headers);
        for row in rows {
            builder.push_record(row);
        }

        Some(builder.build().with(Style::rounded()).to_string())
    }

    /// Single object: one `field | value` row per key, in key order.
    fn field_rows(obj: &serde_json::Map<String, Value>) -> (Vec<String>, Vec<Vec<String>>) {
        let rows = obj
            .iter()
            .map(|(key, value)| vec![key.clone(), Self::value_to_string(value)])
            .collect();
        (vec!["field".to_string(), "value".to_string()], rows)
    }

    fn coerce_rows(value: &Value) -> Option<(Vec<String>, Vec<Vec<String>>)> {
        let rows = match value {
            Value::Array(rows) if !rows.is_empty() => rows,
            _ => return None,
        };

        let mut headers = BTreeSet::new();
        for row in rows {
            if let Value::Object(obj) = row {
                headers.extend(obj.keys().cloned());
            }
        }

        if headers.is_empty() {
            return None;
        }

        let headers: Vec<String> = headers.into_iter().collect();
        let data = rows
            .iter()
            .filter_map(Value::as_object)
            .map(|obj| {
                headers
                    .iter()
                    .map(|header| obj.get(header).map(Self::value_to_string).unwrap_or_default())
                    .collect()
            })
            .collect();

        Some((headers, data))
    }

    /// Issue keys first, then ids, then bare primitives.
    fn quiet_lines(value: &Value) -> Vec<String> {
        match value {
            Value::Array(rows) => rows.iter().flat_map(Self::quiet_lines).collect(),
            Value::Object(obj) => ["key", "id"]
                .iter()
                .find_map(|name| obj.get(*name).and_then(Value::as_str))
                .map(|s| vec![s.to_string()])
                .unwrap_or_default(),
            Value::Null => Vec::new(),
            other => vec![Self::value_to_string(other)],
        }
    }

    fn value_to_string(value: &Value) -> String {
        match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => String::new(),
            other => serde_json::to_string(other).unwrap_or_default(),
        }
    }
}
