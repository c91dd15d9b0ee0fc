// Output formatting for CLI

use anyhow::Result;
use serde::Serialize;
use std::io::Write;

use crate::cli::config::OutputFormat;

/// Format and output records
pub struct OutputFormatter {
    format: OutputFormat,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self { format, quiet }
    }

    /// Output one record
    pub fn output<T, W>(&self, record: &T, writer: &mut W) -> Result<()>
    where
        T: Serialize + ?Sized,
        W: Write + ?Sized,
    {
        if self.quiet {
            return Ok(());
        }
        let value = serde_json::to_value(record)?;
        match self.format {
            OutputFormat::Pretty => {
                writeln!(writer, "{}", serde_json::to_string_pretty(&value)?)?;
            }
            OutputFormat::Json => {
                writeln!(writer, "{}", serde_json::to_string(&value)?)?;
            }
            OutputFormat::KeyValue => {
                self.output_key_value(&value, writer)?;
                writeln!(writer)?;
            }
        }
        Ok(())
    }

    /// Output as key-value pairs
    fn output_key_value<W: Write + ?Sized>(&self, value: &serde_json::Value, writer: &mut W) -> Result<()> {
        if let Some(obj) = value.as_object() {
            for (key, value) in obj {
                writeln!(writer, "{}: {}", key, format_value(value))?;
            }
        } else {
            writeln!(writer, "{}", format_value(value))?;
        }
        Ok(())
    }

    /// Print error message
    pub fn print_error(&self, message: &str) {
        eprintln!("✗ {}", message);
    }

    /// Print info message
    pub fn print_info(&self, message: &str) {
        if !self.quiet {
            eprintln!("  {}", message);
        }
    }
}

/// Format a JSON value for display
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => "(null)".to_string(),
        serde_json::Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            format!("[{}]", items.join(", "))
        }
        other => other.to_string(),
    }
}
