//! Request command implementation.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Args;
use colored::Colorize;

use refetch_core::BaseUrl;
use refetch_http::{AuthClient, Method, Part, RequestOptions, Response};

use crate::notify::TermNotifier;
use crate::output;

use super::session_store;

#[derive(Args, Debug)]
pub struct RequestArgs {
    /// HTTP method (GET, POST, PUT, PATCH, DELETE, ...)
    pub method: String,

    /// Request target: a path relative to the base URL, or an absolute URL
    pub target: String,

    /// Base URL of the API
    #[arg(long)]
    pub base: String,

    /// Extra header, as 'Name: value' (repeatable, overrides defaults)
    #[arg(short = 'H', long = "header")]
    pub headers: Vec<String>,

    /// JSON request body
    #[arg(long)]
    pub json: Option<String>,

    /// Multipart form field, as 'name=value' or 'name=@path' (repeatable)
    #[arg(short = 'F', long = "form")]
    pub form: Vec<String>,
}

pub async fn run(args: RequestArgs) -> Result<()> {
    let base = BaseUrl::new(&args.base).context("Invalid base URL")?;
    let method: Method = args
        .method
        .to_uppercase()
        .parse()
        .context("Invalid HTTP method")?;

    let mut options = RequestOptions::new();
    for raw in &args.headers {
        let (name, value) = parse_header(raw)?;
        options = options.header(name, value)?;
    }

    if args.json.is_some() && !args.form.is_empty() {
        bail!("--json and --form are mutually exclusive");
    }
    if let Some(json) = &args.json {
        let value = serde_json::from_str(json).context("Invalid JSON body")?;
        options = options.json(value);
    } else if !args.form.is_empty() {
        let parts = args
            .form
            .iter()
            .map(|raw| parse_form_field(raw))
            .collect::<Result<Vec<_>>>()?;
        options = options.multipart(parts);
    }

    let store = Arc::new(session_store()?);
    let client = AuthClient::with_notifier(base, store, Arc::new(TermNotifier));

    tracing::debug!(method = %method, target = %args.target, "sending request");

    let response = client.execute(method, &args.target, options).await?;
    print_response(response).await
}

/// Parse a 'Name: value' header argument.
fn parse_header(raw: &str) -> Result<(&str, &str)> {
    let (name, value) = raw
        .split_once(':')
        .with_context(|| format!("Invalid header '{}', expected 'Name: value'", raw))?;
    Ok((name.trim(), value.trim()))
}

/// Parse a 'name=value' or 'name=@path' form field argument.
fn parse_form_field(raw: &str) -> Result<Part> {
    let (name, value) = raw
        .split_once('=')
        .with_context(|| format!("Invalid form field '{}', expected 'name=value'", raw))?;

    if let Some(path) = value.strip_prefix('@') {
        let data =
            std::fs::read(path).with_context(|| format!("Failed to read file '{}'", path))?;
        let filename = Path::new(path)
            .file_name()
            .map(|f| f.to_string_lossy().into_owned());
        let mut part = Part::bytes(name, data);
        if let Some(filename) = filename {
            part = part.file_name(filename);
        }
        Ok(part)
    } else {
        Ok(Part::text(name, value))
    }
}

async fn print_response(response: Response) -> Result<()> {
    let status = response.status();
    let status_str = status.to_string();
    let colored_status = if status.is_success() {
        status_str.green()
    } else if status.is_server_error() {
        status_str.red()
    } else {
        status_str.yellow()
    };
    eprintln!("{}", colored_status);

    let text = response.text().await.context("Failed to read body")?;
    if text.is_empty() {
        return Ok(());
    }
    match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(value) => output::json_pretty(&value)?,
        Err(_) => println!("{}", text),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_parsing_trims_whitespace() {
        let (name, value) = parse_header("X-Client:  cli  ").unwrap();
        assert_eq!(name, "X-Client");
        assert_eq!(value, "cli");
    }

    #[test]
    fn header_without_colon_is_rejected() {
        assert!(parse_header("not-a-header").is_err());
    }

    #[test]
    fn form_field_text() {
        let part = parse_form_field("title=hello").unwrap();
        assert!(format!("{:?}", part).contains("hello"));
    }

    #[test]
    fn form_field_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("payload.bin");
        std::fs::write(&path, b"data").unwrap();

        let raw = format!("file=@{}", path.display());
        let part = parse_form_field(&raw).unwrap();
        assert!(format!("{:?}", part).contains("payload.bin"));
    }

    #[test]
    fn form_field_without_equals_is_rejected() {
        assert!(parse_form_field("oops").is_err());
    }
}
