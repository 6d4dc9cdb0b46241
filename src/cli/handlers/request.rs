//! Request command handler
//!
//! Turns a verb subcommand into client calls and prints every result
//! envelope as pretty JSON.

use std::io::Write;
use std::time::Duration;

use anyhow::Context;
use serde::Serialize;
use serde_json::Value;

use crate::cli::parser::{BodyArgs, Commands, RequestArgs};
use crate::client::{
    Body, CacheFetcher, HeadResult, MutationResult, OptionsResult, QueryResult, RequestOptions,
    content_type,
};
use crate::transport::FormData;

/// Any of the four envelope shapes
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Envelope {
    Query(QueryResult),
    Mutation(MutationResult),
    Head(HeadResult),
    Options(OptionsResult),
}

impl Envelope {
    pub fn is_error(&self) -> bool {
        match self {
            Envelope::Query(result) => result.is_error,
            Envelope::Mutation(result) => result.is_error,
            Envelope::Head(result) => result.is_error,
            Envelope::Options(result) => result.is_error,
        }
    }
}

/// Handler for the verb subcommands
pub struct RequestCommandHandler {
    fetcher: CacheFetcher,
    default_content_type: String,
}

impl RequestCommandHandler {
    pub fn new(fetcher: CacheFetcher, default_content_type: impl Into<String>) -> Self {
        Self {
            fetcher,
            default_content_type: default_content_type.into(),
        }
    }

    /// Run the command `--repeat` times, writing each envelope to `out`.
    ///
    /// Returns whether the last envelope reported an error.
    pub async fn execute<W: Write>(&self, command: &Commands, out: &mut W) -> anyhow::Result<bool> {
        let args = command.request();
        let options = request_options(args);

        let mut last_is_error = false;
        for attempt in 1..=args.repeat {
            tracing::debug!(
                method = %command.method(),
                url = %args.url,
                attempt,
                "Executing request"
            );

            let envelope = self.dispatch(command, &options).await?;
            last_is_error = envelope.is_error();

            serde_json::to_writer_pretty(&mut *out, &envelope)
                .context("Failed to write result envelope")?;
            writeln!(out)?;
        }

        Ok(last_is_error)
    }

    async fn dispatch(&self, command: &Commands, options: &RequestOptions) -> anyhow::Result<Envelope> {
        let fetcher = &self.fetcher;
        let envelope = match command {
            Commands::Get(args) => Envelope::Query(fetcher.get(&args.url, options).await),
            Commands::Delete(args) => Envelope::Mutation(fetcher.delete(&args.url, options).await),
            Commands::Head(args) => Envelope::Head(fetcher.head(&args.url, options).await),
            Commands::Options(args) => Envelope::Options(fetcher.options(&args.url, options).await),
            Commands::Post(args) => {
                let (body, content_type) = self.body_for(args)?;
                Envelope::Mutation(fetcher.post(&args.request.url, body, &content_type, options).await)
            }
            Commands::Put(args) => {
                let (body, content_type) = self.body_for(args)?;
                Envelope::Mutation(fetcher.put(&args.request.url, body, &content_type, options).await)
            }
            Commands::Patch(args) => {
                let (body, content_type) = self.body_for(args)?;
                Envelope::Mutation(fetcher.patch(&args.request.url, body, &content_type, options).await)
            }
        };
        Ok(envelope)
    }

    fn body_for(&self, args: &BodyArgs) -> anyhow::Result<(Body, String)> {
        let content_type = args
            .content_type
            .clone()
            .unwrap_or_else(|| self.default_content_type.clone());
        let body = match &args.data {
            Some(data) => build_body(&read_data(data)?, &content_type),
            None => Body::Empty,
        };
        Ok((body, content_type))
    }
}

fn request_options(args: &RequestArgs) -> RequestOptions {
    RequestOptions {
        headers: args.headers.clone(),
        timeout: args.timeout.map(Duration::from_secs),
    }
}

/// `@path` reads the body from a file, anything else is the body itself
fn read_data(data: &str) -> anyhow::Result<String> {
    match data.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read request body from '{}'", path)),
        None => Ok(data.to_string()),
    }
}

/// Shape command-line text into the body the content type expects
pub(crate) fn build_body(data: &str, content_type: &str) -> Body {
    let content_type = content_type.trim();

    if content_type.eq_ignore_ascii_case(content_type::JSON) {
        match serde_json::from_str::<Value>(data) {
            Ok(value) => Body::Json(value),
            Err(_) => Body::Text(data.to_string()),
        }
    } else if content_type.eq_ignore_ascii_case(content_type::MULTIPART) {
        let form = url::form_urlencoded::parse(data.trim().as_bytes())
            .fold(FormData::new(), |form, (name, value)| form.text(name, value));
        Body::Form(form)
    } else {
        Body::Text(data.to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use clap::Parser;
    use http::Method;
    use serde_json::json;

    use super::*;
    use crate::cli::parser::Cli;
    use crate::transport::RequestBody;
    use crate::transport::scripted::{ScriptedTransport, json_ok, text_ok};

    const URL: &str = "https://api.test/todos/1";

    fn handler() -> (Arc<ScriptedTransport>, RequestCommandHandler) {
        let transport = Arc::new(ScriptedTransport::new());
        let fetcher = CacheFetcher::with_memory_cache(transport.clone());
        (transport, RequestCommandHandler::new(fetcher, content_type::JSON))
    }

    fn command(args: &[&str]) -> Commands {
        let argv = std::iter::once("cache-fetcher").chain(args.iter().copied());
        Cli::try_parse_from(argv).unwrap().command
    }

    /// Split the concatenated pretty-printed envelopes
    fn envelopes(out: &[u8]) -> Vec<Value> {
        serde_json::Deserializer::from_slice(out)
            .into_iter::<Value>()
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_prints_envelope() {
        let (transport, handler) = handler();
        transport.on(Method::GET, URL, json_ok(r#"{"id":1}"#));
        let mut out = Vec::new();

        let is_error = handler.execute(&command(&["get", URL]), &mut out).await.unwrap();

        assert!(!is_error);
        let printed = envelopes(&out);
        assert_eq!(printed.len(), 1);
        assert_eq!(
            printed[0],
            json!({ "data": { "id": 1 }, "isLoading": false, "isError": false, "error": null })
        );
    }

    #[tokio::test]
    async fn test_repeat_hits_cache() {
        let (transport, handler) = handler();
        transport.on(Method::GET, URL, json_ok(r#"{"id":1}"#));
        let mut out = Vec::new();

        handler
            .execute(&command(&["get", URL, "--repeat", "3"]), &mut out)
            .await
            .unwrap();

        assert_eq!(envelopes(&out).len(), 3);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_error_envelope_sets_flag() {
        let (_transport, handler) = handler();
        let mut out = Vec::new();

        let is_error = handler.execute(&command(&["get", URL]), &mut out).await.unwrap();

        assert!(is_error);
        let printed = envelopes(&out);
        assert_eq!(printed[0]["isError"], true);
        assert_eq!(printed[0]["error"]["status"], 404);
        assert_eq!(printed[0]["error"]["message"], "Not Found");
    }

    #[tokio::test]
    async fn test_post_uses_default_content_type() {
        let (transport, handler) = handler();
        transport.on(Method::POST, URL, json_ok(r#"{"ok":true}"#));
        let mut out = Vec::new();

        handler
            .execute(&command(&["post", URL, "--data", r#"{"title":"x"}"#]), &mut out)
            .await
            .unwrap();

        let request = transport.last_request();
        assert_eq!(request.headers["content-type"], "application/json");
        assert_eq!(request.body, Some(RequestBody::Bytes(br#"{"title":"x"}"#.to_vec())));
        assert_eq!(envelopes(&out)[0]["data"], json!({ "ok": true }));
    }

    #[tokio::test]
    async fn test_headers_and_timeout_are_forwarded() {
        let (transport, handler) = handler();
        transport.on(Method::HEAD, URL, text_ok(""));
        let mut out = Vec::new();

        handler
            .execute(
                &command(&["head", URL, "-H", "X-Trace: 1", "--timeout", "7"]),
                &mut out,
            )
            .await
            .unwrap();

        let request = transport.last_request();
        assert_eq!(request.headers["x-trace"], "1");
        assert_eq!(request.timeout, Some(Duration::from_secs(7)));
        assert_eq!(envelopes(&out)[0]["status"], 200);
    }

    #[tokio::test]
    async fn test_data_from_file() {
        let (transport, handler) = handler();
        transport.on(Method::PUT, URL, text_ok("ok"));
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "a=1&b=two").unwrap();
        let data = format!("@{}", file.path().display());
        let mut out = Vec::new();

        handler
            .execute(
                &command(&[
                    "put",
                    URL,
                    "--data",
                    &data,
                    "--content-type",
                    content_type::FORM_URLENCODED,
                ]),
                &mut out,
            )
            .await
            .unwrap();

        assert_eq!(
            transport.last_request().body,
            Some(RequestBody::Bytes(b"a=1&b=two".to_vec()))
        );
    }

    #[tokio::test]
    async fn test_missing_data_file_is_an_error() {
        let (transport, handler) = handler();
        let mut out = Vec::new();

        let result = handler
            .execute(&command(&["patch", URL, "--data", "@/no/such/file"]), &mut out)
            .await;

        assert!(result.is_err());
        assert_eq!(transport.calls(), 0);
    }

    #[test]
    fn test_build_body() {
        assert_eq!(build_body(r#"{"a":1}"#, content_type::JSON), Body::Json(json!({ "a": 1 })));
        assert_eq!(build_body("plain", content_type::JSON), Body::Text("plain".to_string()));
        assert_eq!(
            build_body("a=1&b=2", content_type::MULTIPART),
            Body::Form(FormData::new().text("a", "1").text("b", "2"))
        );
        assert_eq!(build_body("<x/>", "application/xml"), Body::Text("<x/>".to_string()));
    }
}
