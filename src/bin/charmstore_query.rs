//! Query a fixture-seeded fake charm store from the shell.
//!
//! Loads a repository fixture, optionally switches the active channel, runs a
//! single lookup and prints the answer as one JSON object on stdout. Misses
//! and bad arguments go to stderr with exit status 1.

use anyhow::{Context, Result, bail};
use charmstore_fake::{Channel, CharmUrl, Repository, load_fixture_from_path};
use serde_json::{Value, json};
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse(env::args_os().skip(1))?;
    let mut repo = load_fixture_from_path(&cli.fixture)?;
    if let Some(channel) = cli.channel {
        repo.set_channel(channel);
    }
    let output = answer(&repo, &cli.query)?;
    println!("{}", serde_json::to_string(&output)?);
    Ok(())
}

#[derive(Debug)]
struct Cli {
    fixture: PathBuf,
    channel: Option<Channel>,
    query: Query,
}

#[derive(Debug)]
enum Query {
    Resolve(CharmUrl),
    Charm(CharmUrl),
    Bundle(CharmUrl),
    Resources(CharmUrl),
    Blob(String),
}

impl Cli {
    fn parse(args: impl IntoIterator<Item = OsString>) -> Result<Self> {
        let mut fixture = None;
        let mut channel = None;
        let mut positional: Vec<String> = Vec::new();

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let arg = arg
                .into_string()
                .map_err(|_| anyhow::anyhow!("Invalid UTF-8 in argument"))?;
            match arg.as_str() {
                "--fixture" | "-f" => {
                    let value = args.next().context("--fixture requires a path")?;
                    fixture = Some(PathBuf::from(value));
                }
                "--channel" | "-c" => {
                    let value = args
                        .next()
                        .and_then(|v| v.into_string().ok())
                        .context("--channel requires a name")?;
                    channel = Some(value.parse::<Channel>()?);
                }
                "--help" | "-h" => usage(0),
                other if other.starts_with('-') => bail!("unknown flag {other}"),
                _ => positional.push(arg),
            }
        }

        let Some(fixture) = fixture else {
            usage(1);
        };
        let [command, target] = positional.as_slice() else {
            usage(1);
        };

        let query = match command.as_str() {
            "resolve" => Query::Resolve(target.parse()?),
            "charm" => Query::Charm(target.parse()?),
            "bundle" => Query::Bundle(target.parse()?),
            "resources" => Query::Resources(target.parse()?),
            "blob" => Query::Blob(target.clone()),
            other => bail!("unknown command {other}"),
        };

        Ok(Self {
            fixture,
            channel,
            query,
        })
    }
}

fn answer(repo: &Repository, query: &Query) -> Result<Value> {
    let value = match query {
        Query::Resolve(url) => {
            let (resolved, channel, series) = repo.resolve_with_channel(url);
            json!({
                "url": resolved,
                "channel": channel,
                "supported_series": series,
            })
        }
        Query::Charm(url) => {
            let charm = repo.get(url)?;
            json!({
                "url": url,
                "resolved": repo.resolve(url).0,
                "charm": charm,
            })
        }
        Query::Bundle(url) => json!({
            "url": url,
            "bundle": repo.get_bundle(url)?,
        }),
        Query::Resources(url) => json!({
            "url": url,
            "resources": repo.resources(url)?,
        }),
        Query::Blob(path) => blob_answer(path, repo.blobs().get(path)?),
    };
    Ok(value)
}

/// Raw bytes always go out as `bytes`; `text` is added only when they are
/// valid UTF-8, so nothing is lost or replaced.
fn blob_answer(path: &str, data: &[u8]) -> Value {
    let mut value = json!({
        "path": path,
        "size": data.len(),
        "bytes": data,
    });
    if let Ok(text) = std::str::from_utf8(data) {
        value["text"] = Value::from(text);
    }
    value
}

fn usage(code: i32) -> ! {
    eprintln!(
        "Usage: charmstore-query --fixture PATH [--channel NAME] COMMAND ARG\n\nCommands:\n  resolve URL     Resolve URL to a concrete revision.\n  charm URL       Print the charm stored at the resolved URL.\n  bundle URL      Print the bundle stored at exactly URL.\n  resources URL   Print the resource list stored at URL.\n  blob PATH       Print a raw blob as bytes, plus text when it is UTF-8.\n\nChannels: stable (default), candidate, beta, edge, unpublished."
    );
    std::process::exit(code);
}
