use anyhow::{Context, Result};
use clap::{App, Arg, SubCommand};
use log::{debug, warn};

use crate::config::Config;
use crate::http::AttoClient;
use crate::source::base::{FetchResponse, Format};
use crate::source::youtube::YouTube;

/// Show what a URL resolves to, without any network access
fn resolve(url: &str) -> Result<()> {
    if !YouTube.matches_host(url) {
        warn!("{} is not on a YouTube host", url);
    }
    let resource = YouTube.matches(url);
    println!("{}\t{}", resource.as_str(), resource.id().unwrap_or(""));
    Ok(())
}

/// Run a fetch, printing the error envelope if it fails
fn run_fetch(url: &str) -> Result<FetchResponse> {
    debug!("Loading config");
    let cfg = Config::load()?;
    let http = AttoClient::new(cfg.timeout);

    match YouTube.fetch(&http, url, &cfg.credentials) {
        Ok(resp) => Ok(resp),
        Err(e) => {
            println!("{}", serde_json::to_string_pretty(&e.envelope())?);
            Err(anyhow::Error::new(e).context(format!("Failed to fetch {}", url)))
        }
    }
}

fn fetch(url: &str) -> Result<()> {
    let resp = run_fetch(url)?;
    println!("{}", serde_json::to_string_pretty(&resp)?);
    Ok(())
}

/// Parse a previously fetched body stored in a file
fn parse(path: &str, url: Option<&str>) -> Result<()> {
    let body =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let parsed = YouTube.parse(&body, url.unwrap_or(""));
    println!("{}", serde_json::to_string_pretty(&parsed)?);
    Ok(())
}

/// Fetch and parse in one go
fn entry(url: &str) -> Result<()> {
    let resp = run_fetch(url)?;
    let parsed = YouTube.parse(&resp.body, &resp.url);
    println!("{}", serde_json::to_string_pretty(&parsed)?);
    Ok(())
}

fn config_logging(verbosity: u64) -> Result<()> {
    // Level for this application
    let internal_level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,  // -v
        2 => log::LevelFilter::Debug, // -vv
        _ => log::LevelFilter::Trace, // -vvv
    };

    // Show log output for 3rd party library at -vvv
    let thirdparty_level = match verbosity {
        0..=2 => log::LevelFilter::Warn,
        _ => log::LevelFilter::Debug, // -vvv
    };

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(thirdparty_level)
        .level_for("ytentry", internal_level)
        .chain(std::io::stderr())
        .apply()?;

    Ok(())
}

pub fn main() -> Result<()> {
    let url_arg = || Arg::with_name("url").required(true);

    let sc_resolve = SubCommand::with_name("resolve")
        .about("show which video or playlist a URL refers to")
        .arg(url_arg());

    let sc_fetch = SubCommand::with_name("fetch")
        .about("fetch raw metadata for a URL from the YouTube API")
        .arg(url_arg());

    let sc_parse = SubCommand::with_name("parse")
        .about("normalise a body previously returned by fetch")
        .arg(Arg::with_name("file").required(true))
        .arg(Arg::with_name("url"));

    let sc_entry = SubCommand::with_name("entry")
        .about("fetch a URL and print the normalised entry")
        .arg(url_arg());

    // Main command
    let app = App::new("ytentry")
        .subcommand(sc_resolve)
        .subcommand(sc_fetch)
        .subcommand(sc_parse)
        .subcommand(sc_entry)
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .takes_value(false)
                .global(true),
        );

    // Parse
    let app_m = app.get_matches();

    // Logging levels
    let verbosity = app_m.occurrences_of("verbose");
    config_logging(verbosity)?;

    match app_m.subcommand() {
        ("resolve", Some(sub_m)) => resolve(sub_m.value_of("url").expect("required arg url missing"))?,
        ("fetch", Some(sub_m)) => fetch(sub_m.value_of("url").expect("required arg url missing"))?,
        ("parse", Some(sub_m)) => parse(
            sub_m.value_of("file").expect("required arg file missing"),
            sub_m.value_of("url"),
        )?,
        ("entry", Some(sub_m)) => entry(sub_m.value_of("url").expect("required arg url missing"))?,
        _ => {
            return Err(anyhow::anyhow!("Unhandled subcommand"));
        }
    };

    Ok(())
}
