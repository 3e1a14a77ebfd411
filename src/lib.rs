//! Turns YouTube video and playlist URLs into normalised h-entry style
//! documents, using the YouTube Data API v3.
//!
//! ```no_run
//! use ytentry::{AttoClient, Credentials, Format, YouTube};
//!
//! # fn main() -> anyhow::Result<()> {
//! let url = "https://youtu.be/dQw4w9WgXcQ";
//! let resp = YouTube.fetch(&AttoClient::default(), url, &Credentials::new("API_KEY"))?;
//! let parsed = YouTube.parse(&resp.body, url);
//! println!("{}", serde_json::to_string_pretty(&parsed)?);
//! # Ok(())
//! # }
//! ```

#[macro_use]
extern crate serde_derive;

pub mod cli;
pub mod common;
pub mod config;
pub mod entry;
pub mod http;
pub mod resolve;
pub mod source;
pub mod youtube;

pub use common::{Credentials, Resource};
pub use entry::{Document, Parsed};
pub use http::{AttoClient, HttpClient, HttpResponse};
pub use source::base::{ErrorEnvelope, FetchError, FetchResponse, Format};
pub use source::youtube::YouTube;
