//! A Rust client for the Stratus imagery API.
//!
//! This crate wraps the Stratus REST endpoints for scenes, mosaics, and
//! areas of interest behind a small async request pipeline: request
//! normalization (URL resolution, query merging, header composition, JSON or
//! multipart body encoding), dispatch with explicit redirect handling and
//! cooperative cancellation, typed error classification, and cursor-based
//! pagination over list endpoints.
//!
//! ## Quick start
//! - Configure authentication via environment variables (`STRATUS_API_URL`,
//!   `STRATUS_API_KEY`) or a `.stratusrc` file (supported in the current
//!   directory and in your home directory).
//! - Call the resource helpers in [`scenes`], [`mosaics`], or [`aois`], or
//!   issue raw requests through [`Client::request`].
//!
//! ```no_run
//! use stratusapi::{Client, Result, scenes};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = Client::from_env()?;
//!
//!     let mut page = scenes::find(&client, "ortho", &[("limit", "10")]).await?;
//!     loop {
//!         for scene in page.items() {
//!             println!("{}", scene.id);
//!         }
//!         match page.fetch_next() {
//!             Some(next) => page = next.await?,
//!             None => break,
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! For full usage and configuration details, see the crate README.

#![forbid(unsafe_code)]

pub mod aois;
mod auth;
mod cancel;
mod client;
mod config;
mod error;
pub mod mosaics;
mod multipart;
mod page;
mod request;
pub mod scenes;
mod urls;

pub use auth::AuthStore;
pub use cancel::CancelHandle;
pub use client::{Client, ResponseEnvelope};
pub use config::ClientConfig;
pub use error::{Error, ResponseDetails, Result};
pub use page::Page;
pub use request::{FilePayload, RequestConfig};
