//! Content-retrieval adapters.
//!
//! Every adapter takes an explicit [`HttpClient`] (or, for YouTube, shells
//! out to yt-dlp) and returns a `snatch_model` value or an
//! [`snatch_model::AcquireError`].

pub mod client;
pub mod languages;
pub mod normalize;
pub mod quotes;
pub mod session;
pub mod spotify;
pub mod tiktok;
pub mod translate;
pub mod types;
pub mod youtube;

pub use client::{ClientConfig, HttpClient};
