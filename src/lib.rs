//! lakefront library
//!
//! This library provides the core functionality for the lakefront site
//! server: the blob-store listing client, the media classifier, and the
//! HTTP server that exposes the listing API and the promotional page.

pub mod blobstore;
pub mod cli;
pub mod config;
pub mod logging;
pub mod media;
pub mod server;
pub mod site;
