//! Genius Client Library
//!
//! A Rust client for the Product Genius recommendation and content API.
//! Covers project creation, item and policy management, model training and
//! activation, and feed/batch retrieval.
//!
//! # Features
//!
//! - **Two-phase credentials**: bootstrap with a username and password,
//!   then work with the project's session token
//! - **Session persistence**: the token is saved to `token.json` and can be
//!   reloaded later
//! - **Local validation**: records are checked for required keys before any
//!   request is sent
//! - **Both API generations**: current policy routes and legacy instruction
//!   routes side by side
//! - **Observability**: `tracing` spans on every operation
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use genius_client::{FeedQuery, GeniusClient, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GeniusClient::from_session(Session::load("genius_project/token.json")?)?;
//!
//!     let feed = client.data().feed(&FeedQuery::default(), None).await?;
//!     println!("{feed}");
//!     Ok(())
//! }
//! ```
//!
//! # Creating a Project
//!
//! ```rust,no_run
//! use genius_client::{BasicCredentials, GeniusClient, ProjectDescriptor};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = GeniusClient::from_bootstrap(
//!         BasicCredentials::new("username", "password"),
//!         ProjectDescriptor::new("my_project", "A catalogue of chairs", "me@example.com"),
//!     )?;
//!
//!     let report = client
//!         .provision(
//!             vec![json!({
//!                 "title": "Chair",
//!                 "description": "Four legs",
//!                 "external_url": "https://example.com/chair",
//!                 "image_url": "https://example.com/chair.png"
//!             })],
//!             vec![json!({"policy": "Recommend seating first"})],
//!         )
//!         .await?;
//!     println!("{:?}", report.training);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod observability;
pub mod services;
pub mod session;
pub mod transport;
pub mod types;
pub mod validation;

// Re-exports for convenience
pub use client::{GeniusClient, GeniusClientBuilder, ProvisionOptions, ProvisionReport};
pub use config::GeniusConfig;
pub use errors::{GeniusError, GeniusResult};
pub use session::{FileSessionStore, SessionStore};

// Type re-exports
pub use types::credentials::{BasicCredentials, ProjectDescriptor, Session};
pub use types::feed::{FeedQuery, Pagination};
pub use types::records::RecordSource;
pub use validation::{validate_instructions, validate_items, validate_policies};

/// Mock implementations for testing.
pub mod mocks;
