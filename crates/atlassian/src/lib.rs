//! # atlasgate-atlassian
//!
//! Jira and Confluence Cloud adapters implementing the atlasgate backend
//! contract ([`IssueTracker`] and [`DocumentSpace`]).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use atlasgate_atlassian::{AtlassianClient, AtlassianResult};
//! use atlasgate_core::IssueTracker;
//!
//! # async fn example() -> AtlassianResult<()> {
//! let client = AtlassianClient::builder()
//!     .base_url("https://your-domain.atlassian.net")
//!     .email("you@example.com")
//!     .api_token("your-api-token")
//!     .build()?;
//!
//! let projects = client.jira().list_projects().await;
//! # let _ = projects;
//! # Ok(())
//! # }
//! ```
//!
//! Every failure leaving an adapter is already a
//! [`ToolError`](atlasgate_core::ToolError) with a classified kind; see
//! [`AtlassianError::kind`].
//!
//! [`IssueTracker`]: atlasgate_core::IssueTracker
//! [`DocumentSpace`]: atlasgate_core::DocumentSpace

pub mod adf;
pub mod client;
pub mod config;
pub mod confluence;
pub mod error;
pub mod jira;
pub mod transport;

pub use client::{AtlassianClient, AtlassianClientBuilder};
pub use config::AtlassianConfig;
pub use confluence::ConfluenceClient;
pub use error::{AtlassianError, AtlassianResult};
pub use jira::JiraClient;
