//! Integreat: an immigration research assistant.
//!
//! A single conversational agent is bound to the destination country the
//! user picked. Changing the country rebuilds the agent's persona while its
//! conversation memory carries over; questions are answered by an OpenAI chat
//! model that can search the web through SerpApi.
//!
//! # Quick Start
//!
//! ```no_run
//! use integreat::prelude::*;
//!
//! # async fn example() -> integreat::error::Result<()> {
//! let config = IntegreatConfig::load(None)?;
//! let session = AgentSessionManager::from_config(&config).await?;
//!
//! let answer = session.ask("What visa do I need?", AskMode::Direct).await?;
//! println!("{answer}");
//!
//! session.reinitialize("Germany").await?;
//! for entry in session.history() {
//!     println!("#{} {} -> {}", entry.sequence_index, entry.query, entry.response);
//! }
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod config;
pub mod countries;
pub mod error;
pub mod generation;
pub mod persona;
pub mod prelude;
pub mod provider;
pub mod tools;
pub mod types;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
