//! Country-bound agent: memory, history, capability bindings and the
//! session manager that ties them together.

pub mod agent;
pub mod bindings;
pub mod history;
pub mod memory;
pub mod session;

pub use agent::Agent;
pub use bindings::{CapabilityBindings, ConfiguredBindings, FixedBindings};
pub use history::{HistoryEntry, HistoryStore};
pub use memory::{Conversation, ConversationMemory};
pub use session::{AgentSessionManager, AskMode, SessionOptions, SessionPhase};
