//! Decision strategies
//!
//! One capability interface, [`DecisionEngine`], with the rule-based
//! Ichimoku implementation living here; the LLM-backed implementation
//! lives with the bot's I/O clients and hides behind the same trait.

pub mod base;
pub mod ichimoku;

pub use base::DecisionEngine;
pub use ichimoku::IchimokuStrategy;
