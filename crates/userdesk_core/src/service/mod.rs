//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate the remote source and override persistence into the
//!   session-authoritative merged view.
//! - Keep UI layers decoupled from transport and storage details.

pub mod user_store;
