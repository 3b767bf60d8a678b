//! Referral Console - Campaign Configuration Editor
//!
//! Referral Console is a desktop application for editing the referral
//! campaign configuration JSON of mobile apps and synchronizing it with
//! the config store that serves the apps. The heavy lifting is a
//! schema-less form editor over arbitrary nested JSON plus an optimistic
//! dirty-state flow between the working copy and the store.
//!
//! # Core Features
//!
//! - **Form editor for arbitrary JSON**: field widgets inferred from the
//!   structure of the config tree, no schema required
//! - **Dirty-state reconciliation**: original/current snapshots, explicit
//!   save and discard, and a navigation guard against losing edits
//! - **Tab projection**: well-known campaign sections in a canonical
//!   order, with synthesized App Details and Image tabs
//! - **Raw JSON mode**: per-tab JSON editing with validation at the
//!   boundary
//! - **Generation integration**: per-tab content regeneration and
//!   fire-and-forget translation requests
//!
//! # Architecture Overview
//!
//! The application follows a layered architecture:
//!
//! - **UI Layer** ([`app::consoleui`]): egui-based desktop interface with
//!   window management
//! - **Business Logic** ([`app`]): tree editing, reconciliation, and tab
//!   projection
//! - **Collaborators**: config store, generation service, and identity
//!   provider behind traits, called from worker threads
//!
//! The main entry point is [`ConsoleApp`], which coordinates the panels,
//! windows, and background work.

#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub use app::ConsoleApp;
