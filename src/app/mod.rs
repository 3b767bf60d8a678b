//! Core application modules for the referral config console.
//!
//! This module contains the business logic and data models for editing
//! referral-campaign configuration and synchronizing it with the config
//! store.
//!
//! # Module Organization
//!
//! ## Config editing
//! - [`config_tree`] - Paths, field classification, and pure tree edits
//! - [`reconciler`] - Original/current snapshots and the save lifecycle
//! - [`tab_projection`] - Canonical tab ordering with pseudo-tabs
//!
//! ## Collaborators
//! - [`config_store`] - App records and config persistence contract
//! - [`generation`] - Content regeneration and translation service
//! - [`identity`] - Signed-in user state
//!
//! ## UI and Infrastructure
//! - [`consoleui`] - Complete user interface implementation
//! - [`notifications`] - Notification system for user feedback
//! - [`config_cache`] - Keyed cache for fetched config trees
//! - [`settings`] - Endpoint configuration on disk

pub mod apps;
pub mod config_cache;
pub mod config_store;
pub mod config_tree;
pub mod consoleui;
pub mod generation;
pub mod identity;
pub mod json_syntax;
pub mod notifications;
pub mod reconciler;
pub mod settings;
pub mod tab_projection;

pub use consoleui::app::ConsoleApp;
