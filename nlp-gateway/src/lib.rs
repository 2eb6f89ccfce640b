//! HTTP gateway for natural-language operations backed by Gemini.
//!
//! Handlers take an injected [`services::NlpBackend`] from [`startup::AppState`];
//! the backend is either the live Gemini adapter or the deterministic mock,
//! chosen once at startup.

pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
