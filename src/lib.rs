//! TableRonde API - backend for board-game meetups
//!
//! This crate provides the REST API for TableRonde:
//! - Session creation with free-text game lists and a coarse location key
//! - RSVPs with soft capacity (over-subscription is allowed)
//! - Per-session message threads
//! - Passwordless sign-in links and user profiles

pub mod auth;
pub mod config;
pub mod db;
pub mod dto;
pub mod entities;
pub mod error;
pub mod extract;
pub mod mail;
pub mod rate_limit;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
pub mod validation;
