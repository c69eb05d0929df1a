//! Reshow Core - Shared domain library.
//!
//! This crate provides the domain types and rules used by the Reshow site:
//! - `site` - Public marketing pages and the admin content-management area
//!
//! # Architecture
//!
//! The core crate contains only types and rules - no I/O, no HTTP clients,
//! no session storage. Everything here is deterministic and unit-testable.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, pending list-item IDs, roles and statuses
//! - [`api_url`] - Backend base URL normalization and image URL resolution
//! - [`auth`] - Admin users, login outcomes, password policy, idle timeout
//! - [`content`] - Section schema, defaults, merge, about composite, drafts
//! - [`catalog`] - Products, services, categories and their forms
//! - [`rating`] - Star rating rendering and input
//! - [`quote`] - Quote requests, the visitor's quote cart, reply links
//! - [`contact`] - Public contact form
//! - [`stats`] - Dashboard counters

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api_url;
pub mod auth;
pub mod catalog;
pub mod contact;
pub mod content;
pub mod quote;
pub mod rating;
pub mod stats;
pub mod types;

pub use types::*;
