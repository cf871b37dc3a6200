//! Vitrine - backend for a personal portfolio site
//!
//! This library provides the core functionality for the Vitrine service:
//! a project gallery API, a contact form inbox, and privacy-friendly visit
//! analytics (page views, sessions, Web Vitals).
//!
//! # Architecture
//! - `analytics`: user-agent classification and visit aggregation
//! - `repository`: storage abstraction (sea-orm databases or JSON files)
//! - `services`: HTTP handlers (visits, projects, contact, health)
//! - `middleware`: authentication middleware
//! - `config`: configuration management
//! - `system`: logging and process utilities

pub mod analytics;
pub mod config;
pub mod errors;
pub mod middleware;
pub mod repository;
pub mod services;
pub mod system;
pub mod utils;
