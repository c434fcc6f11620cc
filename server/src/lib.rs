//! parlor blog/chat server library.
//! This crate exposes internal modules for integration testing.
//! The binary entry point is in main.rs.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod pages;
pub mod posts;
pub mod registration;
pub mod routes;
pub mod state;
pub mod uploads;
pub mod ws;
