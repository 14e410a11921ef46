//! The API service library: configuration, adapters, vertical services,
//! and the web layer.

pub mod adapters;
pub mod config;
pub mod error;
pub mod schemas;
pub mod services;
pub mod web;
