//! Unit tests for politicos modules
//!
//! The gateway tests talk to an in-process mock server; nothing here needs
//! a live API.

mod test_api;
mod test_config;
mod test_search;
mod test_service;
mod test_view;
