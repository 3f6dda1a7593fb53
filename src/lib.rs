//! Entity, clause and summary extraction for legal HTML documents.

pub mod api;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod nlp;
pub mod pipeline;
