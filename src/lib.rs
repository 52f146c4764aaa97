//! Minimal HTTP text-generation service for a pretrained Gemma model.
//!
//! The model and tokenizer are fetched from the HuggingFace Hub once at
//! startup and then shared by the `/` and `/generate` routes.

pub mod api;
pub mod config;
pub mod device;
pub mod error;
pub mod generation;
pub mod model;
pub mod sampling;
pub mod tokenizer;
