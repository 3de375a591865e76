//! # crudgen
//!
//! Generates source code for every operation of an API description by
//! holding a short, tool-calling conversation with an LLM.
//!
//! This library provides:
//! - An HTTP API for submitting generation jobs
//! - A walker that derives one generation task per route/method pair
//! - A bounded conversation loop that executes the tools the model asks for
//! - Built-in tools for saving generated files and resolving the target language
//!
//! ## Architecture
//!
//! A job flows one way:
//! 1. Fetch and parse the API description
//! 2. Walk it into generation tasks
//! 3. Render each task into a prompt
//! 4. Run a conversation per task, executing tool calls and feeding results back
//! 5. Files written by `saveFileToLocalDirectory` are the job's only output
//!
//! ## Example
//!
//! ```rust,ignore
//! use crudgen::{agent::Orchestrator, config::Config, description::fetch_description};
//!
//! let config = Config::from_env()?;
//! let description = fetch_description("./petstore.yaml").await?;
//! let summary = Orchestrator::from_config(&config).run(&description, "python flask").await;
//! ```

pub mod agent;
pub mod api;
pub mod artifact;
pub mod config;
pub mod description;
pub mod language;
pub mod llm;
pub mod tools;

pub use config::Config;
