//! Interactive CLI chat experience for Asintel.
//!
//! Implements the full analysis loop: welcome banner, slash commands,
//! async readline input, and retrievals that run in the background and
//! land back in the conversation when they finish. Entry point:
//! `loop_runner::run_chat_loop`.

pub mod banner;
pub mod commands;
pub mod input;
pub mod loop_runner;

pub use loop_runner::run_chat_loop;
