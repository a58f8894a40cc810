//! # pix-cli: PIX Receiver Operator CLI
//!
//! ## Subcommands
//!
//! - `check`: Run the document, email and PIX key validators offline
//! - `seed`: Fill the receivers table with sample data
//!
//! Argument parsing lives next to each handler; the validation and lifecycle
//! rules come from `pix-core` and `pix-state`.

pub mod check;
pub mod seed;
