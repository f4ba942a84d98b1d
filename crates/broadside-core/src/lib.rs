//! Core types and definitions for the BROADSIDE simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! components, commands, state snapshots, events, ship profiles and constants.
//! It has no dependency on the ECS or any runtime framework.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod events;
pub mod observer;
pub mod profiles;
pub mod state;
pub mod types;
