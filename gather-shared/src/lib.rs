//! # Gather Shared
//! This crate defines shared data structures and types used across the gather ecosystem.
//! It includes common definitions for identities, friendship edges, friendship states,
//! events, and tags.
pub mod types;
