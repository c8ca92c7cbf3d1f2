//! Archgraph Core Types and Definitions
//!
//! This crate provides the foundational types shared by the archgraph crates.
//! It includes:
//!
//! - **Schema**: The architecture description model ([`schema::Entity`], [`schema::Level`])
//! - **Graph**: The flattened node/edge output ([`graph::Graph`])
//! - **Paths**: Nesting paths used to namespace entity identifiers ([`path::EntityPath`])

pub mod graph;
pub mod path;
pub mod schema;
