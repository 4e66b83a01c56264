//! # Resource Recipe
//!
//! > **A Recipe for Versioned Cloud Resources in Rust.**
//!
//! This crate shows how to model cloud resources that exist in several API
//! versions at once with [`resource_framework`]: one logical resource, three
//! typed representations (stable, beta, alpha), kept consistent automatically.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Write to any version, send the right one
//! Code that builds a resource should not track which API version every field
//! belongs to. It mutates whichever representation it has, and the framework
//! reports what the other versions could not carry. When the resource is
//! frozen, the one version that loses nothing is chosen.
//!
//! ### Generics: The Power of `Resource<S, A, B>`
//! The propagation engine is written **once** over any three serde types. A
//! new resource type is three structs and, only if some field was renamed
//! between versions, a few bridging hooks.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`resource_framework`])
//! The generic [`Resource`](resource_framework::Resource), the structural
//! copier, field traits and the freeze step.
//!
//! ### 2. The Resources ([`model`])
//! - [`Address`](model::Address): a renamed field bridged by hooks
//!   ([`AddressTypeTrait`](model::AddressTypeTrait))
//! - [`ForwardingRule`](model::ForwardingRule): version-only fields handled
//!   without any custom code, plus references to other resources
//!
//! ### 3. The Planner Contract ([`graph`])
//! [`GraphNode`](graph::GraphNode) is what a planner sees of a frozen
//! resource; [`graph::graphviz`] draws the result.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Print the demo graph, with propagation logs
//! RUST_LOG=debug cargo run
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test --workspace
//! ```

pub mod graph;
pub mod model;
