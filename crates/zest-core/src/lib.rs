//! # zest-core
//!
//! Object model for Zest security-testing scripts.
//!
//! A script is a tree of statements (requests, assignments, conditionals,
//! loops, actions, browser steps) plus metadata, parameters and
//! authentication. This crate provides the tree, its document-order
//! navigation, and the pieces needed to evaluate it: variables, boolean
//! expressions and loop state machines. Sending HTTP traffic and driving a
//! browser are left to the host application.
//!
//! ## Modules
//!
//! - [`script`] - The root container, metadata and whole-tree queries
//! - [`statement`] - The closed set of statement kinds and their capabilities
//! - [`container`] - The container contract and document-order traversal
//! - [`loops`] / [`token_set`] - Loop state machines over integer and string tokens
//! - [`expression`] - Boolean expression trees
//! - [`variables`] - Ordered variable store with `{{name}}` substitution
//! - [`runtime`] - The context expressions and loops are evaluated against
//! - [`runner`] - A reference runner delegating I/O to a [`runner::ScriptHost`]
//! - [`config`] - Persistent settings in `~/.zest/config.json`
//!
//! ## Example
//!
//! ```
//! use zest_core::container::ZestContainer;
//! use zest_core::expression::Expression;
//! use zest_core::http::ZestRequest;
//! use zest_core::script::{ScriptType, ZestScript};
//! use zest_core::statement::Statement;
//!
//! let mut script = ZestScript::new("smoke", "home page is up", ScriptType::StandAlone);
//! script.parameters.set("host", "http://localhost:8080");
//! let request = ZestRequest::new("GET", "{{host}}/").with_assertion(Expression::status_code(200));
//! script.add(Statement::request(request));
//!
//! for (index, stmt) in script.chain() {
//!     println!("{index}: {}", stmt.name());
//! }
//! ```

pub mod auth;
pub mod config;
pub mod container;
pub mod error;
pub mod expression;
pub mod http;
pub mod loops;
pub mod pattern;
pub mod runner;
pub mod runtime;
pub mod script;
pub mod statement;
pub mod token_set;
pub mod variables;

pub use error::ZestError;
