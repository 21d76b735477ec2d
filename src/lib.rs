//! # blockplan - Visual Command-Block Compiler
//!
//! **blockplan** turns the command-block programs operators draw on an authoring canvas
//! into nested, ordered command trees ready for a flight-plan encoder. Blocks (conditionals,
//! loops, waits, GPIO writes, image captures) are joined by two kinds of connections:
//! *sequential* ("do this next") and *hierarchical* ("do this inside me").
//!
//! ## Core Workflow
//!
//! 1.  **Build a Graph**: Add blocks from the [`catalog`] to a [`graph::ProgramGraph`], either
//!     directly or by importing a canvas document through [`canvas::IntoGraph`].
//! 2.  **Connect**: Every proposed edge is checked against the connection rules in
//!     [`graph::validator`]. A rejected edge is simply not created.
//! 3.  **Compile**: [`compiler::compile`] (or a configured [`compiler::Compiler`]) turns the
//!     graph into a forest of [`compiler::CompiledStatement`]s, or a typed
//!     [`error::CompileError`] naming the offending node.
//!
//! ## Quick Start
//!
//! ```rust
//! use blockplan::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut graph = ProgramGraph::new();
//!
//!     let repeat = graph.add_node(BlockKind::RepeatN);
//!     graph.set_parameter_value(repeat, "count", 3)?;
//!
//!     let write = graph.add_node(BlockKind::GpioWrite);
//!     graph.set_parameter_value(write, "pin", 8)?;
//!     graph.set_parameter_value(write, "value", 1)?;
//!
//!     let wait = graph.add_node(BlockKind::WaitSec);
//!     graph.set_parameter_value(wait, "duration", "2")?;
//!
//!     graph.connect(repeat, SourceHandle::Hierarchical, write)?;
//!     graph.connect(write, SourceHandle::Sequential, wait)?;
//!
//!     let program = compile(&graph)?;
//!     assert_eq!(
//!         program_to_json(&program)?,
//!         serde_json::json!([{
//!             "name": "repeat-n",
//!             "count": 3,
//!             "body": [
//!                 { "name": "gpio-write", "pin": 8, "value": 1 },
//!                 { "name": "wait-sec", "duration": 2 }
//!             ]
//!         }])
//!     );
//!     Ok(())
//! }
//! ```

pub mod canvas;
pub mod catalog;
pub mod compiler;
pub mod error;
pub mod graph;
pub mod prelude;
pub mod value;
