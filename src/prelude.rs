//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and functions from the blockplan
//! crate, so the graph, the connection rules and the compiler are one `use` away.
//!
//! # Example
//!
//! ```rust,no_run
//! use blockplan::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let canvas_json = std::fs::read_to_string("path/to/canvas.json")?;
//! let imported = CanvasDocument::from_json(&canvas_json)?.into_graph(ImportMode::Validated)?;
//!
//! let program = compile(&imported.graph)?;
//! println!("{}", render_program(&program));
//! # Ok(())
//! # }
//! ```

// Catalog
pub use crate::catalog::{
    BlockKind, BlockTypeDefinition, ParameterSpec, ParameterType, definition_of,
    list_block_kinds,
};

// Graph model and connection rules
pub use crate::graph::{
    EdgeId, GraphEdge, GraphNode, GraphSnapshot, NodeId, ProgramGraph, ProposedEdge,
    SourceHandle, TargetHandle, check_connection, is_valid,
};
pub use crate::value::ParamValue;

// Compilation
pub use crate::compiler::{
    CompileOptions, CompiledStatement, Compiler, CompilerBuilder, compile, program_to_json,
    render_program,
};

// Canvas import
pub use crate::canvas::{CanvasDocument, ImportMode, ImportedGraph, IntoGraph};

// Error types
pub use crate::error::{
    CatalogError, CompileError, ConnectionRejected, GraphError, ImportError, SnapshotError,
};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
