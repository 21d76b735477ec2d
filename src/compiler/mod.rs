use crate::catalog::{ParameterSpec, ParameterType};
use crate::error::CompileError;
use crate::graph::{GraphNode, NodeId, ProgramGraph, SourceHandle};
use crate::value::ParamValue;
use ahash::AHashSet;
use tracing::{debug, info};

mod integrity;
mod statement;

pub use statement::{CompiledStatement, program_to_json, render_program};

/// Options controlling how parameter values are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Fail with `MissingRequiredInput` when a required parameter is unset.
    pub enforce_required_inputs: bool,
    /// Parse text held by number-typed parameters into numbers.
    pub coerce_numeric_text: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            enforce_required_inputs: false,
            coerce_numeric_text: true,
        }
    }
}

/// Turns a [`ProgramGraph`] into an ordered forest of [`CompiledStatement`]s.
///
/// Compilation is a pure function of the graph: the compiler holds no state between
/// runs and the same graph always yields the same program.
#[derive(Debug, Clone, Copy, Default)]
pub struct Compiler {
    options: CompileOptions,
}

pub struct CompilerBuilder {
    options: CompileOptions,
}

impl CompilerBuilder {
    pub fn new() -> Self {
        Self {
            options: CompileOptions::default(),
        }
    }
    pub fn enforce_required_inputs(mut self, enforce: bool) -> Self {
        self.options.enforce_required_inputs = enforce;
        self
    }
    pub fn coerce_numeric_text(mut self, coerce: bool) -> Self {
        self.options.coerce_numeric_text = coerce;
        self
    }
    pub fn build(self) -> Compiler {
        Compiler {
            options: self.options,
        }
    }
}

impl Default for CompilerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Compiles `graph` with the default options.
pub fn compile(graph: &ProgramGraph) -> Result<Vec<CompiledStatement>, CompileError> {
    Compiler::default().compile(graph)
}

impl Compiler {
    pub fn builder() -> CompilerBuilder {
        CompilerBuilder::new()
    }

    pub fn options(&self) -> CompileOptions {
        self.options
    }

    /// Compiles every root, in creation order, followed by its sequential chain.
    ///
    /// # Errors
    ///
    /// * `MultipleParents`, `MultipleSuccessors`, `ChildrenNotAllowed`, `TooManyChildren`,
    ///   `CyclicReference`: the graph breaks a structural invariant.
    /// * `MissingRequiredInput`: a required parameter is unset and enforcement is enabled.
    /// * `InvalidNumber`: a number-typed parameter holds text that is not a number, or
    ///   any parameter holds NaN or an infinity.
    pub fn compile(&self, graph: &ProgramGraph) -> Result<Vec<CompiledStatement>, CompileError> {
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "compiling program graph"
        );
        integrity::check(graph)?;

        let roots = graph.roots();
        debug!(roots = roots.len(), "root discovery complete");

        let program = self.assemble(graph, roots)?;

        info!(statements = program.len(), "compilation successful");
        #[cfg(feature = "debug-tools")]
        debug!("compiled program:\n{}", render_program(&program));

        Ok(program)
    }

    /// Builds the statement forest with an explicit stack, so nesting depth is bounded
    /// by memory rather than by the call stack.
    ///
    /// Each frame collects the body of one statement. A frame first drains the
    /// sequential chain it is currently following, then starts the chain of its next
    /// child. The bottom frame has no statement of its own: its children are the roots
    /// and its body is the program.
    fn assemble(
        &self,
        graph: &ProgramGraph,
        roots: Vec<NodeId>,
    ) -> Result<Vec<CompiledStatement>, CompileError> {
        let mut visited = AHashSet::new();
        let mut stack = vec![Frame::new(None, Vec::new(), roots)];

        loop {
            let next = match stack.last_mut() {
                Some(frame) => frame.next_node(),
                None => return Ok(Vec::new()),
            };

            match next {
                Some(id) => {
                    let Some(node) = graph.node(id) else {
                        continue;
                    };
                    if !visited.insert(node.id()) {
                        return Err(CompileError::CyclicReference { node_id: node.id() });
                    }
                    let fields = self.compile_fields(node)?;
                    let children = graph
                        .outgoing(node.id(), SourceHandle::Hierarchical)
                        .map(|edge| edge.target)
                        .collect();
                    stack.push(Frame::new(Some(node), fields, children));
                }
                None => {
                    let Some(done) = stack.pop() else {
                        return Ok(Vec::new());
                    };
                    let Some(node) = done.node else {
                        return Ok(done.body);
                    };
                    if let Some(parent) = stack.last_mut() {
                        parent.chain = graph
                            .outgoing(node.id(), SourceHandle::Sequential)
                            .next()
                            .map(|edge| edge.target);
                        parent.body.push(CompiledStatement {
                            name: node.kind(),
                            fields: done.fields,
                            body: (!done.body.is_empty()).then_some(done.body),
                        });
                    }
                }
            }
        }
    }

    /// Resolved parameters of `node`, in catalog order.
    fn compile_fields(
        &self,
        node: &GraphNode,
    ) -> Result<Vec<(&'static str, ParamValue)>, CompileError> {
        let mut fields = Vec::new();
        for spec in node.kind().definition().parameters {
            match node.value(spec.name).filter(|v| !v.is_unset()) {
                Some(value) => fields.push((spec.name, self.resolve(node.id(), spec, value)?)),
                None if spec.required && self.options.enforce_required_inputs => {
                    return Err(CompileError::MissingRequiredInput {
                        node_id: node.id(),
                        parameter: spec.name.to_string(),
                    });
                }
                None => {}
            }
        }
        Ok(fields)
    }

    fn resolve(
        &self,
        node_id: NodeId,
        spec: &ParameterSpec,
        value: &ParamValue,
    ) -> Result<ParamValue, CompileError> {
        let invalid = || CompileError::InvalidNumber {
            node_id,
            parameter: spec.name.to_string(),
            value: match value {
                ParamValue::Text(s) => s.clone(),
                other => other.to_string(),
            },
        };
        // NaN and infinities have no representation on the wire.
        if matches!(value, ParamValue::Number(n) if !n.is_finite()) {
            return Err(invalid());
        }
        if spec.param_type != ParameterType::Number || !self.options.coerce_numeric_text {
            return Ok(value.clone());
        }
        value.as_number().map(ParamValue::Number).ok_or_else(invalid)
    }
}

/// A statement whose body is still being collected.
struct Frame<'g> {
    node: Option<&'g GraphNode>,
    fields: Vec<(&'static str, ParamValue)>,
    children: std::vec::IntoIter<NodeId>,
    /// Next node of the sequential chain being followed, if any.
    chain: Option<NodeId>,
    body: Vec<CompiledStatement>,
}

impl<'g> Frame<'g> {
    fn new(
        node: Option<&'g GraphNode>,
        fields: Vec<(&'static str, ParamValue)>,
        children: Vec<NodeId>,
    ) -> Self {
        Self {
            node,
            fields,
            children: children.into_iter(),
            chain: None,
            body: Vec::new(),
        }
    }

    fn next_node(&mut self) -> Option<NodeId> {
        self.chain.take().or_else(|| self.children.next())
    }
}
