//! Representation for structure (functions, nodes, values) in an HLS program.
use crate::attributes::{Attributes, GetAttributes, HlsAttributes};
use crate::types::Type;
use hls_idx::{impl_index, maps::IndexedMap};
use hls_utils::{GetName, Id};
use linked_hash_map::LinkedHashMap;
use smallvec::SmallVec;

/// Index of a [Function] in a [Program].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FuncIdx(u32);
impl_index!(FuncIdx);

/// Index of a [Node] in a [Program].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIdx(u32);
impl_index!(NodeIdx);

/// Index of a [Value] in a [Program].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueIdx(u32);
impl_index!(ValueIdx);

impl std::fmt::Display for NodeIdx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

impl std::fmt::Display for ValueIdx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// The operation performed by a [Node].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Declares a stream channel as its only result.
    Channel,
    /// Reads one element from the channel operand.
    Read,
    /// Writes the second operand into the channel operand.
    Write,
    /// Invokes a function. Operands are bound to its parameters and results
    /// mirror its return values.
    Call(FuncIdx),
    /// Returns its operands from the enclosing function.
    Return,
    /// A loop. Only carries loop attributes.
    Loop,
    /// Any other operation.
    Op(Id),
}

impl NodeKind {
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Channel => "stream.channel",
            NodeKind::Read => "stream.read",
            NodeKind::Write => "stream.write",
            NodeKind::Call(_) => "call",
            NodeKind::Return => "return",
            NodeKind::Loop => "loop",
            NodeKind::Op(name) => name.as_str(),
        }
    }
}

/// A use of a value: operand `operand` of node `user`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Use {
    pub user: NodeIdx,
    pub operand: usize,
}

/// Where a [Value] comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueDef {
    /// Result `index` of `node`.
    Result { node: NodeIdx, index: usize },
    /// Parameter `index` of `func`.
    Param { func: FuncIdx, index: usize },
}

/// A typed value in the program.
#[derive(Debug, Clone)]
pub struct Value {
    /// Type of the value.
    pub ty: Type,
    /// Definition site of the value.
    pub def: ValueDef,
    /// All nodes using this value, in the order they were added.
    pub(crate) uses: Vec<Use>,
}

impl Value {
    pub fn uses(&self) -> &[Use] {
        &self.uses
    }

    pub fn is_channel(&self) -> bool {
        self.ty.is_channel()
    }
}

/// An operation in a function body.
#[derive(Debug, Clone)]
pub struct Node {
    /// The operation performed.
    pub kind: NodeKind,
    /// Function containing this node.
    pub parent: FuncIdx,
    /// Attributes attached to this node.
    pub attributes: Attributes,
    pub(crate) operands: SmallVec<[ValueIdx; 4]>,
    pub(crate) results: SmallVec<[ValueIdx; 2]>,
}

impl Node {
    pub fn operands(&self) -> &[ValueIdx] {
        &self.operands
    }

    pub fn results(&self) -> &[ValueIdx] {
        &self.results
    }

    pub fn num_results(&self) -> usize {
        self.results.len()
    }

    /// The callee if this node is a call.
    pub fn callee(&self) -> Option<FuncIdx> {
        match self.kind {
            NodeKind::Call(f) => Some(f),
            _ => None,
        }
    }
}

impl GetAttributes for Node {
    fn get_attributes(&self) -> &Attributes {
        &self.attributes
    }

    fn get_mut_attributes(&mut self) -> &mut Attributes {
        &mut self.attributes
    }
}

/// A named, reusable subgraph.
#[derive(Debug, Clone)]
pub struct Function {
    /// Name of the function.
    pub name: Id,
    /// Types of the values returned by the function.
    pub return_types: Vec<Type>,
    /// Attributes attached to the function.
    pub attributes: Attributes,
    pub(crate) params: Vec<ValueIdx>,
    pub(crate) body: Vec<NodeIdx>,
}

impl Function {
    pub fn params(&self) -> &[ValueIdx] {
        &self.params
    }

    /// Nodes of the function in program order.
    pub fn body(&self) -> &[NodeIdx] {
        &self.body
    }
}

impl GetName for Function {
    fn name(&self) -> Id {
        self.name
    }
}

impl GetAttributes for Function {
    fn get_attributes(&self) -> &Attributes {
        &self.attributes
    }

    fn get_mut_attributes(&mut self) -> &mut Attributes {
        &mut self.attributes
    }
}

/// An HLS program: arenas of functions, nodes and values.
///
/// Entities are only ever added (through a [Builder](crate::Builder)), so
/// indices handed out by a program stay valid for its whole lifetime.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub(crate) functions: IndexedMap<FuncIdx, Function>,
    pub(crate) nodes: IndexedMap<NodeIdx, Node>,
    pub(crate) values: IndexedMap<ValueIdx, Value>,
    /// Mapping from function names to functions, in definition order.
    pub(crate) func_names: LinkedHashMap<Id, FuncIdx>,
}

impl Program {
    pub fn func(&self, idx: FuncIdx) -> &Function {
        &self.functions[idx]
    }

    pub fn func_mut(&mut self, idx: FuncIdx) -> &mut Function {
        &mut self.functions[idx]
    }

    pub fn node(&self, idx: NodeIdx) -> &Node {
        &self.nodes[idx]
    }

    pub fn node_mut(&mut self, idx: NodeIdx) -> &mut Node {
        &mut self.nodes[idx]
    }

    pub fn value(&self, idx: ValueIdx) -> &Value {
        &self.values[idx]
    }

    pub fn contains_node(&self, idx: NodeIdx) -> bool {
        self.nodes.contains(idx)
    }

    pub fn contains_value(&self, idx: ValueIdx) -> bool {
        self.values.contains(idx)
    }

    /// Find a function by name.
    pub fn find_function(&self, name: Id) -> Option<FuncIdx> {
        self.func_names.get(&name).copied()
    }

    /// All functions in definition order.
    pub fn functions(&self) -> impl Iterator<Item = (FuncIdx, &Function)> {
        self.func_names
            .values()
            .map(move |idx| (*idx, &self.functions[*idx]))
    }

    pub fn num_functions(&self) -> usize {
        self.functions.len()
    }

    /// All nodes of all functions.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIdx, &Node)> {
        self.nodes.iter()
    }

    /// Every call node invoking `func`, in creation order.
    pub fn call_sites(&self, func: FuncIdx) -> impl Iterator<Item = NodeIdx> {
        self.nodes
            .iter()
            .filter(move |(_, node)| node.callee() == Some(func))
            .map(|(idx, _)| idx)
    }

    /// Every return node in the body of `func`.
    pub fn returns(&self, func: FuncIdx) -> impl Iterator<Item = NodeIdx> {
        self.functions[func]
            .body
            .iter()
            .copied()
            .filter(move |n| self.nodes[*n].kind == NodeKind::Return)
    }

    /// The function marked as the synthesis entry point, if any. If several
    /// functions carry the marker, the first one in definition order wins.
    pub fn top_function(&self) -> Option<FuncIdx> {
        self.functions()
            .find(|(_, f)| f.has_top_func())
            .map(|(idx, _)| idx)
    }

    /// Human readable description of a node used in diagnostics.
    pub fn describe_node(&self, idx: NodeIdx) -> String {
        match self.nodes.get(idx) {
            Some(node) => format!(
                "`{}' {} in function `{}'",
                node.kind.as_str(),
                idx,
                self.functions[node.parent].name
            ),
            None => format!("unknown {idx}"),
        }
    }

    /// Human readable description of a value used in diagnostics.
    pub fn describe_value(&self, idx: ValueIdx) -> String {
        let Some(value) = self.values.get(idx) else {
            return format!("unknown value {idx}");
        };
        match value.def {
            ValueDef::Result { node, index } => {
                format!("{idx} (result {index} of {})", self.describe_node(node))
            }
            ValueDef::Param { func, index } => format!(
                "{idx} (parameter {index} of function `{}')",
                self.functions[func].name
            ),
        }
    }

    /// Position of `node` in the body of its parent function.
    pub fn position_in_body(&self, node: NodeIdx) -> Option<usize> {
        let parent = self.nodes.get(node)?.parent;
        self.functions[parent].body.iter().position(|n| *n == node)
    }
}
