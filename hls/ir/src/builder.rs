//! IR Builder. Provides convinience methods to add functions and nodes to a
//! [Program] while keeping the use lists of values consistent.
use crate::structure::{
    FuncIdx, Function, Node, NodeIdx, NodeKind, Program, Use, Value, ValueDef,
    ValueIdx,
};
use crate::{Attributes, types::Type};
use hls_utils::{Error, HlsResult, Id};
use smallvec::SmallVec;

/// IR builder.
/// Uses internal references to the program to construct and validate
/// constructed nodes.
pub struct Builder<'a> {
    /// Program being modified.
    pub program: &'a mut Program,
}

impl<'a> Builder<'a> {
    /// Instantiate a new builder using for a program.
    pub fn new(program: &'a mut Program) -> Self {
        Self { program }
    }

    /// Add a new function with parameters of types `params` returning values
    /// of types `returns`. Fails if a function with the same name exists.
    pub fn add_function<S>(
        &mut self,
        name: S,
        params: Vec<Type>,
        returns: Vec<Type>,
    ) -> HlsResult<FuncIdx>
    where
        S: Into<Id>,
    {
        let name = name.into();
        if self.program.func_names.contains_key(&name) {
            return Err(Error::already_bound(name, "function"));
        }
        let func = self.program.functions.push(Function {
            name,
            return_types: returns,
            attributes: Attributes::default(),
            params: Vec::with_capacity(params.len()),
            body: Vec::new(),
        });
        let params = params
            .into_iter()
            .enumerate()
            .map(|(index, ty)| {
                self.program.values.push(Value {
                    ty,
                    def: ValueDef::Param { func, index },
                    uses: Vec::new(),
                })
            })
            .collect();
        self.program.functions[func].params = params;
        self.program.func_names.insert(name, func);
        log::trace!("added function `{name}'");
        Ok(func)
    }

    /// Parameter `index` of `func`.
    ///
    /// # Panics
    /// Panics if the function has no such parameter.
    pub fn param(&self, func: FuncIdx, index: usize) -> ValueIdx {
        self.program.func(func).params()[index]
    }

    /// Result `index` of `node`.
    ///
    /// # Panics
    /// Panics if the node has no such result.
    pub fn result(&self, node: NodeIdx, index: usize) -> ValueIdx {
        self.program.node(node).results()[index]
    }

    /// Append a node of `kind` to the body of `func`. Registers a use on each
    /// operand and creates one value per result type.
    pub fn add_node(
        &mut self,
        func: FuncIdx,
        kind: NodeKind,
        operands: &[ValueIdx],
        result_types: Vec<Type>,
    ) -> NodeIdx {
        let node = self.program.nodes.peek_next_idx();
        let results: SmallVec<[ValueIdx; 2]> = result_types
            .into_iter()
            .enumerate()
            .map(|(index, ty)| {
                self.program.values.push(Value {
                    ty,
                    def: ValueDef::Result { node, index },
                    uses: Vec::new(),
                })
            })
            .collect();
        for (operand, value) in operands.iter().enumerate() {
            self.program.values[*value].uses.push(Use {
                user: node,
                operand,
            });
        }
        let pushed = self.program.nodes.push(Node {
            kind,
            parent: func,
            attributes: Attributes::default(),
            operands: operands.iter().copied().collect(),
            results,
        });
        debug_assert_eq!(pushed, node);
        self.program.functions[func].body.push(node);
        node
    }

    /// Declare a channel carrying `elem` in `func`.
    pub fn add_channel(
        &mut self,
        func: FuncIdx,
        elem: Type,
    ) -> (NodeIdx, ValueIdx) {
        let node =
            self.add_node(func, NodeKind::Channel, &[], vec![Type::channel(elem)]);
        (node, self.result(node, 0))
    }

    /// Read an element from `channel`.
    pub fn add_read(
        &mut self,
        func: FuncIdx,
        channel: ValueIdx,
    ) -> HlsResult<(NodeIdx, ValueIdx)> {
        let elem = self
            .program
            .value(channel)
            .ty
            .channel_elem()
            .cloned()
            .ok_or_else(|| {
                Error::malformed_structure(format!(
                    "Cannot read from non-channel value {}",
                    self.program.describe_value(channel)
                ))
            })?;
        let node = self.add_node(func, NodeKind::Read, &[channel], vec![elem]);
        Ok((node, self.result(node, 0)))
    }

    /// Write `data` into `channel`.
    pub fn add_write(
        &mut self,
        func: FuncIdx,
        channel: ValueIdx,
        data: ValueIdx,
    ) -> NodeIdx {
        self.add_node(func, NodeKind::Write, &[channel, data], vec![])
    }

    /// Call `callee` with `args`. The results mirror the callee's returns.
    pub fn add_call(
        &mut self,
        func: FuncIdx,
        callee: FuncIdx,
        args: &[ValueIdx],
    ) -> NodeIdx {
        let results = self.program.func(callee).return_types.clone();
        self.add_node(func, NodeKind::Call(callee), args, results)
    }

    /// Return `values` from `func`.
    pub fn add_return(&mut self, func: FuncIdx, values: &[ValueIdx]) -> NodeIdx {
        self.add_node(func, NodeKind::Return, values, vec![])
    }

    /// Add a loop node to `func`.
    pub fn add_loop(&mut self, func: FuncIdx) -> NodeIdx {
        self.add_node(func, NodeKind::Loop, &[], vec![])
    }

    /// Add an arbitrary operation named `name`.
    pub fn add_op<S: Into<Id>>(
        &mut self,
        func: FuncIdx,
        name: S,
        operands: &[ValueIdx],
        result_types: Vec<Type>,
    ) -> NodeIdx {
        self.add_node(func, NodeKind::Op(name.into()), operands, result_types)
    }
}
