use hls_ir::{self as ir, FuncIdx, NodeIdx};
use petgraph::{
    algo,
    graph::{DiGraph, NodeIndex},
};
use std::collections::HashMap;

/// Call relation between the functions of a program. There is an edge from
/// `f` to `g`, weighted by the call node, for every call to `g` in the body
/// of `f`.
pub struct CallGraph {
    graph: DiGraph<FuncIdx, NodeIdx>,
    nodes: HashMap<FuncIdx, NodeIndex>,
}

impl CallGraph {
    pub fn new(prog: &ir::Program) -> Self {
        let mut graph = DiGraph::new();
        let nodes: HashMap<_, _> = prog
            .functions()
            .map(|(idx, _)| (idx, graph.add_node(idx)))
            .collect();
        for (idx, func) in prog.functions() {
            for node in func.body() {
                if let Some(callee) = prog.node(*node).callee() {
                    graph.add_edge(nodes[&idx], nodes[&callee], *node);
                }
            }
        }
        Self { graph, nodes }
    }

    /// Functions called from the body of `func`, without duplicates.
    pub fn callees(&self, func: FuncIdx) -> Vec<FuncIdx> {
        self.neighbors(func, petgraph::Direction::Outgoing)
    }

    /// Functions whose bodies call `func`, without duplicates.
    pub fn callers(&self, func: FuncIdx) -> Vec<FuncIdx> {
        self.neighbors(func, petgraph::Direction::Incoming)
    }

    fn neighbors(
        &self,
        func: FuncIdx,
        dir: petgraph::Direction,
    ) -> Vec<FuncIdx> {
        let Some(node) = self.nodes.get(&func) else {
            return vec![];
        };
        let mut out: Vec<FuncIdx> = self
            .graph
            .neighbors_directed(*node, dir)
            .map(|n| self.graph[n])
            .collect();
        out.sort();
        out.dedup();
        out
    }

    /// Whether `func` can reach itself through calls.
    pub fn is_recursive(&self, func: FuncIdx) -> bool {
        self.recursive_functions().contains(&func)
    }

    /// Every function that lies on a call cycle, in increasing index order.
    pub fn recursive_functions(&self) -> Vec<FuncIdx> {
        let mut out: Vec<FuncIdx> = algo::tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| {
                scc.len() > 1
                    || self.graph.find_edge(scc[0], scc[0]).is_some()
            })
            .flatten()
            .map(|n| self.graph[n])
            .collect();
        out.sort();
        out
    }

    /// All functions ordered so that every callee comes before its callers.
    /// Returns `None` if the call graph has a cycle.
    pub fn callee_first(&self) -> Option<Vec<FuncIdx>> {
        if !self.recursive_functions().is_empty() {
            return None;
        }
        let order = algo::toposort(&self.graph, None).ok()?;
        Some(order.into_iter().rev().map(|n| self.graph[n]).collect())
    }
}
