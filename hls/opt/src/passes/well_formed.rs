use crate::traversal::{DiagnosticPass, Diagnostics, Named, Pass};
use hls_ir::{self as ir, HlsAttributes, NodeIdx, NodeKind, Type, ValueIdx};
use hls_utils::{Error, HlsResult};
use itertools::Itertools;

/// Checks the structural assumptions the other passes rely on:
/// 1. Every channel-declaring node has exactly one result of channel type.
/// 2. Reads and writes are applied to channels with matching element types.
/// 3. Calls agree with the signature of the callee.
/// 4. Returns agree with the signature of the enclosing function.
/// 5. At most one function is the top function and it is not a runtime
///    function.
///
/// Loop attributes attached to non-loop nodes are reported as warnings.
#[derive(Default)]
pub struct WellFormed {
    diag: Diagnostics,
}

impl Named for WellFormed {
    fn name() -> &'static str {
        "well-formed"
    }

    fn description() -> &'static str {
        "Check that channels, calls, returns and function markers are well formed."
    }
}

impl DiagnosticPass for WellFormed {
    fn take_diagnostics(&mut self) -> Diagnostics {
        std::mem::take(&mut self.diag)
    }
}

/// Fails if the types of `values` don't match `expected` one for one.
fn check_types(
    prog: &ir::Program,
    node: NodeIdx,
    what: &str,
    values: &[ValueIdx],
    expected: &[Type],
) -> HlsResult<()> {
    if values.len() != expected.len() {
        return Err(Error::malformed_structure(format!(
            "{} has {} {what} but {} were expected",
            prog.describe_node(node),
            values.len(),
            expected.len()
        )));
    }
    for (i, (value, ty)) in values.iter().zip(expected).enumerate() {
        let actual = &prog.value(*value).ty;
        if actual != ty {
            return Err(Error::malformed_structure(format!(
                "{} {what} {i} has type {actual} but {ty} was expected",
                prog.describe_node(node),
            )));
        }
    }
    Ok(())
}

/// Element type of the channel `value`.
fn channel_elem(
    prog: &ir::Program,
    node: NodeIdx,
    value: Option<&ValueIdx>,
) -> HlsResult<Type> {
    value
        .and_then(|v| prog.value(*v).ty.channel_elem().cloned())
        .ok_or_else(|| {
            Error::malformed_structure(format!(
                "{} expects a channel as its first operand",
                prog.describe_node(node)
            ))
        })
}

fn check_node(prog: &ir::Program, idx: NodeIdx) -> HlsResult<()> {
    let node = prog.node(idx);
    if ir::declares_channel(&node.kind) {
        return ir::verify_channel_decl(prog, idx);
    }
    match &node.kind {
        NodeKind::Read => {
            let elem = channel_elem(prog, idx, node.operands().first())?;
            check_types(prog, idx, "operands", node.operands(), &[
                Type::channel(elem.clone()),
            ])?;
            check_types(prog, idx, "results", node.results(), &[elem])
        }
        NodeKind::Write => {
            let elem = channel_elem(prog, idx, node.operands().first())?;
            check_types(prog, idx, "operands", node.operands(), &[
                Type::channel(elem.clone()),
                elem,
            ])?;
            check_types(prog, idx, "results", node.results(), &[])
        }
        NodeKind::Call(callee) => {
            let callee = prog.func(*callee);
            let params = callee
                .params()
                .iter()
                .map(|p| prog.value(*p).ty.clone())
                .collect_vec();
            check_types(prog, idx, "arguments", node.operands(), &params)?;
            check_types(
                prog,
                idx,
                "results",
                node.results(),
                &callee.return_types,
            )
        }
        NodeKind::Return => {
            let parent = prog.func(node.parent);
            check_types(
                prog,
                idx,
                "returned values",
                node.operands(),
                &parent.return_types,
            )
        }
        NodeKind::Channel | NodeKind::Loop | NodeKind::Op(_) => Ok(()),
    }
}

impl Pass for WellFormed {
    fn run(&mut self, prog: &mut ir::Program) -> HlsResult<()> {
        for (_, func) in prog.functions() {
            for idx in func.body() {
                if let Err(err) = check_node(prog, *idx) {
                    self.diag.err(err);
                }

                let node = prog.node(*idx);
                if node.kind != NodeKind::Loop
                    && (node.loop_info().is_some()
                        || node.loop_directive().is_some())
                {
                    self.diag.warning(Error::misc(format!(
                        "{} carries loop attributes but is not a loop",
                        prog.describe_node(*idx)
                    )));
                }
            }
        }

        let tops = prog
            .functions()
            .filter(|(_, f)| f.has_top_func())
            .collect_vec();
        if tops.len() > 1 {
            self.diag.err(Error::malformed_structure(format!(
                "Multiple top functions: {}",
                tops.iter().map(|(_, f)| f.name).join(", ")
            )));
        }
        for (_, func) in &tops {
            if func.has_runtime() {
                self.diag.err(Error::malformed_structure(format!(
                    "Top function `{}' is also marked as a runtime function",
                    func.name
                )));
            }
        }

        // Function directives only make sense on functions.
        for (idx, node) in prog.nodes() {
            if node.func_directive().is_some() {
                self.diag.warning(Error::misc(format!(
                    "{} carries a function directive",
                    prog.describe_node(idx)
                )));
            }
        }
        Ok(())
    }
}
