use crate::analysis::CallGraph;
use crate::traversal::{ConstructPass, Named, Pass};
use hls_ir::{self as ir, FuncIdx, HlsAttributes, NodeKind, Resource};
use hls_utils::{Error, HlsResult};
use itertools::Itertools;

/// Annotates every function with the total [Resource] usage of its body.
///
/// A node contributes its own resource estimate if it has one. A call without
/// an estimate contributes the rolled-up usage of its callee. Runtime
/// functions are not synthesized and keep whatever estimate they carry.
pub struct ResourceRollup {
    /// Functions ordered callees first.
    order: Vec<FuncIdx>,
}

impl Named for ResourceRollup {
    fn name() -> &'static str {
        "resource-rollup"
    }

    fn description() -> &'static str {
        "Sum node and callee resources into a resource estimate per function."
    }
}

impl ConstructPass for ResourceRollup {
    fn from(prog: &ir::Program) -> HlsResult<Self> {
        let cg = CallGraph::new(prog);
        let Some(order) = cg.callee_first() else {
            return Err(Error::pass_assumption(
                Self::name(),
                format!(
                    "call graph is recursive through: {}",
                    cg.recursive_functions()
                        .into_iter()
                        .map(|f| prog.func(f).name)
                        .join(", ")
                ),
            ));
        };
        Ok(ResourceRollup { order })
    }
}

impl Pass for ResourceRollup {
    fn run(&mut self, prog: &mut ir::Program) -> HlsResult<()> {
        for func in &self.order {
            let func = *func;
            if prog.func(func).has_runtime() {
                continue;
            }
            let mut total = Resource::default();
            for idx in prog.func(func).body() {
                let node = prog.node(*idx);
                let res = match (node.resource(), &node.kind) {
                    (Some(res), _) => res,
                    (None, NodeKind::Call(callee)) => {
                        prog.func(*callee).resource().unwrap_or_default()
                    }
                    (None, _) => Resource::default(),
                };
                total = total.checked_add(res).ok_or_else(|| {
                    Error::pass_assumption(
                        Self::name(),
                        format!(
                            "resource usage of `{}' overflows at {}",
                            prog.func(func).name,
                            prog.describe_node(*idx)
                        ),
                    )
                })?;
            }
            log::debug!(
                "`{}': lut={} dsp={} bram={}",
                prog.func(func).name,
                total.lut,
                total.dsp,
                total.bram
            );
            prog.func_mut(func).set_resource(total);
        }
        Ok(())
    }
}
