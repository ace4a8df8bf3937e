use crate::def::{FunctionDef, KindDef, NodeDef, ProgramDef, ValueRef};
use crate::{FuncIdx, NodeKind, Program, ValueDef, ValueIdx};
use hls_utils::{Error, HlsResult};

/// Convert the IR back into a program definition. Attributes are copied
/// verbatim so that every record and marker survives a round trip through
/// [def_to_ir](crate::from_def::def_to_ir).
pub fn ir_to_def(prog: &Program) -> HlsResult<ProgramDef> {
    let functions = prog
        .functions()
        .map(|(idx, func)| {
            let body = func
                .body()
                .iter()
                .map(|n| {
                    let node = prog.node(*n);
                    let kind = match &node.kind {
                        NodeKind::Channel => KindDef::Channel,
                        NodeKind::Read => KindDef::Read,
                        NodeKind::Write => KindDef::Write,
                        NodeKind::Call(callee) => {
                            KindDef::Call(prog.func(*callee).name)
                        }
                        NodeKind::Return => KindDef::Return,
                        NodeKind::Loop => KindDef::Loop,
                        NodeKind::Op(name) => KindDef::Op(*name),
                    };
                    let operands = node
                        .operands()
                        .iter()
                        .map(|v| value_ref(prog, idx, *v))
                        .collect::<HlsResult<_>>()?;
                    let results = node
                        .results()
                        .iter()
                        .map(|v| prog.value(*v).ty.clone())
                        .collect();
                    Ok(NodeDef {
                        kind,
                        operands,
                        results,
                        attributes: node.attributes.clone(),
                    })
                })
                .collect::<HlsResult<_>>()?;
            Ok(FunctionDef {
                name: func.name,
                params: func
                    .params()
                    .iter()
                    .map(|v| prog.value(*v).ty.clone())
                    .collect(),
                returns: func.return_types.clone(),
                attributes: func.attributes.clone(),
                body,
            })
        })
        .collect::<HlsResult<_>>()?;
    Ok(ProgramDef { functions })
}

fn value_ref(prog: &Program, func: FuncIdx, value: ValueIdx) -> HlsResult<ValueRef> {
    let foreign = || {
        Error::malformed_structure(format!(
            "{} is used outside of function `{}' where it is defined",
            prog.describe_value(value),
            prog.func(func).name
        ))
    };
    match prog.value(value).def {
        ValueDef::Param { func: owner, index } if owner == func => {
            Ok(ValueRef::Param { param: index })
        }
        ValueDef::Result { node, index } if prog.node(node).parent == func => {
            let pos = prog.position_in_body(node).ok_or_else(foreign)?;
            Ok(ValueRef::Result {
                node: pos,
                result: index,
            })
        }
        _ => Err(foreign()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::from_def::def_to_ir;
    use crate::{Builder, HlsAttributes, Type};

    #[test]
    fn attributes_round_trip() {
        let mut prog = Program::default();
        let mut b = Builder::new(&mut prog);
        let chan_ty = Type::channel(Type::Int(16));
        let sink = b.add_function("sink", vec![chan_ty.clone()], vec![]).unwrap();
        let p = b.param(sink, 0);
        b.add_read(sink, p).unwrap();
        let top = b.add_function("top", vec![], vec![]).unwrap();
        let (decl, chan) = b.add_channel(top, Type::Int(16));
        let call = b.add_call(top, sink, &[chan]);
        let lp = b.add_loop(top);

        prog.func_mut(top).set_top_func();
        prog.func_mut(top).set_func_directive_fields(false, 2, true);
        prog.func_mut(sink).set_runtime();
        prog.node_mut(decl).set_resource_fields(0, 0, 1);
        prog.node_mut(call).set_timing_fields(1, 4, 3, 1);
        prog.node_mut(lp).set_loop_info_fields(256, 3, 1);
        prog.node_mut(lp).set_loop_directive_fields(true, 1, false, true);
        prog.node_mut(lp).set_parallel();

        let def = ir_to_def(&prog).unwrap();
        let json = serde_json::to_string(&def).unwrap();
        let back = def_to_ir(serde_json::from_str(&json).unwrap()).unwrap();
        assert_eq!(ir_to_def(&back).unwrap(), def);

        let top = back.find_function("top".into()).unwrap();
        let body = back.func(top).body();
        assert!(back.func(top).has_top_func());
        assert_eq!(back.node(body[1]).timing().map(|t| t.latency), Some(3));
        assert_eq!(back.node(body[2]).loop_info().map(|l| l.min_ii), Some(1));
        assert!(back.node(body[2]).has_parallel());
        assert!(back.node(body[0]).loop_info().is_none());
    }

    #[test]
    fn values_from_other_functions_are_rejected() {
        let mut prog = Program::default();
        let mut b = Builder::new(&mut prog);
        let f = b.add_function("f", vec![Type::Index], vec![]).unwrap();
        let g = b.add_function("g", vec![], vec![]).unwrap();
        let p = b.param(f, 0);
        b.add_op(g, "hls.use", &[p], vec![]);
        assert!(ir_to_def(&prog).is_err());
    }
}
