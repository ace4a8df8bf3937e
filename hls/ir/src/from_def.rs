use crate::def::{FunctionDef, KindDef, NodeDef, ProgramDef, ValueRef};
use crate::{Builder, FuncIdx, NodeIdx, NodeKind, Program, ValueIdx};
use hls_utils::{Error, HlsResult, Id};

/// Construct the IR from a program definition.
///
/// All functions are declared first so that calls may refer to functions
/// defined later in the definition. Value references must point to
/// parameters or to results of nodes appearing earlier in the same body.
pub fn def_to_ir(def: ProgramDef) -> HlsResult<Program> {
    let mut prog = Program::default();
    let mut builder = Builder::new(&mut prog);

    let funcs = def
        .functions
        .iter()
        .map(|f| {
            let idx = builder.add_function(
                f.name,
                f.params.clone(),
                f.returns.clone(),
            )?;
            builder.program.func_mut(idx).attributes = f.attributes.clone();
            Ok(idx)
        })
        .collect::<HlsResult<Vec<_>>>()?;

    for (func, fdef) in funcs.into_iter().zip(def.functions) {
        build_body(&mut builder, func, fdef)?;
    }

    Ok(prog)
}

fn build_body(
    builder: &mut Builder,
    func: FuncIdx,
    fdef: FunctionDef,
) -> HlsResult<()> {
    let mut nodes: Vec<NodeIdx> = Vec::with_capacity(fdef.body.len());
    for (pos, ndef) in fdef.body.into_iter().enumerate() {
        let NodeDef {
            kind,
            operands,
            results,
            attributes,
        } = ndef;
        let operands = operands
            .iter()
            .map(|r| resolve_ref(builder, func, &nodes, *r))
            .collect::<HlsResult<Vec<_>>>()
            .map_err(|e| {
                e.with_post_msg(Some(format!(
                    "while building node {pos} of function `{}'",
                    fdef.name
                )))
            })?;
        let kind = match kind {
            KindDef::Channel => NodeKind::Channel,
            KindDef::Read => NodeKind::Read,
            KindDef::Write => NodeKind::Write,
            KindDef::Call(callee) => NodeKind::Call(find_callee(builder, callee)?),
            KindDef::Return => NodeKind::Return,
            KindDef::Loop => NodeKind::Loop,
            KindDef::Op(name) => NodeKind::Op(name),
        };
        let results = match (&kind, results.is_empty()) {
            (NodeKind::Call(callee), true) => {
                builder.program.func(*callee).return_types.clone()
            }
            _ => results,
        };
        let node = builder.add_node(func, kind, &operands, results);
        builder.program.node_mut(node).attributes = attributes;
        nodes.push(node);
    }
    Ok(())
}

fn find_callee(builder: &Builder, name: Id) -> HlsResult<FuncIdx> {
    builder
        .program
        .find_function(name)
        .ok_or_else(|| Error::undefined(name, "function"))
}

fn resolve_ref(
    builder: &Builder,
    func: FuncIdx,
    nodes: &[NodeIdx],
    r: ValueRef,
) -> HlsResult<ValueIdx> {
    let prog = &*builder.program;
    let fname = prog.func(func).name;
    match r {
        ValueRef::Param { param } => {
            prog.func(func).params().get(param).copied().ok_or_else(|| {
                Error::undefined(
                    Id::new(format!("{fname}.param{param}")),
                    "parameter",
                )
            })
        }
        ValueRef::Result { node, result } => {
            let Some(n) = nodes.get(node) else {
                return Err(Error::undefined(
                    Id::new(format!("{fname}.node{node}")),
                    "node (nodes may only use earlier nodes)",
                ));
            };
            prog.node(*n).results().get(result).copied().ok_or_else(|| {
                Error::undefined(
                    Id::new(format!("{fname}.node{node}.result{result}")),
                    "result",
                )
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HlsAttributes, Type, stream_channel_users};

    fn parse(json: &str) -> HlsResult<Program> {
        def_to_ir(serde_json::from_str(json)?)
    }

    #[test]
    fn builds_calls_to_later_functions() {
        let prog = parse(
            r#"{
              "functions": [
                {
                  "name": "top",
                  "attributes": { "markers": ["top_func"] },
                  "body": [
                    { "kind": "channel", "results": [{ "channel": { "int": 32 } }] },
                    { "kind": { "call": "consumer" }, "operands": [{ "node": 0 }] }
                  ]
                },
                {
                  "name": "consumer",
                  "params": [{ "channel": { "int": 32 } }],
                  "body": [
                    { "kind": "read", "operands": [{ "param": 0 }], "results": [{ "int": 32 }],
                      "attributes": { "timing": [0, 1, 1, 1] } }
                  ]
                }
              ]
            }"#,
        )
        .unwrap();

        let top = prog.find_function(Id::from("top")).unwrap();
        let consumer = prog.find_function(Id::from("consumer")).unwrap();
        assert_eq!(prog.top_function(), Some(top));
        let decl = prog.func(top).body()[0];
        let chan = prog.node(decl).results()[0];
        assert_eq!(prog.value(chan).ty, Type::channel(Type::Int(32)));

        let read = prog.func(consumer).body()[0];
        assert_eq!(stream_channel_users(&prog, chan).unwrap(), vec![read]);
        assert_eq!(prog.node(read).timing().map(|t| t.end), Some(1));
    }

    #[test]
    fn undefined_callee_is_reported() {
        let err = parse(
            r#"{ "functions": [ { "name": "top", "body": [ { "kind": { "call": "ghost" } } ] } ] }"#,
        )
        .unwrap_err();
        assert_eq!(err.message(), "Undefined function name: ghost");
    }

    #[test]
    fn forward_references_are_rejected() {
        let err = parse(
            r#"{ "functions": [ { "name": "top", "body": [
                 { "kind": { "op": "hls.use" }, "operands": [{ "node": 1 }] },
                 { "kind": "channel", "results": [{ "channel": "index" }] }
               ] } ] }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("while building node 0"));
    }

    #[test]
    fn duplicate_functions_are_rejected() {
        assert!(
            parse(r#"{ "functions": [ { "name": "f" }, { "name": "f" } ] }"#)
                .is_err()
        );
    }
}
