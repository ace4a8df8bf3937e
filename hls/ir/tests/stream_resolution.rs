use hls_ir::{
    self as ir, Builder, ChannelEndpoints, FuncIdx, NodeIdx, Program, Type,
    ValueIdx,
};
use hls_utils::ErrorKind;

fn i32_chan() -> Type {
    Type::channel(Type::Int(32))
}

fn users(prog: &Program, chan: ValueIdx) -> Vec<NodeIdx> {
    ir::stream_channel_users(prog, chan).unwrap()
}

fn sorted(mut nodes: Vec<NodeIdx>) -> Vec<NodeIdx> {
    nodes.sort();
    nodes
}

#[test]
fn direct_users() {
    let mut prog = Program::default();
    let mut b = Builder::new(&mut prog);
    let top = b.add_function("top", vec![], vec![]).unwrap();
    let (decl, chan) = b.add_channel(top, Type::Int(32));
    let (read, data) = b.add_read(top, chan).unwrap();
    let write = b.add_write(top, chan, data);

    assert_eq!(users(&prog, chan), vec![read, write]);
    assert_eq!(ir::channel_users(&prog, decl).unwrap(), vec![read, write]);
}

#[test]
fn call_argument_pass_through() {
    let mut prog = Program::default();
    let mut b = Builder::new(&mut prog);
    let f = b
        .add_function("f", vec![Type::Index, Type::Int(8), i32_chan()], vec![])
        .unwrap();
    let p2 = b.param(f, 2);
    let (x, _) = b.add_read(f, p2).unwrap();

    let top = b.add_function("top", vec![Type::Index, Type::Int(8)], vec![]).unwrap();
    let (a0, a1) = (b.param(top, 0), b.param(top, 1));
    let (_, chan) = b.add_channel(top, Type::Int(32));
    let call = b.add_call(top, f, &[a0, a1, chan]);

    let found = users(&prog, chan);
    assert_eq!(found, vec![x]);
    assert!(!found.contains(&call));
}

#[test]
fn return_pass_through_reaches_every_call_site() {
    let mut prog = Program::default();
    let mut b = Builder::new(&mut prog);
    let f = b.add_function("f", vec![], vec![i32_chan()]).unwrap();
    let (_, inner) = b.add_channel(f, Type::Int(32));
    let (w, _) = {
        let zero = b.add_op(f, "arith.constant", &[], vec![Type::Int(32)]);
        let zero = b.result(zero, 0);
        (b.add_write(f, inner, zero), zero)
    };
    b.add_return(f, &[inner]);

    let g1 = b.add_function("g1", vec![], vec![]).unwrap();
    let c1 = b.add_call(g1, f, &[]);
    let r1 = b.result(c1, 0);
    let (y1, _) = b.add_read(g1, r1).unwrap();

    let g2 = b.add_function("g2", vec![], vec![]).unwrap();
    let c2 = b.add_call(g2, f, &[]);
    let r2 = b.result(c2, 0);
    let (y2, _) = b.add_read(g2, r2).unwrap();

    assert_eq!(users(&prog, inner), vec![w, y1, y2]);
}

/// Builds `depth` nested functions `wrap_k(chan)` each forwarding the channel
/// to `wrap_{k-1}`, with a reader at the innermost level.
fn nested_calls(prog: &mut Program, depth: usize) -> (FuncIdx, NodeIdx) {
    let mut b = Builder::new(prog);
    let leaf = b.add_function("leaf", vec![i32_chan()], vec![]).unwrap();
    let p = b.param(leaf, 0);
    let (reader, _) = b.add_read(leaf, p).unwrap();
    let mut inner = leaf;
    for k in 0..depth {
        let f = b
            .add_function(format!("wrap{k}"), vec![i32_chan()], vec![])
            .unwrap();
        let p = b.param(f, 0);
        b.add_call(f, inner, &[p]);
        inner = f;
    }
    (inner, reader)
}

#[test]
fn chained_calls_and_returns() {
    let mut prog = Program::default();
    let (outer, reader) = nested_calls(&mut prog, 3);
    let mut b = Builder::new(&mut prog);

    // Three levels of returns: make0 declares, make1/make2 forward the result.
    let make0 = b.add_function("make0", vec![], vec![i32_chan()]).unwrap();
    let (_, chan) = b.add_channel(make0, Type::Int(32));
    b.add_return(make0, &[chan]);
    let mut maker = make0;
    for k in 1..3 {
        let f = b
            .add_function(format!("make{k}"), vec![], vec![i32_chan()])
            .unwrap();
        let c = b.add_call(f, maker, &[]);
        let r = b.result(c, 0);
        b.add_return(f, &[r]);
        maker = f;
    }

    let top = b.add_function("top", vec![], vec![]).unwrap();
    let c = b.add_call(top, maker, &[]);
    let made = b.result(c, 0);
    b.add_call(top, outer, &[made]);

    assert_eq!(users(&prog, chan), vec![reader]);
    let eps = ChannelEndpoints::resolve(&prog, chan).unwrap();
    assert_eq!(eps.readers, vec![reader]);
    assert!(eps.writers.is_empty());
}

#[test]
fn diamond_call_graph_reports_each_user_once() {
    let mut prog = Program::default();
    let mut b = Builder::new(&mut prog);
    let sink = b.add_function("sink", vec![i32_chan()], vec![]).unwrap();
    let p = b.param(sink, 0);
    let (reader, _) = b.add_read(sink, p).unwrap();

    let mut mids = vec![];
    for name in ["left", "right"] {
        let f = b.add_function(name, vec![i32_chan()], vec![]).unwrap();
        let p = b.param(f, 0);
        b.add_call(f, sink, &[p]);
        mids.push(f);
    }

    let top = b.add_function("top", vec![], vec![]).unwrap();
    let (_, chan) = b.add_channel(top, Type::Int(32));
    for f in &mids {
        b.add_call(top, *f, &[chan]);
    }
    let (direct, _) = b.add_read(top, chan).unwrap();

    assert_eq!(sorted(users(&prog, chan)), sorted(vec![reader, direct]));
}

#[test]
fn self_recursion_is_detected() {
    let mut prog = Program::default();
    let mut b = Builder::new(&mut prog);
    let f = b.add_function("f", vec![i32_chan()], vec![]).unwrap();
    let p = b.param(f, 0);
    b.add_read(f, p).unwrap();
    b.add_call(f, f, &[p]);

    let top = b.add_function("top", vec![], vec![]).unwrap();
    let (_, chan) = b.add_channel(top, Type::Int(32));
    b.add_call(top, f, &[chan]);

    let err = ir::stream_channel_users(&prog, chan).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::RecursiveChannel { .. }));
}

#[test]
fn mutual_recursion_is_detected() {
    let mut prog = Program::default();
    let mut b = Builder::new(&mut prog);
    let even = b.add_function("even", vec![i32_chan()], vec![]).unwrap();
    let odd = b.add_function("odd", vec![i32_chan()], vec![]).unwrap();
    let pe = b.param(even, 0);
    b.add_call(even, odd, &[pe]);
    let po = b.param(odd, 0);
    b.add_call(odd, even, &[po]);

    let top = b.add_function("top", vec![], vec![]).unwrap();
    let (decl, chan) = b.add_channel(top, Type::Int(32));
    b.add_call(top, even, &[chan]);

    let err = ir::channel_users(&prog, decl).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::RecursiveChannel { .. }));
    assert!(err.to_string().contains("top"));
}

#[test]
fn identity_function_applied_twice_resolves() {
    // id(id(c)) calls the same function twice but nothing is recursive.
    let mut prog = Program::default();
    let mut b = Builder::new(&mut prog);
    let id = b.add_function("id", vec![i32_chan()], vec![i32_chan()]).unwrap();
    let p = b.param(id, 0);
    b.add_return(id, &[p]);

    let top = b.add_function("top", vec![], vec![]).unwrap();
    let (_, chan) = b.add_channel(top, Type::Int(32));
    let c1 = b.add_call(top, id, &[chan]);
    let r1 = b.result(c1, 0);
    let c2 = b.add_call(top, id, &[r1]);
    let r2 = b.result(c2, 0);
    let (reader, _) = b.add_read(top, r2).unwrap();

    assert_eq!(users(&prog, chan), vec![reader]);
}

#[test]
fn shared_pass_through_in_caller_and_callee() {
    // top: a = id(c); g(a)   g(y): z = id(y); read z
    let mut prog = Program::default();
    let mut b = Builder::new(&mut prog);
    let id = b.add_function("id", vec![i32_chan()], vec![i32_chan()]).unwrap();
    let p = b.param(id, 0);
    b.add_return(id, &[p]);

    let g = b.add_function("g", vec![i32_chan()], vec![]).unwrap();
    let y = b.param(g, 0);
    let cz = b.add_call(g, id, &[y]);
    let z = b.result(cz, 0);
    let (reader, _) = b.add_read(g, z).unwrap();

    let top = b.add_function("top", vec![], vec![]).unwrap();
    let (decl, chan) = b.add_channel(top, Type::Int(32));
    let ca = b.add_call(top, id, &[chan]);
    let a = b.result(ca, 0);
    b.add_call(top, g, &[a]);

    assert_eq!(users(&prog, chan), vec![reader]);
    assert_eq!(ir::channel_users(&prog, decl).unwrap(), vec![reader]);
}

#[test]
fn recursion_through_a_pass_through_is_detected() {
    // f(p) forwards p through id and back into f.
    let mut prog = Program::default();
    let mut b = Builder::new(&mut prog);
    let id = b.add_function("id", vec![i32_chan()], vec![i32_chan()]).unwrap();
    let p = b.param(id, 0);
    b.add_return(id, &[p]);

    let f = b.add_function("f", vec![i32_chan()], vec![]).unwrap();
    let pf = b.param(f, 0);
    let c = b.add_call(f, id, &[pf]);
    let r = b.result(c, 0);
    b.add_call(f, f, &[r]);

    let top = b.add_function("top", vec![], vec![]).unwrap();
    let (_, chan) = b.add_channel(top, Type::Int(32));
    b.add_call(top, f, &[chan]);

    let err = ir::stream_channel_users(&prog, chan).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::RecursiveChannel { .. }));
}

#[test]
fn identity_function_used_once_resolves() {
    let mut prog = Program::default();
    let mut b = Builder::new(&mut prog);
    let id = b.add_function("id", vec![i32_chan()], vec![i32_chan()]).unwrap();
    let p = b.param(id, 0);
    b.add_return(id, &[p]);

    let top = b.add_function("top", vec![], vec![]).unwrap();
    let (_, chan) = b.add_channel(top, Type::Int(32));
    let c = b.add_call(top, id, &[chan]);
    let r = b.result(c, 0);
    let (reader, _) = b.add_read(top, r).unwrap();

    assert_eq!(users(&prog, chan), vec![reader]);
}
