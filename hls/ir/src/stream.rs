//! Stream channels.
//!
//! A node declares a channel when it has exactly one result and that result
//! is of channel type. The effective users of a channel are found by
//! following it through call arguments into callees and through returns
//! out to every call site of the returning function.
use crate::structure::{FuncIdx, NodeIdx, NodeKind, Program, Use, ValueIdx};
use hls_utils::{Error, HlsResult};
use std::collections::HashSet;

/// Whether nodes of this kind claim to declare a stream channel.
pub fn declares_channel(kind: &NodeKind) -> bool {
    matches!(kind, NodeKind::Channel)
}

/// Check that `node` has the shape of a channel declaration: exactly one
/// result, of channel type.
pub fn verify_channel_decl(prog: &Program, node: NodeIdx) -> HlsResult<()> {
    let results = prog.node(node).results();
    if results.len() != 1 {
        return Err(Error::malformed_structure(format!(
            "{} declares a channel but has {} results",
            prog.describe_node(node),
            results.len()
        )));
    }
    let ty = &prog.value(results[0]).ty;
    if !ty.is_channel() {
        return Err(Error::malformed_structure(format!(
            "{} declares a channel but its result has type {ty}",
            prog.describe_node(node),
        )));
    }
    Ok(())
}

/// All effective users of the channel declared by `node`.
pub fn channel_users(prog: &Program, node: NodeIdx) -> HlsResult<Vec<NodeIdx>> {
    verify_channel_decl(prog, node)?;
    stream_channel_users(prog, prog.node(node).results()[0])
}

/// A position through which a channel crosses a function boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Port {
    /// Passed in as parameter `i`.
    Param(usize),
    /// Passed out as return value `i`.
    Return(usize),
}

type PortKey = (FuncIdx, Port);

/// Functions the channel entered through a parameter on the current path,
/// outermost first.
type Chain = Vec<FuncIdx>;

enum Frame {
    /// Visit every use of a value.
    Value(ValueIdx, Chain),
    /// Visit a single use.
    Use(Use, Chain),
}

/// Compute the effective users of `channel`.
///
/// A use as a call argument continues with the matching parameter inside the
/// callee. A use as a return operand continues with the matching result at
/// every call site of the returning function. Every other use is a user.
/// Users are reported once each, in depth-first discovery order.
///
/// Every port is expanded at most once: what a port reaches does not depend
/// on how the traversal got there. Fails if the channel is passed into a
/// function it already entered through a parameter on the current path,
/// which means it flows around a recursive call cycle.
pub fn stream_channel_users(
    prog: &Program,
    channel: ValueIdx,
) -> HlsResult<Vec<NodeIdx>> {
    let mut users = Vec::new();
    let mut found: HashSet<NodeIdx> = HashSet::new();
    let mut visited: HashSet<PortKey> = HashSet::new();

    let mut stack = vec![Frame::Value(channel, Chain::new())];
    while let Some(frame) = stack.pop() {
        let (Use { user, operand }, chain) = match frame {
            Frame::Value(value, chain) => {
                let uses = prog.value(value).uses();
                stack.extend(
                    uses.iter().rev().map(|u| Frame::Use(*u, chain.clone())),
                );
                continue;
            }
            Frame::Use(u, chain) => (u, chain),
        };

        let node = prog.node(user);
        let (key, next, chain) = match node.kind {
            NodeKind::Call(callee) => {
                let params = prog.func(callee).params();
                let Some(param) = params.get(operand) else {
                    return Err(Error::malformed_structure(format!(
                        "{} passes {} arguments to `{}' which takes {}",
                        prog.describe_node(user),
                        node.operands().len(),
                        prog.func(callee).name,
                        params.len()
                    )));
                };
                if chain.contains(&callee) {
                    return Err(Error::recursive_channel(
                        prog.describe_value(channel),
                        format!(
                            "re-entered {} of function `{}'",
                            describe_port(Port::Param(operand)),
                            prog.func(callee).name
                        ),
                    ));
                }
                let mut inner = chain;
                inner.push(callee);
                ((callee, Port::Param(operand)), vec![*param], inner)
            }
            NodeKind::Return => {
                let func = node.parent;
                let mut results = Vec::new();
                for site in prog.call_sites(func) {
                    let Some(res) = prog.node(site).results().get(operand)
                    else {
                        return Err(Error::malformed_structure(format!(
                            "{} has no result {operand} matching the return of `{}'",
                            prog.describe_node(site),
                            prog.func(func).name
                        )));
                    };
                    results.push(*res);
                }
                // Leaving `func` also leaves everything entered after it.
                let mut outer = chain;
                if let Some(pos) = outer.iter().position(|f| *f == func) {
                    outer.truncate(pos);
                }
                ((func, Port::Return(operand)), results, outer)
            }
            _ => {
                if found.insert(user) {
                    users.push(user);
                }
                continue;
            }
        };

        if !visited.insert(key) {
            log::trace!(
                "{} of `{}' already visited",
                describe_port(key.1),
                prog.func(key.0).name
            );
            continue;
        }
        log::trace!(
            "following {} through {} of `{}'",
            prog.describe_value(channel),
            describe_port(key.1),
            prog.func(key.0).name
        );
        stack.extend(
            next.into_iter()
                .rev()
                .map(|value| Frame::Value(value, chain.clone())),
        );
    }

    log::debug!(
        "{} resolved to {} users",
        prog.describe_value(channel),
        users.len()
    );
    Ok(users)
}

fn describe_port(port: Port) -> String {
    match port {
        Port::Param(i) => format!("parameter {i}"),
        Port::Return(i) => format!("return value {i}"),
    }
}

/// The effective users of a channel grouped by how they access it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelEndpoints {
    /// Nodes reading from the channel.
    pub readers: Vec<NodeIdx>,
    /// Nodes writing into the channel.
    pub writers: Vec<NodeIdx>,
    /// Any other node using the channel.
    pub others: Vec<NodeIdx>,
}

impl ChannelEndpoints {
    /// Group `users` by node kind.
    pub fn classify(prog: &Program, users: &[NodeIdx]) -> Self {
        let mut endpoints = ChannelEndpoints::default();
        for user in users {
            match prog.node(*user).kind {
                NodeKind::Read => endpoints.readers.push(*user),
                NodeKind::Write => endpoints.writers.push(*user),
                _ => endpoints.others.push(*user),
            }
        }
        endpoints
    }

    /// Resolve and group the users of `channel`.
    pub fn resolve(prog: &Program, channel: ValueIdx) -> HlsResult<Self> {
        let users = stream_channel_users(prog, channel)?;
        Ok(Self::classify(prog, &users))
    }

    /// Number of nodes reading from the channel.
    pub fn fan_out(&self) -> usize {
        self.readers.len()
    }

    /// Number of nodes writing into the channel.
    pub fn fan_in(&self) -> usize {
        self.writers.len()
    }

    /// Exactly one writer and one reader.
    pub fn is_point_to_point(&self) -> bool {
        self.fan_in() == 1 && self.fan_out() == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Builder, Type};

    #[test]
    fn contract_accepts_single_channel_result() {
        let mut prog = Program::default();
        let mut b = Builder::new(&mut prog);
        let f = b.add_function("f", vec![], vec![]).unwrap();
        let (decl, _) = b.add_channel(f, Type::Int(32));
        assert!(verify_channel_decl(&prog, decl).is_ok());
        assert!(declares_channel(&prog.node(decl).kind));
    }

    #[test]
    fn contract_rejects_other_shapes() {
        let mut prog = Program::default();
        let mut b = Builder::new(&mut prog);
        let f = b.add_function("f", vec![], vec![]).unwrap();
        let none = b.add_node(f, NodeKind::Channel, &[], vec![]);
        let two = b.add_node(
            f,
            NodeKind::Channel,
            &[],
            vec![Type::channel(Type::Int(8)), Type::channel(Type::Int(8))],
        );
        let scalar = b.add_node(f, NodeKind::Channel, &[], vec![Type::Int(8)]);
        for node in [none, two, scalar] {
            assert!(verify_channel_decl(&prog, node).is_err());
            assert!(channel_users(&prog, node).is_err());
        }
    }

    #[test]
    fn unused_channel_has_no_users() {
        let mut prog = Program::default();
        let mut b = Builder::new(&mut prog);
        let f = b.add_function("f", vec![], vec![]).unwrap();
        let (decl, _) = b.add_channel(f, Type::Index);
        assert_eq!(channel_users(&prog, decl).unwrap(), vec![]);
    }

    #[test]
    fn endpoints_split_by_kind() {
        let mut prog = Program::default();
        let mut b = Builder::new(&mut prog);
        let f = b.add_function("f", vec![], vec![]).unwrap();
        let (_, chan) = b.add_channel(f, Type::Int(32));
        let (r1, data) = b.add_read(f, chan).unwrap();
        let (r2, _) = b.add_read(f, chan).unwrap();
        let w = b.add_write(f, chan, data);
        let other = b.add_op(f, "hls.debug", &[chan], vec![]);

        let ends = ChannelEndpoints::resolve(&prog, chan).unwrap();
        assert_eq!(ends.readers, vec![r1, r2]);
        assert_eq!(ends.writers, vec![w]);
        assert_eq!(ends.others, vec![other]);
        assert_eq!((ends.fan_in(), ends.fan_out()), (1, 2));
        assert!(!ends.is_point_to_point());
    }
}
