use hls_ir::{self as ir, ChannelEndpoints, NodeIdx, ValueIdx};
use hls_utils::HlsResult;

/// A channel declaration together with the outcome of resolving its users.
pub struct ChannelInfo {
    pub decl: NodeIdx,
    pub channel: ValueIdx,
    pub endpoints: HlsResult<ChannelEndpoints>,
}

/// Resolved endpoints of every channel declared in a program.
///
/// Nodes that claim to declare a channel but break the declaration contract
/// are left out.
#[derive(Default)]
pub struct ChannelTopology {
    channels: Vec<ChannelInfo>,
}

impl ChannelTopology {
    pub fn new(prog: &ir::Program) -> Self {
        let channels = prog
            .nodes()
            .filter(|(idx, node)| {
                ir::declares_channel(&node.kind)
                    && ir::verify_channel_decl(prog, *idx).is_ok()
            })
            .map(|(decl, node)| {
                let channel = node.results()[0];
                let endpoints = ChannelEndpoints::resolve(prog, channel);
                if let Err(err) = &endpoints {
                    log::debug!("{}: {err}", prog.describe_node(decl));
                }
                ChannelInfo {
                    decl,
                    channel,
                    endpoints,
                }
            })
            .collect();
        Self { channels }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChannelInfo> {
        self.channels.iter()
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Endpoints of the channel declared by `decl`.
    pub fn get(&self, decl: NodeIdx) -> Option<&HlsResult<ChannelEndpoints>> {
        self.channels
            .iter()
            .find(|info| info.decl == decl)
            .map(|info| &info.endpoints)
    }

    /// Channels whose users could be resolved.
    pub fn resolved(
        &self,
    ) -> impl Iterator<Item = (&ChannelInfo, &ChannelEndpoints)> {
        self.channels
            .iter()
            .filter_map(|info| info.endpoints.as_ref().ok().map(|e| (info, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hls_ir::{Builder, Program, Type};

    #[test]
    fn resolves_each_declaration() {
        let mut prog = Program::default();
        let mut b = Builder::new(&mut prog);
        let sink = b
            .add_function("sink", vec![Type::channel(Type::Int(8))], vec![])
            .unwrap();
        let p = b.param(sink, 0);
        let (reader, _) = b.add_read(sink, p).unwrap();

        let top = b.add_function("top", vec![], vec![]).unwrap();
        let (used, chan) = b.add_channel(top, Type::Int(8));
        let (unused, _) = b.add_channel(top, Type::Int(8));
        b.add_call(top, sink, &[chan]);
        // Claims to declare a channel but produces nothing.
        let bad = b.add_node(top, ir::NodeKind::Channel, &[], vec![]);

        let topo = ChannelTopology::new(&prog);
        assert_eq!(topo.len(), 2);
        assert!(topo.get(bad).is_none());
        let eps = topo.get(used).unwrap().as_ref().unwrap();
        assert_eq!(eps.readers, vec![reader]);
        let eps = topo.get(unused).unwrap().as_ref().unwrap();
        assert!(eps.readers.is_empty() && eps.writers.is_empty());
        assert_eq!(topo.resolved().count(), 2);
    }
}
