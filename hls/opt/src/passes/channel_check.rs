use crate::analysis::ChannelTopology;
use crate::traversal::{DiagnosticPass, Diagnostics, Named, Pass};
use hls_ir as ir;
use hls_utils::{Error, HlsResult};

/// Resolves every declared channel across function boundaries. Channels that
/// flow around a recursive call cycle are errors. Channels that nothing reads
/// from or nothing writes into are reported as warnings.
#[derive(Default)]
pub struct ChannelCheck {
    diag: Diagnostics,
}

impl Named for ChannelCheck {
    fn name() -> &'static str {
        "channel-check"
    }

    fn description() -> &'static str {
        "Check that every stream channel resolves to readers and writers."
    }
}

impl DiagnosticPass for ChannelCheck {
    fn take_diagnostics(&mut self) -> Diagnostics {
        std::mem::take(&mut self.diag)
    }
}

impl Pass for ChannelCheck {
    fn precondition(prog: &ir::Program) -> Option<String> {
        if prog.nodes().any(|(_, node)| ir::declares_channel(&node.kind)) {
            None
        } else {
            Some("no channels are declared".to_string())
        }
    }

    fn run(&mut self, prog: &mut ir::Program) -> HlsResult<()> {
        let topology = ChannelTopology::new(prog);
        for info in topology.iter() {
            let endpoints = match &info.endpoints {
                Ok(endpoints) => endpoints,
                Err(err) => {
                    self.diag.err(err.clone());
                    continue;
                }
            };
            // Channels handed to opaque operations may be accessed there.
            if !endpoints.others.is_empty() {
                continue;
            }
            if endpoints.readers.is_empty() {
                self.diag.warning(Error::misc(format!(
                    "Channel declared by {} is never read",
                    prog.describe_node(info.decl)
                )));
            }
            if endpoints.writers.is_empty() {
                self.diag.warning(Error::misc(format!(
                    "Channel declared by {} is never written",
                    prog.describe_node(info.decl)
                )));
            }
        }
        log::debug!("checked {} channels", topology.len());
        Ok(())
    }
}
