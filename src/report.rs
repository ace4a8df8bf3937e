//! JSON summary of a program: function attributes and the resolved endpoints
//! of every stream channel.
use hls_ir::{self as ir, Attributes, Id, NodeIdx};
use hls_opt::analysis::ChannelTopology;
use serde::Serialize;

/// A node named by its function and position in the function body.
#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct NodeRef {
    pub function: Id,
    pub node: usize,
}

impl NodeRef {
    fn new(prog: &ir::Program, idx: NodeIdx) -> Self {
        NodeRef {
            function: prog.func(prog.node(idx).parent).name,
            node: prog.position_in_body(idx).unwrap_or_default(),
        }
    }
}

#[derive(Serialize)]
pub struct FunctionReport {
    pub name: Id,
    #[serde(skip_serializing_if = "Attributes::is_empty")]
    pub attributes: Attributes,
}

#[derive(Serialize)]
pub struct ChannelReport {
    pub decl: NodeRef,
    /// Type of the channel elements.
    pub element: String,
    pub readers: Vec<NodeRef>,
    pub writers: Vec<NodeRef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub others: Vec<NodeRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct Report {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<Id>,
    pub functions: Vec<FunctionReport>,
    pub channels: Vec<ChannelReport>,
}

impl Report {
    pub fn new(prog: &ir::Program) -> Self {
        let functions = prog
            .functions()
            .map(|(_, f)| FunctionReport {
                name: f.name,
                attributes: f.attributes.clone(),
            })
            .collect();

        let refs = |nodes: &[NodeIdx]| -> Vec<NodeRef> {
            nodes.iter().map(|n| NodeRef::new(prog, *n)).collect()
        };
        let channels = ChannelTopology::new(prog)
            .iter()
            .map(|info| {
                let element = prog
                    .value(info.channel)
                    .ty
                    .channel_elem()
                    .map(|t| t.to_string())
                    .unwrap_or_default();
                let (readers, writers, others, error) = match &info.endpoints
                {
                    Ok(eps) => (
                        refs(&eps.readers),
                        refs(&eps.writers),
                        refs(&eps.others),
                        None,
                    ),
                    Err(e) => (vec![], vec![], vec![], Some(e.to_string())),
                };
                ChannelReport {
                    decl: NodeRef::new(prog, info.decl),
                    element,
                    readers,
                    writers,
                    others,
                    error,
                }
            })
            .collect();

        Report {
            top: prog.top_function().map(|f| prog.func(f).name),
            functions,
            channels,
        }
    }
}
