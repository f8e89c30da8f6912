mod dot;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct FrameId(pub usize);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Seed node holding the initial value of a run.
    Input,
    Step,
    /// Fan-in point of parallel or for-each branches.
    Merge,
}

#[derive(Debug, Clone, Serialize)]
pub struct TraceNode {
    pub id: NodeId,
    pub label: String,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, Serialize)]
pub struct TraceEdge {
    pub from: NodeId,
    pub to: NodeId,
    pub label: String,
}

/// A named scope grouping the nodes created while it was open.
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    pub id: FrameId,
    pub name: String,
    pub parent: Option<FrameId>,
    pub nodes: Vec<NodeId>,
    pub children: Vec<FrameId>,
    #[serde(skip)]
    closed: bool,
}

/// Where execution currently stands: the open frame new nodes go into and
/// the node the next edge starts from.
///
/// Cursors are plain values handed into and back out of every evaluation
/// step, so independent branches never share a head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub frame: FrameId,
    pub head: NodeId,
}

/// Append-only record of an interpretation.
#[derive(Debug, Clone, Serialize)]
pub struct TraceGraph {
    pub name: String,
    pub nodes: Vec<TraceNode>,
    pub edges: Vec<TraceEdge>,
    pub frames: Vec<Frame>,
}

impl TraceGraph {
    pub const MERGE_LABEL: &'static str = "gather";

    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        TraceGraph {
            frames: vec![Frame {
                id: FrameId(0),
                name: name.clone(),
                parent: None,
                nodes: Vec::new(),
                children: Vec::new(),
                closed: false,
            }],
            name,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn root_frame(&self) -> FrameId {
        FrameId(0)
    }

    /// Adds the input node to the root frame and returns a cursor on it.
    pub fn seed(&mut self, label: impl Into<String>) -> Cursor {
        let frame = self.root_frame();
        let head = self.add_node(frame, label, NodeKind::Input);
        Cursor { frame, head }
    }

    pub fn add_node(&mut self, frame: FrameId, label: impl Into<String>, kind: NodeKind) -> NodeId {
        debug_assert!(!self.frames[frame.0].closed, "node added to a closed frame");
        let id = NodeId(self.nodes.len());
        self.nodes.push(TraceNode {
            id,
            label: label.into(),
            kind,
        });
        self.frames[frame.0].nodes.push(id);
        id
    }

    pub fn add_edge(&mut self, from: NodeId, to: NodeId, label: impl Into<String>) {
        self.edges.push(TraceEdge {
            from,
            to,
            label: label.into(),
        });
    }

    /// Opens a frame nested in `cursor`'s frame, starting from its head.
    pub fn open_frame(&mut self, cursor: Cursor, name: impl Into<String>) -> Cursor {
        let id = FrameId(self.frames.len());
        self.frames.push(Frame {
            id,
            name: name.into(),
            parent: Some(cursor.frame),
            nodes: Vec::new(),
            children: Vec::new(),
            closed: false,
        });
        self.frames[cursor.frame.0].children.push(id);
        Cursor {
            frame: id,
            head: cursor.head,
        }
    }

    /// Closes the cursor's frame; the returned cursor sits in the parent
    /// frame at the closed frame's final head.
    pub fn close_frame(&mut self, cursor: Cursor) -> Cursor {
        let frame = &mut self.frames[cursor.frame.0];
        frame.closed = true;
        Cursor {
            frame: frame.parent.unwrap_or(cursor.frame),
            head: cursor.head,
        }
    }

    pub fn node(&self, id: NodeId) -> &TraceNode {
        &self.nodes[id.0]
    }

    pub fn frame(&self, id: FrameId) -> &Frame {
        &self.frames[id.0]
    }

    pub fn incoming(&self, id: NodeId) -> impl Iterator<Item = &TraceEdge> {
        self.edges.iter().filter(move |e| e.to == id)
    }

    pub fn outgoing(&self, id: NodeId) -> impl Iterator<Item = &TraceEdge> {
        self.edges.iter().filter(move |e| e.from == id)
    }

    pub fn step_labels(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Step)
            .map(|n| n.label.as_str())
            .collect()
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_and_step() {
        let mut graph = TraceGraph::new("run");
        let cursor = graph.seed("12");
        let step = graph.add_node(cursor.frame, "double", NodeKind::Step);
        graph.add_edge(cursor.head, step, "24");

        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.frame(graph.root_frame()).nodes, vec![cursor.head, step]);
        let edge: Vec<_> = graph.incoming(step).collect();
        assert_eq!(edge.len(), 1);
        assert_eq!(edge[0].label, "24");
    }

    #[test]
    fn test_frames_nest_and_close_to_parent() {
        let mut graph = TraceGraph::new("run");
        let root = graph.seed("x");
        let inner = graph.open_frame(root, "seq");
        assert_eq!(inner.head, root.head);

        let node = graph.add_node(inner.frame, "step", NodeKind::Step);
        let closed = graph.close_frame(Cursor { head: node, ..inner });

        assert_eq!(closed.frame, root.frame);
        assert_eq!(closed.head, node);
        assert_eq!(graph.frame(root.frame).children, vec![inner.frame]);
        assert_eq!(graph.frame(inner.frame).parent, Some(root.frame));
        assert_eq!(graph.frame(inner.frame).nodes, vec![node]);
    }

    #[test]
    fn test_json_export() {
        let mut graph = TraceGraph::new("run");
        graph.seed("1");
        let json = graph.to_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["nodes"][0]["kind"], "input");
        assert_eq!(parsed["frames"][0]["name"], "run");
    }
}
