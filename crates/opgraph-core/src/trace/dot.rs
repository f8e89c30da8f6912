use super::{FrameId, NodeKind, TraceGraph};

fn escape(label: &str) -> String {
    label
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}

impl TraceGraph {
    /// Graphviz rendering: one cluster per frame, nested as the frames are,
    /// with every edge declared at the top level.
    pub fn to_dot(&self) -> String {
        let mut dot = String::new();
        dot.push_str(&format!("digraph \"{}\" {{\n", escape(&self.name)));
        dot.push_str("    rankdir=TB;\n");
        dot.push_str("    node [fontname=\"Helvetica\", fontsize=10];\n");
        dot.push_str("    edge [fontname=\"Helvetica\", fontsize=9];\n");
        dot.push('\n');

        self.write_frame_body(&mut dot, self.root_frame(), 1);

        for edge in &self.edges {
            dot.push_str(&format!(
                "    {} -> {} [label=\"{}\"];\n",
                edge.from,
                edge.to,
                escape(&edge.label)
            ));
        }

        dot.push_str("}\n");
        dot
    }

    fn write_frame_body(&self, dot: &mut String, id: FrameId, depth: usize) {
        let indent = "    ".repeat(depth);
        let frame = self.frame(id);

        for node_id in &frame.nodes {
            let node = self.node(*node_id);
            let (shape, style, color) = match node.kind {
                NodeKind::Input => ("ellipse", "filled", "lightgreen"),
                NodeKind::Step => ("box", "rounded", "white"),
                NodeKind::Merge => ("circle", "filled", "lightyellow"),
            };
            dot.push_str(&format!(
                "{}{} [label=\"{}\" shape={} style=\"{}\" fillcolor=\"{}\"];\n",
                indent,
                node.id,
                escape(&node.label),
                shape,
                style,
                color
            ));
        }

        for child in &frame.children {
            dot.push_str(&format!("{}subgraph cluster_{} {{\n", indent, child.0));
            dot.push_str(&format!(
                "{}    label=\"{}\";\n",
                indent,
                escape(&self.frame(*child).name)
            ));
            dot.push_str(&format!("{}    style=rounded;\n", indent));
            dot.push_str(&format!("{}    color=gray;\n", indent));
            self.write_frame_body(dot, *child, depth + 1);
            dot.push_str(&format!("{}}}\n", indent));
        }
    }
}
