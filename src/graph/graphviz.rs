//! Graphviz (`.dot`) rendering of a resource graph.
//!
//! Every node is a filled box colored by its operation, with its labels in an
//! HTML table. Out refs become edges labeled with the referencing field.
//! Label text is escaped, so error messages may contain markup characters.

use super::{Graph, GraphNode, Operation};
use std::fmt::Write;

/// Renders `graph` as a `.dot` document, nodes in ID order.
pub fn render(graph: &Graph) -> String {
    render_nodes(graph.all())
}

/// Renders `nodes` in the given order.
pub fn render_nodes<'a, N>(nodes: impl IntoIterator<Item = &'a N>) -> String
where
    N: GraphNode + ?Sized + 'a,
{
    let mut out = String::new();
    out.push_str("digraph G {\n");
    out.push_str("  rankdir=TB\n");

    for node in nodes {
        let mut labels = node.labels();
        let out_refs = node.out_refs();

        if let Ok(refs) = &out_refs {
            for r in refs {
                let _ = writeln!(
                    out,
                    "  \"{}\" -> \"{}\" [label=<{}>]",
                    node.id(),
                    r.to,
                    escape(&r.path.to_string())
                );
            }
        }

        let get_err = node.error();
        if get_err.is_some() || out_refs.is_err() {
            let mut errors = String::new();
            if let Some(e) = &get_err {
                let _ = write!(errors, "GetErr()={e} ");
            }
            if let Err(e) = &out_refs {
                let _ = write!(errors, "OutRefs()={e} ");
            }
            labels.insert("errors".to_string(), errors);
        }

        let _ = writeln!(out, "  \"{}\" [label=<", node.id());
        out.push_str("    <table border=\"0\">\n");
        out.push_str("      <tr><td colspan=\"2\"><font point-size=\"16\">\\N</font></td></tr>\n");
        out.push_str("      <tr><td colspan=\"2\">---</td></tr>\n");
        for (k, v) in &labels {
            let _ = writeln!(
                out,
                "      <tr><td>{}</td><td align=\"left\">{}</td></tr>",
                escape(k),
                escape(v)
            );
        }
        out.push_str("    </table>\n");
        let _ = writeln!(out, "  >,color={},shape=box,style=filled]", color(node.operation()));
    }

    out.push_str("}\n");
    out
}

/// Escapes text placed inside an HTML-like label.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
    out
}

fn color(op: Operation) -> &'static str {
    match op {
        Operation::Create => "chartreuse",
        Operation::Delete => "lightcoral",
        Operation::Recreate => "orange",
        Operation::Update => "khaki1",
        Operation::Nothing => "beige",
        Operation::Unknown => "red",
    }
}
