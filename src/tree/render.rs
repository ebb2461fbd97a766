//! Diagnostic output for trees: a boxed summary followed by an indented,
//! corner-labelled rendering of the node structure.

use std::fmt;

use humansize::{format_size, BINARY};

use crate::policy::Element;
use crate::seq::clipped;

use super::{min_node, max_node, Color, Link, OrderedTree};

const RULE: &str = "---------------------------";

impl<T: Element> OrderedTree<T> {
    /// Write the boxed diagnostic: summary figures, extrema, and the tree
    /// itself with `L----` / `R----` corner labels marking which child each
    /// node is and `(red)` marking red links. Nil children are printed so
    /// the shape is unambiguous.
    pub fn render(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        let root = match self.root.as_deref() {
            Some(n) => n,
            None => return write!(out, "\n\u{2205}\tno elements found\n\n"),
        };

        write!(out, "\n{RULE}\nOrdered Tree Elements\n{RULE}\n\n")?;
        render_link(&self.root, out, "", true)?;

        write!(out, "\n{RULE}\n")?;
        write!(out, "Minimum value\t\t{}\n", clipped(&min_node(root).value))?;
        write!(out, "Maximum value\t\t{}\n", clipped(&max_node(root).value))?;
        write!(out, "Root value\t\t{}\n\n", clipped(&root.value))?;

        let bytes_label = if T::WIDTH == 1 { "byte" } else { "bytes" };
        write!(
            out,
            "Size\t\t\t{}\nElement size\t\t{} {}\nHeight\t\t\t{}\nLeaf ct. (non nil)\t{}\nFootprint\t\t{}\n{RULE}\n",
            self.len(),
            T::WIDTH,
            bytes_label,
            self.height(),
            self.leaf_count(),
            format_size(self.len() * T::WIDTH, BINARY),
        )
    }
}

fn render_link<T: Element>(
    link: &Link<T>,
    out: &mut dyn fmt::Write,
    prefix: &str,
    last: bool,
) -> fmt::Result {
    out.write_str(prefix)?;
    out.write_str(if last { "R----" } else { "L----" })?;

    match link.as_deref() {
        Some(n) => {
            write!(out, "[{}]", clipped(&n.value))?;
            if n.color == Color::Red {
                out.write_str(" (red)")?;
            }
            out.write_char('\n')?;

            let child_prefix = format!("{}{}", prefix, if last { "      " } else { "|     " });
            render_link(&n.left, out, &child_prefix, false)?;
            render_link(&n.right, out, &child_prefix, true)
        }
        None => out.write_str("[nil]\n"),
    }
}

impl<T: Element> fmt::Display for OrderedTree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f)
    }
}
