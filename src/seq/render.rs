//! Formatted output for sequences: the caller-controlled `render` form and
//! the boxed diagnostic that wraps it.

use std::fmt;

use humansize::{format_size, BINARY};

use crate::policy::Element;
use crate::MAX_PRINT_BUFFER;

use super::Sequence;

const RULE: &str = "------------------------------";

/// Render `value` through its policy, clipped to [`MAX_PRINT_BUFFER`] bytes.
pub(crate) fn clipped<T: Element>(value: &T) -> String {
    let mut text = value.to_string();
    if text.len() > MAX_PRINT_BUFFER {
        let mut cut = MAX_PRINT_BUFFER;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
    }
    text
}

impl<T: Element> Sequence<T> {
    /// Write `before`, then every element (separated by `separator`, a line
    /// break after each `break_limit` elements, 0 meaning never), then
    /// `after`. An empty sequence writes `empty` instead of elements.
    pub fn render(
        &self,
        out: &mut dyn fmt::Write,
        before: &str,
        after: &str,
        separator: &str,
        empty: &str,
        break_limit: usize,
    ) -> fmt::Result {
        out.write_str(before)?;

        if self.is_empty() {
            out.write_str(empty)?;
            out.write_char('\n')?;
        } else {
            let mut curr = 1;
            for (i, elem) in self.iter().enumerate() {
                write!(out, "{}", elem)?;
                if i + 1 < self.len() {
                    out.write_str(separator)?;
                }
                if curr == break_limit {
                    curr = 0;
                    out.write_char('\n')?;
                }
                curr += 1;
            }
        }

        out.write_str(after)
    }

    /// The boxed diagnostic: a header, one element per line, and a footer
    /// summarising size, capacity, element width and reserved footprint.
    pub fn render_diagnostic(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        let header = format!("\n{RULE}\nElements\n{RULE}\n");

        let bytes_label = if T::WIDTH == 1 { "byte" } else { "bytes" };
        let footprint = format_size(self.capacity() * T::WIDTH, BINARY);
        let footer = format!(
            "{RULE}\nSize\t\t{}\nCapacity\t{}\nElement size\t{} {}\nFootprint\t{}\n{RULE}\n",
            self.len(),
            self.capacity(),
            T::WIDTH,
            bytes_label,
            footprint,
        );

        out.write_str(&header)?;
        if self.is_empty() {
            out.write_str("--- Container is empty ---\n")?;
        } else {
            for elem in self.iter() {
                out.write_str(&clipped(elem))?;
                out.write_char('\n')?;
            }
        }
        out.write_str(&footer)
    }
}

impl<T: Element> fmt::Display for Sequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, elem) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", elem)?;
        }
        f.write_str("]")
    }
}
