//! Diff preview for dry runs.
//!
//! Line diff with three lines of context using the `similar` crate.

use similar::{ChangeTag, TextDiff};

/// Unified-style diff between two versions of a file.
///
/// Hunks are separated by `...`; an identical pair yields an empty string.
#[must_use]
pub fn generate_unified_diff(original: &str, modified: &str) -> String {
    let diff = TextDiff::from_lines(original, modified);
    let mut output = String::new();

    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            output.push_str("...\n");
        }
        for op in group {
            for change in diff.iter_changes(op) {
                let sign = match change.tag() {
                    ChangeTag::Delete => "-",
                    ChangeTag::Insert => "+",
                    ChangeTag::Equal => " ",
                };
                output.push_str(sign);
                // CRLF sources would otherwise print a stray `\r` per line.
                output.push_str(change.value().trim_end_matches(['\r', '\n']));
                output.push('\n');
            }
        }
    }

    output
}
