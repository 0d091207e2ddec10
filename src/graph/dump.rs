// src/graph/dump.rs
// =============================================================================
// Plain-text adjacency dump of a finished graph.
//
// One line per vertex:
//
//   example.com;a.com,b.com;c.com
//   ^ domain    ^ incoming  ^ outgoing
//
// Fields are separated by ';', list entries by ','. An empty list is an empty
// field, so a vertex with no edges is written as "example.com;;".
// Line order is whatever the index hands back and carries no meaning.
//
// Files are opened in append mode: running several crawls against the same
// output path stacks their dumps.
// =============================================================================

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::error::DumpError;

use super::digraph::Digraph;

impl Digraph {
    // Renders every vertex as one dump line, each terminated by '\n'
    pub fn serialize(&self) -> String {
        let mut out = String::new();
        for vertex in self.snapshot() {
            out.push_str(&vertex.dump_line());
            out.push('\n');
        }
        out
    }

    // Appends the dump to `path`, creating the file if it does not exist
    pub fn write_dump(&self, path: impl AsRef<Path>) -> Result<(), DumpError> {
        let path = path.as_ref();
        let io_error = |source| DumpError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(io_error)?;

        file.write_all(self.serialize().as_bytes()).map_err(io_error)?;
        Ok(())
    }

    // Rebuilds a graph from dump text
    //
    // Domains that only show up inside someone's edge list still get a vertex,
    // so a truncated dump stays queryable. Blank lines are skipped.
    pub fn from_dump(text: &str) -> Result<Self, DumpError> {
        let graph = Digraph::new();

        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let malformed = || DumpError::Malformed {
                line: index + 1,
                content: line.to_string(),
            };

            let mut fields = line.split(';');
            let (Some(domain), Some(incoming), Some(outgoing), None) =
                (fields.next(), fields.next(), fields.next(), fields.next())
            else {
                return Err(malformed());
            };
            if domain.is_empty() {
                return Err(malformed());
            }

            let (vertex, _) = graph.get_or_insert(domain);

            for source in split_list(incoming) {
                let (source, _) = graph.get_or_insert(source);
                vertex.push_incoming_name(source.element_arc());
            }
            for target in split_list(outgoing) {
                let (target, _) = graph.get_or_insert(target);
                vertex.push_outgoing_name(target.element_arc());
            }
        }

        Ok(graph)
    }

    // Reads a dump file from disk
    pub fn load_dump(path: impl AsRef<Path>) -> Result<Self, DumpError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| DumpError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_dump(&text)
    }
}

fn split_list(field: &str) -> impl Iterator<Item = &str> {
    field.split(',').filter(|entry| !entry.is_empty())
}
