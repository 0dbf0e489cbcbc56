//! A line-oriented command interpreter mapping textual instructions onto
//! the AVL tree's public operations. Instructions arrive one per line
//! (`insert <slug>`, `search <slug>`, `remove <slug>`, `print`, `size`,
//! `clear`); blank lines and `#` comments are skipped; every instruction
//! produces one or more result lines on a caller-supplied sink.
//!
//! # Examples
//!
//! ```
//! use std::io::Cursor;
//!
//! use trees::command::Interpreter;
//! use trees::record::Record;
//!
//! let roster = vec![Record {
//!     slug: "l-messi".into(),
//!     name: "L. Messi".into(),
//!     full_name: "Lionel Messi".into(),
//!     position: "RW".into(),
//!     overall: 93,
//!     potential: 93,
//! }];
//!
//! let mut interpreter = Interpreter::new(roster);
//! let mut sink = Vec::new();
//! interpreter
//!     .run(Cursor::new("insert l-messi\nsize\n"), &mut sink)
//!     .unwrap();
//!
//! let output = String::from_utf8(sink).unwrap();
//! assert!(output.ends_with("SIZE=1\n"));
//! ```

use std::collections::HashMap;
use std::io::{BufRead, Write};

use tracing::warn;

use crate::avl;
use crate::error::Error;
use crate::record::Record;

/// Executes tree instructions against a roster of player records.
pub struct Interpreter {
    /// Every known record, keyed by slug. Commands name players by slug;
    /// the catalog resolves them to full records before touching the tree.
    catalog: HashMap<String, Record>,
    tree: avl::Tree<Record>,
}

impl Interpreter {
    /// Builds an interpreter over the given roster. The tree starts empty;
    /// only `insert` instructions populate it.
    pub fn new(roster: Vec<Record>) -> Self {
        let catalog = roster
            .into_iter()
            .map(|record| (record.slug.clone(), record))
            .collect();
        Self {
            catalog,
            tree: avl::Tree::new(),
        }
    }

    /// Processes every instruction line from `input`, writing result lines
    /// to `sink`. Malformed or unknown instructions are reported on the
    /// sink and do not stop the run; only I/O failures do.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, sink: &mut W) -> Result<(), Error> {
        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            self.execute(line, sink)?;
        }
        Ok(())
    }

    fn execute<W: Write>(&mut self, line: &str, sink: &mut W) -> Result<(), Error> {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words[0] {
            "insert" => {
                let Some(record) = self.resolve(&words, "INSERT", sink)? else {
                    return Ok(());
                };
                let record = record.clone();
                self.tree.insert(record.clone());
                writeln!(sink, "INSERT: {record}")?;
            }
            "search" => {
                let Some(record) = self.resolve(&words, "SEARCH", sink)? else {
                    return Ok(());
                };
                match self.tree.get(record) {
                    Some(found) => writeln!(sink, "FOUND: {found}")?,
                    None => writeln!(sink, "NOT FOUND in tree: {}", record.slug)?,
                }
            }
            "remove" => {
                let Some(record) = self.resolve(&words, "REMOVE", sink)? else {
                    return Ok(());
                };
                let record = record.clone();
                if self.tree.remove(&record) {
                    writeln!(sink, "REMOVED: {record}")?;
                } else {
                    writeln!(sink, "NOT FOUND in tree: {}", record.slug)?;
                }
            }
            "print" => {
                for record in self.tree.iter() {
                    writeln!(sink, "{record}")?;
                }
            }
            "size" => writeln!(sink, "SIZE={}", self.tree.len())?,
            "clear" => {
                self.tree.clear();
                writeln!(sink, "CLEARED")?;
            }
            other => {
                warn!(command = other, "rejected instruction");
                writeln!(sink, "Invalid command")?;
            }
        }
        Ok(())
    }

    /// Resolves the single slug argument of a keyed instruction against the
    /// catalog, reporting usage and unknown-slug problems to the sink.
    fn resolve<W: Write>(
        &self,
        words: &[&str],
        verb: &str,
        sink: &mut W,
    ) -> Result<Option<&Record>, Error> {
        if words.len() != 2 {
            writeln!(sink, "Usage: {verb} <player_slug>")?;
            return Ok(None);
        }
        match self.catalog.get(words[1]) {
            Some(record) => Ok(Some(record)),
            None => {
                writeln!(sink, "No player found with slug: {}", words[1])?;
                Ok(None)
            }
        }
    }
}
