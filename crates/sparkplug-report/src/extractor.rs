//! Recovers the declared assertion identifiers from a TCK test module.
//!
//! Each test module declares the assertions it checks in a single list-valued
//! statement, either `List<String> testIds = List.of(ID_A, ID_B, ...);` or
//! `String[] testIds = { ID_A, ID_B, ... };`. Items are either constant names
//! or quoted dashed ids such as `"topics-ndata-mqtt"`, which are canonicalized.
//! The statement may be spread over many lines and is read up to its closing
//! delimiter.

use crate::types::canonical_assertion_id;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// A recognised declaration statement and the delimiters enclosing its items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclarationMarker {
    pub marker: &'static str,
    pub open: char,
    pub close: char,
}

/// Declaration forms in the order they are searched for on each line.
pub const DECLARATION_MARKERS: [DeclarationMarker; 2] = [
    DeclarationMarker {
        marker: "List<String> testIds =",
        open: '(',
        close: ')',
    },
    DeclarationMarker {
        marker: "String[] testIds =",
        open: '{',
        close: '}',
    },
];

/// Identifiers declared by one module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Declaration {
    pub ids: BTreeSet<String>,
    /// Identifiers listed more than once, sorted.
    pub duplicates: Vec<String>,
    /// False when the input ended before the closing delimiter.
    pub terminated: bool,
}

impl Declaration {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }
}

struct ItemScanner {
    delimiters: DeclarationMarker,
    opened: bool,
    closed: bool,
    body: String,
}

impl ItemScanner {
    fn new(delimiters: DeclarationMarker) -> Self {
        Self {
            delimiters,
            opened: false,
            closed: false,
            body: String::new(),
        }
    }

    fn feed(&mut self, segment: &str) {
        let segment = segment.split("//").next().unwrap_or_default();
        for c in segment.chars() {
            if !self.opened {
                if c == self.delimiters.open {
                    self.opened = true;
                }
                continue;
            }
            if c == self.delimiters.close {
                self.closed = true;
                return;
            }
            self.body.push(c);
        }
        self.body.push(' ');
    }

    fn items(&self) -> Vec<String> {
        self.body
            .split(|c: char| c == ',' || c.is_whitespace())
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(declared_id)
            .collect()
    }
}

/// `"topics-ndata-mqtt"` becomes `ID_TOPICS_NDATA_MQTT`; `Requirements.ID_X` becomes `ID_X`.
fn declared_id(item: &str) -> String {
    match item.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        Some(literal) => canonical_assertion_id(literal),
        None => item.rsplit('.').next().unwrap_or(item).to_string(),
    }
}

/// Finds the first `testIds` declaration in `source`.
///
/// Returns `None` when the module declares nothing, which callers treat as
/// "no assertions here" rather than an error. An empty list yields
/// `Some` with no ids.
#[must_use]
pub fn extract_declaration(source: &str) -> Option<Declaration> {
    let mut lines = source.lines();
    let mut scanner = loop {
        let line = lines.next()?;
        let found = DECLARATION_MARKERS
            .iter()
            .find_map(|m| line.find(m.marker).map(|pos| (m, pos)));
        if let Some((marker, pos)) = found {
            let mut scanner = ItemScanner::new(*marker);
            scanner.feed(&line[pos + marker.marker.len()..]);
            break scanner;
        }
    };

    while !scanner.closed {
        match lines.next() {
            Some(line) => scanner.feed(line),
            None => break,
        }
    }

    if !scanner.closed {
        warn!(
            marker = scanner.delimiters.marker,
            "testIds declaration is not terminated, keeping the identifiers read so far"
        );
    }

    let items = scanner.items();
    let mut occurrences: BTreeMap<&str, usize> = BTreeMap::new();
    for item in &items {
        *occurrences.entry(item.as_str()).or_default() += 1;
    }
    let duplicates: Vec<String> = occurrences
        .iter()
        .filter(|(_, count)| **count > 1)
        .map(|(id, _)| (*id).to_string())
        .collect();

    Some(Declaration {
        ids: items.into_iter().collect(),
        duplicates,
        terminated: scanner.closed,
    })
}
