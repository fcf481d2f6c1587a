//! Parser and code generator for the node id table in `resources/node_ids.csv`.
//!
//! This file is compiled twice: as part of the library, and by `build.rs` through a `#[path]`
//! include. It must therefore only depend on `std` and `thiserror`.

use std::collections::HashSet;
use std::fmt::Write;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TableError {
    #[error("line {line}: expected 3 fields (name, numeric id, type), found {found}")]
    FieldCount { line: usize, found: usize },

    #[error("line {line}: {name:?} is not a valid identifier")]
    InvalidName { line: usize, name: String },

    #[error("line {line}: {value:?} is not a valid numeric id")]
    InvalidId { line: usize, value: String },

    #[error("line {line}: duplicate name {name:?}")]
    DuplicateName { line: usize, name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeIdRow {
    pub name: String,
    pub numeric_id: u32,
    pub type_name: String,
}

// strict and reserved keywords of the 2021 edition, plus `gen` from 2024
const KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true",
    "type", "unsafe", "use", "where", "while", "abstract", "become", "box", "do", "final", "gen",
    "macro", "override", "priv", "try", "typeof", "unsized", "virtual", "yield",
];

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {},
        _ => return false,
    }
    name != "_" && !KEYWORDS.contains(&name) && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Parses `name,numeric_id,type` rows. Blank lines and `#` comments are skipped.
pub fn parse_table(text: &str) -> Result<Vec<NodeIdRow>, TableError> {
    let mut rows = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        if fields.len() != 3 {
            return Err(TableError::FieldCount { line, found: fields.len() });
        }

        let name = fields[0];
        if !is_identifier(name) {
            return Err(TableError::InvalidName { line, name: name.to_string() });
        }

        let numeric_id = fields[1].parse::<u32>().map_err(|_| TableError::InvalidId {
            line,
            value: fields[1].to_string(),
        })?;

        if !seen.insert(name.to_string()) {
            return Err(TableError::DuplicateName { line, name: name.to_string() });
        }

        rows.push(NodeIdRow {
            name: name.to_string(),
            numeric_id,
            type_name: fields[2].to_string(),
        });
    }

    Ok(rows)
}

/// Renders the `id` and `node` modules plus `TABLE`. `namespace` is the path of the namespace
/// index constant every composite id is qualified with.
pub fn render_table(rows: &[NodeIdRow], namespace: &str) -> String {
    let mut out = String::new();

    // writing into a String cannot fail
    let _ = writeln!(out, "// @generated from resources/node_ids.csv");
    let _ = writeln!(out);
    let _ = writeln!(out, "#[allow(non_upper_case_globals)]");
    let _ = writeln!(out, "pub mod id {{");
    let _ = writeln!(out, "    use super::NumericId;");
    for row in rows {
        let _ = writeln!(out, "    /// {}", row.type_name);
        let _ = writeln!(out, "    pub const {}: NumericId = {};", row.name, row.numeric_id);
    }
    let _ = writeln!(out, "}}");
    let _ = writeln!(out);
    let _ = writeln!(out, "#[allow(non_upper_case_globals)]");
    let _ = writeln!(out, "pub mod node {{");
    for row in rows {
        let _ = writeln!(
            out,
            "    pub const {name}: super::NodeId = super::NodeId::numeric(super::id::{name}, {namespace});",
            name = row.name,
            namespace = namespace,
        );
    }
    let _ = writeln!(out, "}}");
    let _ = writeln!(out);
    let _ = writeln!(out, "pub static TABLE: &[(&str, NumericId, &str)] = &[");
    for row in rows {
        let _ = writeln!(out, "    ({:?}, id::{}, {:?}),", row.name, row.name, row.type_name);
    }
    let _ = writeln!(out, "];");

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_skipping_comments_and_blanks() {
        let text = "# name,id,type\nBoolean, 1, DataType\n\n  Organizes,35,ReferenceType  \n";
        let rows = parse_table(text).unwrap();

        assert_eq!(rows, vec![
            NodeIdRow { name: "Boolean".into(), numeric_id: 1, type_name: "DataType".into() },
            NodeIdRow { name: "Organizes".into(), numeric_id: 35, type_name: "ReferenceType".into() },
        ]);
    }

    #[test]
    fn reports_line_of_malformed_row() {
        assert_eq!(
            parse_table("Boolean,1,DataType\nSByte,2\n"),
            Err(TableError::FieldCount { line: 2, found: 2 }),
        );
        assert_eq!(
            parse_table("\n\nByte,three,DataType"),
            Err(TableError::InvalidId { line: 3, value: "three".into() }),
        );
        assert_eq!(
            parse_table("9Lives,1,DataType"),
            Err(TableError::InvalidName { line: 1, name: "9Lives".into() }),
        );
        assert_eq!(
            parse_table("Boolean,1,DataType\ntype,99,DataType"),
            Err(TableError::InvalidName { line: 2, name: "type".into() }),
        );
        assert_eq!(
            parse_table("Self,5,ObjectType"),
            Err(TableError::InvalidName { line: 1, name: "Self".into() }),
        );
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = parse_table("Double,11,DataType\nDouble,12,DataType").unwrap_err();
        assert_eq!(err, TableError::DuplicateName { line: 2, name: "Double".into() });
    }

    #[test]
    fn renders_both_namespaces() {
        let rows = parse_table("RootFolder,84,Object").unwrap();
        let out = render_table(&rows, "super::namespaces::STANDARD");

        assert!(out.contains("pub const RootFolder: NumericId = 84;"));
        assert!(out.contains(
            "pub const RootFolder: super::NodeId = super::NodeId::numeric(super::id::RootFolder, super::namespaces::STANDARD);"
        ));
        assert!(out.contains("(\"RootFolder\", id::RootFolder, \"Object\"),"));
    }
}
