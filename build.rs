use std::{env, fs};
use std::path::PathBuf;

#[path = "src/node_id/table.rs"]
mod table;

fn package_dir() -> String {
    env::var("CARGO_MANIFEST_DIR").expect("No CARGO_MANIFEST_DIR env var")
}

fn out_dir() -> String {
    env::var("OUT_DIR").expect("No OUT_DIR env var")
}

fn build_node_ids() {
    let table_path: PathBuf = [package_dir().as_str(), "resources", "node_ids.csv"].iter().collect();
    let out_path: PathBuf = [out_dir().as_str(), "node_ids.rs"].iter().collect();

    println!("cargo:rerun-if-changed={}", table_path.display());

    let text = fs::read_to_string(&table_path)
        .unwrap_or_else(|err| panic!("Failed to read {}: {}", table_path.display(), err));
    let rows = table::parse_table(&text)
        .unwrap_or_else(|err| panic!("Failed to parse {}: {}", table_path.display(), err));

    let source = table::render_table(&rows, "super::namespaces::STANDARD");
    fs::write(&out_path, source).expect("Failed to write node_ids.rs");
}

fn main() {
    println!("cargo:rerun-if-changed=src/node_id/table.rs");
    build_node_ids();
}
