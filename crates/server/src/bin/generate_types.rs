//! Writes TypeScript declarations for the wire types shared with the frontend.
//!
//! Usage: `generate-types [output-path]` (defaults to `shared/types.ts`).

use std::{fs, path::PathBuf};

use anyhow::Context;
use protocol::{NavigationRequest, PageObject, PartialReload, VisitMethod};
use server::routes::events::Event;
use ts_rs::TS;

fn generate_types_content() -> String {
    let decls = [
        PageObject::decl(),
        VisitMethod::decl(),
        NavigationRequest::decl(),
        PartialReload::decl(),
        Event::decl(),
    ];

    let mut out = String::from("// This file was generated by `generate-types`. Do not edit it by hand.\n\n");
    for decl in decls {
        out.push_str("export ");
        out.push_str(&decl);
        out.push_str("\n\n");
    }
    out
}

fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("shared/types.ts"));

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    fs::write(&path, generate_types_content())
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Wrote {}", path.display());
    Ok(())
}
