// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{LineItem, ListKind};

pub fn format_list(items: &[LineItem]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Both lists under their titles, plumbing first. Empty lists keep their heading.
pub fn format_takeoff(plumbing: &[LineItem], trim: &[LineItem]) -> String {
    let mut out = String::new();
    for (kind, items) in [(ListKind::Plumbing, plumbing), (ListKind::Trim, trim)] {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(kind.title());
        out.push_str(":\n");
        for item in items {
            out.push_str(&item.to_string());
            out.push('\n');
        }
    }
    out
}
