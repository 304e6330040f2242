//! Text and JSON rendering of views for the CLI.

use crate::error::{ApiError, StorageError};
use crate::outline::{OutlineNode, OutlineView};
use crate::store::RecycleRecord;
use crate::todo::TodoSpan;
use crate::tree::{TreeNode, TreeProvider};
use crate::types::ResourceType;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

fn colored_label(resource_type: ResourceType, label: &str) -> String {
    match resource_type {
        ResourceType::Root => format!("{}", label.bold().underline()),
        ResourceType::Container => format!("{}", label.bold()),
        ResourceType::Chapter => format!("{}", label.green()),
        ResourceType::Snip => format!("{}", label.cyan()),
        ResourceType::Fragment => label.to_string(),
    }
}

/// Indented outline. Each line shows the title and the project-relative path.
pub fn format_outline_text(view: &OutlineView) -> Result<String, ApiError> {
    let tree = view.tree()?;
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n",
        colored_label(ResourceType::Root, &tree.data.ids.display)
    ));
    write_outline_rows(view, tree, 1, &mut out)?;
    Ok(out.trim_end().to_string())
}

fn write_outline_rows(
    view: &OutlineView,
    node: &OutlineNode,
    depth: usize,
    out: &mut String,
) -> Result<(), ApiError> {
    for child in view.get_children(Some(node))? {
        let ids = child.ids();
        out.push_str(&format!(
            "{}{}  {}\n",
            "  ".repeat(depth),
            colored_label(ids.resource_type, &ids.display),
            ids.relative_uri().dimmed()
        ));
        write_outline_rows(view, &child, depth + 1, out)?;
    }
    Ok(())
}

/// Nested tree items as the host would receive them.
pub fn format_tree_json<N: TreeNode>(view: &TreeProvider<N>) -> Result<String, ApiError> {
    let tree = view.tree()?;
    let value = tree_item_json(view, tree)?;
    to_pretty_json(&value)
}

fn tree_item_json<N: TreeNode>(
    view: &TreeProvider<N>,
    node: &N,
) -> Result<serde_json::Value, ApiError> {
    let mut value = serde_json::to_value(view.get_tree_item(node)?).map_err(StorageError::from)?;
    let children = view
        .get_children(Some(node))?
        .iter()
        .map(|child| tree_item_json(view, child))
        .collect::<Result<Vec<_>, _>>()?;
    value["children"] = serde_json::Value::Array(children);
    Ok(value)
}

/// One row per TODO, with 1-based line and column.
pub fn format_todos_text(root: &Path, todos: &[(PathBuf, Vec<TodoSpan>)]) -> String {
    let total: usize = todos.iter().map(|(_, spans)| spans.len()).sum();
    if total == 0 {
        return "No TODOs.".to_string();
    }

    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Fragment", "Line", "Column", "TODO"]);
    for (fragment, spans) in todos {
        let shown = fragment.strip_prefix(root).unwrap_or(fragment);
        for span in spans {
            table.add_row(vec![
                shown.display().to_string(),
                (span.row_start + 1).to_string(),
                (span.col_start + 1).to_string(),
                span.preview.clone(),
            ]);
        }
    }
    format!(
        "{}\n\n{}\n\nTotal: {}",
        format_section_heading("TODOs"),
        table,
        total
    )
}

pub fn format_todos_json(todos: &[(PathBuf, Vec<TodoSpan>)]) -> Result<String, ApiError> {
    let entries: Vec<serde_json::Value> = todos
        .iter()
        .map(|(fragment, spans)| {
            serde_json::json!({
                "fragment": fragment,
                "todos": spans,
            })
        })
        .collect();
    to_pretty_json(&serde_json::Value::Array(entries))
}

/// Summary of records appended to the recycling log.
pub fn format_recycled(records: &[RecycleRecord]) -> String {
    if records.is_empty() {
        return "Nothing removed.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Type", "Title", "Original path", "Recycled as"]);
    for record in records {
        table.add_row(vec![
            record.resource_type.to_string(),
            record.title.clone().unwrap_or_else(|| "-".to_string()),
            record.old_uri.clone(),
            record.recycle_bin_name.clone(),
        ]);
    }
    format!("Recycled {} resources:\n{}", records.len(), table)
}

fn to_pretty_json(value: &serde_json::Value) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value).map_err(|e| StorageError::from(e).into())
}
