use crate::error::DomainResult;
use crate::models::{PageNavigationLink, VisibilitySetting};
use rusqlite::Connection;
use std::collections::HashMap;

// Nesting depth of a path = number of '/' separators ('/' itself is depth 1).
const DEPTH_EXPR: &str = "LENGTH(url_path_after_course_path) \
     - LENGTH(REPLACE(url_path_after_course_path, '/', ''))";

struct NavNode {
    title: String,
    url_path: String,
    children: Vec<usize>,
}

/// Builds the sidebar navigation forest for a course: only Listed pages,
/// breadth-first level by level, title order within a level.
///
/// A node attaches to its parent when the immediate parent path was
/// discovered at the previous level; otherwise it is promoted to root, so an
/// orphaned Listed page (its parent missing, Hidden, or Unlisted) surfaces
/// at the top level instead of disappearing. The literal root page `/`
/// cannot have children: every deeper path starts its own depth-1 segment.
pub fn navigation_tree(
    conn: &Connection,
    course_id: i64,
) -> DomainResult<Vec<PageNavigationLink>> {
    let max_depth: i64 = conn.query_row(
        &format!(
            "SELECT COALESCE(MAX({DEPTH_EXPR}), 0)
             FROM pages
             WHERE course_id = ?1 AND visibility = ?2"
        ),
        (course_id, VisibilitySetting::Listed.as_i64()),
        |r| r.get(0),
    )?;

    let mut level_query = conn.prepare(&format!(
        "SELECT title, url_path_after_course_path
         FROM pages
         WHERE course_id = ?1 AND visibility = ?2 AND {DEPTH_EXPR} = ?3
         ORDER BY title ASC, url_path_after_course_path ASC"
    ))?;

    let mut nodes: Vec<NavNode> = Vec::new();
    let mut index_by_path: HashMap<String, usize> = HashMap::new();
    let mut roots: Vec<usize> = Vec::new();

    for depth in 1..=max_depth {
        let level = level_query
            .query_map(
                (course_id, VisibilitySetting::Listed.as_i64(), depth),
                |r| Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?)),
            )?
            .collect::<Result<Vec<_>, _>>()?;

        for (title, url_path) in level {
            let idx = nodes.len();
            nodes.push(NavNode {
                title,
                url_path: url_path.clone(),
                children: Vec::new(),
            });

            match parent_path(&url_path).and_then(|p| index_by_path.get(p)) {
                Some(&parent_idx) => nodes[parent_idx].children.push(idx),
                None => roots.push(idx),
            }
            index_by_path.insert(url_path, idx);
        }
    }

    let links = roots
        .into_iter()
        .map(|idx| assemble(&mut nodes, idx))
        .collect();
    Ok(links)
}

/// `/syllabus/grading` -> `/syllabus`; depth-1 paths have no parent.
fn parent_path(path: &str) -> Option<&str> {
    let cut = path.rfind('/')?;
    if cut == 0 {
        None
    } else {
        Some(&path[..cut])
    }
}

fn assemble(nodes: &mut [NavNode], idx: usize) -> PageNavigationLink {
    let title = std::mem::take(&mut nodes[idx].title);
    let url_path = std::mem::take(&mut nodes[idx].url_path);
    let children = std::mem::take(&mut nodes[idx].children);
    PageNavigationLink {
        title,
        url_path_after_course_path: url_path,
        nested_links: children.into_iter().map(|c| assemble(nodes, c)).collect(),
    }
}
