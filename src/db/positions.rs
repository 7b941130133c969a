//! Sibling position bookkeeping shared by list and card ordering.
//!
//! Three pieces: append allocation (`next_position`, the only rule used at
//! create time), the pure splice-and-renumber planners, and the transaction
//! helpers that load a sibling scope, apply a planned write set, and assert
//! the resulting ordering is dense.
//!
//! Reorders operate on the *active* (non-archived) siblings of a parent,
//! sorted by position; archived siblings keep their stale positions and are
//! invisible to the drag surface. Gaps left by deletions or archiving are
//! tolerated and closed by the next reorder of the scope.

use crate::error::{Error, Result};
use rusqlite::{Connection, params};

/// One table's children of one parent column.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SiblingScope {
    pub table: &'static str,
    pub parent_column: &'static str,
}

/// Lists ordered within a board.
pub(crate) const LIST_SCOPE: SiblingScope = SiblingScope {
    table: "lists",
    parent_column: "board_id",
};

/// Cards ordered within a list.
pub(crate) const CARD_SCOPE: SiblingScope = SiblingScope {
    table: "cards",
    parent_column: "list_id",
};

/// A single planned position update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PositionWrite {
    pub id: String,
    pub position: i64,
}

/// Position for a freshly appended sibling: max existing position + 1,
/// or 0 for an empty parent. Archived siblings count, so a new record
/// always sorts after everything that ever lived in the scope.
pub(crate) fn next_position(
    conn: &Connection,
    table: &str,
    parent_column: &str,
    parent_id: &str,
) -> Result<i64> {
    let position = conn.query_row(
        &format!("SELECT COALESCE(MAX(position) + 1, 0) FROM {table} WHERE {parent_column} = ?1"),
        params![parent_id],
        |row| row.get(0),
    )?;
    Ok(position)
}

/// Load the active siblings of a parent as (id, position), position
/// ascending. `extra_id` forces one row into the sequence regardless of
/// its archived flag -- the item being dragged always participates.
pub(crate) fn active_siblings(
    conn: &Connection,
    scope: SiblingScope,
    parent_id: &str,
    extra_id: Option<&str>,
) -> Result<Vec<(String, i64)>> {
    let mut rows = Vec::new();
    match extra_id {
        Some(id) => {
            let sql = format!(
                "SELECT id, position FROM {} WHERE {} = ?1 AND (is_archived = 0 OR id = ?2)
                 ORDER BY position",
                scope.table, scope.parent_column
            );
            let mut stmt = conn.prepare(&sql)?;
            let mapped = stmt.query_map(params![parent_id, id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?;
            for row in mapped {
                rows.push(row?);
            }
        }
        None => {
            let sql = format!(
                "SELECT id, position FROM {} WHERE {} = ?1 AND is_archived = 0
                 ORDER BY position",
                scope.table, scope.parent_column
            );
            let mut stmt = conn.prepare(&sql)?;
            let mapped = stmt.query_map(params![parent_id], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?;
            for row in mapped {
                rows.push(row?);
            }
        }
    }
    Ok(rows)
}

/// Plan a move of `moved_id` to `target_index` within its own scope.
///
/// Treats `siblings` (sorted by position) as a dense 0..N-1 sequence:
/// remove the moved element, insert it at the clamped target index,
/// renumber everything, and emit a write for each element whose position
/// changed plus the moved element itself. Moving to the current index is
/// a no-op and yields an empty plan.
pub(crate) fn splice_renumber(
    siblings: &[(String, i64)],
    moved_id: &str,
    target_index: usize,
) -> Vec<PositionWrite> {
    let n = siblings.len();
    let Some(source) = siblings.iter().position(|(id, _)| id == moved_id) else {
        return Vec::new();
    };
    let target = target_index.min(n - 1);
    if target == source {
        return Vec::new();
    }

    let mut order: Vec<&(String, i64)> = siblings.iter().collect();
    let moved = order.remove(source);
    order.insert(target, moved);

    order
        .iter()
        .enumerate()
        .filter(|(index, (id, old))| *old != *index as i64 || id == moved_id)
        .map(|(index, (id, _))| PositionWrite {
            id: id.clone(),
            position: index as i64,
        })
        .collect()
}

/// Plan the source-side renumbering after `removed_id` leaves the scope.
/// The survivors collapse to a dense 0..N-2 sequence.
pub(crate) fn remove_renumber(siblings: &[(String, i64)], removed_id: &str) -> Vec<PositionWrite> {
    siblings
        .iter()
        .filter(|(id, _)| id != removed_id)
        .enumerate()
        .filter(|(index, (_, old))| *old != *index as i64)
        .map(|(index, (id, _))| PositionWrite {
            id: id.clone(),
            position: index as i64,
        })
        .collect()
}

/// Plan the destination-side renumbering for an incoming element.
///
/// `siblings` must not contain `inserted_id`. The index clamps to the end
/// of the sequence; an empty destination places the element at 0. The
/// inserted element always gets a write.
pub(crate) fn insert_renumber(
    siblings: &[(String, i64)],
    inserted_id: &str,
    dest_index: usize,
) -> Vec<PositionWrite> {
    let inserted = (inserted_id.to_string(), -1);
    let mut order: Vec<&(String, i64)> = siblings.iter().collect();
    order.insert(dest_index.min(siblings.len()), &inserted);

    order
        .iter()
        .enumerate()
        .filter(|(index, (id, old))| *old != *index as i64 || id == inserted_id)
        .map(|(index, (id, _))| PositionWrite {
            id: id.clone(),
            position: index as i64,
        })
        .collect()
}

/// Apply a planned write set, touching `updated_at` on every moved row.
pub(crate) fn apply_writes(
    conn: &Connection,
    scope: SiblingScope,
    writes: &[PositionWrite],
    now: i64,
) -> Result<()> {
    let sql = format!(
        "UPDATE {} SET position = ?1, updated_at = ?2 WHERE id = ?3",
        scope.table
    );
    for write in writes {
        conn.execute(&sql, params![write.position, now, write.id])?;
    }
    Ok(())
}

/// Assert the active siblings of `parent_id` form a dense 0..N-1 sequence.
///
/// Runs after every applied reorder, inside the same transaction, so a
/// violation rolls the write set back instead of persisting a duplicate or
/// missing position. This never fires for a correct plan; it exists as the
/// engine's last-resort assertion.
pub(crate) fn assert_dense(
    conn: &Connection,
    scope: SiblingScope,
    parent_id: &str,
    extra_id: Option<&str>,
) -> Result<()> {
    let rows = active_siblings(conn, scope, parent_id, extra_id)?;
    for (index, (id, position)) in rows.iter().enumerate() {
        if *position != index as i64 {
            return Err(Error::InvariantViolation {
                scope: format!("{}.{}={}", scope.table, scope.parent_column, parent_id),
                detail: format!(
                    "row {} has position {} at rank {} of {}",
                    id,
                    position,
                    index,
                    rows.len()
                ),
            });
        }
    }
    Ok(())
}

/// Reorder `moved_id` to `target_index` among the active siblings of
/// `parent_id`, renumbering the scope densely. Returns the number of rows
/// written (0 for a no-op move).
pub(crate) fn reorder_within(
    conn: &Connection,
    scope: SiblingScope,
    parent_id: &str,
    moved_id: &str,
    target_index: usize,
    now: i64,
) -> Result<usize> {
    let siblings = active_siblings(conn, scope, parent_id, Some(moved_id))?;
    let writes = splice_renumber(&siblings, moved_id, target_index);
    if writes.is_empty() {
        return Ok(0);
    }
    apply_writes(conn, scope, &writes, now)?;
    assert_dense(conn, scope, parent_id, Some(moved_id))?;
    Ok(writes.len())
}
