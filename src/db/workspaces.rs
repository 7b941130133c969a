//! Workspace records: the ownership scope boards live in.

use super::{Database, now_ms};
use crate::error::Result;
use crate::types::Workspace;
use rusqlite::params;
use uuid::Uuid;

impl Database {
    /// Create a new workspace.
    pub fn create_workspace(&self, name: &str) -> Result<Workspace> {
        let id = Uuid::now_v7().to_string();
        let now = now_ms();

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO workspaces (id, name, created_at) VALUES (?1, ?2, ?3)",
                params![id, name, now],
            )?;
            Ok(Workspace {
                id: id.clone(),
                name: name.to_string(),
                created_at: now,
            })
        })
    }

    /// Get a workspace by ID.
    pub fn get_workspace(&self, workspace_id: &str) -> Result<Option<Workspace>> {
        self.with_conn(|conn| {
            let result = conn.query_row(
                "SELECT id, name, created_at FROM workspaces WHERE id = ?1",
                params![workspace_id],
                |row| {
                    Ok(Workspace {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        created_at: row.get(2)?,
                    })
                },
            );
            match result {
                Ok(workspace) => Ok(Some(workspace)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }
}
