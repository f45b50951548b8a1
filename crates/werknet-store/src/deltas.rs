//! Row-level change observation.
//!
//! The subscription transport (out of tree) ships insert/update/delete deltas
//! to clients after each commit. This module is the seam it consumes: a hook
//! registered on the connection that fires once per row change. Rolled-back
//! changes are never delivered because SQLite only invokes the hook for
//! changes that reach the journal and the transport drains after commit.

use rusqlite::hooks::Action;
use serde::{Deserialize, Serialize};

use crate::database::Database;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DeltaOp {
    Insert,
    Update,
    Delete,
}

/// One row change: which table, which rowid, what happened.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RowDelta {
    pub table: String,
    pub op: DeltaOp,
    pub rowid: i64,
}

impl Database {
    /// Register a delta observer, replacing any previous one. Pass `None`
    /// to stop observing.
    pub fn observe_deltas<F>(&self, observer: Option<F>)
    where
        F: FnMut(RowDelta) + Send + 'static,
    {
        match observer {
            Some(mut f) => {
                self.conn()
                    .update_hook(Some(move |action, _db: &str, table: &str, rowid| {
                        let op = match action {
                            Action::SQLITE_INSERT => DeltaOp::Insert,
                            Action::SQLITE_UPDATE => DeltaOp::Update,
                            Action::SQLITE_DELETE => DeltaOp::Delete,
                            _ => return,
                        };
                        f(RowDelta {
                            table: table.to_string(),
                            op,
                            rowid,
                        });
                    }));
            }
            None => {
                self.conn()
                    .update_hook(None::<fn(Action, &str, &str, i64)>);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use super::*;
    use crate::companies::{insert_company, NewCompany};

    #[test]
    fn observer_sees_insert_and_delete() {
        let db = Database::open_in_memory().unwrap();
        let (tx, rx) = mpsc::channel();
        db.observe_deltas(Some(move |delta: RowDelta| {
            let _ = tx.send(delta);
        }));

        let id = insert_company(
            db.conn(),
            &NewCompany {
                name: "A",
                slug: "a",
                location: "NL",
            },
            1,
        )
        .unwrap();
        crate::companies::delete_company(db.conn(), id).unwrap();

        let deltas: Vec<RowDelta> = rx.try_iter().collect();
        assert!(deltas.contains(&RowDelta {
            table: "companies".to_string(),
            op: DeltaOp::Insert,
            rowid: id,
        }));
        assert!(deltas.contains(&RowDelta {
            table: "companies".to_string(),
            op: DeltaOp::Delete,
            rowid: id,
        }));
        // The capability row created alongside the company is observed too
        assert!(deltas
            .iter()
            .any(|d| d.table == "capabilities" && d.op == DeltaOp::Insert));
    }
}
