use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::errors::AppError;

/// A navigation node with its children, as served to the UI.
#[derive(Debug, Clone, Serialize)]
pub struct MenuNode {
    pub id: i64,
    pub title: String,
    pub path: String,
    pub children: Vec<MenuNode>,
}

/// One node of a menu replace request. Order within a level is positional.
#[derive(Debug, Clone, Deserialize)]
pub struct MenuNodeForm {
    pub title: String,
    pub path: String,
    #[serde(default)]
    pub children: Vec<MenuNodeForm>,
}

#[derive(sqlx::FromRow)]
struct MenuRow {
    id: i64,
    parent_id: Option<i64>,
    title: String,
    path: String,
}

/// The full navigation tree, ordered by position at every level.
pub async fn find_tree(pool: &PgPool) -> Result<Vec<MenuNode>, AppError> {
    let rows = sqlx::query_as::<_, MenuRow>(
        "SELECT id, parent_id, title, path FROM menu_items ORDER BY position, id",
    )
    .fetch_all(pool)
    .await?;

    let mut children_of: HashMap<Option<i64>, Vec<MenuRow>> = HashMap::new();
    for row in rows {
        children_of.entry(row.parent_id).or_default().push(row);
    }

    fn build(parent: Option<i64>, children_of: &mut HashMap<Option<i64>, Vec<MenuRow>>) -> Vec<MenuNode> {
        let rows = children_of.remove(&parent).unwrap_or_default();
        rows.into_iter()
            .map(|row| {
                let children = build(Some(row.id), children_of);
                MenuNode {
                    id: row.id,
                    title: row.title,
                    path: row.path,
                    children,
                }
            })
            .collect()
    }

    Ok(build(None, &mut children_of))
}

/// Replace the entire menu tree in one transaction.
pub async fn replace_tree(pool: &PgPool, nodes: &[MenuNodeForm]) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM menu_items").execute(&mut *tx).await?;

    // Breadth-first insert: parents always exist before their children.
    let mut queue: VecDeque<(Option<i64>, i32, &MenuNodeForm)> = nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (None, i as i32, n))
        .collect();

    while let Some((parent_id, position, node)) = queue.pop_front() {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO menu_items (parent_id, title, path, position) \
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(parent_id)
        .bind(node.title.trim())
        .bind(node.path.trim())
        .bind(position)
        .fetch_one(&mut *tx)
        .await?;

        for (i, child) in node.children.iter().enumerate() {
            queue.push_back((Some(id), i as i32, child));
        }
    }

    tx.commit().await?;
    Ok(())
}
