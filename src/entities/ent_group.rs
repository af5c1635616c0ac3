// Group entity - presentational community cards

use sqlx::{sqlite::SqliteRow, Row};

use crate::{
    database::Database,
    error::{AppError, AppResult},
    models::{Group, GroupUpdate, NewGroup},
};

fn group_from_row(row: &SqliteRow) -> Result<Group, sqlx::Error> {
    Ok(Group {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        members: row.try_get("members")?,
        image: row.try_get("image")?,
    })
}

impl Group {
    pub async fn gen(db: &Database, id: i64) -> AppResult<Group> {
        let row = sqlx::query("SELECT id, name, members, image FROM student_groups WHERE id = ?")
            .bind(id)
            .fetch_optional(db.pool())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Group with id {} not found", id)))?;
        Ok(group_from_row(&row)?)
    }

    pub async fn gen_all(db: &Database) -> AppResult<Vec<Group>> {
        let rows = sqlx::query("SELECT id, name, members, image FROM student_groups ORDER BY id")
            .fetch_all(db.pool())
            .await?;
        Ok(rows.iter().map(group_from_row).collect::<Result<_, _>>()?)
    }

    pub async fn create(db: &Database, new_group: NewGroup) -> AppResult<Group> {
        new_group.validate()?;

        let result = sqlx::query("INSERT INTO student_groups (name, members, image) VALUES (?, ?, ?)")
            .bind(&new_group.name)
            .bind(new_group.members)
            .bind(&new_group.image)
            .execute(db.pool())
            .await?;
        Self::gen(db, result.last_insert_rowid()).await
    }

    pub async fn update(db: &Database, id: i64, update: GroupUpdate) -> AppResult<Group> {
        update.validate()?;

        let result = sqlx::query(
            "UPDATE student_groups SET
                name = COALESCE(?, name),
                members = COALESCE(?, members),
                image = CASE WHEN ? THEN ? ELSE image END
            WHERE id = ?",
        )
        .bind(&update.name)
        .bind(update.members)
        .bind(update.image.is_some())
        .bind(update.image.flatten())
        .bind(id)
        .execute(db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Group with id {} not found", id)));
        }
        Self::gen(db, id).await
    }

    pub async fn delete(db: &Database, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM student_groups WHERE id = ?")
            .bind(id)
            .execute(db.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_group_crud() {
        let db = Database::in_memory().await.unwrap();

        let group = Group::create(
            &db,
            NewGroup {
                name: "Book_Club".to_string(),
                members: 28,
                image: Some("📚".to_string()),
            },
        )
        .await
        .unwrap();
        assert_eq!(group.members, 28);

        let renamed = Group::update(
            &db,
            group.id,
            GroupUpdate {
                members: Some(29),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(renamed.name, "Book_Club");
        assert_eq!(renamed.members, 29);
        assert_eq!(renamed.image.as_deref(), Some("📚"));

        let cleared = Group::update(
            &db,
            group.id,
            GroupUpdate {
                image: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(cleared.image, None);

        assert_eq!(Group::gen_all(&db).await.unwrap(), vec![cleared]);
        assert!(Group::delete(&db, group.id).await.unwrap());
        assert!(Group::gen_all(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_group_validation() {
        let db = Database::in_memory().await.unwrap();

        let blank = Group::create(
            &db,
            NewGroup {
                name: " ".to_string(),
                members: 0,
                image: None,
            },
        )
        .await;
        assert!(matches!(blank, Err(AppError::Validation(_))));

        let negative = GroupUpdate {
            members: Some(-1),
            ..Default::default()
        };
        assert!(negative.validate().is_err());
    }
}
