use async_trait::async_trait;

use super::UserDirectory;
use crate::database::seed::demo_accounts;
use crate::database::{Database, StoreError};
use crate::models::{User, UserRecord};

/// The demo accounts, hashed once at startup
pub struct DemoUserDirectory {
    records: Vec<UserRecord>,
}

impl DemoUserDirectory {
    pub fn new(bcrypt_cost: u32) -> Result<Self, bcrypt::BcryptError> {
        let mut records = Vec::new();
        for account in demo_accounts() {
            records.push(UserRecord {
                password_hash: bcrypt::hash(account.password, bcrypt_cost)?,
                user: account.user,
            });
        }
        Ok(Self { records })
    }

    fn with_children(&self, user: &User) -> User {
        let mut user = user.clone();
        user.children = self
            .records
            .iter()
            .filter(|r| r.user.parent_id.as_deref() == Some(user.id.as_str()))
            .map(|r| r.user.id.clone())
            .collect();
        user
    }
}

#[async_trait]
impl UserDirectory for DemoUserDirectory {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self
            .records
            .iter()
            .find(|r| r.user.username == username)
            .map(|r| UserRecord {
                user: self.with_children(&r.user),
                password_hash: r.password_hash.clone(),
            }))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .records
            .iter()
            .find(|r| r.user.id == id)
            .map(|r| self.with_children(&r.user)))
    }

    async fn children_of(&self, parent_id: &str) -> Result<Vec<User>, StoreError> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.user.parent_id.as_deref() == Some(parent_id))
            .map(|r| self.with_children(&r.user))
            .collect())
    }
}

const USER_COLUMNS: &str = r#"
    id, username, password_hash, role, name, email, age, school, grade, parent_id,
    ARRAY(SELECT c.id FROM users c WHERE c.parent_id = users.id ORDER BY c.id) AS children
"#;

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: String,
    username: String,
    password_hash: String,
    role: String,
    name: String,
    email: Option<String>,
    age: Option<i32>,
    school: Option<String>,
    grade: Option<String>,
    parent_id: Option<String>,
    children: Vec<String>,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(UserRecord {
            user: User {
                id: row.id,
                username: row.username,
                role: row.role.parse().map_err(StoreError::Corrupt)?,
                name: row.name,
                email: row.email,
                age: row.age,
                school: row.school,
                grade: row.grade,
                parent_id: row.parent_id,
                children: row.children,
            },
            password_hash: row.password_hash,
        })
    }
}

/// Users stored in the `users` table
pub struct PgUserDirectory {
    db: Database,
}

impl PgUserDirectory {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
        let row = self
            .db
            .fetch_optional(sqlx::query_as::<_, UserRow>(&sql).bind(username))
            .await?;
        row.map(UserRecord::try_from).transpose()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let row = self
            .db
            .fetch_optional(sqlx::query_as::<_, UserRow>(&sql).bind(id))
            .await?;
        Ok(row.map(UserRecord::try_from).transpose()?.map(|r| r.user))
    }

    async fn children_of(&self, parent_id: &str) -> Result<Vec<User>, StoreError> {
        let sql = format!(
            "SELECT {} FROM users WHERE parent_id = $1 ORDER BY id",
            USER_COLUMNS
        );
        let rows = self
            .db
            .fetch_all(sqlx::query_as::<_, UserRow>(&sql).bind(parent_id))
            .await?;
        rows.into_iter()
            .map(|row| UserRecord::try_from(row).map(|r| r.user))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;

    #[tokio::test]
    async fn demo_passwords_are_stored_hashed() {
        let directory = DemoUserDirectory::new(4).unwrap();
        let record = directory.find_by_username("admin").await.unwrap().unwrap();
        assert_ne!(record.password_hash, "123");
        assert!(bcrypt::verify("123", &record.password_hash).unwrap());
        assert_eq!(record.user.role, UserRole::Admin);
    }

    #[tokio::test]
    async fn username_lookup_is_exact() {
        let directory = DemoUserDirectory::new(4).unwrap();
        assert!(directory.find_by_username("Admin").await.unwrap().is_none());
        assert!(directory.find_by_username("admin ").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn parent_sees_its_child() {
        let directory = DemoUserDirectory::new(4).unwrap();
        let parent = directory.find_by_id("2").await.unwrap().unwrap();
        assert_eq!(parent.children, vec!["3".to_string()]);

        let children = directory.children_of("2").await.unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].username, "student");
        assert!(directory.children_of("1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn pg_directory_without_pool_is_unavailable() {
        let directory = PgUserDirectory::new(Database::unavailable());
        let result = directory.find_by_username("admin").await;
        assert!(matches!(result, Err(StoreError::Unavailable)));
    }
}
