//! # PostgreSQL store
//!
//! Maps the relational model onto the domain ports. Comments live in a JSONB
//! column on `posts`: appends use the `||` operator in a single statement,
//! deletions overwrite the whole array.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domains::{
    AdminAccount, AdminRepository, Blocklist, BlocklistRepository, Comment, DomainError,
    DomainResult, Post, PostLookup, PostRepository,
};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use tracing::{info, warn};
use uuid::Uuid;

const POST_COLUMNS: &str =
    "id, legacy_id, title, body, visible, comments_allowed, comments, created_at, updated_at";

/// Shared handle over a connection pool. Cloning is cheap.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        info!(max_connections, "postgres pool connected");
        Ok(Self::new(pool))
    }

    /// Applies the embedded migrations in `migrations/`.
    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("database migrations applied");
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    legacy_id: Option<String>,
    title: String,
    body: String,
    visible: bool,
    comments_allowed: bool,
    comments: Json<Vec<Comment>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post {
            id: row.id,
            legacy_id: row.legacy_id,
            title: row.title,
            body: row.body,
            visible: row.visible,
            comments_allowed: row.comments_allowed,
            comments: row.comments.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct AdminRow {
    id: Uuid,
    username: String,
    password_hash: String,
}

fn db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            warn!(constraint = db.constraint().unwrap_or("-"), "unique constraint rejected a write");
            return DomainError::Conflict("a record with this identifier already exists".into());
        }
    }
    DomainError::upstream(err)
}

#[async_trait]
impl PostRepository for PgStore {
    async fn find(&self, lookup: &PostLookup) -> DomainResult<Option<Post>> {
        // A native match wins over a legacy match on another row.
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts \
             WHERE id = $1 OR legacy_id = $2 \
             ORDER BY CASE WHEN id = $1 THEN 0 ELSE 1 END \
             LIMIT 1"
        ))
        .bind(lookup.native())
        .bind(lookup.legacy())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(Post::from))
    }

    async fn list(&self, include_hidden: bool) -> DomainResult<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE visible OR $1 ORDER BY created_at DESC"
        ))
        .bind(include_hidden)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    async fn insert(&self, post: &Post) -> DomainResult<()> {
        sqlx::query(&format!(
            "INSERT INTO posts ({POST_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)"
        ))
        .bind(post.id)
        .bind(&post.legacy_id)
        .bind(&post.title)
        .bind(&post.body)
        .bind(post.visible)
        .bind(post.comments_allowed)
        .bind(Json(&post.comments))
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(())
    }

    async fn update(&self, post: &Post) -> DomainResult<()> {
        let result = sqlx::query(
            "UPDATE posts \
             SET title = $2, body = $3, visible = $4, comments_allowed = $5, updated_at = $6 \
             WHERE id = $1",
        )
        .bind(post.id)
        .bind(&post.title)
        .bind(&post.body)
        .bind(post.visible)
        .bind(post.comments_allowed)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("post", post.id.to_string()));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn append_comment(&self, post_id: Uuid, comment: &Comment) -> DomainResult<Vec<Comment>> {
        let comments: Option<Json<Vec<Comment>>> = sqlx::query_scalar(
            "UPDATE posts SET comments = comments || $2::jsonb WHERE id = $1 RETURNING comments",
        )
        .bind(post_id)
        .bind(Json([comment]))
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        comments
            .map(|Json(comments)| comments)
            .ok_or_else(|| DomainError::not_found("post", post_id.to_string()))
    }

    async fn replace_comments(
        &self,
        post_id: Uuid,
        comments: &[Comment],
    ) -> DomainResult<Vec<Comment>> {
        let comments: Option<Json<Vec<Comment>>> = sqlx::query_scalar(
            "UPDATE posts SET comments = $2 WHERE id = $1 RETURNING comments",
        )
        .bind(post_id)
        .bind(Json(comments))
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        comments
            .map(|Json(comments)| comments)
            .ok_or_else(|| DomainError::not_found("post", post_id.to_string()))
    }
}

#[async_trait]
impl BlocklistRepository for PgStore {
    async fn load(&self) -> DomainResult<Blocklist> {
        let terms: Option<Vec<String>> =
            sqlx::query_scalar("SELECT terms FROM blocklist WHERE id = 1")
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

        Ok(terms.map(Blocklist::new).unwrap_or_default())
    }

    async fn save(&self, blocklist: &Blocklist) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO blocklist (id, terms) VALUES (1, $1) \
             ON CONFLICT (id) DO UPDATE SET terms = EXCLUDED.terms",
        )
        .bind(blocklist.terms())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(())
    }
}

#[async_trait]
impl AdminRepository for PgStore {
    async fn find_admin(&self) -> DomainResult<Option<AdminAccount>> {
        let row = sqlx::query_as::<_, AdminRow>(
            "SELECT id, username, password_hash FROM admins LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(|row| AdminAccount {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
        }))
    }

    async fn upsert_admin(&self, admin: &AdminAccount) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO admins (id, username, password_hash) VALUES ($1, $2, $3) \
             ON CONFLICT (singleton) DO UPDATE \
             SET username = EXCLUDED.username, password_hash = EXCLUDED.password_hash",
        )
        .bind(admin.id)
        .bind(&admin.username)
        .bind(&admin.password_hash)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;
        Ok(())
    }
}
