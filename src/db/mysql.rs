use crate::config::RowScanPolicy;
use crate::db::models::{Post, seed_titles};
use crate::db::schema::{CREATE_BLOG, DROP_BLOG, INSERT_POST, SELECT_POSTS, SELECT_TITLES};
use crate::error::BlogError;
use futures::TryStreamExt;
use sqlx::{Connection, MySql, Pool, Row};
use tracing::warn;

pub type MySqlPool = Pool<MySql>;

#[derive(Clone)]
pub struct PostsStorage {
    pool: MySqlPool,
}

impl PostsStorage {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Liveness check: check out a connection and ping the server.
    pub async fn ping(&self) -> Result<(), BlogError> {
        let mut conn = self.pool.acquire().await?;
        conn.ping().await?;
        Ok(())
    }

    /// Drop and recreate the `blog` table.
    pub async fn reset_schema(&self) -> Result<(), BlogError> {
        sqlx::query(DROP_BLOG).execute(&self.pool).await?;
        sqlx::query(CREATE_BLOG).execute(&self.pool).await?;
        Ok(())
    }

    /// Insert `count` sample posts in a single transaction. Returns the titles written.
    pub async fn seed(&self, count: usize) -> Result<Vec<String>, BlogError> {
        let titles = seed_titles(count);
        let mut tx = self.pool.begin().await?;
        for title in &titles {
            sqlx::query(INSERT_POST)
                .bind(title)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(titles)
    }

    /// Every title in the table, in whatever order the server returns them.
    ///
    /// A failing query or a broken row stream is an error. A row whose title
    /// cannot be decoded is handled according to `policy`.
    pub async fn list_titles(&self, policy: RowScanPolicy) -> Result<Vec<String>, BlogError> {
        let mut rows = sqlx::query(SELECT_TITLES).fetch(&self.pool);
        let mut titles = Vec::new();
        while let Some(row) = rows.try_next().await? {
            accumulate_title(&mut titles, row.try_get::<String, _>("title"), policy)?;
        }
        Ok(titles)
    }

    pub async fn list_posts(&self) -> Result<Vec<Post>, BlogError> {
        let posts = sqlx::query_as::<_, Post>(SELECT_POSTS)
            .fetch_all(&self.pool)
            .await?;
        Ok(posts)
    }

    /// Close the pool, waiting for checked-out connections to come back.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

pub(crate) fn accumulate_title(
    titles: &mut Vec<String>,
    scanned: Result<String, sqlx::Error>,
    policy: RowScanPolicy,
) -> Result<(), BlogError> {
    match (scanned, policy) {
        (Ok(title), _) => titles.push(title),
        (Err(e), RowScanPolicy::Skip) => {
            warn!(error = %e, position = titles.len(), "skipping unreadable blog row");
        }
        (Err(e), RowScanPolicy::Empty) => {
            warn!(error = %e, position = titles.len(), "unreadable blog row listed as empty title");
            titles.push(String::new());
        }
        (Err(e), RowScanPolicy::Abort) => return Err(e.into()),
    }
    Ok(())
}
