use {
    crate::parsers::entry::IndexEntry,
    anyhow::{Context, Result},
    sqlx::{
        Pool, Row, Sqlite,
        sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    },
    std::path::Path,
};

const CREATE_TABLE: &str =
    "CREATE TABLE searchIndex(id INTEGER PRIMARY KEY, name TEXT, type TEXT, path TEXT)";

/// The docset search-index store. One store per run; rows are only ever
/// inserted, never updated or deleted.
pub(crate) struct SearchIndex {
    pool: Pool<Sqlite>,
}

impl SearchIndex {
    /// Create a fresh store file with an empty searchIndex table.
    pub(crate) async fn create(path: &Path) -> Result<Self> {
        let index = Self::connect(path, true).await?;
        sqlx::query(CREATE_TABLE)
            .execute(&index.pool)
            .await
            .context("Failed to create the search index table")?;
        Ok(index)
    }

    /// Open an existing store.
    pub(crate) async fn open(path: &Path) -> Result<Self> {
        Self::connect(path, false).await
    }

    async fn connect(path: &Path, create: bool) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(create);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open search index: {}", path.display()))?;
        Ok(Self { pool })
    }

    pub(crate) async fn insert(&self, entry: &IndexEntry) -> Result<()> {
        sqlx::query("INSERT INTO searchIndex (name, type, path) VALUES (?, ?, ?)")
            .bind(&entry.name)
            .bind(entry.entry_type)
            .bind(&entry.path)
            .execute(&self.pool)
            .await
            .with_context(|| format!("Failed to index entry: {}", entry.name))?;
        Ok(())
    }

    pub(crate) async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(1) AS count FROM searchIndex")
            .fetch_one(&self.pool)
            .await
            .context("Failed to count index entries")?;
        Ok(row.get("count"))
    }

    pub(crate) async fn rows(&self) -> Result<Vec<(String, String, String)>> {
        let rows = sqlx::query("SELECT name, type, path FROM searchIndex ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .context("Failed to read index entries")?;
        Ok(rows
            .into_iter()
            .map(|row| (row.get("name"), row.get("type"), row.get("path")))
            .collect())
    }

    /// Flush and release the store file. Must run on every exit path so a
    /// partially written index never ships.
    pub(crate) async fn close(&self) {
        self.pool.close().await;
    }
}
