use anyhow::{Context, Result};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
    sync::Arc,
};
use tokio::sync::Mutex;

use shared::domain::{Hero, HeroId, NewHero};

/// Id handed out when the collection is empty.
pub const FIRST_HERO_ID: HeroId = HeroId(11);

const DEFAULT_HERO_NAMES: [&str; 10] = [
    "Aquaman",
    "Batman",
    "Cyborg",
    "Superman",
    "The Flash",
    "Wonder Woman",
    "Mera",
    "Batgirl",
    "Martian Manhunter",
    "Green Lantern",
];

/// The ten heroes a fresh registry starts with, ids 11 through 20.
pub fn default_heroes() -> Vec<Hero> {
    DEFAULT_HERO_NAMES
        .iter()
        .zip(FIRST_HERO_ID.0..)
        .map(|(name, id)| Hero::new(id, *name))
        .collect()
}

/// Max existing id + 1, or [`FIRST_HERO_ID`] for an empty collection.
pub fn gen_id(heroes: &[Hero]) -> HeroId {
    heroes
        .iter()
        .map(|hero| hero.id.0)
        .max()
        .map_or(FIRST_HERO_ID, |max| HeroId(max + 1))
}

#[derive(Clone)]
pub struct HeroStore {
    pool: Pool<Sqlite>,
    // Serializes id generation with the insert that uses it.
    write_lock: Arc<Mutex<()>>,
}

impl HeroStore {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool_options = if is_in_memory(database_url) {
            // The database disappears with its last connection.
            SqlitePoolOptions::new()
                .min_connections(1)
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };
        let pool = pool_options.connect_with(connect_options).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self {
            pool,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    /// Loads [`default_heroes`] into an empty store. Returns whether anything was written.
    pub async fn seed_defaults(&self) -> Result<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM heroes")
            .fetch_one(&self.pool)
            .await
            .context("failed to count heroes")?;
        if count > 0 {
            return Ok(false);
        }
        self.reset(&default_heroes()).await?;
        Ok(true)
    }

    /// Replaces the whole collection with `heroes`, keeping their ids.
    pub async fn reset(&self, heroes: &[Hero]) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM heroes")
            .execute(&mut *tx)
            .await
            .context("failed to clear heroes")?;
        for hero in heroes {
            sqlx::query("INSERT INTO heroes (id, name) VALUES (?, ?)")
                .bind(hero.id.0)
                .bind(&hero.name)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("failed to insert hero id={}", hero.id))?;
        }
        tx.commit().await?;
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<Hero>> {
        let rows = sqlx::query("SELECT id, name FROM heroes ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(hero_from_row).collect())
    }

    pub async fn get(&self, id: HeroId) -> Result<Option<Hero>> {
        let row = sqlx::query("SELECT id, name FROM heroes WHERE id = ?")
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(hero_from_row))
    }

    /// Case-insensitive substring match on the hero name. `term` is taken
    /// literally. SQLite's `lower()` only folds ASCII, so matching happens here.
    pub async fn search(&self, term: &str) -> Result<Vec<Hero>> {
        let needle = term.to_lowercase();
        let heroes = self.list().await?;
        Ok(heroes
            .into_iter()
            .filter(|hero| hero.name.to_lowercase().contains(&needle))
            .collect())
    }

    /// Stores `new_hero` under [`gen_id`] of the current collection. The id
    /// read and the insert share one transaction.
    pub async fn insert(&self, new_hero: &NewHero) -> Result<Hero> {
        let _guard = self.write_lock.lock().await;
        let mut tx = self.pool.begin().await?;
        let rows = sqlx::query("SELECT id, name FROM heroes")
            .fetch_all(&mut *tx)
            .await
            .context("failed to read heroes")?;
        let existing: Vec<Hero> = rows.iter().map(hero_from_row).collect();
        let hero = Hero::new(gen_id(&existing), new_hero.name.clone());
        sqlx::query("INSERT INTO heroes (id, name) VALUES (?, ?)")
            .bind(hero.id.0)
            .bind(&hero.name)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("failed to insert hero id={}", hero.id))?;
        tx.commit().await?;
        Ok(hero)
    }

    /// Renames the hero with `hero.id`. Returns `false` when no such hero exists.
    pub async fn update(&self, hero: &Hero) -> Result<bool> {
        let result = sqlx::query("UPDATE heroes SET name = ? WHERE id = ?")
            .bind(&hero.name)
            .bind(hero.id.0)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, id: HeroId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM heroes WHERE id = ?")
            .bind(id.0)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn hero_from_row(row: &SqliteRow) -> Hero {
    Hero::new(row.get::<i64, _>("id"), row.get::<String, _>("name"))
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.starts_with("sqlite::memory:") || database_url.contains("mode=memory")
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if is_in_memory(database_url) || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
