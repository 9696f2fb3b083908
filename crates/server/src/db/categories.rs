//! Category repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use greenbasket_core::CategoryId;
use greenbasket_core::api::CategoryDoc;

use super::{RepositoryError, conflict_on_unique};

const CATEGORY_COLUMNS: &str =
    "id, title, description, image, is_active, sort_order, slug, created_at, updated_at";

/// Database row for a category.
#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: i32,
    title: String,
    description: Option<String>,
    image: String,
    is_active: bool,
    sort_order: i32,
    slug: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CategoryRow> for CategoryDoc {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::new(row.id),
            title: row.title,
            description: row.description,
            image: row.image,
            is_active: row.is_active,
            sort_order: row.sort_order,
            slug: row.slug,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Parameters for creating a category.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub sort_order: Option<i32>,
}

/// Parameters for updating a category. Absent fields keep their value.
#[derive(Debug, Clone, Default)]
pub struct UpdateCategory {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

/// Derive a URL slug from a category title.
///
/// Lowercases, strips everything but `[a-z0-9 -]`, then collapses runs of
/// whitespace and dashes into single dashes.
#[must_use]
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let kept: String = lowered
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == ' ' || *c == '-')
        .collect();

    let mut slug = String::with_capacity(kept.len());
    let mut last_dash = true; // suppress leading dashes
    for c in kept.chars() {
        if c == ' ' || c == '-' {
            if !last_dash {
                slug.push('-');
                last_dash = true;
            }
        } else {
            slug.push(c);
            last_dash = false;
        }
    }
    slug.trim_end_matches('-').to_string()
}

/// Repository for category database operations.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List categories, ordered by sort order then title.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, include_inactive: bool) -> Result<Vec<CategoryDoc>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories \
             WHERE is_active OR $1 \
             ORDER BY sort_order, title"
        ))
        .bind(include_inactive)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(CategoryDoc::from).collect())
    }

    /// Get an active category by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_active_by_id(
        &self,
        id: CategoryId,
    ) -> Result<Option<CategoryDoc>, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1 AND is_active"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(CategoryDoc::from))
    }

    /// Get an active category by slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_active_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<CategoryDoc>, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE slug = $1 AND is_active"
        ))
        .bind(slug)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(CategoryDoc::from))
    }

    /// Get a category by id regardless of active state.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: CategoryId) -> Result<Option<CategoryDoc>, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(CategoryDoc::from))
    }

    /// Whether a category with this title or slug already exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists_by_title_or_slug(
        &self,
        title: &str,
        slug: &str,
    ) -> Result<bool, RepositoryError> {
        let (exists,): (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM categories WHERE title = $1 OR slug = $2)")
                .bind(title)
                .bind(slug)
                .fetch_one(self.pool)
                .await?;

        Ok(exists)
    }

    /// Create a new category. The slug is derived from the title.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the title already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new: NewCategory) -> Result<CategoryDoc, RepositoryError> {
        let slug = slugify(&new.title);

        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "INSERT INTO categories (title, description, image, sort_order, slug) \
             VALUES ($1, $2, COALESCE($3, ''), COALESCE($4, 0), $5) \
             RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.image)
        .bind(new.sort_order)
        .bind(&slug)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "category"))?;

        Ok(row.into())
    }

    /// Update a category. A changed title re-derives the slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the category doesn't exist.
    /// Returns `RepositoryError::Conflict` if the new title collides.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: CategoryId,
        update: UpdateCategory,
    ) -> Result<CategoryDoc, RepositoryError> {
        let slug = update.title.as_deref().map(slugify);

        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "UPDATE categories \
             SET title = COALESCE($2, title), \
                 description = COALESCE($3, description), \
                 image = COALESCE($4, image), \
                 sort_order = COALESCE($5, sort_order), \
                 is_active = COALESCE($6, is_active), \
                 slug = COALESCE($7, slug), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(id)
        .bind(&update.title)
        .bind(&update.description)
        .bind(&update.image)
        .bind(update.sort_order)
        .bind(update.is_active)
        .bind(&slug)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "category title"))?;

        row.map(CategoryDoc::from).ok_or(RepositoryError::NotFound)
    }

    /// Delete a category.
    ///
    /// # Returns
    ///
    /// Returns `true` if the category was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: CategoryId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Flip a category's active flag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn toggle(&self, id: CategoryId) -> Result<Option<CategoryDoc>, RepositoryError> {
        let row = sqlx::query_as::<_, CategoryRow>(&format!(
            "UPDATE categories SET is_active = NOT is_active, updated_at = now() \
             WHERE id = $1 \
             RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(CategoryDoc::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Fresh Produce"), "fresh-produce");
    }

    #[test]
    fn test_slugify_strips_punctuation() {
        assert_eq!(slugify("Dairy & Eggs!"), "dairy-eggs");
    }

    #[test]
    fn test_slugify_collapses_separators() {
        assert_eq!(slugify("Home  --  Garden"), "home-garden");
    }

    #[test]
    fn test_slugify_trims_edges() {
        assert_eq!(slugify("  Snacks  "), "snacks");
        assert_eq!(slugify("-Snacks-"), "snacks");
    }

    #[test]
    fn test_slugify_keeps_digits() {
        assert_eq!(slugify("Top 10 Deals"), "top-10-deals");
    }
}
