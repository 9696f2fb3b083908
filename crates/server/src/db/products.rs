//! Product repository for database operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use greenbasket_core::api::{ProductAttribute, ProductDoc};
use greenbasket_core::{CategoryId, ProductId};

use super::{RepositoryError, conflict_on_unique};

const PRODUCT_COLUMNS: &str = "id, title, description, price, original_price, image, category, \
                               category_name, stock_quantity, sku, featured, in_stock, is_active, \
                               attributes, created_at, updated_at";

/// Database row for a product.
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i32,
    title: String,
    description: String,
    price: Decimal,
    original_price: Option<Decimal>,
    image: String,
    category: i32,
    category_name: String,
    stock_quantity: i32,
    sku: Option<String>,
    featured: bool,
    in_stock: bool,
    is_active: bool,
    attributes: Json<Vec<ProductAttribute>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for ProductDoc {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            title: row.title,
            description: row.description,
            price: row.price,
            original_price: row.original_price,
            image: row.image,
            category: CategoryId::new(row.category),
            category_name: row.category_name,
            stock_quantity: row.stock_quantity,
            sku: row.sku,
            featured: row.featured,
            in_stock: row.in_stock,
            is_active: row.is_active,
            attributes: row.attributes.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Filters for listing products. Pages are 1-based.
#[derive(Debug, Clone, Copy)]
pub struct ProductFilter {
    pub page: u32,
    pub limit: u32,
    pub category: Option<CategoryId>,
    pub featured: Option<bool>,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            category: None,
            featured: None,
        }
    }
}

impl ProductFilter {
    fn offset(self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.limit)
    }
}

/// Parameters for creating a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub original_price: Option<Decimal>,
    pub image: String,
    pub category: CategoryId,
    pub category_name: String,
    pub stock_quantity: Option<i32>,
    pub sku: Option<String>,
    pub attributes: Vec<ProductAttribute>,
}

/// Parameters for updating a product. Absent fields keep their value.
#[derive(Debug, Clone, Default)]
pub struct UpdateProduct {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub original_price: Option<Decimal>,
    pub image: Option<String>,
    pub category: Option<CategoryId>,
    pub category_name: Option<String>,
    pub stock_quantity: Option<i32>,
    pub sku: Option<String>,
    pub featured: Option<bool>,
    pub in_stock: Option<bool>,
    pub is_active: Option<bool>,
    pub attributes: Option<Vec<ProductAttribute>>,
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List active products matching the filter, newest first.
    ///
    /// Returns the page of products and the total match count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(
        &self,
        filter: ProductFilter,
    ) -> Result<(Vec<ProductDoc>, u64), RepositoryError> {
        let category = filter.category.map(|c| c.as_i32());

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE is_active \
               AND ($1::integer IS NULL OR category = $1) \
               AND ($2::boolean IS NULL OR featured = $2) \
             ORDER BY created_at DESC \
             LIMIT $3 OFFSET $4"
        ))
        .bind(category)
        .bind(filter.featured)
        .bind(i64::from(filter.limit))
        .bind(filter.offset())
        .fetch_all(self.pool)
        .await?;

        let (total,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM products \
             WHERE is_active \
               AND ($1::integer IS NULL OR category = $1) \
               AND ($2::boolean IS NULL OR featured = $2)",
        )
        .bind(category)
        .bind(filter.featured)
        .fetch_one(self.pool)
        .await?;

        Ok((
            rows.into_iter().map(ProductDoc::from).collect(),
            total.try_into().unwrap_or(0),
        ))
    }

    /// Get an active product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_active_by_id(
        &self,
        id: ProductId,
    ) -> Result<Option<ProductDoc>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1 AND is_active"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(ProductDoc::from))
    }

    /// Case-insensitive substring search over title and description.
    ///
    /// Returns the page of products and the total match count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn search(
        &self,
        query: &str,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<ProductDoc>, u64), RepositoryError> {
        let pattern = format!("%{query}%");
        let offset = i64::from(page.saturating_sub(1)) * i64::from(limit);

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE is_active AND (title ILIKE $1 OR description ILIKE $1) \
             ORDER BY created_at DESC \
             LIMIT $2 OFFSET $3"
        ))
        .bind(&pattern)
        .bind(i64::from(limit))
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        let (total,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM products \
             WHERE is_active AND (title ILIKE $1 OR description ILIKE $1)",
        )
        .bind(&pattern)
        .fetch_one(self.pool)
        .await?;

        Ok((
            rows.into_iter().map(ProductDoc::from).collect(),
            total.try_into().unwrap_or(0),
        ))
    }

    /// Create a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the title or SKU already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new: NewProduct) -> Result<ProductDoc, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO products (title, description, price, original_price, image, category, \
                                   category_name, stock_quantity, sku, attributes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, 0), $9, $10) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.price)
        .bind(new.original_price)
        .bind(&new.image)
        .bind(new.category)
        .bind(&new.category_name)
        .bind(new.stock_quantity)
        .bind(&new.sku)
        .bind(Json(&new.attributes))
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "product with this title or SKU"))?;

        Ok(row.into())
    }

    /// Update a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Conflict` if the new title or SKU collides.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        update: UpdateProduct,
    ) -> Result<ProductDoc, RepositoryError> {
        let attributes = update.attributes.map(Json);

        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE products \
             SET title = COALESCE($2, title), \
                 description = COALESCE($3, description), \
                 price = COALESCE($4, price), \
                 original_price = COALESCE($5, original_price), \
                 image = COALESCE($6, image), \
                 category = COALESCE($7, category), \
                 category_name = COALESCE($8, category_name), \
                 stock_quantity = COALESCE($9, stock_quantity), \
                 sku = COALESCE($10, sku), \
                 featured = COALESCE($11, featured), \
                 in_stock = COALESCE($12, in_stock), \
                 is_active = COALESCE($13, is_active), \
                 attributes = COALESCE($14, attributes), \
                 updated_at = now() \
             WHERE id = $1 \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(&update.title)
        .bind(&update.description)
        .bind(update.price)
        .bind(update.original_price)
        .bind(&update.image)
        .bind(update.category)
        .bind(&update.category_name)
        .bind(update.stock_quantity)
        .bind(&update.sku)
        .bind(update.featured)
        .bind(update.in_stock)
        .bind(update.is_active)
        .bind(attributes)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "product with this title or SKU"))?;

        row.map(ProductDoc::from).ok_or(RepositoryError::NotFound)
    }

    /// Delete a product.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_offset() {
        let filter = ProductFilter {
            page: 1,
            limit: 10,
            ..ProductFilter::default()
        };
        assert_eq!(filter.offset(), 0);

        let filter = ProductFilter {
            page: 3,
            limit: 25,
            ..ProductFilter::default()
        };
        assert_eq!(filter.offset(), 50);
    }

    #[test]
    fn test_filter_offset_page_zero() {
        // A client sending page=0 gets page one, not a negative offset.
        let filter = ProductFilter {
            page: 0,
            limit: 10,
            ..ProductFilter::default()
        };
        assert_eq!(filter.offset(), 0);
    }
}
