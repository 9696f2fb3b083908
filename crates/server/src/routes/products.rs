//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::Response,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use greenbasket_core::api::{Pagination, ProductAttribute, ProductDoc};
use greenbasket_core::{CategoryId, ProductId};

use crate::db::categories::CategoryRepository;
use crate::db::products::{NewProduct, ProductFilter, ProductRepository, UpdateProduct};
use crate::error::{ApiError, Result};
use crate::middleware::{OptionalIdentity, RequireIdentity};
use crate::response;
use crate::state::AppState;
use crate::validation::{Checks, is_url};

const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Debug, Serialize)]
struct ProductsData {
    products: Vec<ProductDoc>,
    pagination: Pagination,
}

#[derive(Debug, Serialize)]
struct ProductData {
    product: ProductDoc,
}

/// Query parameters for product listings.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    page: Option<u32>,
    limit: Option<u32>,
    category: Option<i32>,
    featured: Option<bool>,
}

/// Query parameters for paged sub-listings (by category, search).
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    page: Option<u32>,
    limit: Option<u32>,
}

/// Body of `POST /products`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductBody {
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub original_price: Option<Decimal>,
    pub image: String,
    pub category: i32,
    pub stock_quantity: Option<i32>,
    pub sku: Option<String>,
    #[serde(default)]
    pub attributes: Vec<ProductAttribute>,
}

/// Body of `PUT /products/:id`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductBody {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub original_price: Option<Decimal>,
    pub image: Option<String>,
    pub category: Option<i32>,
    pub stock_quantity: Option<i32>,
    pub sku: Option<String>,
    pub featured: Option<bool>,
    pub in_stock: Option<bool>,
    pub is_active: Option<bool>,
    pub attributes: Option<Vec<ProductAttribute>>,
}

fn validate_create(body: &CreateProductBody) -> Result<()> {
    let mut checks = Checks::new();

    let title_len = body.title.trim().len();
    checks.ensure(
        (2..=100).contains(&title_len),
        "title",
        "Title must be between 2 and 100 characters",
    );

    let description_len = body.description.trim().len();
    checks.ensure(
        (10..=1000).contains(&description_len),
        "description",
        "Description must be between 10 and 1000 characters",
    );

    checks.ensure(
        body.price >= Decimal::ZERO,
        "price",
        "Price must be a positive number",
    );
    if let Some(original) = body.original_price {
        checks.ensure(
            original >= Decimal::ZERO,
            "originalPrice",
            "Original price must be a positive number",
        );
    }

    checks.ensure(is_url(&body.image), "image", "Image must be a valid URL");

    if let Some(stock) = body.stock_quantity {
        checks.ensure(
            stock >= 0,
            "stockQuantity",
            "Stock quantity must be a positive integer",
        );
    }
    if let Some(sku) = &body.sku {
        let len = sku.trim().len();
        checks.ensure(
            (3..=20).contains(&len),
            "sku",
            "SKU must be between 3 and 20 characters",
        );
    }

    checks.finish()
}

fn validate_update(body: &UpdateProductBody) -> Result<()> {
    let mut checks = Checks::new();

    if let Some(title) = &body.title {
        let len = title.trim().len();
        checks.ensure(
            (2..=100).contains(&len),
            "title",
            "Title must be between 2 and 100 characters",
        );
    }
    if let Some(description) = &body.description {
        let len = description.trim().len();
        checks.ensure(
            (10..=1000).contains(&len),
            "description",
            "Description must be between 10 and 1000 characters",
        );
    }
    if let Some(price) = body.price {
        checks.ensure(
            price >= Decimal::ZERO,
            "price",
            "Price must be a positive number",
        );
    }
    if let Some(original) = body.original_price {
        checks.ensure(
            original >= Decimal::ZERO,
            "originalPrice",
            "Original price must be a positive number",
        );
    }
    if let Some(image) = &body.image {
        checks.ensure(is_url(image), "image", "Image must be a valid URL");
    }
    if let Some(stock) = body.stock_quantity {
        checks.ensure(
            stock >= 0,
            "stockQuantity",
            "Stock quantity must be a positive integer",
        );
    }
    if let Some(sku) = &body.sku {
        let len = sku.trim().len();
        checks.ensure(
            (3..=20).contains(&len),
            "sku",
            "SKU must be between 3 and 20 characters",
        );
    }

    checks.finish()
}

fn pagination(page: u32, limit: u32, total: u64) -> Pagination {
    let total_pages = if limit == 0 {
        0
    } else {
        total.div_ceil(u64::from(limit)).try_into().unwrap_or(u32::MAX)
    };

    Pagination {
        current_page: page,
        total_pages,
        total_products: total,
    }
}

/// `GET /products`
pub async fn list(
    _identity: OptionalIdentity,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Response> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1);

    let (products, total) = ProductRepository::new(state.pool())
        .list(ProductFilter {
            page,
            limit,
            category: query.category.map(CategoryId::new),
            featured: query.featured,
        })
        .await?;

    Ok(response::ok(ProductsData {
        products,
        pagination: pagination(page, limit, total),
    }))
}

/// `GET /products/:id`
pub async fn show(
    _identity: OptionalIdentity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response> {
    let product = ProductRepository::new(state.pool())
        .get_active_by_id(ProductId::new(id))
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_owned()))?;

    Ok(response::ok(ProductData { product }))
}

/// `GET /products/category/:id`
pub async fn by_category(
    _identity: OptionalIdentity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<PageQuery>,
) -> Result<Response> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1);

    let (products, total) = ProductRepository::new(state.pool())
        .list(ProductFilter {
            page,
            limit,
            category: Some(CategoryId::new(id)),
            featured: None,
        })
        .await?;

    Ok(response::ok(ProductsData {
        products,
        pagination: pagination(page, limit, total),
    }))
}

/// `GET /products/search/:query`
pub async fn search(
    _identity: OptionalIdentity,
    State(state): State<AppState>,
    Path(term): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Response> {
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1);

    let (products, total) = ProductRepository::new(state.pool())
        .search(&term, page, limit)
        .await?;

    Ok(response::ok(ProductsData {
        products,
        pagination: pagination(page, limit, total),
    }))
}

/// `POST /products`
pub async fn create(
    RequireIdentity(_identity): RequireIdentity,
    State(state): State<AppState>,
    Json(body): Json<CreateProductBody>,
) -> Result<Response> {
    validate_create(&body)?;

    // Resolve the category and denormalize its title onto the product.
    let category = CategoryRepository::new(state.pool())
        .get_by_id(CategoryId::new(body.category))
        .await?
        .ok_or_else(|| ApiError::BadRequest("Category not found".to_owned()))?;

    let product = ProductRepository::new(state.pool())
        .create(NewProduct {
            title: body.title.trim().to_owned(),
            description: body.description.trim().to_owned(),
            price: body.price,
            original_price: body.original_price,
            image: body.image,
            category: category.id,
            category_name: category.title,
            stock_quantity: body.stock_quantity,
            sku: body.sku,
            attributes: body.attributes,
        })
        .await?;

    Ok(response::created_with_message(
        ProductData { product },
        "Product created successfully",
    ))
}

/// `PUT /products/:id`
pub async fn update(
    RequireIdentity(_identity): RequireIdentity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<UpdateProductBody>,
) -> Result<Response> {
    validate_update(&body)?;

    // A changed category re-resolves the denormalized title.
    let category = match body.category {
        Some(category_id) => Some(
            CategoryRepository::new(state.pool())
                .get_by_id(CategoryId::new(category_id))
                .await?
                .ok_or_else(|| ApiError::BadRequest("Category not found".to_owned()))?,
        ),
        None => None,
    };

    let product = ProductRepository::new(state.pool())
        .update(
            ProductId::new(id),
            UpdateProduct {
                title: body.title.map(|t| t.trim().to_owned()),
                description: body.description.map(|d| d.trim().to_owned()),
                price: body.price,
                original_price: body.original_price,
                image: body.image,
                category: category.as_ref().map(|c| c.id),
                category_name: category.map(|c| c.title),
                stock_quantity: body.stock_quantity,
                sku: body.sku,
                featured: body.featured,
                in_stock: body.in_stock,
                is_active: body.is_active,
                attributes: body.attributes,
            },
        )
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                ApiError::NotFound("Product not found".to_owned())
            }
            other => ApiError::Database(other),
        })?;

    Ok(response::ok_with_message(
        ProductData { product },
        "Product updated successfully",
    ))
}

/// `DELETE /products/:id`
pub async fn remove(
    RequireIdentity(_identity): RequireIdentity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response> {
    let deleted = ProductRepository::new(state.pool())
        .delete(ProductId::new(id))
        .await?;

    if !deleted {
        return Err(ApiError::NotFound("Product not found".to_owned()));
    }

    Ok(response::message("Product deleted successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_body() -> CreateProductBody {
        CreateProductBody {
            title: "Granny Smith Apples".to_owned(),
            description: "Crisp, tart apples sold by the pound.".to_owned(),
            price: Decimal::new(299, 2),
            original_price: None,
            image: "https://cdn.example.com/apples.png".to_owned(),
            category: 1,
            stock_quantity: Some(50),
            sku: Some("APL-GS-1".to_owned()),
            attributes: vec![],
        }
    }

    #[test]
    fn test_create_valid() {
        assert!(validate_create(&create_body()).is_ok());
    }

    #[test]
    fn test_create_short_description() {
        let body = CreateProductBody {
            description: "Too short".to_owned(),
            ..create_body()
        };
        assert!(validate_create(&body).is_err());
    }

    #[test]
    fn test_create_negative_price() {
        let body = CreateProductBody {
            price: Decimal::new(-1, 0),
            ..create_body()
        };
        assert!(validate_create(&body).is_err());
    }

    #[test]
    fn test_update_sku_bounds() {
        let body = UpdateProductBody {
            sku: Some("ab".to_owned()),
            ..UpdateProductBody::default()
        };
        assert!(validate_update(&body).is_err());
    }

    #[test]
    fn test_pagination_math() {
        let p = pagination(2, 10, 35);
        assert_eq!(p.current_page, 2);
        assert_eq!(p.total_pages, 4);
        assert_eq!(p.total_products, 35);
    }

    #[test]
    fn test_pagination_exact_multiple() {
        assert_eq!(pagination(1, 10, 30).total_pages, 3);
        assert_eq!(pagination(1, 10, 0).total_pages, 0);
    }
}
