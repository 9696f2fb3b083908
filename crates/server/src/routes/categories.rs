//! Category route handlers.
//!
//! Reads resolve identity optionally; writes require it. The `:id` path
//! parameter accepts either a numeric id or a slug.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::Response,
};
use serde::{Deserialize, Serialize};

use greenbasket_core::CategoryId;
use greenbasket_core::api::CategoryDoc;

use crate::db::categories::{CategoryRepository, NewCategory, UpdateCategory, slugify};
use crate::error::{ApiError, Result};
use crate::middleware::{OptionalIdentity, RequireIdentity};
use crate::response;
use crate::state::AppState;
use crate::validation::{Checks, is_url};

#[derive(Debug, Serialize)]
struct CategoriesData {
    categories: Vec<CategoryDoc>,
}

#[derive(Debug, Serialize)]
struct CategoryData {
    category: CategoryDoc,
}

/// Query parameters for the category list.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    include_inactive: Option<String>,
}

/// Body of `POST /categories`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryBody {
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub order: Option<i32>,
}

/// Body of `PUT /categories/:id`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryBody {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub order: Option<i32>,
    pub is_active: Option<bool>,
}

fn validate_create(body: &CreateCategoryBody) -> Result<()> {
    let mut checks = Checks::new();
    check_common(
        &mut checks,
        Some(&body.title),
        body.description.as_deref(),
        body.image.as_deref(),
        body.order,
    );
    checks.finish()
}

fn validate_update(body: &UpdateCategoryBody) -> Result<()> {
    let mut checks = Checks::new();
    check_common(
        &mut checks,
        body.title.as_deref(),
        body.description.as_deref(),
        body.image.as_deref(),
        body.order,
    );
    checks.finish()
}

fn check_common(
    checks: &mut Checks,
    title: Option<&str>,
    description: Option<&str>,
    image: Option<&str>,
    order: Option<i32>,
) {
    if let Some(title) = title {
        let len = title.trim().len();
        checks.ensure(
            (2..=50).contains(&len),
            "title",
            "Title must be between 2 and 50 characters",
        );
    }
    if let Some(description) = description {
        checks.ensure(
            description.trim().len() <= 500,
            "description",
            "Description must be less than 500 characters",
        );
    }
    if let Some(image) = image {
        checks.ensure(is_url(image), "image", "Image must be a valid URL");
    }
    if let Some(order) = order {
        checks.ensure(order >= 0, "order", "Order must be a positive integer");
    }
}

/// `GET /categories`
pub async fn list(
    _identity: OptionalIdentity,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Response> {
    let include_inactive = query.include_inactive.as_deref() == Some("true");

    let categories = CategoryRepository::new(state.pool())
        .list(include_inactive)
        .await?;

    Ok(response::ok(CategoriesData { categories }))
}

/// `GET /categories/:id` - by numeric id or slug.
pub async fn show(
    _identity: OptionalIdentity,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response> {
    let repo = CategoryRepository::new(state.pool());

    let category = match id.parse::<i32>() {
        Ok(numeric) => repo.get_active_by_id(CategoryId::new(numeric)).await?,
        Err(_) => repo.get_active_by_slug(&id).await?,
    };

    let category = category.ok_or_else(|| ApiError::NotFound("Category not found".to_owned()))?;
    Ok(response::ok(CategoryData { category }))
}

/// `POST /categories`
pub async fn create(
    RequireIdentity(_identity): RequireIdentity,
    State(state): State<AppState>,
    Json(body): Json<CreateCategoryBody>,
) -> Result<Response> {
    validate_create(&body)?;

    let repo = CategoryRepository::new(state.pool());

    let slug = slugify(&body.title);
    if repo.exists_by_title_or_slug(&body.title, &slug).await? {
        return Err(ApiError::BadRequest("Category already exists".to_owned()));
    }

    let category = repo
        .create(NewCategory {
            title: body.title.trim().to_owned(),
            description: body.description,
            image: body.image,
            sort_order: body.order,
        })
        .await?;

    Ok(response::created_with_message(
        CategoryData { category },
        "Category created successfully",
    ))
}

/// `PUT /categories/:id`
pub async fn update(
    RequireIdentity(_identity): RequireIdentity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<UpdateCategoryBody>,
) -> Result<Response> {
    validate_update(&body)?;

    let category = CategoryRepository::new(state.pool())
        .update(
            CategoryId::new(id),
            UpdateCategory {
                title: body.title.map(|t| t.trim().to_owned()),
                description: body.description,
                image: body.image,
                sort_order: body.order,
                is_active: body.is_active,
            },
        )
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                ApiError::NotFound("Category not found".to_owned())
            }
            crate::db::RepositoryError::Conflict(_) => {
                ApiError::BadRequest("Category title already exists".to_owned())
            }
            other => ApiError::Database(other),
        })?;

    Ok(response::ok_with_message(
        CategoryData { category },
        "Category updated successfully",
    ))
}

/// `DELETE /categories/:id`
pub async fn remove(
    RequireIdentity(_identity): RequireIdentity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response> {
    let deleted = CategoryRepository::new(state.pool())
        .delete(CategoryId::new(id))
        .await?;

    if !deleted {
        return Err(ApiError::NotFound("Category not found".to_owned()));
    }

    Ok(response::message("Category deleted successfully"))
}

/// `PATCH /categories/:id/toggle`
pub async fn toggle(
    RequireIdentity(_identity): RequireIdentity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Response> {
    let category = CategoryRepository::new(state.pool())
        .toggle(CategoryId::new(id))
        .await?
        .ok_or_else(|| ApiError::NotFound("Category not found".to_owned()))?;

    let message = if category.is_active {
        "Category activated successfully"
    } else {
        "Category deactivated successfully"
    };

    Ok(response::ok_with_message(CategoryData { category }, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_title_bounds() {
        let body = CreateCategoryBody {
            title: "A".to_owned(),
            description: None,
            image: None,
            order: None,
        };
        assert!(validate_create(&body).is_err());

        let body = CreateCategoryBody {
            title: "Fresh Produce".to_owned(),
            description: None,
            image: None,
            order: None,
        };
        assert!(validate_create(&body).is_ok());
    }

    #[test]
    fn test_create_rejects_bad_image() {
        let body = CreateCategoryBody {
            title: "Fresh Produce".to_owned(),
            description: None,
            image: Some("not-a-url".to_owned()),
            order: None,
        };
        assert!(validate_create(&body).is_err());
    }

    #[test]
    fn test_update_allows_empty_body() {
        let body = UpdateCategoryBody {
            title: None,
            description: None,
            image: None,
            order: None,
            is_active: None,
        };
        assert!(validate_update(&body).is_ok());
    }

    #[test]
    fn test_update_rejects_negative_order() {
        let body = UpdateCategoryBody {
            title: None,
            description: None,
            image: None,
            order: Some(-1),
            is_active: None,
        };
        assert!(validate_update(&body).is_err());
    }
}
