//! Category and product endpoints.

use serde::Deserialize;

use greenbasket_core::api::{CategoryDoc, Pagination, ProductDoc};
use greenbasket_core::{CategoryId, ProductId};

use super::ApiClient;
use crate::result::RemoteResult;

/// `data` payload of the category list.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoriesPayload {
    pub categories: Vec<CategoryDoc>,
}

/// `data` payload of a single category.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryPayload {
    pub category: CategoryDoc,
}

/// `data` payload of product listings.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductsPayload {
    pub products: Vec<ProductDoc>,
    pub pagination: Pagination,
}

/// `data` payload of a single product.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductPayload {
    pub product: ProductDoc,
}

/// Query knobs for product listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductsQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub category: Option<CategoryId>,
    pub featured: Option<bool>,
}

impl ProductsQuery {
    fn to_query_string(self) -> String {
        let mut parts = Vec::new();
        if let Some(page) = self.page {
            parts.push(format!("page={page}"));
        }
        if let Some(limit) = self.limit {
            parts.push(format!("limit={limit}"));
        }
        if let Some(category) = self.category {
            parts.push(format!("category={category}"));
        }
        if let Some(featured) = self.featured {
            parts.push(format!("featured={featured}"));
        }

        if parts.is_empty() {
            String::new()
        } else {
            format!("?{}", parts.join("&"))
        }
    }
}

impl ApiClient {
    /// `GET /categories`
    pub async fn categories(&self, include_inactive: bool) -> RemoteResult<CategoriesPayload> {
        let endpoint = if include_inactive {
            "/categories?includeInactive=true"
        } else {
            "/categories"
        };
        self.get(endpoint).await
    }

    /// `GET /categories/:id` - numeric id or slug.
    pub async fn category(&self, id_or_slug: &str) -> RemoteResult<CategoryPayload> {
        self.get(&format!("/categories/{id_or_slug}")).await
    }

    /// `GET /products`
    pub async fn products(&self, query: ProductsQuery) -> RemoteResult<ProductsPayload> {
        self.get(&format!("/products{}", query.to_query_string()))
            .await
    }

    /// `GET /products/:id`
    pub async fn product(&self, id: ProductId) -> RemoteResult<ProductPayload> {
        self.get(&format!("/products/{id}")).await
    }

    /// `GET /products/category/:id`
    pub async fn products_by_category(
        &self,
        category: CategoryId,
        page: Option<u32>,
    ) -> RemoteResult<ProductsPayload> {
        let query = ProductsQuery {
            page,
            ..ProductsQuery::default()
        };
        self.get(&format!(
            "/products/category/{category}{}",
            query.to_query_string()
        ))
        .await
    }

    /// `GET /products/search/:query`
    pub async fn search_products(
        &self,
        term: &str,
        page: Option<u32>,
    ) -> RemoteResult<ProductsPayload> {
        let query = ProductsQuery {
            page,
            ..ProductsQuery::default()
        };
        self.get(&format!("/products/search/{term}{}", query.to_query_string()))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_string_empty() {
        assert_eq!(ProductsQuery::default().to_query_string(), "");
    }

    #[test]
    fn test_query_string_full() {
        let query = ProductsQuery {
            page: Some(2),
            limit: Some(20),
            category: Some(CategoryId::new(3)),
            featured: Some(true),
        };
        assert_eq!(
            query.to_query_string(),
            "?page=2&limit=20&category=3&featured=true"
        );
    }
}
