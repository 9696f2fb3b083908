//! Seed the database with sample categories and products.
//!
//! Intended for development environments; existing rows with the same
//! titles are left alone, so running it twice is safe.

use rust_decimal::Decimal;
use secrecy::SecretString;
use sqlx::PgPool;
use tracing::{info, warn};

use greenbasket_server::db;
use greenbasket_server::db::categories::{CategoryRepository, NewCategory};
use greenbasket_server::db::products::{NewProduct, ProductRepository};
use greenbasket_server::db::RepositoryError;

struct SampleCategory {
    title: &'static str,
    description: &'static str,
    image: &'static str,
    order: i32,
}

struct SampleProduct {
    title: &'static str,
    description: &'static str,
    price: Decimal,
    image: &'static str,
    category: &'static str,
    stock: i32,
    sku: &'static str,
}

const CATEGORIES: &[SampleCategory] = &[
    SampleCategory {
        title: "Electronics",
        description: "Latest gadgets and electronic devices",
        image: "https://cdn.greenbasket.dev/seed/electronics.jpg",
        order: 1,
    },
    SampleCategory {
        title: "Clothing",
        description: "Fashionable clothing for all seasons",
        image: "https://cdn.greenbasket.dev/seed/clothing.jpg",
        order: 2,
    },
    SampleCategory {
        title: "Home & Kitchen",
        description: "Everything for your home and kitchen",
        image: "https://cdn.greenbasket.dev/seed/home-kitchen.jpg",
        order: 3,
    },
    SampleCategory {
        title: "Books",
        description: "Best selling books and novels",
        image: "https://cdn.greenbasket.dev/seed/books.jpg",
        order: 4,
    },
    SampleCategory {
        title: "Sports",
        description: "Sports equipment and accessories",
        image: "https://cdn.greenbasket.dev/seed/sports.jpg",
        order: 5,
    },
];

fn sample_products() -> Vec<SampleProduct> {
    vec![
        SampleProduct {
            title: "Wireless Earbuds",
            description: "Compact true-wireless earbuds with a charging case.",
            price: Decimal::new(4999, 2),
            image: "https://cdn.greenbasket.dev/seed/earbuds.jpg",
            category: "Electronics",
            stock: 120,
            sku: "ELC-EARBUD-01",
        },
        SampleProduct {
            title: "Smart Watch",
            description: "Fitness tracking, notifications, and a week of battery.",
            price: Decimal::new(12900, 2),
            image: "https://cdn.greenbasket.dev/seed/watch.jpg",
            category: "Electronics",
            stock: 60,
            sku: "ELC-WATCH-01",
        },
        SampleProduct {
            title: "Cotton T-Shirt",
            description: "Heavyweight cotton tee, pre-shrunk and garment dyed.",
            price: Decimal::new(1999, 2),
            image: "https://cdn.greenbasket.dev/seed/tshirt.jpg",
            category: "Clothing",
            stock: 300,
            sku: "CLO-TEE-01",
        },
        SampleProduct {
            title: "Cast Iron Skillet",
            description: "10-inch pre-seasoned skillet for stove or oven.",
            price: Decimal::new(3450, 2),
            image: "https://cdn.greenbasket.dev/seed/skillet.jpg",
            category: "Home & Kitchen",
            stock: 85,
            sku: "HOM-SKIL-10",
        },
        SampleProduct {
            title: "Trail Running Shoes",
            description: "Grippy outsole and cushioned ride for rough ground.",
            price: Decimal::new(8999, 2),
            image: "https://cdn.greenbasket.dev/seed/shoes.jpg",
            category: "Sports",
            stock: 150,
            sku: "SPT-SHOE-01",
        },
    ]
}

/// Seed categories and products.
///
/// # Errors
///
/// Returns an error if the database URL is missing or a query fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("GREENBASKET_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| "GREENBASKET_DATABASE_URL not set")?;

    let pool = db::create_pool(&database_url).await?;

    seed_categories(&pool).await?;
    seed_products(&pool).await?;

    info!("Seeding complete!");
    Ok(())
}

async fn seed_categories(pool: &PgPool) -> Result<(), RepositoryError> {
    let repo = CategoryRepository::new(pool);

    for sample in CATEGORIES {
        let result = repo
            .create(NewCategory {
                title: sample.title.to_owned(),
                description: Some(sample.description.to_owned()),
                image: Some(sample.image.to_owned()),
                sort_order: Some(sample.order),
            })
            .await;

        match result {
            Ok(category) => info!(title = %category.title, "seeded category"),
            Err(RepositoryError::Conflict(_)) => {
                warn!(title = %sample.title, "category already exists, skipping");
            }
            Err(e) => return Err(e),
        }
    }

    Ok(())
}

async fn seed_products(pool: &PgPool) -> Result<(), Box<dyn std::error::Error>> {
    let categories = CategoryRepository::new(pool);
    let products = ProductRepository::new(pool);

    for sample in sample_products() {
        let Some(category) = categories.get_active_by_slug(&slug_of(sample.category)).await?
        else {
            warn!(category = %sample.category, "category missing, skipping product");
            continue;
        };

        let result = products
            .create(NewProduct {
                title: sample.title.to_owned(),
                description: sample.description.to_owned(),
                price: sample.price,
                original_price: None,
                image: sample.image.to_owned(),
                category: category.id,
                category_name: category.title,
                stock_quantity: Some(sample.stock),
                sku: Some(sample.sku.to_owned()),
                attributes: vec![],
            })
            .await;

        match result {
            Ok(product) => info!(title = %product.title, "seeded product"),
            Err(RepositoryError::Conflict(_)) => {
                warn!(title = %sample.title, "product already exists, skipping");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

fn slug_of(title: &str) -> String {
    greenbasket_server::db::categories::slugify(title)
}
