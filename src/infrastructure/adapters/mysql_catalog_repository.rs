use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::Money;
use crate::domain::{Category, Product};
use crate::ports::catalog_repository_port::{
    CatalogRepositoryPort, CategoryWithCount, ProductFilter,
};
use async_trait::async_trait;
use sqlx::{MySql, Pool};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// MySQL catalog repository (categories and products).
#[derive(Clone)]
pub struct MySqlCatalogRepository {
    pool: Arc<Pool<MySql>>,
}

impl MySqlCatalogRepository {
    pub fn new(pool: Arc<Pool<MySql>>) -> Self {
        Self { pool }
    }
}

/// Duplicate category names hit the unique index; surface that as a
/// caller-fixable error instead of a bare database failure.
fn map_unique_violation(e: sqlx::Error, message: &str) -> DomainError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.is_unique_violation() {
            return DomainError::ValidationError(message.to_string());
        }
    }
    DomainError::DatabaseError(e)
}

#[async_trait]
impl CatalogRepositoryPort for MySqlCatalogRepository {
    async fn list_categories(&self) -> DomainResult<Vec<CategoryWithCount>> {
        let query = r#"
            SELECT c.id, c.name, c.created_at, c.updated_at,
                   COUNT(p.id) AS product_count
            FROM categories c
            LEFT JOIN products p ON p.category_id = c.id
            GROUP BY c.id, c.name, c.created_at, c.updated_at
            ORDER BY c.name
        "#;

        let rows = sqlx::query_as::<_, CategoryRow>(query)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(CategoryRow::into_with_count).collect())
    }

    async fn find_category_by_id(&self, id: Uuid) -> DomainResult<Option<Category>> {
        let query = r#"
            SELECT c.id, c.name, c.created_at, c.updated_at,
                   0 AS product_count
            FROM categories c
            WHERE c.id = ?
        "#;

        let row = sqlx::query_as::<_, CategoryRow>(query)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(|r| r.into_with_count().category))
    }

    async fn insert_category(&self, category: &Category) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO categories (id, name, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(category.created_at)
        .bind(category.updated_at)
        .execute(self.pool.as_ref())
        .await
        .map_err(|e| map_unique_violation(e, "Category name already exists"))?;

        debug!("Category saved: {}", category.id);
        Ok(())
    }

    async fn update_category(&self, category: &Category) -> DomainResult<()> {
        let rows_affected =
            sqlx::query("UPDATE categories SET name = ?, updated_at = ? WHERE id = ?")
                .bind(&category.name)
                .bind(category.updated_at)
                .bind(category.id)
                .execute(self.pool.as_ref())
                .await
                .map_err(|e| map_unique_violation(e, "Category name already exists"))?
                .rows_affected();

        if rows_affected == 0 {
            return Err(DomainError::CategoryNotFound(category.id.to_string()));
        }

        Ok(())
    }

    async fn delete_category(&self, id: Uuid) -> DomainResult<()> {
        let product_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE category_id = ?")
                .bind(id)
                .fetch_one(self.pool.as_ref())
                .await?;

        if product_count > 0 {
            return Err(DomainError::CategoryInUse(id.to_string()));
        }

        let rows_affected = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Err(DomainError::CategoryNotFound(id.to_string()));
        }

        debug!("Category deleted: {}", id);
        Ok(())
    }

    async fn list_products(&self, filter: &ProductFilter) -> DomainResult<Vec<Product>> {
        let mut query = String::from(
            "SELECT id, name, price, category_id, image_url, created_at, updated_at \
             FROM products WHERE 1 = 1",
        );

        if filter.category_id.is_some() {
            query.push_str(" AND category_id = ?");
        }
        if filter.search.is_some() {
            query.push_str(" AND name LIKE CONCAT('%', ?, '%')");
        }
        query.push_str(" ORDER BY name");

        let mut q = sqlx::query_as::<_, ProductRow>(&query);
        if let Some(category_id) = filter.category_id {
            q = q.bind(category_id);
        }
        if let Some(search) = &filter.search {
            q = q.bind(search);
        }

        let rows = q.fetch_all(self.pool.as_ref()).await?;
        Ok(rows.into_iter().map(ProductRow::into_product).collect())
    }

    async fn find_product_by_id(&self, id: Uuid) -> DomainResult<Option<Product>> {
        let query = r#"
            SELECT id, name, price, category_id, image_url, created_at, updated_at
            FROM products
            WHERE id = ?
        "#;

        let row = sqlx::query_as::<_, ProductRow>(query)
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(ProductRow::into_product))
    }

    async fn find_products_by_ids(&self, ids: &[Uuid]) -> DomainResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let query = format!(
            "SELECT id, name, price, category_id, image_url, created_at, updated_at \
             FROM products WHERE id IN ({placeholders})"
        );

        let mut q = sqlx::query_as::<_, ProductRow>(&query);
        for id in ids {
            q = q.bind(id);
        }

        let rows = q.fetch_all(self.pool.as_ref()).await?;
        Ok(rows.into_iter().map(ProductRow::into_product).collect())
    }

    async fn insert_product(&self, product: &Product) -> DomainResult<()> {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, price, category_id, image_url, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(product.price.as_rupiah())
        .bind(product.category_id)
        .bind(&product.image_url)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(self.pool.as_ref())
        .await?;

        debug!("Product saved: {}", product.id);
        Ok(())
    }

    async fn update_product(&self, product: &Product) -> DomainResult<()> {
        let rows_affected = sqlx::query(
            r#"
            UPDATE products
            SET name = ?, price = ?, category_id = ?, image_url = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&product.name)
        .bind(product.price.as_rupiah())
        .bind(product.category_id)
        .bind(&product.image_url)
        .bind(product.updated_at)
        .bind(product.id)
        .execute(self.pool.as_ref())
        .await?
        .rows_affected();

        if rows_affected == 0 {
            return Err(DomainError::ProductNotFound(product.id.to_string()));
        }

        Ok(())
    }

    async fn delete_product(&self, id: Uuid) -> DomainResult<()> {
        let rows_affected = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Err(DomainError::ProductNotFound(id.to_string()));
        }

        debug!("Product deleted: {}", id);
        Ok(())
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: Uuid,
    name: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
    product_count: i64,
}

impl CategoryRow {
    fn into_with_count(self) -> CategoryWithCount {
        CategoryWithCount {
            category: Category {
                id: self.id,
                name: self.name,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            product_count: self.product_count,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    price: i64,
    category_id: Uuid,
    image_url: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl ProductRow {
    fn into_product(self) -> Product {
        Product {
            id: self.id,
            name: self.name,
            price: Money::from_rupiah(self.price),
            category_id: self.category_id,
            image_url: self.image_url,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
