use crate::domain::errors::DomainResult;
use crate::domain::{Category, Product};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A category with its derived product count, as shown in listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryWithCount {
    pub category: Category,
    pub product_count: i64,
}

/// Product listing filter. `category_id = None` means all categories.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category_id: Option<Uuid>,
    pub search: Option<String>,
}

/// Catalog persistence port (categories and products).
#[async_trait]
pub trait CatalogRepositoryPort: Send + Sync + 'static {
    async fn list_categories(&self) -> DomainResult<Vec<CategoryWithCount>>;

    async fn find_category_by_id(&self, id: Uuid) -> DomainResult<Option<Category>>;

    async fn insert_category(&self, category: &Category) -> DomainResult<()>;

    async fn update_category(&self, category: &Category) -> DomainResult<()>;

    /// Fails with `CategoryInUse` while products still reference it.
    async fn delete_category(&self, id: Uuid) -> DomainResult<()>;

    async fn list_products(&self, filter: &ProductFilter) -> DomainResult<Vec<Product>>;

    async fn find_product_by_id(&self, id: Uuid) -> DomainResult<Option<Product>>;

    /// Bulk lookup for order pricing. Ids with no matching product are
    /// simply absent from the result; the caller decides what that means.
    async fn find_products_by_ids(&self, ids: &[Uuid]) -> DomainResult<Vec<Product>>;

    async fn insert_product(&self, product: &Product) -> DomainResult<()>;

    async fn update_product(&self, product: &Product) -> DomainResult<()>;

    async fn delete_product(&self, id: Uuid) -> DomainResult<()>;
}
