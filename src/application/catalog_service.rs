use crate::application::dto::{CategoryResponse, ProductPayload};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::Money;
use crate::domain::{Category, Product};
use crate::ports::catalog_repository_port::ProductFilter;
use crate::ports::object_storage_port::SignedUpload;
use crate::ports::{CatalogRepositoryPort, ObjectStoragePort};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Category and product management.
pub struct CatalogService<C: CatalogRepositoryPort, S: ObjectStoragePort> {
    catalog: Arc<C>,
    storage: Arc<S>,
}

impl<C: CatalogRepositoryPort, S: ObjectStoragePort> CatalogService<C, S> {
    pub fn new(catalog: Arc<C>, storage: Arc<S>) -> Self {
        Self { catalog, storage }
    }

    pub async fn list_categories(&self) -> DomainResult<Vec<CategoryResponse>> {
        let categories = self.catalog.list_categories().await?;
        Ok(categories
            .into_iter()
            .map(CategoryResponse::from_with_count)
            .collect())
    }

    pub async fn create_category(&self, name: String) -> DomainResult<Category> {
        let category = Category::new(name)?;
        self.catalog.insert_category(&category).await?;
        info!("Category created: {} ({})", category.name, category.id);
        Ok(category)
    }

    pub async fn rename_category(&self, id: Uuid, name: String) -> DomainResult<Category> {
        let mut category = self
            .catalog
            .find_category_by_id(id)
            .await?
            .ok_or_else(|| DomainError::CategoryNotFound(id.to_string()))?;

        category.rename(name)?;
        self.catalog.update_category(&category).await?;
        Ok(category)
    }

    pub async fn delete_category(&self, id: Uuid) -> DomainResult<()> {
        self.catalog.delete_category(id).await?;
        info!("Category deleted: {}", id);
        Ok(())
    }

    pub async fn list_products(&self, filter: ProductFilter) -> DomainResult<Vec<Product>> {
        self.catalog.list_products(&filter).await
    }

    pub async fn get_product(&self, id: Uuid) -> DomainResult<Product> {
        self.catalog
            .find_product_by_id(id)
            .await?
            .ok_or_else(|| DomainError::ProductNotFound(id.to_string()))
    }

    pub async fn create_product(&self, payload: ProductPayload) -> DomainResult<Product> {
        self.require_category(payload.category_id).await?;

        let product = Product::new(
            payload.name,
            Money::from_rupiah(payload.price),
            payload.category_id,
            payload.image_url,
        )?;
        self.catalog.insert_product(&product).await?;
        info!("Product created: {} ({})", product.name, product.id);
        Ok(product)
    }

    pub async fn edit_product(&self, id: Uuid, payload: ProductPayload) -> DomainResult<Product> {
        self.require_category(payload.category_id).await?;

        let mut product = self
            .catalog
            .find_product_by_id(id)
            .await?
            .ok_or_else(|| DomainError::ProductNotFound(id.to_string()))?;

        product.update(
            payload.name,
            Money::from_rupiah(payload.price),
            payload.category_id,
            payload.image_url,
        )?;
        self.catalog.update_product(&product).await?;
        Ok(product)
    }

    pub async fn delete_product(&self, id: Uuid) -> DomainResult<()> {
        self.catalog.delete_product(id).await?;
        info!("Product deleted: {}", id);
        Ok(())
    }

    /// A signed one-shot upload slot for a product image.
    pub async fn create_image_upload_url(&self) -> DomainResult<SignedUpload> {
        self.storage.create_signed_upload_url().await
    }

    async fn require_category(&self, id: Uuid) -> DomainResult<()> {
        self.catalog
            .find_category_by_id(id)
            .await?
            .ok_or_else(|| DomainError::CategoryNotFound(id.to_string()))?;
        Ok(())
    }
}
