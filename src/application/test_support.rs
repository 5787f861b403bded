//! In-memory port fakes shared by the application service tests.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{Money, OrderStatus, OrderStatusFilter};
use crate::domain::{Category, Order, OrderItem, Product};
use crate::ports::catalog_repository_port::{
    CatalogRepositoryPort, CategoryWithCount, ProductFilter,
};
use crate::ports::object_storage_port::{ObjectStoragePort, SignedUpload};
use crate::ports::order_repository_port::{OrderRepositoryPort, OrderSummary};
use crate::ports::payment_provider_port::{
    PaymentProviderPort, QrPayment, QrPaymentRequest,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use uuid::Uuid;

/// In-memory order repository.
#[derive(Default)]
pub struct InMemoryOrders {
    orders: Mutex<HashMap<Uuid, Order>>,
    items: Mutex<HashMap<Uuid, Vec<OrderItem>>>,
}

impl InMemoryOrders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: Uuid) -> Option<Order> {
        self.orders.lock().unwrap().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.orders.lock().unwrap().len()
    }

    /// Inserts a pre-built order directly, bypassing the provider flow.
    pub fn seed(&self, order: Order, items: Vec<OrderItem>) {
        self.items.lock().unwrap().insert(order.id, items);
        self.orders.lock().unwrap().insert(order.id, order);
    }
}

#[async_trait]
impl OrderRepositoryPort for InMemoryOrders {
    async fn create_with_items(&self, order: &Order, items: &[OrderItem]) -> DomainResult<()> {
        self.items
            .lock()
            .unwrap()
            .insert(order.id, items.to_vec());
        self.orders.lock().unwrap().insert(order.id, order.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Order>> {
        Ok(self.orders.lock().unwrap().get(&id).cloned())
    }

    async fn update(&self, order: &Order) -> DomainResult<()> {
        let mut orders = self.orders.lock().unwrap();
        if !orders.contains_key(&order.id) {
            return Err(DomainError::OrderNotFound(order.id.to_string()));
        }
        orders.insert(order.id, order.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        self.items.lock().unwrap().remove(&id);
        if self.orders.lock().unwrap().remove(&id).is_none() {
            return Err(DomainError::OrderNotFound(id.to_string()));
        }
        Ok(())
    }

    async fn list(&self, filter: OrderStatusFilter) -> DomainResult<Vec<OrderSummary>> {
        let orders = self.orders.lock().unwrap();
        let items = self.items.lock().unwrap();

        let mut summaries: Vec<(chrono::DateTime<chrono::Utc>, OrderSummary)> = orders
            .values()
            .filter(|o| filter.as_status().is_none_or(|s| o.status == s))
            .map(|o| {
                (
                    o.created_at,
                    OrderSummary {
                        id: o.id,
                        grand_total: o.grand_total,
                        status: o.status,
                        item_count: items.get(&o.id).map_or(0, |i| i.len() as i64),
                    },
                )
            })
            .collect();
        summaries.sort_by(|a, b| b.0.cmp(&a.0));

        Ok(summaries.into_iter().map(|(_, s)| s).collect())
    }

    async fn sum_paid_grand_total(&self) -> DomainResult<Money> {
        let total = self
            .orders
            .lock()
            .unwrap()
            .values()
            .filter(|o| o.paid_at.is_some())
            .map(|o| o.grand_total.as_rupiah())
            .sum();
        Ok(Money::from_rupiah(total))
    }

    async fn count_ongoing(&self) -> DomainResult<i64> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .values()
            .filter(|o| o.status != OrderStatus::Done)
            .count() as i64)
    }

    async fn count_completed(&self) -> DomainResult<i64> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .values()
            .filter(|o| o.status == OrderStatus::Done)
            .count() as i64)
    }
}

/// In-memory catalog repository.
#[derive(Default)]
pub struct InMemoryCatalog {
    categories: Mutex<HashMap<Uuid, Category>>,
    products: Mutex<HashMap<Uuid, Product>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_category(&self, category: Category) {
        self.categories
            .lock()
            .unwrap()
            .insert(category.id, category);
    }

    pub fn seed_product(&self, product: Product) {
        self.products.lock().unwrap().insert(product.id, product);
    }
}

#[async_trait]
impl CatalogRepositoryPort for InMemoryCatalog {
    async fn list_categories(&self) -> DomainResult<Vec<CategoryWithCount>> {
        let products = self.products.lock().unwrap();
        let mut result: Vec<CategoryWithCount> = self
            .categories
            .lock()
            .unwrap()
            .values()
            .map(|c| CategoryWithCount {
                category: c.clone(),
                product_count: products
                    .values()
                    .filter(|p| p.category_id == c.id)
                    .count() as i64,
            })
            .collect();
        result.sort_by(|a, b| a.category.name.cmp(&b.category.name));
        Ok(result)
    }

    async fn find_category_by_id(&self, id: Uuid) -> DomainResult<Option<Category>> {
        Ok(self.categories.lock().unwrap().get(&id).cloned())
    }

    async fn insert_category(&self, category: &Category) -> DomainResult<()> {
        let mut categories = self.categories.lock().unwrap();
        if categories.values().any(|c| c.name == category.name) {
            return Err(DomainError::ValidationError(
                "Category name already exists".to_string(),
            ));
        }
        categories.insert(category.id, category.clone());
        Ok(())
    }

    async fn update_category(&self, category: &Category) -> DomainResult<()> {
        let mut categories = self.categories.lock().unwrap();
        if !categories.contains_key(&category.id) {
            return Err(DomainError::CategoryNotFound(category.id.to_string()));
        }
        categories.insert(category.id, category.clone());
        Ok(())
    }

    async fn delete_category(&self, id: Uuid) -> DomainResult<()> {
        let in_use = self
            .products
            .lock()
            .unwrap()
            .values()
            .any(|p| p.category_id == id);
        if in_use {
            return Err(DomainError::CategoryInUse(id.to_string()));
        }
        if self.categories.lock().unwrap().remove(&id).is_none() {
            return Err(DomainError::CategoryNotFound(id.to_string()));
        }
        Ok(())
    }

    async fn list_products(&self, filter: &ProductFilter) -> DomainResult<Vec<Product>> {
        let mut result: Vec<Product> = self
            .products
            .lock()
            .unwrap()
            .values()
            .filter(|p| filter.category_id.is_none_or(|c| p.category_id == c))
            .filter(|p| {
                filter.search.as_ref().is_none_or(|s| {
                    p.name.to_lowercase().contains(&s.to_lowercase())
                })
            })
            .cloned()
            .collect();
        result.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(result)
    }

    async fn find_product_by_id(&self, id: Uuid) -> DomainResult<Option<Product>> {
        Ok(self.products.lock().unwrap().get(&id).cloned())
    }

    async fn find_products_by_ids(&self, ids: &[Uuid]) -> DomainResult<Vec<Product>> {
        let products = self.products.lock().unwrap();
        let unique: HashSet<Uuid> = ids.iter().copied().collect();
        Ok(unique
            .into_iter()
            .filter_map(|id| products.get(&id).cloned())
            .collect())
    }

    async fn insert_product(&self, product: &Product) -> DomainResult<()> {
        self.products
            .lock()
            .unwrap()
            .insert(product.id, product.clone());
        Ok(())
    }

    async fn update_product(&self, product: &Product) -> DomainResult<()> {
        let mut products = self.products.lock().unwrap();
        if !products.contains_key(&product.id) {
            return Err(DomainError::ProductNotFound(product.id.to_string()));
        }
        products.insert(product.id, product.clone());
        Ok(())
    }

    async fn delete_product(&self, id: Uuid) -> DomainResult<()> {
        if self.products.lock().unwrap().remove(&id).is_none() {
            return Err(DomainError::ProductNotFound(id.to_string()));
        }
        Ok(())
    }
}

/// Scripted payment provider.
#[derive(Default)]
pub struct StubProvider {
    fail_next_create: AtomicBool,
    create_calls: AtomicUsize,
    simulated: Mutex<HashSet<String>>,
}

impl StubProvider {
    /// The only signature `verify_callback` accepts.
    pub const VALID_SIGNATURE: &'static str = "valid-signature";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next_create(&self) {
        self.fail_next_create.store(true, Ordering::SeqCst);
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn was_simulated(&self, payment_method_id: &str) -> bool {
        self.simulated.lock().unwrap().contains(payment_method_id)
    }
}

#[async_trait]
impl PaymentProviderPort for StubProvider {
    async fn create_qr_payment(&self, request: QrPaymentRequest) -> DomainResult<QrPayment> {
        if self.fail_next_create.swap(false, Ordering::SeqCst) {
            return Err(DomainError::PaymentProviderError(
                "provider unavailable".to_string(),
            ));
        }
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        Ok(QrPayment {
            transaction_id: "pr-test-1".to_string(),
            payment_method_id: "pm-test-1".to_string(),
            qr_string: format!("00020101021226-QRIS-{}", request.reference_id),
        })
    }

    async fn simulate_payment(&self, payment_method_id: &str, _amount: i64) -> DomainResult<()> {
        self.simulated
            .lock()
            .unwrap()
            .insert(payment_method_id.to_string());
        Ok(())
    }

    async fn verify_callback(&self, _body: &str, signature: &str) -> DomainResult<bool> {
        Ok(signature == Self::VALID_SIGNATURE)
    }
}

/// Fixed-response object storage.
#[derive(Default)]
pub struct StubStorage;

#[async_trait]
impl ObjectStoragePort for StubStorage {
    async fn create_signed_upload_url(&self) -> DomainResult<SignedUpload> {
        Ok(SignedUpload {
            url: "https://stub.supabase.co/storage/v1/object/upload/sign/product-images/1.jpeg"
                .to_string(),
            token: "upload-token".to_string(),
            path: "1.jpeg".to_string(),
        })
    }
}

/// Seeds a category and one product, returning the product.
pub fn seed_product(catalog: &InMemoryCatalog, name: &str, price: i64) -> Product {
    let category = Category::new("Minuman".to_string()).unwrap();
    let product = Product::new(
        name.to_string(),
        Money::from_rupiah(price),
        category.id,
        None,
    )
    .unwrap();
    catalog.seed_category(category);
    catalog.seed_product(product.clone());
    product
}
