//! Service locator and data manager interplay: a service that reads from
//! a loaded domain, plus the registry clear/teardown contracts.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use data_manager::{DataEntity, DataError, DataManager, Domain, EntityStore};
use service_locator::{Service, ServiceLocator};

#[derive(Debug, Clone, PartialEq)]
struct ItemRecord {
    id: u32,
    price: i64,
}

impl DataEntity for ItemRecord {
    fn id(&self) -> u32 {
        self.id
    }

    fn validate(&self) -> bool {
        self.price >= 0
    }
}

struct ItemDomain {
    store: EntityStore<ItemRecord>,
}

impl ItemDomain {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            store: EntityStore::new(),
        })
    }
}

impl Domain for ItemDomain {
    fn name(&self) -> &str {
        "items"
    }

    fn load_data(&self) -> Result<(), DataError> {
        self.store.insert(ItemRecord { id: 10, price: 250 })?;
        self.store.insert(ItemRecord { id: 11, price: 90 })?;
        Ok(())
    }
}

/// A shop service backed by the item domain.
struct ShopService {
    items: Arc<ItemDomain>,
    init_calls: AtomicUsize,
    dispose_calls: AtomicUsize,
}

impl ShopService {
    fn new(items: Arc<ItemDomain>) -> Arc<Self> {
        Arc::new(Self {
            items,
            init_calls: AtomicUsize::new(0),
            dispose_calls: AtomicUsize::new(0),
        })
    }

    fn price_of(&self, id: u32) -> Option<i64> {
        self.items.store.get(id).map(|item| item.price)
    }
}

impl Service for ShopService {
    fn name(&self) -> &str {
        "shop"
    }

    fn initialize(&self) {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn dispose(&self) {
        self.dispose_calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_service_reads_domain_after_bulk_load() {
    let manager = DataManager::new();
    let locator = ServiceLocator::new();

    let items = ItemDomain::new();
    manager.register_domain(Arc::clone(&items));

    // Before the bulk load the domain is registered but empty.
    let fetched = manager.get_domain::<ItemDomain>().unwrap();
    assert!(fetched.store.all().is_empty());

    let report = manager.load_all();
    assert!(report.is_complete());

    locator.register(ShopService::new(items));
    let shop = locator.get::<ShopService>().unwrap();
    assert_eq!(shop.price_of(10), Some(250));
    assert_eq!(shop.price_of(99), None);
}

#[test]
fn test_reregistration_disposes_old_service_before_new_is_visible() {
    let locator = ServiceLocator::new();
    let items = ItemDomain::new();

    let first = ShopService::new(Arc::clone(&items));
    let second = ShopService::new(items);

    locator.register(Arc::clone(&first));
    locator.register(Arc::clone(&second));

    assert_eq!(first.dispose_calls.load(Ordering::SeqCst), 1);
    assert_eq!(second.init_calls.load(Ordering::SeqCst), 1);
    let current = locator.get::<ShopService>().unwrap();
    assert!(Arc::ptr_eq(&current, &second));
}

#[test]
fn test_clear_restores_empty_registries() {
    let manager = DataManager::new();
    let locator = ServiceLocator::new();

    let items = ItemDomain::new();
    manager.register_domain(Arc::clone(&items));
    manager.load_all();
    locator.register(ShopService::new(items));

    manager.clear();
    locator.clear();

    assert!(!manager.has_domain::<ItemDomain>());
    assert!(!manager.is_loaded());
    assert!(!locator.has::<ShopService>());

    // Lookups after clear fail fast rather than yielding defaults.
    assert!(manager.get_domain::<ItemDomain>().is_err());
    assert!(locator.get::<ShopService>().is_err());
}
