use rust_decimal::Decimal;
use std::sync::Arc;
use storefront::config::ShopConfig;
use storefront::fulfillment::{AdminAction, LogNotifier, MemoryNotifier, Resolution};
use storefront::item_actor::{CatalogError, Restock};
use actor_framework::{FrameworkError, SnapshotError};
use storefront::lifecycle::{ShopError, ShopSystem};
use storefront::model::{
    CategoryCreate, CategoryId, CodePool, ItemCreate, ItemKind, ItemUpdate, NewItem, OrderStatus,
    UserId,
};

const ADMIN: UserId = UserId(1);

fn new_item(category_id: CategoryId, title: &str, codes: &[&str]) -> NewItem {
    NewItem {
        category_id,
        title: title.into(),
        kind: "voucher".into(),
        unit_price: Decimal::new(9950, 2),
        quantity: codes.len() as i64,
        codes: codes.iter().map(|c| c.to_string()).collect(),
    }
}

/// Full catalog round trip with all real actors.
#[tokio::test]
async fn test_catalog_administration() {
    let system = ShopSystem::new(&ShopConfig::in_memory(ADMIN), Arc::new(LogNotifier)).unwrap();
    let catalog = &system.catalog;

    let music = catalog.add_category("Music").await.unwrap();
    let games = catalog.add_category("Games").await.unwrap();
    assert_eq!(
        catalog.add_category("Games").await,
        Err(CatalogError::DuplicateCategory("Games".into()))
    );
    assert!(matches!(
        catalog.add_category("   ").await,
        Err(CatalogError::Validation(_))
    ));
    let names: Vec<String> = catalog
        .list_categories()
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, ["Games", "Music"]);

    let zelda = catalog
        .add_item(new_item(games.clone(), "Zelda Card", &["Z1"]))
        .await
        .unwrap();
    let arcade = catalog
        .add_item(new_item(games.clone(), "Arcade Card", &["R1", "R2"]))
        .await
        .unwrap();
    catalog
        .add_item(new_item(music, "Song Pass", &["S1"]))
        .await
        .unwrap();

    let titles = |items: Vec<storefront::model::Item>| -> Vec<String> {
        items.into_iter().map(|i| i.title).collect()
    };
    assert_eq!(
        titles(catalog.list_active_items(games.clone()).await.unwrap()),
        ["Arcade Card", "Zelda Card"]
    );

    // Deactivated items drop out of browsing but stay readable
    catalog
        .update_item(
            zelda.clone(),
            ItemUpdate {
                active: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(
        titles(catalog.list_active_items(games.clone()).await.unwrap()),
        ["Arcade Card"]
    );
    assert!(!catalog.get_item(zelda).await.unwrap().active);

    let arcade_item = catalog.get_item(arcade).await.unwrap();
    assert_eq!(arcade_item.kind, ItemKind::Voucher);
    assert_eq!(arcade_item.quantity, 2);
    assert!(arcade_item.stock_consistent());

    assert!(matches!(
        catalog.list_active_items(CategoryId(99)).await,
        Err(CatalogError::NotFound(_))
    ));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_item_validation() {
    let system = ShopSystem::new(&ShopConfig::in_memory(ADMIN), Arc::new(LogNotifier)).unwrap();
    let catalog = &system.catalog;
    let games = catalog.add_category("Games").await.unwrap();

    assert!(matches!(
        catalog
            .add_item(new_item(CategoryId(42), "Orphan", &["O1"]))
            .await,
        Err(CatalogError::NotFound(_))
    ));

    let mut mismatched = new_item(games.clone(), "Card", &["A", "B"]);
    mismatched.quantity = 3;
    assert!(matches!(
        catalog.add_item(mismatched).await,
        Err(CatalogError::Validation(_))
    ));

    let mut bad_kind = new_item(games.clone(), "Card", &["A"]);
    bad_kind.kind = "gift".into();
    assert!(matches!(
        catalog.add_item(bad_kind).await,
        Err(CatalogError::Validation(_))
    ));

    for codes in [&["A", "A"][..], &["A||B"][..], &["  "][..]] {
        assert!(
            matches!(
                catalog.add_item(new_item(games.clone(), "Card", codes)).await,
                Err(CatalogError::Validation(_))
            ),
            "{codes:?}"
        );
    }

    let mut negative = new_item(games.clone(), "Card", &[]);
    negative.kind = "recharge".into();
    negative.quantity = -1;
    assert!(matches!(
        catalog.add_item(negative).await,
        Err(CatalogError::Validation(_))
    ));

    // Nothing above reached the store
    assert!(catalog.list_active_items(games).await.unwrap().is_empty());

    system.shutdown().await.unwrap();
}

/// The item actor enforces stock rules itself, not only the catalog client.
#[tokio::test]
async fn test_raw_item_client_rejects_inconsistent_stock() {
    let (category_actor, categories) = storefront::category_actor::new(8);
    let (item_actor, items) = storefront::item_actor::new(8);
    let category_handle = tokio::spawn(category_actor.run(()));
    let item_handle = tokio::spawn(item_actor.run(categories.clone()));

    let games = categories
        .create(CategoryCreate {
            name: "Games".into(),
        })
        .await
        .unwrap();
    let create = |kind, quantity, codes: &[&str]| ItemCreate {
        category_id: games.clone(),
        title: "Card".into(),
        kind,
        unit_price: Decimal::from(10),
        quantity,
        codes: CodePool::from_codes(codes).unwrap(),
    };

    for bad in [
        create(ItemKind::Voucher, 5, &["A"]),
        create(ItemKind::Recharge, 1, &["A"]),
        ItemCreate {
            title: "  ".into(),
            ..create(ItemKind::Voucher, 1, &["A"])
        },
    ] {
        assert!(matches!(
            items.create(bad).await,
            Err(FrameworkError::Entity(CatalogError::Validation(_)))
        ));
    }
    assert!(items.list().await.unwrap().is_empty());

    let id = items.create(create(ItemKind::Voucher, 1, &["A"])).await.unwrap();
    assert!(items.get(id).await.unwrap().unwrap().stock_consistent());

    drop(items);
    item_handle.await.unwrap();
    drop(categories);
    category_handle.await.unwrap();
}

#[tokio::test]
async fn test_allocate_and_restock_keep_pool_consistent() {
    let system = ShopSystem::new(&ShopConfig::in_memory(ADMIN), Arc::new(LogNotifier)).unwrap();
    let catalog = &system.catalog;
    let games = catalog.add_category("Games").await.unwrap();
    let card = catalog
        .add_item(new_item(games.clone(), "Card", &["A", "B", "C"]))
        .await
        .unwrap();

    assert_eq!(catalog.allocate(card.clone(), 2).await.unwrap(), ["A", "B"]);
    assert_eq!(
        catalog.allocate(card.clone(), 2).await,
        Err(CatalogError::OutOfStock {
            requested: 2,
            available: 1
        })
    );
    let item = catalog.get_item(card.clone()).await.unwrap();
    assert_eq!(item.quantity, 1);
    assert!(item.stock_consistent());

    assert_eq!(
        catalog
            .restock(card.clone(), Restock::Codes(vec!["D".into()]))
            .await
            .unwrap(),
        2
    );
    assert!(matches!(
        catalog.restock(card.clone(), Restock::Units(5)).await,
        Err(CatalogError::Validation(_))
    ));
    assert!(matches!(
        catalog
            .restock(card.clone(), Restock::Codes(vec!["C".into()]))
            .await,
        Err(CatalogError::Validation(_))
    ));

    // Released codes go back to the front
    assert_eq!(catalog.release(card.clone(), vec!["B".into()]).await.unwrap(), 3);
    assert_eq!(catalog.allocate(card.clone(), 3).await.unwrap(), ["B", "C", "D"]);

    let mut topup = new_item(games, "Top-up", &[]);
    topup.kind = "recharge".into();
    topup.quantity = 4;
    let topup = catalog.add_item(topup).await.unwrap();
    assert!(catalog.allocate(topup.clone(), 2).await.unwrap().is_empty());
    assert_eq!(catalog.restock(topup.clone(), Restock::Units(6)).await.unwrap(), 10);
    assert!(matches!(
        catalog.allocate(topup, 0).await,
        Err(CatalogError::Validation(_))
    ));

    system.shutdown().await.unwrap();
}

/// Snapshot persistence: a restarted shop sees the catalog, orders and directory it left.
#[tokio::test]
async fn test_shop_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = ShopConfig {
        data_dir: Some(dir.path().join("data")),
        ..ShopConfig::in_memory(ADMIN)
    };
    let buyer = UserId(100);

    let (card, delivered, pending) = {
        let system = ShopSystem::new(&config, Arc::new(MemoryNotifier::new())).unwrap();
        system.directory.set_payment_handle(ADMIN, "shop@upi").unwrap();
        system.directory.grant_admin(ADMIN, UserId(2)).unwrap();

        let games = system.catalog.add_category("Games").await.unwrap();
        let card = system
            .catalog
            .add_item(new_item(games, "Card", &["A", "B", "C"]))
            .await
            .unwrap();

        let delivered = system
            .coordinator
            .place_order(buyer, card.clone(), 1)
            .await
            .unwrap()
            .order
            .id;
        system
            .coordinator
            .submit_payment(delivered.clone(), buyer, "TXN1")
            .await
            .unwrap();
        system
            .coordinator
            .resolve(delivered.clone(), ADMIN, AdminAction::Confirm)
            .await
            .unwrap();
        let pending = system
            .coordinator
            .place_order(buyer, card.clone(), 1)
            .await
            .unwrap()
            .order
            .id;

        system.shutdown().await.unwrap();
        (card, delivered, pending)
    };

    let system = ShopSystem::new(&config, Arc::new(MemoryNotifier::new())).unwrap();
    assert_eq!(system.directory.payment_handle().as_deref(), Some("shop@upi"));
    assert!(system.directory.is_admin(UserId(2)));

    let item = system.catalog.get_item(card.clone()).await.unwrap();
    assert_eq!(item.codes.iter().collect::<Vec<_>>(), ["B", "C"]);
    assert_eq!(item.quantity, 2);

    let order = system.ledger.get_order(delivered.clone()).await.unwrap();
    assert_eq!(order.status, OrderStatus::Delivered);
    assert_eq!(order.delivered_codes, ["A"]);

    // The restored pending order continues where it stopped, and ids keep counting
    system
        .coordinator
        .submit_payment(pending.clone(), buyer, "TXN2")
        .await
        .unwrap();
    let resolved = system
        .coordinator
        .resolve(pending.clone(), UserId(2), AdminAction::Confirm)
        .await
        .unwrap();
    assert!(matches!(
        resolved.resolution,
        Resolution::Delivered { ref codes, .. } if codes == &["B".to_string()]
    ));
    let fresh = system
        .coordinator
        .place_order(buyer, card, 1)
        .await
        .unwrap()
        .order
        .id;
    assert!(fresh.0 > pending.0 && pending.0 > delivered.0);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_inconsistent_item_snapshot_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let config = ShopConfig {
        data_dir: Some(dir.path().to_path_buf()),
        ..ShopConfig::in_memory(ADMIN)
    };
    {
        let system = ShopSystem::new(&config, Arc::new(LogNotifier)).unwrap();
        let games = system.catalog.add_category("Games").await.unwrap();
        system
            .catalog
            .add_item(new_item(games, "Card", &["A"]))
            .await
            .unwrap();
        system.shutdown().await.unwrap();
    }

    // Claim five units while the pool still holds one code
    let path = dir.path().join("items.json");
    let mut image: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    image["entities"][0]["quantity"] = 5.into();
    std::fs::write(&path, serde_json::to_vec(&image).unwrap()).unwrap();

    assert!(matches!(
        ShopSystem::new(&config, Arc::new(LogNotifier)),
        Err(ShopError::Snapshot(SnapshotError::Invalid { .. }))
    ));
}
