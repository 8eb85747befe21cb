use super::*;

// ========================================================================
//  Order lifecycle: store → fabrication → delivery → receipt
// ========================================================================

#[tokio::test]
async fn create_store_order_round_trip_defaults() {
    let db = setup().await;
    insert_part(&db.pool, "P-100", 20, 0).await;

    let kanban = orchestrate::create_store_order(
        &db.pool,
        &StoreOrderCreate {
            part_number: "P-100".to_string(),
            quantity: 5,
            request_host: HOST.to_string(),
        },
        1,
    )
    .await
    .unwrap();

    assert_eq!(kanban.status, KanbanStatus::Queue);
    assert_eq!(kanban.kanban_type, KanbanType::Production);
    assert_eq!(kanban.card_id, CARD_PRODUCTION);
    assert!(!kanban.qr_code.is_empty());

    let stored = kanban_repo::find_by_id(&db.pool, &kanban.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, KanbanStatus::Queue);
    assert_eq!(stored.station_id, StationId::AssemblyStore.id());

    let store_orders = order::find_order_store_with_part(&db.pool).await.unwrap();
    assert_eq!(store_orders.len(), 1);
    assert_eq!(store_orders[0].status, OrderStoreStatus::Pending);
    assert_eq!(store_orders[0].quantity, 5);

    // Part store row created lazily with idle defaults
    let stores = part_store::find_all_with_part(&db.pool).await.unwrap();
    assert_eq!(stores.len(), 1);
    assert_eq!(stores[0].status, PartStoreStatus::Idle);
    assert_eq!(stores[0].stock, 0);
}

#[tokio::test]
async fn create_store_order_validates_part_and_quantity() {
    let db = setup().await;
    insert_part(&db.pool, "P-100", 20, 0).await;

    let err = orchestrate::create_store_order(
        &db.pool,
        &StoreOrderCreate {
            part_number: "P-999".to_string(),
            quantity: 5,
            request_host: HOST.to_string(),
        },
        1,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, FlowError::PartNotFound(_)));

    let err = orchestrate::create_store_order(
        &db.pool,
        &StoreOrderCreate {
            part_number: "P-100".to_string(),
            quantity: 0,
            request_host: HOST.to_string(),
        },
        1,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, FlowError::InvalidQuantity(0)));
}

#[tokio::test]
async fn advance_to_fabrication_creates_every_record() {
    let db = setup().await;
    let fab_kanban = setup_fabrication(&db, "P-100", 5).await;

    assert_eq!(fab_kanban.status, KanbanStatus::Queue);
    assert_eq!(fab_kanban.station_id, StationId::Fabrication.id());

    let store_orders = order::find_order_store_with_part(&db.pool).await.unwrap();
    assert_eq!(store_orders[0].status, OrderStoreStatus::Production);

    let fabs = order::find_all_order_fabrication(&db.pool).await.unwrap();
    assert_eq!(fabs.len(), 1);
    assert_eq!(fabs[0].status, OrderFabricationStatus::Pending);
    assert_eq!(fabs[0].quantity, 5);

    let floor = shop_floor::find_by_order_id(&db.pool, fab_kanban.order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(floor.status, ShopFloorStatus::Pending);

    let stores = part_store::find_all_with_part(&db.pool).await.unwrap();
    assert_eq!(stores[0].status, PartStoreStatus::OrderToFabrication);
}

#[tokio::test]
async fn advance_to_fabrication_requires_pending() {
    let db = setup().await;
    setup_fabrication(&db, "P-100", 5).await;
    let store = order::find_order_store_with_part(&db.pool).await.unwrap()[0].clone();

    let err = orchestrate::advance_to_fabrication(&db.pool, store.id, 1, HOST)
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::InvalidTransition(_)));
}

#[tokio::test]
async fn deliver_fabrication_hands_back_to_store() {
    let db = setup().await;
    let fab_kanban = setup_fabrication(&db, "P-100", 5).await;
    let fab = order::find_all_order_fabrication(&db.pool).await.unwrap()[0].clone();

    orchestrate::deliver_fabrication(&db.pool, fab.id).await.unwrap();

    let fab = order::find_order_fabrication_by_id(&db.pool, fab.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fab.status, OrderFabricationStatus::Finish);

    let fab_order = order::find_order_by_id(&db.pool, fab_kanban.order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fab_order.station_id, StationId::AssemblyStore.id());

    let stores = part_store::find_all_with_part(&db.pool).await.unwrap();
    assert_eq!(stores[0].status, PartStoreStatus::Receive);

    // Finished again is rejected
    let err = orchestrate::deliver_fabrication(&db.pool, fab.id).await.unwrap_err();
    assert!(matches!(err, FlowError::InvalidTransition(_)));
}

#[tokio::test]
async fn receive_delivery_requires_receive_status() {
    let db = setup().await;
    insert_part(&db.pool, "P-100", 20, 0).await;
    orchestrate::create_store_order(
        &db.pool,
        &StoreOrderCreate {
            part_number: "P-100".to_string(),
            quantity: 5,
            request_host: HOST.to_string(),
        },
        1,
    )
    .await
    .unwrap();
    let store = part_store::find_all_with_part(&db.pool).await.unwrap()[0].clone();

    // Status is idle, not receive
    let err = orchestrate::receive_delivery(&db.pool, store.id, PartStoreStatus::Idle)
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::InvalidTransition(_)));
}

#[tokio::test]
async fn receive_delivery_without_open_receipts_is_not_found() {
    let db = setup().await;
    setup_fabrication(&db, "P-100", 5).await;
    let store = part_store::find_all_with_part(&db.pool).await.unwrap()[0].clone();

    // Nothing delivered yet, forced into receive by hand
    sqlx::query("UPDATE part_store SET status = 'receive' WHERE id = ?")
        .bind(store.id)
        .execute(&db.pool)
        .await
        .unwrap();

    let err = orchestrate::receive_delivery(&db.pool, store.id, PartStoreStatus::Idle)
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::OrderNotFound(_)));
}

#[tokio::test]
async fn receive_delivery_books_stock_and_advances_covered_orders() {
    let db = setup().await;
    setup_fabrication(&db, "P-100", 5).await;
    let fab = order::find_all_order_fabrication(&db.pool).await.unwrap()[0].clone();
    orchestrate::deliver_fabrication(&db.pool, fab.id).await.unwrap();

    let store = part_store::find_all_with_part(&db.pool).await.unwrap()[0].clone();
    let err = orchestrate::receive_delivery(&db.pool, store.id, PartStoreStatus::Receive)
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::InvalidRequest(_)));

    let delivered = orchestrate::receive_delivery(&db.pool, store.id, PartStoreStatus::Idle)
        .await
        .unwrap();
    assert_eq!(delivered, 5);

    let stores = part_store::find_all_with_part(&db.pool).await.unwrap();
    assert_eq!(stores[0].stock, 5);
    assert_eq!(stores[0].status, PartStoreStatus::Idle);

    // The covering store order advanced to deliver
    let store_orders = order::find_order_store_with_part(&db.pool).await.unwrap();
    assert_eq!(store_orders[0].status, OrderStoreStatus::Deliver);

    // Receipts consumed; a second receive books nothing
    let mut tx = db.pool.begin().await.unwrap();
    let open = order::find_open_deliveries_by_part(&mut tx, store.part_id)
        .await
        .unwrap();
    assert!(open.is_empty());
}

#[tokio::test]
async fn deliver_store_order_finishes_and_replenishes() {
    let db = setup().await;
    let part_id = insert_part(&db.pool, "P-100", 20, 0).await;
    orchestrate::create_store_order(
        &db.pool,
        &StoreOrderCreate {
            part_number: "P-100".to_string(),
            quantity: 5,
            request_host: HOST.to_string(),
        },
        1,
    )
    .await
    .unwrap();
    let store_order = order::find_order_store_with_part(&db.pool).await.unwrap()[0].clone();

    // Not in deliver yet
    let err = orchestrate::deliver_store_order(&db.pool, store_order.id)
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::InvalidTransition(_)));

    let mut tx = db.pool.begin().await.unwrap();
    order::set_order_store_status(&mut tx, store_order.id, OrderStoreStatus::Deliver)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    orchestrate::deliver_store_order(&db.pool, store_order.id).await.unwrap();
    let finished = order::find_order_store_by_id(&db.pool, store_order.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(finished.status, OrderStoreStatus::Finish);
    assert_eq!(part_quantity(&db.pool, part_id).await, 25);
}

#[tokio::test]
async fn delete_order_cascades_when_not_started() {
    let db = setup().await;
    let fab_kanban = setup_fabrication(&db, "P-100", 5).await;

    orchestrate::delete_order(&db.pool, fab_kanban.order_id).await.unwrap();

    assert!(order::find_order_by_id(&db.pool, fab_kanban.order_id)
        .await
        .unwrap()
        .is_none());
    assert!(kanban_repo::find_by_id(&db.pool, &fab_kanban.id)
        .await
        .unwrap()
        .is_none());
    assert!(shop_floor::find_by_order_id(&db.pool, fab_kanban.order_id)
        .await
        .unwrap()
        .is_none());
    assert!(order::find_all_order_fabrication(&db.pool).await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_order_locked_once_in_progress() {
    let db = setup().await;
    let fab_kanban = setup_fabrication(&db, "P-100", 5).await;
    let floor = shop_floor::find_by_order_id(&db.pool, fab_kanban.order_id)
        .await
        .unwrap()
        .unwrap();
    set_plan_raw(&db.pool, fab_kanban.order_id, 1_000, 2_000).await;
    orchestrate::advance_shop_floor_status(&db.pool, floor.id, ShopFloorStatus::InProgress)
        .await
        .unwrap();

    let err = orchestrate::delete_order(&db.pool, fab_kanban.order_id)
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::OrderLocked(_)));
    assert!(order::find_order_by_id(&db.pool, fab_kanban.order_id)
        .await
        .unwrap()
        .is_some());
}

#[tokio::test]
async fn start_assembly_consumes_and_opens_withdrawal() {
    let db = setup().await;
    let a = insert_part(&db.pool, "P-100", 10, 4).await;
    let b = insert_part(&db.pool, "P-200", 8, 3).await;

    let kanban = orchestrate::start_assembly(
        &db.pool,
        &StartAssembly {
            component_id: 7,
            request_host: HOST.to_string(),
        },
        1,
    )
    .await
    .unwrap();

    assert_eq!(kanban.kanban_type, KanbanType::Withdrawal);
    assert_eq!(kanban.status, KanbanStatus::Progress);
    assert_eq!(kanban.card_id, CARD_WITHDRAWAL);
    assert_eq!(kanban.station_id, StationId::AssemblyLine.id());

    assert_eq!(part_quantity(&db.pool, a).await, 6);
    assert_eq!(part_quantity(&db.pool, b).await, 5);

    let withdrawal = kanban_repo::find_withdrawal(&db.pool, &kanban.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(withdrawal.prev_station_id, StationId::AssemblyStore.id());
    assert_eq!(withdrawal.next_station_id, StationId::AssemblyLine.id());
}

#[tokio::test]
async fn start_assembly_insufficient_leaves_ledger_unchanged() {
    let db = setup().await;
    let a = insert_part(&db.pool, "P-100", 10, 4).await;
    let b = insert_part(&db.pool, "P-200", 2, 5).await;

    let err = orchestrate::start_assembly(
        &db.pool,
        &StartAssembly {
            component_id: 7,
            request_host: HOST.to_string(),
        },
        1,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, FlowError::InsufficientStock { .. }));

    assert_eq!(part_quantity(&db.pool, a).await, 10);
    assert_eq!(part_quantity(&db.pool, b).await, 2);
    // No order or kanban leaked out of the rolled-back transaction
    assert!(order::find_all_order_store(&db.pool).await.unwrap().is_empty());
    assert!(kanban_repo::find_all_cards(&db.pool).await.unwrap().is_empty());
}
