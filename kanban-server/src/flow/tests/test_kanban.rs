use super::*;

// ========================================================================
//  Kanban card state machine
// ========================================================================

#[tokio::test]
async fn queue_advance_requires_plan() {
    let db = setup().await;
    let fab_kanban = setup_fabrication(&db, "P-100", 5).await;

    // Scenario: confirm before the shop floor plan exists
    let err = confirm::update_status(&db.pool, &fab_kanban.id, KanbanStatus::Progress)
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::PlanRequired));

    set_plan_raw(&db.pool, fab_kanban.order_id, 1_000, 2_000).await;
    let updated = confirm::update_status(&db.pool, &fab_kanban.id, KanbanStatus::Progress)
        .await
        .unwrap();
    assert_eq!(updated.status, KanbanStatus::Progress);

    // Side effect landed on the shop floor
    let floor = shop_floor::find_by_order_id(&db.pool, fab_kanban.order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(floor.status, ShopFloorStatus::InProgress);
    assert!(floor.actual_start.is_some());
}

#[tokio::test]
async fn repeat_target_is_noop() {
    let db = setup().await;
    let fab_kanban = setup_fabrication(&db, "P-100", 5).await;
    set_plan_raw(&db.pool, fab_kanban.order_id, 1_000, 2_000).await;

    confirm::update_status(&db.pool, &fab_kanban.id, KanbanStatus::Progress)
        .await
        .unwrap();
    let err = confirm::update_status(&db.pool, &fab_kanban.id, KanbanStatus::Progress)
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::NoOp));
}

#[tokio::test]
async fn skipping_a_status_is_invalid_target() {
    let db = setup().await;
    let fab_kanban = setup_fabrication(&db, "P-100", 5).await;
    set_plan_raw(&db.pool, fab_kanban.order_id, 1_000, 2_000).await;

    let err = confirm::update_status(&db.pool, &fab_kanban.id, KanbanStatus::Done)
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::InvalidTarget));

    // Still in queue, shop floor untouched
    let card = kanban_repo::find_by_id(&db.pool, &fab_kanban.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(card.status, KanbanStatus::Queue);
    let floor = shop_floor::find_by_order_id(&db.pool, fab_kanban.order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(floor.status, ShopFloorStatus::Pending);
}

#[tokio::test]
async fn done_is_terminal() {
    let db = setup().await;
    let fab_kanban = setup_fabrication(&db, "P-100", 5).await;
    set_plan_raw(&db.pool, fab_kanban.order_id, 1_000, 2_000).await;

    confirm::update_status(&db.pool, &fab_kanban.id, KanbanStatus::Progress)
        .await
        .unwrap();
    let done = confirm::update_status(&db.pool, &fab_kanban.id, KanbanStatus::Done)
        .await
        .unwrap();
    assert_eq!(done.status, KanbanStatus::Done);
    assert!(done.finish_date.is_some());

    // Shop floor finished and the fabrication order moved to deliver
    let floor = shop_floor::find_by_order_id(&db.pool, fab_kanban.order_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(floor.status, ShopFloorStatus::Finish);
    let fab = order::find_all_order_fabrication(&db.pool).await.unwrap()[0].clone();
    assert_eq!(fab.status, OrderFabricationStatus::Deliver);

    let err = confirm::update_status(&db.pool, &fab_kanban.id, KanbanStatus::Progress)
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::Terminal));
}

#[tokio::test]
async fn diverged_shop_floor_is_out_of_sync() {
    let db = setup().await;
    let fab_kanban = setup_fabrication(&db, "P-100", 5).await;
    set_plan_raw(&db.pool, fab_kanban.order_id, 1_000, 2_000).await;
    let floor = shop_floor::find_by_order_id(&db.pool, fab_kanban.order_id)
        .await
        .unwrap()
        .unwrap();

    // Shop floor advanced on its own; card still in queue
    orchestrate::advance_shop_floor_status(&db.pool, floor.id, ShopFloorStatus::InProgress)
        .await
        .unwrap();

    let err = confirm::update_status(&db.pool, &fab_kanban.id, KanbanStatus::Progress)
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::OutOfSync(_)));
}

#[tokio::test]
async fn missing_kanban_is_not_found() {
    let db = setup().await;
    let err = confirm::update_status(&db.pool, "no-such-token", KanbanStatus::Progress)
        .await
        .unwrap_err();
    assert!(matches!(err, FlowError::KanbanNotFound(_)));
}

#[tokio::test]
async fn withdrawal_card_finishes_without_shop_floor() {
    let db = setup().await;
    insert_part(&db.pool, "P-100", 10, 4).await;
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

    let done = confirm::update_status(&db.pool, &kanban.id, KanbanStatus::Done)
        .await
        .unwrap();
    assert_eq!(done.status, KanbanStatus::Done);
    assert!(done.finish_date.is_some());
}

#[tokio::test]
async fn detail_enriches_production_and_withdrawal_cards() {
    let db = setup().await;
    let fab_kanban = setup_fabrication(&db, "P-100", 5).await;
    set_plan_raw(&db.pool, fab_kanban.order_id, 1_000, 2_000).await;

    let detail = kanban_repo::find_detail(&db.pool, &fab_kanban.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(detail.part_number.as_deref(), Some("P-100"));
    assert_eq!(detail.quantity, Some(5));
    assert_eq!(detail.station_name, StationId::Fabrication.name());
    assert_eq!(detail.shop_floor_plan_start, Some(1_000));
    assert_eq!(detail.shop_floor_plan_finish, Some(2_000));
    assert!(detail.withdrawal.is_none());

    insert_part(&db.pool, "P-200", 10, 4).await;
    let withdrawal_kanban = orchestrate::start_assembly(
        &db.pool,
        &StartAssembly {
            component_id: 7,
            request_host: HOST.to_string(),
        },
        1,
    )
    .await
    .unwrap();
    let detail = kanban_repo::find_detail(&db.pool, &withdrawal_kanban.id)
        .await
        .unwrap()
        .unwrap();
    let routing = detail.withdrawal.unwrap();
    assert_eq!(routing.prev_station_name, StationId::AssemblyStore.name());
    assert_eq!(routing.next_station_name, StationId::AssemblyLine.name());
    assert_eq!(detail.quantity, Some(1));
}
