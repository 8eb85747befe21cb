use super::*;

// ========================================================================
//  Stats aggregations
// ========================================================================

#[tokio::test]
async fn progress_track_on_empty_database_is_all_zero() {
    let db = setup().await;
    let track = stats::progress_track(&db.pool).await.unwrap();
    assert_eq!(track.len(), 3);
    assert!(track.iter().all(|s| s.percentage == 0));
}

#[tokio::test]
async fn progress_track_floors_quantity_percentages() {
    let db = setup().await;
    insert_part(&db.pool, "P-100", 100, 0).await;
    insert_part(&db.pool, "P-200", 100, 0).await;
    insert_part(&db.pool, "P-300", 100, 0).await;

    for (number, quantity) in [("P-100", 5), ("P-200", 5), ("P-300", 5)] {
        orchestrate::create_store_order(
            &db.pool,
            &StoreOrderCreate {
                part_number: number.to_string(),
                quantity,
                request_host: HOST.to_string(),
            },
            1,
        )
        .await
        .unwrap();
    }
    // One of three equal orders delivered: 5 / 15 → 33
    let store_order = order::find_order_store_with_part(&db.pool).await.unwrap()[0].clone();
    let mut tx = db.pool.begin().await.unwrap();
    order::set_order_store_status(&mut tx, store_order.id, OrderStoreStatus::Deliver)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let track = stats::progress_track(&db.pool).await.unwrap();
    let store = track
        .iter()
        .find(|s| s.station_id == StationId::AssemblyStore.id())
        .unwrap();
    assert_eq!(store.percentage, 33);
    let line = track
        .iter()
        .find(|s| s.station_id == StationId::AssemblyLine.id())
        .unwrap();
    assert_eq!(line.percentage, 0);
}

#[tokio::test]
async fn production_progress_lists_only_in_progress_floors() {
    let db = setup().await;
    let fab_kanban = setup_fabrication(&db, "P-100", 5).await;
    assert!(stats::production_progress(&db.pool).await.unwrap().is_empty());

    let floor = shop_floor::find_by_order_id(&db.pool, fab_kanban.order_id)
        .await
        .unwrap()
        .unwrap();
    set_plan_raw(&db.pool, fab_kanban.order_id, 1_000, 2_000).await;
    orchestrate::advance_shop_floor_status(&db.pool, floor.id, ShopFloorStatus::InProgress)
        .await
        .unwrap();

    let active = stats::production_progress(&db.pool).await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].part_number, "P-100");
}

#[tokio::test]
async fn progress_track_counts_started_work() {
    let db = setup().await;
    let fab_kanban = setup_fabrication(&db, "P-100", 5).await;

    // The store order left pending; the shop floor has not started
    let track = stats::progress_track(&db.pool).await.unwrap();
    let station = |id: StationId| {
        track
            .iter()
            .find(|s| s.station_id == id.id())
            .unwrap()
            .percentage
    };
    assert_eq!(station(StationId::AssemblyStore), 100);
    assert_eq!(station(StationId::Fabrication), 0);

    let floor = shop_floor::find_by_order_id(&db.pool, fab_kanban.order_id)
        .await
        .unwrap()
        .unwrap();
    set_plan_raw(&db.pool, fab_kanban.order_id, 1_000, 2_000).await;
    orchestrate::advance_shop_floor_status(&db.pool, floor.id, ShopFloorStatus::InProgress)
        .await
        .unwrap();

    let track = stats::progress_track(&db.pool).await.unwrap();
    let fabrication = track
        .iter()
        .find(|s| s.station_id == StationId::Fabrication.id())
        .unwrap();
    assert_eq!(fabrication.percentage, 100);
}

#[tokio::test]
async fn delay_ontime_sums_quantities_by_time_remaining() {
    let db = setup().await;
    let part_id = insert_part(&db.pool, "P-100", 10, 0).await;
    let now = shared::util::now_millis();

    // Two finished floors inserted directly: 5 units late, 3 on time
    for (order_id, quantity, plan_finish, actual_finish) in
        [(9001, 5, now - 10_000, now), (9002, 3, now + 10_000, now)]
    {
        sqlx::query("INSERT INTO orders (id, station_id, created_by, created_at) VALUES (?, 3, 1, ?)")
            .bind(order_id)
            .bind(now)
            .execute(&db.pool)
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO order_fabrication (id, order_id, part_id, quantity, status, created_at) \
             VALUES (?, ?, ?, ?, 'finish', ?)",
        )
        .bind(shared::util::snowflake_id())
        .bind(order_id)
        .bind(part_id)
        .bind(quantity)
        .bind(now)
        .execute(&db.pool)
        .await
        .unwrap();
        sqlx::query(
            "INSERT INTO part_shop_floor \
             (id, order_id, part_id, plan_start, plan_finish, actual_start, actual_finish, \
              status, station, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, 'finish', 'shop_floor', ?)",
        )
        .bind(shared::util::snowflake_id())
        .bind(order_id)
        .bind(part_id)
        .bind(now - 20_000)
        .bind(plan_finish)
        .bind(now - 5_000)
        .bind(actual_finish)
        .bind(now)
        .execute(&db.pool)
        .await
        .unwrap();
    }

    let split = stats::delay_ontime(&db.pool).await.unwrap();
    assert_eq!(split.total, 8);
    assert_eq!(split.delay, 5);
    assert_eq!(split.ontime, 3);
}
