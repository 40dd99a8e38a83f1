//! Order creation and loyalty accrual against an in-memory database.

use cafe_server::db::DbService;
use cafe_server::db::models::{OrderCreate, OrderItem, OrderStatus};
use cafe_server::db::repository::{OrderRepository, RepoError, UserRepository};
use cafe_server::services::loyalty::settle_delivered_order;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

async fn test_db() -> Surreal<Db> {
    DbService::memory().await.expect("in-memory db").db
}

fn item(name: &str, price: f64, quantity: u32) -> OrderItem {
    OrderItem {
        menu_item: format!("menu_item:{}", name).parse().unwrap(),
        name: name.to_string(),
        quantity,
        price,
    }
}

fn order_payload(email: &str, items: Vec<OrderItem>) -> OrderCreate {
    OrderCreate {
        customer_name: "Asha".into(),
        customer_email: email.into(),
        customer_phone: "9999999999".into(),
        items,
        order_type: None,
        special_instructions: None,
        delivery_address: None,
        payment_method: None,
    }
}

#[tokio::test]
async fn order_total_is_computed_server_side() {
    let db = test_db().await;
    let repo = OrderRepository::new(db);

    let order = repo
        .create(
            order_payload("asha@example.com", vec![item("latte", 4.10, 2), item("scone", 2.20, 1)]),
            None,
        )
        .await
        .unwrap();

    assert_eq!(order.total_amount, 10.40);
    assert_eq!(order.status, OrderStatus::Pending);
    assert!(!order.loyalty_awarded);
}

#[tokio::test]
async fn empty_order_is_rejected() {
    let db = test_db().await;
    let repo = OrderRepository::new(db);

    let err = repo
        .create(order_payload("asha@example.com", vec![]), None)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[tokio::test]
async fn zero_quantity_is_rejected() {
    let db = test_db().await;
    let repo = OrderRepository::new(db);

    let err = repo
        .create(
            order_payload("asha@example.com", vec![item("latte", 4.10, 0)]),
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[tokio::test]
async fn negative_price_is_rejected() {
    let db = test_db().await;
    let repo = OrderRepository::new(db);

    // 负单价会把总额和积分都算成负数
    let err = repo
        .create(
            order_payload("asha@example.com", vec![item("latte", -50.0, 1)]),
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[tokio::test]
async fn orders_are_listed_by_customer_email() {
    let db = test_db().await;
    let repo = OrderRepository::new(db);

    repo.create(
        order_payload("Asha@Example.COM", vec![item("latte", 4.10, 1)]),
        None,
    )
    .await
    .unwrap();

    // 邮箱大小写在存储和查询两侧都归一化
    let orders = repo.find_by_email("asha@example.com").await.unwrap();
    assert_eq!(orders.len(), 1);

    let none = repo.find_by_email("other@example.com").await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn delivered_order_awards_points_exactly_once() {
    let db = test_db().await;
    let orders = OrderRepository::new(db.clone());
    let users = UserRepository::new(db.clone());

    let user = users
        .create(
            "Asha".into(),
            "asha@example.com".into(),
            "secret-password",
            "token".into(),
        )
        .await
        .unwrap();
    let user_id = user.id.clone().unwrap();

    let order = orders
        .create(
            order_payload("asha@example.com", vec![item("latte", 25.0, 2)]),
            Some(user_id.clone()),
        )
        .await
        .unwrap();
    let order_id = order.id.as_ref().unwrap().to_string();

    // 首次送达：结算发放 floor(50 / 10) 分
    let updated = orders
        .update_status(&order_id, OrderStatus::Delivered)
        .await
        .unwrap();
    assert_eq!(settle_delivered_order(&db, &updated).await.unwrap(), Some(5));

    // 状态来回切换后再次送达，标记挡住重复发放
    orders
        .update_status(&order_id, OrderStatus::Preparing)
        .await
        .unwrap();
    let again = orders
        .update_status(&order_id, OrderStatus::Delivered)
        .await
        .unwrap();
    assert!(again.loyalty_awarded);
    assert_eq!(settle_delivered_order(&db, &again).await.unwrap(), None);

    let user = users
        .find_by_id(&user_id.to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.loyalty_points, 5);
    assert_eq!(user.total_spent, 50.0);
}

#[tokio::test]
async fn guest_delivery_settles_nothing() {
    let db = test_db().await;
    let orders = OrderRepository::new(db.clone());

    let order = orders
        .create(
            order_payload("guest@example.com", vec![item("latte", 25.0, 2)]),
            None,
        )
        .await
        .unwrap();
    let order_id = order.id.as_ref().unwrap().to_string();

    let delivered = orders
        .update_status(&order_id, OrderStatus::Delivered)
        .await
        .unwrap();
    assert_eq!(settle_delivered_order(&db, &delivered).await.unwrap(), None);
}

#[tokio::test]
async fn my_orders_lists_only_linked_orders() {
    let db = test_db().await;
    let orders = OrderRepository::new(db.clone());
    let users = UserRepository::new(db);

    let user = users
        .create(
            "Asha".into(),
            "asha@example.com".into(),
            "secret-password",
            "token".into(),
        )
        .await
        .unwrap();
    let user_id = user.id.unwrap();

    orders
        .create(
            order_payload("asha@example.com", vec![item("latte", 4.10, 1)]),
            Some(user_id.clone()),
        )
        .await
        .unwrap();
    // 同邮箱的游客订单没有账户关联
    orders
        .create(
            order_payload("asha@example.com", vec![item("mocha", 5.0, 1)]),
            None,
        )
        .await
        .unwrap();

    let mine = orders.find_by_user(&user_id).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].items[0].name, "latte");

    // 邮箱查询两条都能看到
    assert_eq!(orders.find_by_email("asha@example.com").await.unwrap().len(), 2);
}

#[tokio::test]
async fn redeeming_more_points_than_owned_fails() {
    let db = test_db().await;
    let users = UserRepository::new(db);

    let user = users
        .create(
            "Asha".into(),
            "asha@example.com".into(),
            "secret-password",
            "token".into(),
        )
        .await
        .unwrap();
    let user_id = user.id.unwrap().to_string();

    let err = users.redeem_points(&user_id, 100).await.unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));

    users.award_loyalty(&user_id, 120, 1200.0).await.unwrap();
    let after = users.redeem_points(&user_id, 100).await.unwrap();
    assert_eq!(after.loyalty_points, 20);
}

#[tokio::test]
async fn revenue_excludes_cancelled_orders() {
    let db = test_db().await;
    let repo = OrderRepository::new(db);

    repo.create(
        order_payload("a@example.com", vec![item("latte", 10.0, 1)]),
        None,
    )
    .await
    .unwrap();
    let cancelled = repo
        .create(
            order_payload("b@example.com", vec![item("mocha", 99.0, 1)]),
            None,
        )
        .await
        .unwrap();
    repo.update_status(
        &cancelled.id.as_ref().unwrap().to_string(),
        OrderStatus::Cancelled,
    )
    .await
    .unwrap();

    assert_eq!(repo.total_revenue().await.unwrap(), 10.0);

    let by_status = repo.count_by_status().await.unwrap();
    assert_eq!(by_status.get("pending"), Some(&1));
    assert_eq!(by_status.get("cancelled"), Some(&1));
}
