//! Account, catalog and engagement flows against an in-memory database.

use cafe_server::db::DbService;
use cafe_server::db::models::{
    AddressCreate, AddressLabel, BlogCategory, BlogCreate, ChatSender, Dietary, MenuCategory,
    MenuItemCreate,
};
use cafe_server::db::repository::{
    AddressRepository, BlogRepository, ChatRepository, ContactRepository, MenuItemRepository,
    RepoError, ReviewRepository, UserRepository, WishlistRepository,
};
use surrealdb::{RecordId, Surreal};
use surrealdb::engine::local::Db;

async fn test_db() -> Surreal<Db> {
    DbService::memory().await.expect("in-memory db").db
}

async fn seed_user(db: &Surreal<Db>, email: &str) -> RecordId {
    UserRepository::new(db.clone())
        .create("Asha".into(), email.into(), "secret-password", "tok".into())
        .await
        .unwrap()
        .id
        .unwrap()
}

fn menu_payload(name: &str, category: MenuCategory, available: bool) -> MenuItemCreate {
    MenuItemCreate {
        name: name.to_string(),
        description: format!("{name} description"),
        price: 4.50,
        image: "/images/item.jpg".into(),
        category: Some(category),
        available: Some(available),
        dietary: Some(vec![Dietary::Vegetarian]),
        customizations: None,
        tags: None,
    }
}

#[tokio::test]
async fn duplicate_email_registration_is_rejected() {
    let db = test_db().await;
    let users = UserRepository::new(db);

    users
        .create("Asha".into(), "asha@example.com".into(), "pw-one-two", "t1".into())
        .await
        .unwrap();
    let err = users
        .create("Imposter".into(), "asha@example.com".into(), "pw-two-three", "t2".into())
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));
}

#[tokio::test]
async fn verification_token_is_single_use() {
    let db = test_db().await;
    let users = UserRepository::new(db);

    users
        .create("Asha".into(), "asha@example.com".into(), "pw-one-two", "vtok".into())
        .await
        .unwrap();

    let verified = users.verify_email("vtok").await.unwrap().unwrap();
    assert!(verified.is_verified);

    // 令牌已消费，第二次无效
    assert!(users.verify_email("vtok").await.unwrap().is_none());
}

#[tokio::test]
async fn profile_update_touches_only_given_fields() {
    let db = test_db().await;
    let users = UserRepository::new(db.clone());
    let id = seed_user(&db, "asha@example.com").await.to_string();

    let updated = users
        .update_profile(&id, Some("Asha K".into()), None)
        .await
        .unwrap();
    assert_eq!(updated.name, "Asha K");
    assert_eq!(updated.email, "asha@example.com");

    // 其他账户占用的邮箱不能换入
    seed_user(&db, "ben@example.com").await;
    let err = users
        .update_profile(&id, None, Some("ben@example.com".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));

    // 两个字段都不给时原样返回
    let unchanged = users.update_profile(&id, None, None).await.unwrap();
    assert_eq!(unchanged.name, "Asha K");
}

#[tokio::test]
async fn menu_filters_hide_unavailable_items() {
    let db = test_db().await;
    let menu = MenuItemRepository::new(db);

    menu.create(menu_payload("Latte", MenuCategory::Coffee, true))
        .await
        .unwrap();
    menu.create(menu_payload("Earl Grey", MenuCategory::Tea, true))
        .await
        .unwrap();
    menu.create(menu_payload("Hidden Roast", MenuCategory::Coffee, false))
        .await
        .unwrap();

    let coffee = menu
        .find_available(Some(MenuCategory::Coffee), None, None)
        .await
        .unwrap();
    assert_eq!(coffee.len(), 1);
    assert_eq!(coffee[0].name, "Latte");

    let search = menu
        .find_available(None, None, Some("EARL".into()))
        .await
        .unwrap();
    assert_eq!(search.len(), 1);

    // admin 列表包含下架商品
    assert_eq!(menu.find_all().await.unwrap().len(), 3);
}

#[tokio::test]
async fn one_review_per_user_and_rating_rollup() {
    let db = test_db().await;
    let menu = MenuItemRepository::new(db.clone());
    let reviews = ReviewRepository::new(db.clone());

    let item = menu
        .create(menu_payload("Latte", MenuCategory::Coffee, true))
        .await
        .unwrap();
    let item_id = item.id.unwrap();

    let asha = seed_user(&db, "asha@example.com").await;
    let ben = seed_user(&db, "ben@example.com").await;

    reviews
        .create(asha.clone(), "Asha".into(), item_id.clone(), 5, "great".into(), vec![])
        .await
        .unwrap();
    reviews
        .create(ben, "Ben".into(), item_id.clone(), 4, "good".into(), vec![])
        .await
        .unwrap();

    let err = reviews
        .create(asha, "Asha".into(), item_id.clone(), 1, "again".into(), vec![])
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));

    let (avg, count) = reviews.recompute_rating(&item_id).await.unwrap();
    assert_eq!(avg, 4.5);
    assert_eq!(count, 2);

    let item = menu
        .find_by_id(&item_id.to_string())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(item.rating, 4.5);
    assert_eq!(item.review_count, 2);
}

#[tokio::test]
async fn only_one_default_address_per_user() {
    let db = test_db().await;
    let addresses = AddressRepository::new(db.clone());
    let user = seed_user(&db, "asha@example.com").await;

    let payload = |label: AddressLabel, is_default: bool| AddressCreate {
        label,
        full_name: "Asha".into(),
        phone: "9999999999".into(),
        address_line1: "12 Brew Lane".into(),
        address_line2: None,
        city: "Pune".into(),
        state: "MH".into(),
        pincode: "411001".into(),
        landmark: None,
        is_default: Some(is_default),
    };

    let home = addresses
        .create(user.clone(), payload(AddressLabel::Home, true))
        .await
        .unwrap();
    let work = addresses
        .create(user.clone(), payload(AddressLabel::Work, true))
        .await
        .unwrap();

    let all = addresses.find_for_user(&user).await.unwrap();
    assert_eq!(all.len(), 2);
    let defaults: Vec<_> = all.iter().filter(|a| a.is_default).collect();
    assert_eq!(defaults.len(), 1);
    assert_eq!(defaults[0].id, work.id);

    // 把旧地址设回默认，另一边翻转
    addresses
        .set_default(&home.id.unwrap().to_string(), &user)
        .await
        .unwrap();
    let all = addresses.find_for_user(&user).await.unwrap();
    let defaults: Vec<_> = all.iter().filter(|a| a.is_default).collect();
    assert_eq!(defaults.len(), 1);
    assert_eq!(defaults[0].label, AddressLabel::Home);
}

#[tokio::test]
async fn wishlist_rejects_duplicates_and_clears() {
    let db = test_db().await;
    let menu = MenuItemRepository::new(db.clone());
    let wishlists = WishlistRepository::new(db.clone());
    let user = seed_user(&db, "asha@example.com").await;

    let item = menu
        .create(menu_payload("Latte", MenuCategory::Coffee, true))
        .await
        .unwrap();
    let item_id = item.id.unwrap();

    let wishlist = wishlists.add_item(&user, item_id.clone()).await.unwrap();
    assert_eq!(wishlist.items.len(), 1);

    let err = wishlists.add_item(&user, item_id.clone()).await.unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));

    let wishlist = wishlists.remove_item(&user, &item_id).await.unwrap();
    assert!(wishlist.items.is_empty());

    wishlists.add_item(&user, item_id).await.unwrap();
    let cleared = wishlists.clear(&user).await.unwrap();
    assert!(cleared.items.is_empty());
}

#[tokio::test]
async fn blog_slug_views_and_likes() {
    let db = test_db().await;
    let blogs = BlogRepository::new(db.clone());
    let author = seed_user(&db, "admin@example.com").await;

    let post = blogs
        .create(
            author.clone(),
            "Admin".into(),
            BlogCreate {
                title: "Our New Winter Menu!".into(),
                content: "Lots of cinnamon.".into(),
                excerpt: "Winter is here".into(),
                cover_image: "/images/winter.jpg".into(),
                category: BlogCategory::News,
                tags: Some(vec!["menu".into()]),
                published: Some(true),
            },
        )
        .await
        .unwrap();
    assert_eq!(post.slug, "our-new-winter-menu");

    // 同标题第二篇撞 slug
    let err = blogs
        .create(
            author.clone(),
            "Admin".into(),
            BlogCreate {
                title: "Our New Winter Menu".into(),
                content: "dup".into(),
                excerpt: "dup".into(),
                cover_image: "/images/dup.jpg".into(),
                category: BlogCategory::News,
                tags: None,
                published: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Duplicate(_)));

    let read = blogs
        .find_by_slug_counting_view("our-new-winter-menu")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(read.views, 1);
    let read = blogs
        .find_by_slug_counting_view("our-new-winter-menu")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(read.views, 2);

    let post_id = post.id.unwrap().to_string();
    assert_eq!(blogs.toggle_like(&post_id, &author).await.unwrap(), 1);
    assert_eq!(blogs.toggle_like(&post_id, &author).await.unwrap(), 0);
}

#[tokio::test]
async fn drafts_are_hidden_from_public_listing() {
    let db = test_db().await;
    let blogs = BlogRepository::new(db.clone());
    let author = seed_user(&db, "admin@example.com").await;

    blogs
        .create(
            author,
            "Admin".into(),
            BlogCreate {
                title: "Draft Post".into(),
                content: "wip".into(),
                excerpt: "wip".into(),
                cover_image: "/images/wip.jpg".into(),
                category: BlogCategory::Recipes,
                tags: None,
                published: None,
            },
        )
        .await
        .unwrap();

    assert!(blogs.find_published(None, None, None).await.unwrap().is_empty());
    assert_eq!(blogs.find_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn chat_mark_read_only_touches_admin_messages() {
    let db = test_db().await;
    let chats = ChatRepository::new(db.clone());
    let user = seed_user(&db, "asha@example.com").await;

    let chat = chats
        .find_or_create_for_user(&user, "Asha", "asha@example.com")
        .await
        .unwrap();
    let chat_id = chat.id.unwrap().to_string();

    chats
        .append_message(&chat_id, ChatSender::User, "hello?".into())
        .await
        .unwrap();
    chats
        .append_message(&chat_id, ChatSender::Admin, "hi, how can we help?".into())
        .await
        .unwrap();

    let chat = chats.mark_read(&chat_id).await.unwrap();
    assert_eq!(chat.messages.len(), 2);
    assert!(!chat.messages[0].read, "user message stays untouched");
    assert!(chat.messages[1].read, "admin message marked read");

    // 同一用户再次进入拿到同一条会话
    let again = chats
        .find_or_create_for_user(&user, "Asha", "asha@example.com")
        .await
        .unwrap();
    assert_eq!(again.id.unwrap().to_string(), chat_id);
}

#[tokio::test]
async fn contact_pending_count_tracks_status() {
    let db = test_db().await;
    let contacts = ContactRepository::new(db);

    let first = contacts
        .create("Asha".into(), "Asha@Example.com".into(), "Do you cater?".into())
        .await
        .unwrap();
    contacts
        .create("Ben".into(), "ben@example.com".into(), "Opening hours?".into())
        .await
        .unwrap();

    assert_eq!(first.email, "asha@example.com");
    assert_eq!(contacts.count_pending().await.unwrap(), 2);

    contacts
        .update_status(
            &first.id.unwrap().to_string(),
            cafe_server::db::models::ContactStatus::Resolved,
        )
        .await
        .unwrap();
    assert_eq!(contacts.count_pending().await.unwrap(), 1);
}
