#![cfg(feature = "sqlite")]

use shop_repo::sqlite::SqliteRepo;
use shop_types::domain::item::NewItem;
use shop_types::domain::order::NewOrder;
use shop_types::domain::user::{NewUser, UserUpdate};
use shop_types::ports::shop_repository::ShopRepository;
use std::path::PathBuf;

fn temp_db_url(dir: &tempfile::TempDir, name: &str) -> String {
    let mut path = PathBuf::from(dir.path());
    path.push(format!("{name}.db"));
    format!("sqlite://{}", path.display())
}

fn sample_user(email: &str) -> NewUser {
    NewUser {
        name: "Test".into(),
        email: email.into(),
        password_hash: "$2b$08$hash".into(),
    }
}

#[tokio::test]
async fn sqlite_repo_crud_flow() {
    let dir = tempfile::tempdir().expect("tempdir");
    let repo = SqliteRepo::new(&temp_db_url(&dir, "shop-crud")).await.unwrap();

    let user = repo.create_user(sample_user("a@b.com")).await.unwrap();
    let item = repo
        .create_item(NewItem {
            title: "Mug".into(),
            image: "mug.png".into(),
        })
        .await
        .unwrap();
    let order = repo
        .create_order(NewOrder {
            quantity: 3,
            user_id: user.id,
            item_id: item.id,
        })
        .await
        .unwrap();

    let fetched = repo.find_user(user.id).await.unwrap().unwrap();
    assert_eq!(fetched.email, "a@b.com");
    assert_eq!(fetched.password_hash, "$2b$08$hash");

    let by_title = repo.find_item_by_title("Mug").await.unwrap().unwrap();
    assert_eq!(by_title.id, item.id);

    let view = repo.user_with_orders(user.id).await.unwrap().unwrap();
    assert_eq!(view.orders.len(), 1);
    assert_eq!(view.orders[0].quantity, 3);
    assert_eq!(view.orders[0].item.title, "Mug");

    let listed = repo.list_users().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].orders.len(), 1);

    let updated = repo
        .update_user(
            user.id,
            UserUpdate {
                name: "Renamed".into(),
                email: "a@b.com".into(),
                password_hash: "$2b$08$other".into(),
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.name, "Renamed");

    let deleted = repo.delete_order(order.id).await.unwrap();
    assert!(deleted);
    assert!(repo.find_order(order.id).await.unwrap().is_none());
}

#[tokio::test]
async fn sqlite_repo_enforces_unique_email_and_title() {
    let dir = tempfile::tempdir().expect("tempdir");
    let repo = SqliteRepo::new(&temp_db_url(&dir, "shop-unique"))
        .await
        .unwrap();

    repo.create_user(sample_user("dup@b.com")).await.unwrap();
    assert!(repo.create_user(sample_user("dup@b.com")).await.is_err());

    repo.create_item(NewItem {
        title: "Mug".into(),
        image: "a.png".into(),
    })
    .await
    .unwrap();
    let dup = repo
        .create_item(NewItem {
            title: "Mug".into(),
            image: "b.png".into(),
        })
        .await;
    assert!(dup.is_err());
}

#[tokio::test]
async fn sqlite_repo_handles_missing_rows() {
    let dir = tempfile::tempdir().expect("tempdir");
    let repo = SqliteRepo::new(&temp_db_url(&dir, "shop-missing"))
        .await
        .unwrap();

    assert!(repo.find_user(99).await.unwrap().is_none());
    assert!(repo.user_with_orders(99).await.unwrap().is_none());
    assert!(repo.find_item(99).await.unwrap().is_none());

    let updated = repo
        .update_user(
            99,
            UserUpdate {
                name: "X".into(),
                email: "x@y.com".into(),
                password_hash: "h".into(),
            },
        )
        .await
        .unwrap();
    assert!(updated.is_none());

    let deleted = repo.delete_order(99).await.unwrap();
    assert!(!deleted);
}

#[tokio::test]
async fn sqlite_repo_enforces_foreign_keys() {
    let dir = tempfile::tempdir().expect("tempdir");
    let repo = SqliteRepo::new(&temp_db_url(&dir, "shop-fk")).await.unwrap();

    let res = repo
        .create_order(NewOrder {
            quantity: 1,
            user_id: 42,
            item_id: 42,
        })
        .await;
    assert!(res.is_err());
}
