use shop_repo::{build_repo, Repo};
use shop_types::ports::shop_repository::ShopRepository;
use std::env;

#[tokio::test]
async fn builds_sqlite_repo_from_env() {
    // Use a temp DB path for isolation.
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("shop-test.db");
    let url = format!("sqlite://{}", db_path.display());
    env::set_var("DATABASE_URL", &url);

    let repo: Repo = build_repo(Some(&url)).await.expect("build repo");
    // basic sanity: listings should succeed and be empty
    let users = repo.list_users().await.expect("list users");
    assert!(users.is_empty());
    let items = repo.list_items().await.expect("list items");
    assert!(items.is_empty());
}
