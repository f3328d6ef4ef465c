use shop_hex::application::auth::TokenSigner;
use shop_hex::application::shop_service::ShopService;
use shop_repo::memory::InMemoryRepo;

// End-to-end service flow against the in-memory adapter.
#[tokio::test]
async fn sign_up_order_validate_delete_flow() {
    let repo = InMemoryRepo::new();
    let svc = ShopService::new(repo, TokenSigner::new("flow-secret"));

    let session = svc
        .sign_up("Eve".into(), "eve@example.com".into(), "pw".into())
        .await
        .unwrap();

    svc.create_item("Gadget".into(), "gadget.png".into())
        .await
        .unwrap();

    let order = svc
        .place_order(session.user.id, "Gadget".into(), 3)
        .await
        .unwrap();
    assert_eq!(order.user_id, session.user.id);

    // The token resolves to the user, orders included.
    let resolved = svc.authenticate(Some(&session.token)).await.unwrap();
    assert_eq!(resolved.id, session.user.id);
    assert_eq!(resolved.orders.len(), 1);
    assert_eq!(resolved.orders[0].item.title, "Gadget");

    let removed = svc.remove_order(session.user.id, order.id).await.unwrap();
    assert_eq!(removed.id, order.id);

    let after = svc.get_user(session.user.id).await.unwrap();
    assert!(after.orders.is_empty());
}
