///  To run :
///  TOKEN_SECRET=example cargo r --example client_example
use shop_client::{CreateItemRequest, CreateOrderRequest, ShopClient, SignInRequest, SignUpRequest};
use shop_hex::application::auth::TokenSigner;
use shop_hex::application::shop_service::ShopService;
use shop_hex::inbound::http::{HttpServer, HttpServerConfig};
use shop_repo::build_repo;
use tempfile::tempdir;

fn find_free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Start server on an ephemeral port.
    let port = find_free_port();
    let addr = format!("http://127.0.0.1:{port}/");

    // Use a temp file-backed SQLite DB so multiple connections see the same data.
    let tmp = tempdir()?;
    let db_path = tmp.path().join("shop.db");
    let db_url = format!("sqlite://{}", db_path.display());

    let repo = build_repo(Some(&db_url)).await?;
    let service = ShopService::new(repo, TokenSigner::new("example-secret"));
    let server = HttpServer::new(
        service,
        HttpServerConfig {
            port: port.to_string(),
        },
    )
    .await?;

    let handle = tokio::spawn(async move {
        server.run().await.expect("server run");
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    // Use client against the running server.
    let client = ShopClient::new(&addr)?;
    let session = client
        .sign_up(SignUpRequest {
            name: "Example".into(),
            email: "example@example.com".into(),
            password: "hunter2".into(),
        })
        .await?;
    println!("Signed up user id={}", session.user.id);

    let session = client
        .sign_in(SignInRequest {
            email: "example@example.com".into(),
            password: "hunter2".into(),
        })
        .await?;
    println!("Signed in, token issued");

    let item = client
        .create_item(CreateItemRequest {
            title: "Mug".into(),
            image: "mug.png".into(),
        })
        .await?;
    println!("Created item id={} title={}", item.id, item.title);

    let order = client
        .create_order(
            &session.token,
            CreateOrderRequest {
                quantity: 2,
                title: "Mug".into(),
            },
        )
        .await?;
    println!("Placed order id={} quantity={}", order.id, order.quantity);

    let me = client.validate(&session.token).await?;
    println!(
        "Validated token: user {} has {} order(s)",
        me.email,
        me.orders.len()
    );

    let deleted = client.delete_order(&session.token, order.id).await?;
    println!("Deleted order id={}", deleted.id);

    handle.abort();
    Ok(())
}
