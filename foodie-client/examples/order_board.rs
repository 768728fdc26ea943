// foodie-client/examples/order_board.rs
// Live restaurant-admin order board: polls orders, approves what is
// pending, prints what each row currently allows.

use foodie_client::{ClientConfig, OrderAction, OrderBoard, Role, Session};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        println!("Usage: {} <restaurant-admin-username> [token]", args[0]);
        return Ok(());
    }

    let username = &args[1];
    let mut config = ClientConfig::from_env();
    if let Some(token) = args.get(2) {
        config = config.with_token(token);
    }
    let poll_interval = config.poll_interval;
    let client = config.build_http_client();

    let session = Session::new(
        client.token().unwrap_or_default(),
        username,
        Role::RestaurantAdmin,
    );
    let board = OrderBoard::restaurant_admin(client, &session, poll_interval)?;

    // let the first poll land
    tokio::time::sleep(poll_interval).await;

    for round in 0..5 {
        let orders = board.orders().await;
        println!("--- poll {} ({} orders)", round, orders.len());
        for order in &orders {
            let actions: Vec<_> = board
                .actions_for(order)
                .iter()
                .map(OrderAction::as_str)
                .collect();
            println!(
                "  #{} {} {:.2} [{}]",
                order.id,
                order.status,
                order.total_price,
                actions.join(", ")
            );

            if board.actions_for(order).contains(&OrderAction::Approve) {
                match board.approve(order.id).await {
                    Ok(()) => println!("  approved #{}", order.id),
                    Err(e) => tracing::warn!("Approve failed: {}", e),
                }
            }
        }
        tokio::time::sleep(poll_interval).await;
    }

    board.shutdown().await;
    Ok(())
}
