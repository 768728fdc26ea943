// foodie-client/examples/customer_shop.rs
// Customer flow walkthrough: browse menus, fill a cart, check out.

use foodie_client::{ClientConfig, PaymentMethod, Role, Session, Shop};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        println!("Usage: {} <username> [token]", args[0]);
        println!("  Example: {} mario", args[0]);
        println!("  API url comes from FOODIE_API_URL (default http://localhost:8000)");
        return Ok(());
    }

    let username = &args[1];
    let mut config = ClientConfig::from_env();
    if let Some(token) = args.get(2) {
        config = config.with_token(token);
    }
    let client = config.build_http_client();

    let session = Session::new(client.token().unwrap_or_default(), username, Role::Customer);
    let mut shop = Shop::new(client, &session)?;

    shop.load_menus().await?;
    for menu in shop.menus() {
        println!("{} ({} items)", menu.restaurant_name, menu.food_items.len());
        for item in &menu.food_items {
            match item.discount_price {
                Some(discounted) => {
                    println!("  [{}] {} - {:.2} (discounted {:.2})", item.id, item.name, item.price, discounted)
                }
                None => println!("  [{}] {} - {:.2}", item.id, item.name, item.price),
            }
        }
    }

    // put two of the first listed item in the cart
    let Some(first_item) = shop.menus().first().and_then(|m| m.food_items.first()) else {
        println!("No purchasable items, nothing to order");
        return Ok(());
    };
    let item_id = first_item.id;
    shop.add_to_cart(item_id, 2)?;
    println!("Cart total: {}", shop.cart().display_total());

    shop.set_payment_method(PaymentMethod::Cash);
    shop.set_delivery_time(chrono::Utc::now() + chrono::Duration::hours(1));

    match shop.checkout().await {
        Ok(confirmation) => {
            println!("Order {} placed, status: {}", confirmation.id, confirmation.status)
        }
        Err(e) => tracing::error!("Checkout failed: {}", e),
    }

    let history = shop.order_history().await?;
    println!("{} past orders", history.len());

    Ok(())
}
