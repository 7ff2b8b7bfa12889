use scrumix_client::{ApiClient, ClientConfig, Session, UnreadBadge};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = ClientConfig::load(None)?;
    let badge = UnreadBadge::from_config(&config);
    let cookie = std::env::var("SCRUMIX_SESSION_COOKIE").unwrap_or_default();
    let client = ApiClient::new(config).for_session(Session::new(cookie));

    // Both reads are in flight at once, so only one request goes out
    let (first, second) = tokio::join!(
        client.notifications().unread_count(),
        client.notifications().unread_count(),
    );
    println!("unread: {:?} / {:?}", first.data, second.data);
    if let Some(err) = first.error() {
        println!("request failed: {}", err);
    }

    println!("badge shows {}", badge.refresh(&client).await);
    println!("in flight after settle: {:?}", client.deduplication_stats());

    Ok(())
}
