use pairlist_lunarcrush::{CoinsList, LunarcrushClient};
use tokio::test;

#[test]
#[ignore = "hits the live LunarCrush API"]
pub async fn fetch_coins_list() {
    let client = LunarcrushClient::new(
        std::env::var("LUNARCRUSH_TOKEN")
            .expect("Fill $LUNARCRUSH_TOKEN")
            .as_str(),
    )
    .expect("Failed to build client");

    let reply = client
        .call0::<CoinsList>()
        .await
        .expect("Failed to fetch coins list");

    assert!(!reply.body.data.is_empty());
    println!("{} coins, first: {:?}", reply.body.data.len(), reply.body.data.first());
}
