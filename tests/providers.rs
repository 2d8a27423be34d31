use std::time::{Duration, Instant};

use aggregator_quote::source::{
    format_address, native_asset_addr, usdc_addr, weth_addr, NormalizedQuote, OdosProvider,
    ParaswapProvider, ParaswapVersion, ProviderConfig, ProviderError, QuoteProvider, QuoteRequest,
    RateLimit, Side, ZeroExProvider,
};
use alloy::primitives::{address, bytes, Address, U256};
use mockito::{Matcher, Server};
use pretty_assertions::assert_eq;
use reqwest::Client;
use serde_json::json;

const RECEIVER: Address = address!("00000000000000000000000000000000000000aa");

fn mock_config(server: &Server) -> ProviderConfig {
    ProviderConfig::paraswap()
        .with_base_url(server.url())
        .with_rate_limit(RateLimit::none())
}

fn query(pairs: &[(&str, String)]) -> Matcher {
    Matcher::AllOf(
        pairs
            .iter()
            .map(|(k, v)| Matcher::UrlEncoded(k.to_string(), v.clone()))
            .collect(),
    )
}

fn price_route(src_amount: &str, dest_amount: &str) -> serde_json::Value {
    json!({
        "blockNumber": 19000000,
        "network": 1,
        "srcAmount": src_amount,
        "destAmount": dest_amount,
        "bestRoute": [{ "percent": 100, "swaps": [] }],
        "contractMethod": "simpleSwap",
    })
}

#[tokio::test]
async fn paraswap_sell_quotes_destination_amount() {
    let mut server = Server::new_async().await;
    let route = price_route("1000", "2500");

    let prices = server
        .mock("GET", "/prices/")
        .match_query(query(&[
            ("srcToken", format_address(weth_addr())),
            ("destToken", format_address(usdc_addr())),
            ("amount", "1000".to_string()),
            ("side", "SELL".to_string()),
            ("network", "1".to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "priceRoute": route }).to_string())
        .create_async()
        .await;
    let transactions = server
        .mock("POST", "/transactions/1/")
        .match_query(Matcher::UrlEncoded("ignoreChecks".into(), "true".into()))
        .match_body(Matcher::PartialJson(json!({
            "priceRoute": route,
            "srcToken": format_address(weth_addr()),
            "destToken": format_address(usdc_addr()),
            "srcAmount": "1000",
            "destAmount": "2500",
            "userAddress": format_address(RECEIVER),
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "data": "0xdeadbeef" }).to_string())
        .create_async()
        .await;

    let provider =
        ParaswapProvider::new(Client::new(), mock_config(&server), ParaswapVersion::Current);
    let request = QuoteRequest::new(weth_addr(), usdc_addr(), U256::from(1000), Side::Sell)
        .with_network(1)
        .with_receiver(RECEIVER);

    let quote = provider.quote(&request).await.unwrap();

    prices.assert_async().await;
    transactions.assert_async().await;
    assert_eq!(
        quote,
        NormalizedQuote {
            counterparty_amount: U256::from(2500),
            call_data: bytes!("deadbeef"),
        }
    );
}

#[tokio::test]
async fn paraswap_buy_quotes_source_amount() {
    let mut server = Server::new_async().await;
    let route = price_route("500", "1000");

    server
        .mock("GET", "/prices/")
        .match_query(query(&[("side", "BUY".to_string()), ("network", "10".to_string())]))
        .with_status(200)
        .with_body(json!({ "priceRoute": route }).to_string())
        .create_async()
        .await;
    let transactions = server
        .mock("POST", "/transactions/10/")
        .match_query(Matcher::Any)
        .match_body(Matcher::PartialJson(json!({
            "srcAmount": "500",
            "destAmount": "1000",
        })))
        .with_status(200)
        .with_body(json!({ "data": "0x01" }).to_string())
        .create_async()
        .await;

    let provider =
        ParaswapProvider::new(Client::new(), mock_config(&server), ParaswapVersion::Current);
    let request = QuoteRequest::new(weth_addr(), usdc_addr(), U256::from(1000), Side::Buy)
        .with_network(10)
        .with_receiver(RECEIVER);

    let quote = provider.quote(&request).await.unwrap();

    transactions.assert_async().await;
    assert_eq!(quote.counterparty_amount, U256::from(500));
}

#[tokio::test]
async fn paraswap_legacy_sends_decimals() {
    let mut server = Server::new_async().await;

    let prices = server
        .mock("GET", "/prices/")
        .match_query(query(&[
            ("srcDecimals", "18".to_string()),
            ("destDecimals", "6".to_string()),
        ]))
        .with_status(200)
        .with_body(json!({ "priceRoute": price_route("1000", "3") }).to_string())
        .create_async()
        .await;
    server
        .mock("POST", "/transactions/1/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!({ "data": "0x02" }).to_string())
        .create_async()
        .await;

    let provider =
        ParaswapProvider::new(Client::new(), mock_config(&server), ParaswapVersion::Legacy);
    let request = QuoteRequest::new(weth_addr(), usdc_addr(), U256::from(1000), Side::Sell)
        .with_decimals(18, 6)
        .with_receiver(RECEIVER);

    let quote = provider.quote(&request).await.unwrap();

    prices.assert_async().await;
    assert_eq!(quote.counterparty_amount, U256::from(3));
}

#[tokio::test]
async fn paraswap_rejection_stops_before_transaction() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/prices/")
        .match_query(Matcher::Any)
        .with_status(400)
        .with_body(json!({ "error": "Invalid tokens" }).to_string())
        .create_async()
        .await;
    let transactions = server
        .mock("POST", "/transactions/1/")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let provider =
        ParaswapProvider::new(Client::new(), mock_config(&server), ParaswapVersion::Current);
    let request = QuoteRequest::new(weth_addr(), usdc_addr(), U256::from(1), Side::Sell);

    let err = provider.quote(&request).await.unwrap_err();

    transactions.assert_async().await;
    match err {
        ProviderError::UpstreamRejected { status, reason } => {
            assert_eq!(status, 400);
            assert_eq!(reason, "Invalid tokens");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn paraswap_route_without_amounts_is_missing_field() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/prices/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!({ "priceRoute": { "srcAmount": "1" } }).to_string())
        .create_async()
        .await;

    let provider =
        ParaswapProvider::new(Client::new(), mock_config(&server), ParaswapVersion::Current);
    let request = QuoteRequest::new(weth_addr(), usdc_addr(), U256::from(1), Side::Sell);

    let err = provider.quote(&request).await.unwrap_err();

    assert!(matches!(err, ProviderError::MissingField("priceRoute.destAmount")));
}

#[tokio::test]
async fn zero_ex_side_selects_amount_and_parameter() {
    let mut server = Server::new_async().await;
    let body = json!({ "buyAmount": "1000", "sellAmount": "500", "data": "0xabcd" }).to_string();

    let sell = server
        .mock("GET", "/quote")
        .match_query(query(&[
            ("sellToken", format_address(weth_addr())),
            ("buyToken", format_address(usdc_addr())),
            ("sellAmount", "500".to_string()),
            ("slippagePercentage", "0.03".to_string()),
            ("excludedSources", "Balancer".to_string()),
        ]))
        .with_status(200)
        .with_body(body.clone())
        .create_async()
        .await;
    let buy = server
        .mock("GET", "/quote")
        .match_query(query(&[("buyAmount", "1000".to_string())]))
        .with_status(200)
        .with_body(body)
        .create_async()
        .await;

    let provider = ZeroExProvider::new(Client::new(), mock_config(&server));
    let sell_quote = provider
        .quote(&QuoteRequest::new(weth_addr(), usdc_addr(), U256::from(500), Side::Sell))
        .await
        .unwrap();
    let buy_quote = provider
        .quote(&QuoteRequest::new(weth_addr(), usdc_addr(), U256::from(1000), Side::Buy))
        .await
        .unwrap();

    sell.assert_async().await;
    buy.assert_async().await;
    assert_eq!(sell_quote.counterparty_amount, U256::from(1000));
    assert_eq!(buy_quote.counterparty_amount, U256::from(500));
    assert_eq!(sell_quote.call_data, bytes!("abcd"));
}

#[tokio::test]
async fn zero_ex_without_data_is_missing_field() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/quote")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!({ "buyAmount": "1", "sellAmount": "2" }).to_string())
        .create_async()
        .await;

    let provider = ZeroExProvider::new(Client::new(), mock_config(&server));
    let err = provider
        .quote(&QuoteRequest::new(weth_addr(), usdc_addr(), U256::from(2), Side::Sell))
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::MissingField("data")));
}

#[tokio::test]
async fn zero_ex_non_json_body_is_rejected() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/quote")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>rate limited</html>")
        .create_async()
        .await;

    let provider = ZeroExProvider::new(Client::new(), mock_config(&server));
    let err = provider
        .quote(&QuoteRequest::new(weth_addr(), usdc_addr(), U256::from(2), Side::Sell))
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::UpstreamRejected { status: 200, .. }));
}

#[tokio::test]
async fn zero_ex_waits_out_rate_limit_before_quoting() {
    let mut server = Server::new_async().await;
    let delay = Duration::from_millis(200);

    let quote = server
        .mock("GET", "/quote")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!({ "buyAmount": "7", "sellAmount": "3", "data": "0x01" }).to_string())
        .create_async()
        .await;

    let config = mock_config(&server).with_rate_limit(RateLimit::fixed(delay));
    let provider = ZeroExProvider::new(Client::new(), config);
    let request = QuoteRequest::new(weth_addr(), usdc_addr(), U256::from(3), Side::Sell);

    let start = Instant::now();
    let result = provider.quote(&request).await.unwrap();
    let elapsed = start.elapsed();

    quote.assert_async().await;
    assert!(elapsed >= delay, "quoted after {elapsed:?}");
    assert_eq!(result.counterparty_amount, U256::from(7));
}

#[tokio::test]
async fn odos_posts_normalized_native_source() {
    let mut server = Server::new_async().await;

    let swap = server
        .mock("POST", "/sor/swap")
        .match_header("accept", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "chainId": 1,
            "inputTokens": [{ "tokenAddress": format_address(Address::ZERO), "amount": "5" }],
            "outputTokens": [{ "tokenAddress": format_address(usdc_addr()), "proportion": 1 }],
            "sourceBlacklist": [
                "Balancer V1",
                "Balancer V2 MetaStable",
                "Balancer V2 Stable",
                "Balancer V2 Weighted",
            ],
            "userAddr": format_address(RECEIVER),
        })))
        .with_status(200)
        .with_body(
            json!({
                "outputTokens": [{ "tokenAddress": format_address(usdc_addr()), "amount": "42" }],
                "transaction": { "data": "0x01", "to": format_address(RECEIVER) },
            })
            .to_string(),
        )
        .create_async()
        .await;

    let provider = OdosProvider::new(Client::new(), mock_config(&server));
    let request = QuoteRequest::new(native_asset_addr(), usdc_addr(), U256::from(5), Side::Sell)
        .with_receiver(RECEIVER);

    let quote = provider.quote(&request).await.unwrap();

    swap.assert_async().await;
    assert_eq!(
        quote,
        NormalizedQuote {
            counterparty_amount: U256::from(42),
            call_data: bytes!("01"),
        }
    );
}

#[tokio::test]
async fn odos_empty_output_tokens_is_missing_field() {
    let mut server = Server::new_async().await;

    server
        .mock("POST", "/sor/swap")
        .with_status(200)
        .with_body(json!({ "outputTokens": [], "transaction": { "data": "0x01" } }).to_string())
        .create_async()
        .await;

    let provider = OdosProvider::new(Client::new(), mock_config(&server));
    let request = QuoteRequest::new(weth_addr(), usdc_addr(), U256::from(5), Side::Sell);

    let err = provider.quote(&request).await.unwrap_err();

    assert!(matches!(err, ProviderError::MissingField("outputTokens[0]")));
}

#[tokio::test]
async fn odos_buy_issues_no_request() {
    let mut server = Server::new_async().await;

    let swap = server
        .mock("POST", "/sor/swap")
        .expect(0)
        .create_async()
        .await;

    let provider = OdosProvider::new(Client::new(), mock_config(&server));
    let request = QuoteRequest::new(weth_addr(), usdc_addr(), U256::from(5), Side::Buy);

    let err = provider.quote(&request).await.unwrap_err();

    swap.assert_async().await;
    assert!(matches!(err, ProviderError::UnsupportedSide { side: Side::Buy, .. }));
}

#[tokio::test]
async fn odos_buy_fails_without_waiting_out_rate_limit() {
    let mut server = Server::new_async().await;

    let swap = server
        .mock("POST", "/sor/swap")
        .expect(0)
        .create_async()
        .await;

    let config = mock_config(&server).with_rate_limit(RateLimit::fixed(Duration::from_secs(30)));
    let provider = OdosProvider::new(Client::new(), config);
    let request = QuoteRequest::new(weth_addr(), usdc_addr(), U256::from(5), Side::Buy);

    let start = Instant::now();
    let err = tokio::time::timeout(Duration::from_secs(5), provider.quote(&request))
        .await
        .expect("side check must not sleep")
        .unwrap_err();

    swap.assert_async().await;
    assert!(start.elapsed() < Duration::from_secs(1));
    assert!(matches!(err, ProviderError::UnsupportedSide { provider: "odos", side: Side::Buy }));
}
