#![deny(unused_crate_dependencies)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

mod cache;
mod config;
mod error;
mod fetch;
mod parse;
mod webhook;

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, on, MethodFilter},
    Extension, Router,
};

use crate::{cache::Multithreaded, config::Config, fetch::make_client};
use juniper::{graphql_object, EmptyMutation, EmptySubscription, RootNode};
use juniper_axum::{graphiql, graphql};
use parse::Schedules;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::{compression::CompressionLayer, cors::Any};

pub use error::Result;

/// How often the refresh task checks whether the cached hours are stale.
/// A failed scrape is retried on the next check.
const REFRESH_CHECK_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Clone, Debug)]
pub struct Query(Arc<Multithreaded>);

#[graphql_object]
impl Query {
    /// Restaurant hours from the most recent successful scrape of the hours page.
    async fn hours(&self) -> Schedules {
        self.0.get().await.schedules().to_owned()
    }
}

type Schema = RootNode<'static, Query, EmptyMutation, EmptySubscription>;

#[cfg(all(target_env = "musl", target_pointer_width = "64"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

async fn refresh(State(cache): State<Arc<Multithreaded>>) -> Response {
    if let Err(e) = cache.refresh().await {
        log::warn!("Error while refreshing cache: {e}");
        return webhook::application_error(e);
    }
    let c = cache.get().await;
    let since = c
        .time_since_refresh()
        .map_or_else(|| "never".to_string(), |since| since.to_string());
    (
        StatusCode::CREATED,
        format!(
            "Last refresh: {since}\nNext refresh: {}",
            c.time_until_refresh(),
        ),
    )
        .into_response()
}

async fn refresh_periodically(cache: Arc<Multithreaded>) {
    let mut interval = tokio::time::interval(REFRESH_CHECK_INTERVAL);
    loop {
        interval.tick().await;
        let start = Instant::now();
        match cache.maybe_refresh().await {
            Ok(true) => log::info!("Refresh done, took {:?}", start.elapsed()),
            Ok(false) => {}
            Err(e) => tracing::warn!("Error while refreshing cache: {e}"),
        }
    }
}

fn app(cache: Arc<Multithreaded>, config: &Config) -> Router {
    let schema = Schema::new(
        Query(Arc::clone(&cache)),
        EmptyMutation::new(),
        EmptySubscription::new(),
    );
    let compression_layer: CompressionLayer = CompressionLayer::new()
        .br(true)
        .deflate(true)
        .gzip(true)
        .zstd(true);
    let cors_layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST]) // intentionally excludes request-refresh/PUT
        .allow_origin(Any);

    Router::new()
        .route(
            "/graphql",
            on(
                MethodFilter::GET.or(MethodFilter::POST),
                graphql::<Arc<Schema>>,
            ),
        )
        .route("/graphiql", get(graphiql("/graphql", None)))
        .route("/request-refresh", on(MethodFilter::PUT, refresh))
        .merge(webhook::router(config.verify_token.clone()))
        .fallback(webhook::not_found)
        .with_state(cache)
        .layer(cors_layer)
        .layer(Extension(Arc::new(schema)))
        .layer(compression_layer)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("shutting down");
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> core::result::Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let config = Config::from_env()?;
    log::info!("scraping hours from {}", config.hours_url);
    let cache = Arc::new(Multithreaded::new(make_client()?, config.clone()));
    let app = app(Arc::clone(&cache), &config);
    tokio::spawn(refresh_periodically(Arc::clone(&cache)));
    let listener = TcpListener::bind(config.addr)
        .await
        .map_err(|e| format!("failed to listen on {}: {e}", config.addr))?;
    log::info!("listening on http://{}", config.addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::serve_pages;
    use chrono::NaiveDate;
    use serde_json::{json, Value};
    use std::fs;

    fn fixture_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 8).unwrap()
    }

    /// Starts the app against an hours page serving `pages`, returning its base url.
    async fn spawn_app(pages: Vec<(&'static str, String)>) -> String {
        let config = Config {
            hours_url: serve_pages(pages).await,
            verify_token: Some("blue-devils".to_string()),
            ..Config::default()
        };
        let cache = Arc::new(
            Multithreaded::new(make_client().unwrap(), config.clone()).with_today(fixture_today),
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app(cache, &config)).await });
        format!("http://{addr}")
    }

    fn page() -> String {
        fs::read_to_string("./src/parse/html_examples/hours/menus_hours.html").unwrap()
    }

    #[tokio::test]
    async fn test_webhook_routes() {
        let base = spawn_app(vec![]).await;
        let client = make_client().unwrap();

        let res = client
            .get(format!("{base}/"))
            .query(&[
                ("hub.mode", "subscribe"),
                ("hub.verify_token", "blue-devils"),
                ("hub.challenge", "1158201444"),
            ])
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200);
        assert_eq!(res.text().await.unwrap(), "1158201444");

        let res = client
            .post(format!("{base}/"))
            .header("content-type", "application/json")
            .body(r#"{"object": "page", "entry": []}"#)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200);
        assert_eq!(res.text().await.unwrap(), "ok");

        let res = client
            .post(format!("{base}/"))
            .header("content-type", "application/x-www-form-urlencoded")
            .body("object=page")
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200);
        assert_eq!(res.text().await.unwrap(), "ok");

        let res = client.get(format!("{base}/menus")).send().await.unwrap();
        assert_eq!(res.status(), 404);
        assert_eq!(res.text().await.unwrap(), "Sorry, Nothing at this URL.");
    }

    #[tokio::test]
    async fn test_refresh_and_query() {
        let base = spawn_app(vec![
            ("200 OK", page()),
            ("502 Bad Gateway", String::new()),
        ])
        .await;
        let client = make_client().unwrap();
        let query = "{ hours { schedules(names: [\"Marketplace\"]) { name availabilities { isClosed } } } }";

        let res = client.get(format!("{base}/graphql")).query(&[("query", query)]).send().await.unwrap();
        let body: Value = serde_json::from_str(&res.text().await.unwrap()).unwrap();
        assert_eq!(body, json!({ "data": { "hours": { "schedules": [] } } }));

        let res = client.put(format!("{base}/request-refresh")).send().await.unwrap();
        assert_eq!(res.status(), 201);

        let res = client.get(format!("{base}/graphql")).query(&[("query", query)]).send().await.unwrap();
        let body: Value = serde_json::from_str(&res.text().await.unwrap()).unwrap();
        let availabilities = &body["data"]["hours"]["schedules"][0]["availabilities"];
        assert_eq!(body["data"]["hours"]["schedules"][0]["name"], "Marketplace");
        assert_eq!(availabilities.as_array().unwrap().len(), 7);
        assert_eq!(availabilities[6]["isClosed"], true);

        let res = client.put(format!("{base}/request-refresh")).send().await.unwrap();
        assert_eq!(res.status(), 500);
        assert!(res
            .text()
            .await
            .unwrap()
            .starts_with("Sorry, unexpected error: Request error"));
    }
}
