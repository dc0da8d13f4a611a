use std::time::Duration;

use chrono::{TimeZone, Utc};

use content_stream::contract::{MockContentGateway, MockUpdateFeed, Subscription};
use content_stream::feed::ChannelFeed;
use content_stream::model::{ContentItem, Filter};
use content_stream::page::{HomeSession, LoadIndicator, ProductPage};
use content_stream::reconcile::Phase;

fn item(id: &str, minutes: i64, title: &str, category: Option<&str>) -> ContentItem {
    ContentItem {
        id: id.to_string(),
        created_at: Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap()
            + chrono::Duration::minutes(minutes),
        title: title.to_string(),
        slug: None,
        excerpt: None,
        category: category.map(str::to_string),
    }
}

/// Pump the session until the view holds `expected` items or a timeout
/// elapses; returns all collected notices. Feed delivery crosses a task
/// boundary, so give it a moment.
async fn pump_until<G, F>(
    session: &mut HomeSession<G, F>,
    expected: usize,
) -> Vec<content_stream::page::FeedNotice>
where
    G: content_stream::contract::ContentGateway,
    F: content_stream::contract::UpdateFeed,
{
    let mut notices = Vec::new();
    for _ in 0..200 {
        notices.extend(session.pump_feed());
        if session.view().items().len() >= expected {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    notices
}

#[tokio::test]
async fn failed_initial_load_degrades_and_never_subscribes() {
    let mut gateway = MockContentGateway::new();
    gateway
        .expect_list_categories()
        .times(1)
        .returning(|| Err("gateway unreachable".into()));
    gateway.expect_list_content().times(0);

    let mut feed = MockUpdateFeed::new();
    feed.expect_subscribe().times(0);

    let mut session = HomeSession::new(gateway, feed);
    session.initial_load().await;

    let render = session.render();
    assert!(render.blocking_error.is_some(), "Blocking error expected");
    assert!(!render.filters_enabled, "Filter controls must be inert");
    assert_eq!(session.view().phase(), Phase::Degraded);

    // A filter change after degradation must not hit the gateway either.
    session.set_filter(Filter::new("tech", "")).await;
    assert_eq!(session.view().phase(), Phase::Degraded);
}

#[tokio::test]
async fn search_with_no_matches_is_empty_but_not_an_error() {
    let mut gateway = MockContentGateway::new();
    gateway
        .expect_list_categories()
        .times(1)
        .returning(|| Ok(vec!["all".to_string(), "Technology".to_string()]));
    gateway.expect_list_content().returning(|filter: &Filter| {
        if filter.search_term.is_empty() {
            Ok(vec![item("a", 0, "A", None), item("b", 1, "B", None)])
        } else {
            Ok(Vec::new())
        }
    });
    let mut feed = MockUpdateFeed::new();
    feed.expect_subscribe().returning(|_| Subscription::inert());

    let mut session = HomeSession::new(gateway, feed);
    session.initial_load().await;
    assert_eq!(session.view().items().len(), 2);

    session.set_filter(Filter::new("all", "zzz")).await;

    let render = session.render();
    assert!(render.items.is_empty());
    assert!(render.no_content, "No-content state expected");
    assert!(render.blocking_error.is_none());
    assert!(render.inline_error.is_none());
    assert_eq!(render.indicator, LoadIndicator::None);
}

#[tokio::test]
async fn feed_items_are_admitted_per_filter_and_noticed_once() {
    let mut gateway = MockContentGateway::new();
    gateway
        .expect_list_categories()
        .returning(|| Ok(vec!["all".to_string(), "tech".to_string()]));
    gateway
        .expect_list_content()
        .returning(|_: &Filter| Ok(Vec::new()));

    let feed = ChannelFeed::new();
    let mut session = HomeSession::new(gateway, feed.clone());
    session.initial_load().await;
    session.set_filter(Filter::new("tech", "")).await;

    // Three arrivals: two matching the active filter, one not.
    feed.publish(item("first", 1, "First tech post", Some("tech")));
    feed.publish(item("offtopic", 2, "Gardening", Some("lifestyle")));
    feed.publish(item("second", 3, "Second tech post", Some("Tech")));

    let notices = pump_until(&mut session, 2).await;

    let titles: Vec<&str> = session
        .view()
        .items()
        .iter()
        .map(|i| i.title.as_str())
        .collect();
    assert_eq!(
        titles,
        vec!["Second tech post", "First tech post"],
        "Exactly the matching items, newest first"
    );
    assert_eq!(notices.len(), 2, "One notice per admitted item");

    // Redelivery does not change the view and raises no further notice.
    feed.publish(item("first", 1, "First tech post", Some("tech")));
    tokio::time::sleep(Duration::from_millis(50)).await;
    let extra = session.pump_feed();
    assert!(extra.is_empty(), "No notice for duplicates");
    assert_eq!(session.view().items().len(), 2);

    session.close();
}

#[tokio::test]
async fn filter_change_tears_down_and_resubscribes() {
    let mut gateway = MockContentGateway::new();
    gateway
        .expect_list_categories()
        .returning(|| Ok(vec!["all".to_string()]));
    gateway
        .expect_list_content()
        .times(2)
        .returning(|_: &Filter| Ok(Vec::new()));

    let mut feed = MockUpdateFeed::new();
    // Once after the initial load, once after the filter change.
    feed.expect_subscribe()
        .times(2)
        .returning(|_| Subscription::inert());

    let mut session = HomeSession::new(gateway, feed);
    session.initial_load().await;
    session.set_filter(Filter::new("all", "rust")).await;
}

#[tokio::test]
async fn failed_refresh_keeps_items_and_surfaces_inline_error() {
    let mut gateway = MockContentGateway::new();
    gateway
        .expect_list_categories()
        .returning(|| Ok(vec!["all".to_string()]));
    gateway.expect_list_content().returning(|filter: &Filter| {
        if filter.search_term.is_empty() {
            Ok(vec![item("a", 0, "A", None)])
        } else {
            Err("backend flaked".into())
        }
    });
    let mut feed = MockUpdateFeed::new();
    feed.expect_subscribe().returning(|_| Subscription::inert());

    let mut session = HomeSession::new(gateway, feed);
    session.initial_load().await;
    session.set_filter(Filter::new("all", "anything")).await;

    let render = session.render();
    assert_eq!(render.items.len(), 1, "Last good list preserved");
    assert!(render.inline_error.is_some());
    assert!(render.blocking_error.is_none());
    assert!(render.filters_enabled);
}

#[tokio::test]
async fn product_page_distinguishes_found_from_not_found() {
    let mut gateway = MockContentGateway::new();
    gateway
        .expect_get_product_by_slug()
        .returning(|slug: &str| {
            if slug == "aurora-lamp" {
                Ok(Some(content_stream::model::Product {
                    id: "p1".to_string(),
                    created_at: Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap(),
                    name: "Aurora Lamp".to_string(),
                    slug: content_stream::model::Slug::new("aurora-lamp"),
                    description: Some("A lamp.".to_string()),
                    details: None,
                    price: Some(49.5),
                    category: Some("home".to_string()),
                    buy_now_url: None,
                }))
            } else {
                Ok(None)
            }
        });

    let found = content_stream::page::product_page(&gateway, "aurora-lamp")
        .await
        .expect("Gateway is healthy");
    assert!(matches!(found, ProductPage::Found(p) if p.name == "Aurora Lamp"));

    let missing = content_stream::page::product_page(&gateway, "no-such-slug")
        .await
        .expect("Absence is not an error");
    assert_eq!(
        missing,
        ProductPage::NotFound {
            slug: "no-such-slug".to_string()
        }
    );
}
