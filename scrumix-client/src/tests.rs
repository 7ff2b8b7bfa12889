use crate::deduplication::DeduplicationConfig;
use crate::models::backlog::{BacklogCreate, BacklogFilter, BacklogStatus};
use crate::models::documentation::SearchRequest;
use crate::test_support::MockTransport;
use crate::{
    ApiClient, ApiResponse, ClientConfig, ErrorKind, InvalidationPolicy, MemoryBadgeStore, Method,
    Mutation, Session, UnreadBadge,
};
use std::sync::Arc;

fn client(transport: Arc<MockTransport>) -> ApiClient {
    let _ = env_logger::builder().is_test(true).try_init();
    ApiClient::with_transport(ClientConfig::default(), transport)
}

#[tokio::test]
async fn test_concurrent_unread_count_issues_one_request() {
    let transport = MockTransport::gated();
    transport.reply(Method::Get, "/notifications/unread-count", 200, r#"{"unread_count":3}"#);
    let client = client(transport.clone());

    let (first, second, _) = tokio::join!(
        client.notifications().unread_count(),
        client.notifications().unread_count(),
        async {
            tokio::task::yield_now().await;
            transport.open();
        },
    );

    assert_eq!(transport.count(Method::Get, "/notifications/unread-count"), 1);
    assert_eq!(first, ApiResponse::success(3));
    assert_eq!(first, second);
    assert_eq!(client.deduplication_stats().pending_requests, 0);
}

#[tokio::test]
async fn test_facade_can_be_reused_across_concurrent_calls() {
    let transport = MockTransport::gated();
    transport.reply(Method::Get, "/notifications/unread-count", 200, r#"{"unread_count":1}"#);
    transport.reply(Method::Get, "/notifications/feed", 200, r#"{"notifications":[],"total":0}"#);
    let client = client(transport.clone());
    let notifications = client.notifications();

    let (count, again, feed, _) = tokio::join!(
        notifications.unread_count(),
        notifications.unread_count(),
        notifications.feed(0, 20),
        async {
            tokio::task::yield_now().await;
            transport.open();
        },
    );

    assert_eq!(count, ApiResponse::success(1));
    assert_eq!(count, again);
    assert!(feed.is_ok());
    assert_eq!(transport.count(Method::Get, "/notifications/unread-count"), 1);
    assert_eq!(transport.count(Method::Get, "/notifications/feed"), 1);
}

#[tokio::test]
async fn test_mark_as_read_invalidates_unread_count() {
    let transport = MockTransport::gated();
    transport.reply(Method::Get, "/notifications/unread-count", 200, r#"{"unread_count":2}"#);
    transport.reply(Method::Post, "/notifications/9/read", 204, "");
    let client = client(transport.clone());

    let background = client.clone();
    let stale = tokio::spawn(async move { background.notifications().unread_count().await });
    tokio::task::yield_now().await;
    assert_eq!(client.deduplication_stats().pending_requests, 1);

    let (marked, _) = tokio::join!(client.notifications().mark_as_read(9), async {
        tokio::task::yield_now().await;
        transport.open();
    });
    assert!(marked.is_ok());

    let fresh = client.notifications().unread_count().await;
    assert_eq!(fresh, ApiResponse::success(2));
    assert_eq!(transport.count(Method::Get, "/notifications/unread-count"), 2);
    assert_eq!(stale.await.unwrap(), ApiResponse::success(2));
}

#[tokio::test]
async fn test_backlog_not_found() {
    let transport = MockTransport::new();
    let client = client(transport.clone());

    let response = client.backlogs().get(42).await;

    assert!(response.data.is_none());
    assert_eq!(response.error(), Some("Not found"));
    assert_eq!(response.error.unwrap().status(), Some(404));
}

#[tokio::test]
async fn test_sprint_delete_no_content() {
    let transport = MockTransport::new();
    transport.reply(Method::Delete, "/sprints/7", 204, "");
    let client = client(transport.clone());

    let response = client.sprints().delete(7).await;

    assert_eq!(response, ApiResponse::empty());
}

#[tokio::test]
async fn test_different_filters_do_not_share_requests() {
    let transport = MockTransport::gated();
    transport.reply(Method::Get, "/backlogs/", 200, "[]");
    let client = client(transport.clone());

    let todo = BacklogFilter {
        status: Some(BacklogStatus::Todo),
        ..Default::default()
    };
    let done = BacklogFilter {
        status: Some(BacklogStatus::Done),
        ..Default::default()
    };
    let (a, b, _) = tokio::join!(
        client.backlogs().list(&todo),
        client.backlogs().list(&done),
        async {
            tokio::task::yield_now().await;
            transport.open();
        },
    );

    assert_eq!(a, ApiResponse::success(vec![]));
    assert_eq!(b, ApiResponse::success(vec![]));
    assert_eq!(transport.count(Method::Get, "/backlogs/"), 2);
}

#[tokio::test]
async fn test_validation_never_reaches_transport() {
    let transport = MockTransport::new();
    let client = client(transport.clone()).for_session(Session::new("session=abc").with_project(3));

    let response = client.backlogs().create(BacklogCreate::new("   ")).await;

    assert_eq!(response.error.unwrap().kind(), ErrorKind::Validation);
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_session_cookie_and_project_are_forwarded() {
    let transport = MockTransport::new();
    transport.reply(
        Method::Post,
        "/backlogs/",
        201,
        r#"{"id":1,"title":"Login page","projectId":3}"#,
    );
    transport.reply(Method::Get, "/backlogs/", 200, "[]");
    let client = client(transport.clone()).for_session(Session::new("session=abc").with_project(3));

    let created = client.backlogs().create(BacklogCreate::new("Login page")).await;
    client.backlogs().list(&BacklogFilter::default()).await;

    assert_eq!(*created.data.unwrap().project_id(), Some(3));
    let requests = transport.requests();
    assert_eq!(requests[0].cookie().as_deref(), Some("session=abc"));
    assert_eq!(requests[0].body().as_ref().unwrap()["project_id"], 3);
    assert_eq!(requests[1].url().query(), Some("project_id=3"));
}

#[tokio::test]
async fn test_sessions_do_not_share_in_flight_reads() {
    let transport = MockTransport::gated();
    transport.reply(Method::Get, "/users/me", 200, r#"{"id":1,"email":"a@example.com"}"#);
    let root = client(transport.clone());
    let alice = root.for_session(Session::new("session=alice"));
    let bob = root.for_session(Session::new("session=bob"));

    let (a, b, _) = tokio::join!(alice.users().current(), bob.users().current(), async {
        tokio::task::yield_now().await;
        transport.open();
    });

    assert!(a.is_ok() && b.is_ok());
    assert_eq!(transport.count(Method::Get, "/users/me"), 2);
}

#[tokio::test]
async fn test_delete_account_drops_every_in_flight_read() {
    let transport = MockTransport::gated();
    transport.reply(Method::Get, "/users/me", 200, r#"{"id":1,"email":"a@example.com"}"#);
    transport.reply(Method::Get, "/notifications/unread-count", 200, r#"{"count":0}"#);
    let client = client(transport.clone());

    let user = {
        let client = client.clone();
        tokio::spawn(async move { client.users().current().await })
    };
    let unread = {
        let client = client.clone();
        tokio::spawn(async move { client.notifications().unread_count().await })
    };
    tokio::task::yield_now().await;
    assert_eq!(client.deduplication_stats().pending_requests, 2);

    let removed =
        InvalidationPolicy::default().apply(Mutation::DeleteAccount, client.deduplicator());
    assert_eq!(removed, 2);
    assert_eq!(client.deduplication_stats().pending_requests, 0);

    transport.open();
    assert!(user.await.unwrap().is_ok());
    assert_eq!(unread.await.unwrap(), ApiResponse::success(0));
}

#[tokio::test(start_paused = true)]
async fn test_search_times_out() {
    let transport = MockTransport::gated();
    let client = client(transport.clone());

    let response = client.documentation().search(SearchRequest::new("release notes")).await;

    assert_eq!(response.error(), Some("Request timed out"));
    assert_eq!(response.error.unwrap().kind(), ErrorKind::Timeout);
    // the only caller gave up, so the request was abandoned
    assert_eq!(client.deduplication_stats().pending_requests, 0);
}

#[tokio::test]
async fn test_search_results() {
    let transport = MockTransport::new();
    transport.reply(
        Method::Post,
        "/semantic-search/search",
        200,
        r#"{"results":[{"id":5,"title":"Definition of done","similarity_score":0.91}],
            "totalResults":1}"#,
    );
    let client = client(transport.clone()).for_session(Session::default().with_project(8));

    let response = client.documentation().search(SearchRequest::new("done")).await;

    let results = response.data.unwrap();
    assert_eq!(*results.total_results(), 1);
    assert_eq!(results.results()[0].title(), "Definition of done");
    let body = transport.requests()[0].body().clone().unwrap();
    assert_eq!(body["project_id"], 8);
    assert_eq!(body["search_type"], "hybrid");
}

#[tokio::test]
async fn test_transport_failure_becomes_envelope() {
    let transport = MockTransport::new();
    transport.fail(Method::Get, "/users/me", "connection refused");
    let client = client(transport.clone());

    let response = client.users().current().await;

    assert!(response.data.is_none());
    assert_eq!(response.error(), Some("connection refused"));
    assert_eq!(response.error.unwrap().kind(), ErrorKind::Transport);
}

#[tokio::test]
async fn test_disabled_deduplication() {
    let transport = MockTransport::gated();
    transport.reply(Method::Get, "/notifications/unread-count", 200, r#"{"unread_count":1}"#);
    let config = ClientConfig::default().with_deduplication(DeduplicationConfig { enabled: false });
    let client = ApiClient::with_transport(config, transport.clone());

    tokio::join!(
        client.notifications().unread_count(),
        client.notifications().unread_count(),
        async {
            tokio::task::yield_now().await;
            transport.open();
        },
    );

    assert_eq!(transport.count(Method::Get, "/notifications/unread-count"), 2);
}

#[tokio::test]
async fn test_badge_keeps_count_through_failures() {
    let transport = MockTransport::new();
    transport.reply(Method::Get, "/notifications/unread-count", 200, r#"{"unread_count":4}"#);
    transport.reply(Method::Post, "/notifications/2/read", 204, "");
    let client = client(transport.clone());
    let badge = UnreadBadge::new(Arc::new(MemoryBadgeStore::default()));

    assert_eq!(badge.refresh(&client).await, 4);

    transport.reply(Method::Get, "/notifications/unread-count", 500, "oops");
    assert_eq!(badge.refresh(&client).await, 4);

    transport.reply(Method::Get, "/notifications/unread-count", 200, r#"{"unreadCount":3}"#);
    assert!(badge.mark_read(&client, 2).await.is_ok());
    assert_eq!(badge.count(), 3);
}
