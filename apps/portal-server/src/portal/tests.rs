use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use actix_web::ResponseError;
use actix_web::http::StatusCode;
use async_trait::async_trait;
use serde_json::{Map, Value, json};

use academy_core::access::{ANONYMOUS_MEMBER, AccessGate};
use academy_core::domain::{DEFAULT_AUTHOR, PostDraft, ProjectDraft, Role};
use academy_core::error::{DomainError, StoreError};
use academy_core::listing::{ListQuery, PostSort, SortMode};
use academy_core::ports::{
    AuthError, DocumentStore, PasswordService, SnapshotHandler, SubscriptionId,
};
use academy_core::reconcile::{Vote, VoteDirection};
use academy_infra::InMemoryDocumentStore;
use academy_infra::UnavailableAssistant;
use academy_infra::assistant::NO_KEY_MESSAGE;

use super::PortalService;
use crate::middleware::error::AppError;

struct PlainPasswords;

impl PasswordService for PlainPasswords {
    fn hash(&self, code: &str) -> Result<String, AuthError> {
        Ok(format!("plain:{code}"))
    }

    fn verify(&self, code: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(hash == format!("plain:{code}"))
    }
}

fn seeded_store() -> Arc<InMemoryDocumentStore> {
    Arc::new(InMemoryDocumentStore::with_data(json!({
        "projects": {
            "-garden": {
                "title": "Smart Garden",
                "description": "Soil moisture monitoring",
                "category": "IoT",
                "difficulty": "Beginner",
                "views": 100,
                "likes": 10,
                "publishedAt": "2024-01-10",
                "comments": {
                    "-c1": {"author": "Ben", "text": "Nice", "likes": 2}
                }
            },
            "-rover": {
                "title": "Mars Rover",
                "description": "Six wheels",
                "category": "Robotics",
                "difficulty": "Advanced",
                "views": 500,
                "likes": 3,
                "publishedAt": "2024-03-01"
            }
        },
        "communityPosts": {
            "-p1": {"title": "My bot", "description": "Built it", "author": "Ana", "likes": 3},
            "-p2": {"title": "Lamp", "description": "Glows", "author": "Ben", "likes": -1}
        }
    })))
}

/// Delays its first `update` so later writes are issued while it is in flight.
struct SlowFirstUpdate {
    inner: Arc<InMemoryDocumentStore>,
    delayed: AtomicBool,
}

#[async_trait]
impl DocumentStore for SlowFirstUpdate {
    async fn get(&self, path: &str) -> Result<Value, StoreError> {
        self.inner.get(path).await
    }

    async fn set(&self, path: &str, value: Value) -> Result<(), StoreError> {
        self.inner.set(path, value).await
    }

    async fn update(&self, path: &str, fields: Map<String, Value>) -> Result<(), StoreError> {
        if !self.delayed.swap(true, Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        self.inner.update(path, fields).await
    }

    async fn push(&self, path: &str, value: Value) -> Result<String, StoreError> {
        self.inner.push(path, value).await
    }

    async fn remove(&self, path: &str) -> Result<(), StoreError> {
        self.inner.remove(path).await
    }

    async fn subscribe(
        &self,
        path: &str,
        handler: SnapshotHandler,
    ) -> Result<SubscriptionId, StoreError> {
        self.inner.subscribe(path, handler).await
    }

    async fn unsubscribe(&self, id: SubscriptionId) -> Result<(), StoreError> {
        self.inner.unsubscribe(id).await
    }
}

/// Serves reads and subscriptions but refuses every write.
struct ReadOnlyStore(Arc<InMemoryDocumentStore>);

fn refused() -> StoreError {
    StoreError::Request("permission denied".into())
}

#[async_trait]
impl DocumentStore for ReadOnlyStore {
    async fn get(&self, path: &str) -> Result<Value, StoreError> {
        self.0.get(path).await
    }

    async fn set(&self, _path: &str, _value: Value) -> Result<(), StoreError> {
        Err(refused())
    }

    async fn update(&self, _path: &str, _fields: Map<String, Value>) -> Result<(), StoreError> {
        Err(refused())
    }

    async fn push(&self, _path: &str, _value: Value) -> Result<String, StoreError> {
        Err(refused())
    }

    async fn remove(&self, _path: &str) -> Result<(), StoreError> {
        Err(refused())
    }

    async fn subscribe(
        &self,
        path: &str,
        handler: SnapshotHandler,
    ) -> Result<SubscriptionId, StoreError> {
        self.0.subscribe(path, handler).await
    }

    async fn unsubscribe(&self, id: SubscriptionId) -> Result<(), StoreError> {
        self.0.unsubscribe(id).await
    }
}

async fn portal_with(store: Arc<dyn DocumentStore>) -> PortalService {
    let gate = AccessGate::new(
        "admin",
        "plain:root-key",
        "plain:stem-2024",
        Arc::new(PlainPasswords),
    );
    let portal = PortalService::new(store, gate, Arc::new(UnavailableAssistant));
    portal.start().await.unwrap();
    portal
}

async fn wait_for_store(store: &InMemoryDocumentStore, path: &str, expected: Value) {
    for _ in 0..100 {
        if store.get(path).await.unwrap() == expected {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("{path} never became {expected}");
}

#[tokio::test]
async fn test_login_roles_and_logout() {
    let portal = portal_with(seeded_store()).await;

    let (_, admin) = portal.login("admin", "root-key", None).await.unwrap();
    assert_eq!(admin.role, Role::Admin);

    let (sid, member) = portal.login("", "stem-2024", Some("Robot-9")).await.unwrap();
    assert_eq!(member.role, Role::User);
    assert_eq!(member.username, ANONYMOUS_MEMBER);

    assert!(matches!(
        portal.login("admin", "nope", None).await,
        Err(DomainError::InvalidCredentials)
    ));

    portal.logout(sid).await.unwrap();
    assert!(matches!(portal.user(sid).await, Err(DomainError::Unauthorized)));
    assert!(matches!(portal.logout(sid).await, Err(DomainError::Unauthorized)));
}

#[tokio::test]
async fn test_empty_store_shows_sample_catalog() {
    let portal = portal_with(Arc::new(InMemoryDocumentStore::new())).await;
    let (sid, _) = portal.login("Ana", "stem-2024", None).await.unwrap();

    let cards = portal.list(sid, &ListQuery::default()).await.unwrap();
    let ids: Vec<&str> = cards.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "1", "3"]);

    let err = portal.add_comment(sid, "1", "hello").await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let (admin, _) = portal.login("admin", "root-key", None).await.unwrap();
    let err = portal.delete_project(admin, "2").await.unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
    assert_eq!(portal.list(admin, &ListQuery::default()).await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_list_applies_query() {
    let portal = portal_with(seeded_store()).await;
    let (sid, _) = portal.login("Ana", "stem-2024", None).await.unwrap();

    let trending = portal.list(sid, &ListQuery::default()).await.unwrap();
    assert_eq!(trending[0].id, "-rover");

    let liked = ListQuery {
        sort: SortMode::MostLiked,
        ..Default::default()
    };
    assert_eq!(portal.list(sid, &liked).await.unwrap()[0].id, "-garden");

    let search = ListQuery::from_selectors(Some("WHEELS"), None, None, None).unwrap();
    let found = portal.list(sid, &search).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "Mars Rover");
}

#[tokio::test]
async fn test_like_toggle_writes_counter() {
    let store = seeded_store();
    let portal = portal_with(store.clone()).await;
    let (sid, _) = portal.login("Ana", "stem-2024", None).await.unwrap();

    let liked = portal.toggle_like(sid, "-garden").await.unwrap();
    assert_eq!((liked.likes, liked.liked), (11, true));
    let card = portal
        .list(sid, &ListQuery::default())
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.id == "-garden")
        .unwrap();
    assert!(card.is_liked_by_user);
    assert_eq!(card.likes, 11);
    wait_for_store(&store, "projects/-garden/likes", json!(11)).await;

    let unliked = portal.toggle_like(sid, "-garden").await.unwrap();
    assert_eq!((unliked.likes, unliked.liked), (10, false));
    wait_for_store(&store, "projects/-garden/likes", json!(10)).await;
}

#[tokio::test]
async fn test_like_flags_are_per_session() {
    let portal = portal_with(seeded_store()).await;
    let (ana, _) = portal.login("Ana", "stem-2024", None).await.unwrap();
    let (ben, _) = portal.login("Ben", "stem-2024", None).await.unwrap();

    portal.toggle_like(ana, "-rover").await.unwrap();
    let seen_by_ben = portal.open(ben, "-rover").await.unwrap();
    assert!(!seen_by_ben.card.is_liked_by_user);
    assert_eq!(seen_by_ben.card.likes, 4);
}

#[tokio::test]
async fn test_remote_change_clears_like_flag() {
    let store = seeded_store();
    let portal = portal_with(store.clone()).await;
    let (sid, _) = portal.login("Ana", "stem-2024", None).await.unwrap();

    portal.toggle_like(sid, "-garden").await.unwrap();
    wait_for_store(&store, "projects/-garden/likes", json!(11)).await;

    store.set("projects/-garden/likes", json!(50)).await.unwrap();
    for _ in 0..100 {
        let cards = portal.list(sid, &ListQuery::default()).await.unwrap();
        let card = cards.iter().find(|c| c.id == "-garden").unwrap();
        if card.likes == 50 {
            assert!(!card.is_liked_by_user);
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("remote like count never arrived");
}

#[tokio::test]
async fn test_open_counts_a_view() {
    let store = seeded_store();
    let portal = portal_with(store.clone()).await;
    let (sid, _) = portal.login("Ana", "stem-2024", None).await.unwrap();

    let detail = portal.open(sid, "-garden").await.unwrap();
    assert_eq!(detail.card.views, 101);
    assert_eq!(detail.comments.len(), 1);
    assert_eq!(detail.comments[0].id, "-c1");
    wait_for_store(&store, "projects/-garden/views", json!(101)).await;

    assert!(matches!(
        portal.open(sid, "-missing").await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_project_management_is_admin_only() {
    let portal = portal_with(seeded_store()).await;
    let (member, _) = portal.login("Ana", "stem-2024", None).await.unwrap();
    let (admin, _) = portal.login("admin", "root-key", None).await.unwrap();

    let draft = ProjectDraft {
        title: "Weather Station".into(),
        ..Default::default()
    };
    assert!(matches!(
        portal.create_project(member, draft.clone()).await,
        Err(DomainError::Forbidden(_))
    ));
    assert!(matches!(
        portal.delete_project(member, "-garden").await,
        Err(DomainError::Forbidden(_))
    ));

    let created = portal.create_project(admin, draft).await.unwrap();
    assert_eq!(created.author, DEFAULT_AUTHOR);
    assert_eq!(created.views, 0);

    let cards = portal.list(member, &ListQuery::default()).await.unwrap();
    let card = cards.iter().find(|c| c.id == created.id).unwrap();
    assert_eq!(card.title, "Weather Station");
}

#[tokio::test]
async fn test_edit_keeps_counters_and_comments() {
    let store = seeded_store();
    let portal = portal_with(store.clone()).await;
    let (admin, _) = portal.login("admin", "root-key", None).await.unwrap();

    let draft = ProjectDraft {
        title: "Smarter Garden".into(),
        description: "Now with pumps".into(),
        ..Default::default()
    };
    let revised = portal.edit_project(admin, "-garden", draft).await.unwrap();
    assert_eq!(revised.title, "Smarter Garden");
    assert_eq!((revised.views, revised.likes), (100, 10));
    assert_eq!(revised.published_at, "2024-01-10");
    assert_eq!(revised.comments.len(), 1);

    assert_eq!(
        store.get("projects/-garden/comments/-c1/author").await.unwrap(),
        json!("Ben")
    );

    portal.delete_project(admin, "-garden").await.unwrap();
    assert_eq!(store.get("projects/-garden").await.unwrap(), Value::Null);
    let cards = portal.list(admin, &ListQuery::default()).await.unwrap();
    assert_eq!(cards.len(), 1);
}

#[tokio::test]
async fn test_comments_and_comment_likes() {
    let portal = portal_with(seeded_store()).await;
    let (sid, _) = portal.login("Ana", "stem-2024", None).await.unwrap();

    assert!(matches!(
        portal.add_comment(sid, "-rover", "   ").await,
        Err(DomainError::Validation(_))
    ));

    let comment = portal.add_comment(sid, "-rover", "Love it").await.unwrap();
    assert_eq!(comment.author, "Ana");
    assert_eq!(comment.timestamp, "Just now");

    let detail = portal.open(sid, "-rover").await.unwrap();
    assert_eq!(detail.comments.len(), 1);
    assert_eq!(detail.comments[0].text, "Love it");

    let liked = portal
        .toggle_comment_like(sid, "-garden", "-c1")
        .await
        .unwrap();
    assert_eq!((liked.likes, liked.is_liked_by_user), (3, true));
    let unliked = portal
        .toggle_comment_like(sid, "-garden", "-c1")
        .await
        .unwrap();
    assert_eq!((unliked.likes, unliked.is_liked_by_user), (2, false));
}

#[tokio::test]
async fn test_board_sorting_and_stats() {
    let portal = portal_with(seeded_store()).await;
    let (sid, _) = portal.login("Ana", "stem-2024", None).await.unwrap();

    let board = portal.board(sid, PostSort::LeastLikes).await.unwrap();
    assert_eq!(board.sort, "LEAST LIKES");
    assert_eq!(board.stats.post_count, 2);
    assert_eq!(board.stats.total_votes, 2);
    assert_eq!(board.posts[0].post.id, "-p2");
    assert_eq!(board.posts[0].vote_label, "-1");
}

#[tokio::test]
async fn test_vote_protocol_against_store() {
    let store = seeded_store();
    let portal = portal_with(store.clone()).await;
    let (sid, _) = portal.login("Cara", "stem-2024", None).await.unwrap();

    let up = portal.vote(sid, "-p1", VoteDirection::Up).await.unwrap();
    assert_eq!((up.likes, up.vote), (4, Vote::Up));
    wait_for_store(&store, "communityPosts/-p1/likes", json!(4)).await;

    let repeat = portal.vote(sid, "-p1", VoteDirection::Up).await.unwrap();
    assert_eq!((repeat.likes, repeat.vote), (4, Vote::Up));

    let down = portal.vote(sid, "-p1", VoteDirection::Down).await.unwrap();
    assert_eq!((down.likes, down.vote), (2, Vote::Down));
    wait_for_store(&store, "communityPosts/-p1/likes", json!(2)).await;

    let board = portal.board(sid, PostSort::Best).await.unwrap();
    let view = board.posts.iter().find(|p| p.post.id == "-p1").unwrap();
    assert_eq!(view.current_vote, -1);
}

#[tokio::test]
async fn test_counter_writes_reach_store_in_order() {
    let store = seeded_store();
    let portal = portal_with(Arc::new(SlowFirstUpdate {
        inner: store.clone(),
        delayed: AtomicBool::new(false),
    }))
    .await;
    let (sid, _) = portal.login("Cara", "stem-2024", None).await.unwrap();

    let up = portal.vote(sid, "-p1", VoteDirection::Up).await.unwrap();
    assert_eq!(up.likes, 4);
    let down = portal.vote(sid, "-p1", VoteDirection::Down).await.unwrap();
    assert_eq!((down.likes, down.vote), (2, Vote::Down));

    wait_for_store(&store, "communityPosts/-p1/likes", json!(2)).await;
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(store.get("communityPosts/-p1/likes").await.unwrap(), json!(2));

    let board = portal.board(sid, PostSort::Best).await.unwrap();
    let view = board.posts.iter().find(|p| p.post.id == "-p1").unwrap();
    assert_eq!((view.post.likes, view.current_vote), (2, -1));
}

#[tokio::test]
async fn test_failed_counter_writes_keep_local_result() {
    let portal = portal_with(Arc::new(ReadOnlyStore(seeded_store()))).await;
    let (sid, _) = portal.login("Ana", "stem-2024", None).await.unwrap();

    let liked = portal.toggle_like(sid, "-garden").await.unwrap();
    assert_eq!((liked.likes, liked.liked), (11, true));
    let up = portal.vote(sid, "-p2", VoteDirection::Up).await.unwrap();
    assert_eq!((up.likes, up.vote), (0, Vote::Up));
    tokio::time::sleep(Duration::from_millis(50)).await;

    let cards = portal.list(sid, &ListQuery::default()).await.unwrap();
    let garden = cards.iter().find(|c| c.id == "-garden").unwrap();
    assert_eq!((garden.likes, garden.is_liked_by_user), (11, true));

    let board = portal.board(sid, PostSort::Best).await.unwrap();
    let view = board.posts.iter().find(|p| p.post.id == "-p2").unwrap();
    assert_eq!((view.post.likes, view.current_vote), (0, 1));
}

#[tokio::test]
async fn test_failed_content_writes_surface_as_server_errors() {
    let portal = portal_with(Arc::new(ReadOnlyStore(seeded_store()))).await;
    let (admin, _) = portal.login("admin", "root-key", None).await.unwrap();

    let draft = ProjectDraft {
        title: "Weather Station".into(),
        description: "Logs rain".into(),
        ..Default::default()
    };
    let failures = [
        portal.create_project(admin, draft.clone()).await.unwrap_err(),
        portal.edit_project(admin, "-garden", draft).await.unwrap_err(),
        portal.delete_project(admin, "-rover").await.unwrap_err(),
    ];
    for err in failures {
        assert!(matches!(err, DomainError::Internal(_)));
        assert_eq!(AppError::from(err).status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    let cards = portal.list(admin, &ListQuery::default()).await.unwrap();
    let mut titles: Vec<&str> = cards.iter().map(|c| c.title.as_str()).collect();
    titles.sort();
    assert_eq!(titles, vec!["Mars Rover", "Smart Garden"]);
}

#[tokio::test]
async fn test_edit_keeps_array_comments_apart() {
    let store = seeded_store();
    store
        .set(
            "projects/-rover/comments",
            json!([{"author": "A", "text": "one"}, {"author": "B", "text": "two"}]),
        )
        .await
        .unwrap();
    let portal = portal_with(store.clone()).await;
    let (admin, _) = portal.login("admin", "root-key", None).await.unwrap();

    let draft = ProjectDraft {
        title: "Mars Rover II".into(),
        description: "Eight wheels".into(),
        ..Default::default()
    };
    let revised = portal.edit_project(admin, "-rover", draft).await.unwrap();
    assert_eq!(revised.comments.len(), 2);

    let stored = store.get("projects/-rover/comments").await.unwrap();
    assert_eq!(stored["0"]["text"], json!("one"));
    assert_eq!(stored["1"]["text"], json!("two"));
}

#[tokio::test]
async fn test_post_lifecycle_and_ownership() {
    let store = seeded_store();
    let portal = portal_with(store.clone()).await;
    let (ana, ana_user) = portal.login("Ana", "stem-2024", None).await.unwrap();
    let (ben, _) = portal.login("Ben", "stem-2024", None).await.unwrap();
    let (admin, _) = portal.login("admin", "root-key", None).await.unwrap();

    let blank = PostDraft {
        title: "".into(),
        description: "x".into(),
        image_url: None,
        category: "IoT".into(),
    };
    assert!(matches!(
        portal.create_post(ana, blank).await,
        Err(DomainError::Validation(_))
    ));

    let draft = PostDraft {
        title: "Robot arm".into(),
        description: "Servo driven".into(),
        image_url: Some("https://img.example/arm.png".into()),
        category: "Robotics".into(),
    };
    let post = portal.create_post(ana, draft.clone()).await.unwrap();
    assert_eq!(post.likes, 0);
    assert_eq!(post.comments_count, 0);
    assert_eq!(post.author_avatar.as_deref(), Some(ana_user.avatar_seed.as_str()));

    let edited = PostDraft {
        title: "Robot arm v2".into(),
        image_url: None,
        ..draft
    };
    assert!(matches!(
        portal.edit_post(ben, &post.id, edited.clone()).await,
        Err(DomainError::Forbidden(_))
    ));
    portal.edit_post(ana, &post.id, edited).await.unwrap();
    let stored = store.get(&format!("communityPosts/{}", post.id)).await.unwrap();
    assert_eq!(stored["title"], json!("Robot arm v2"));
    assert_eq!(stored["author"], json!("Ana"));
    assert!(stored.get("imageUrl").is_none());

    portal.delete_post(admin, &post.id).await.unwrap();
    let board = portal.board(ana, PostSort::Best).await.unwrap();
    assert_eq!(board.stats.post_count, 2);
}

#[tokio::test]
async fn test_explain_without_key() {
    let portal = portal_with(seeded_store()).await;
    let (sid, _) = portal.login("Ana", "stem-2024", None).await.unwrap();

    assert_eq!(
        portal.explain(sid, "PWM", "Smart Garden").await.unwrap(),
        NO_KEY_MESSAGE
    );
    assert!(matches!(
        portal.explain(sid, " ", "").await,
        Err(DomainError::Validation(_))
    ));
}

#[tokio::test]
async fn test_shutdown_stops_mirroring() {
    let store = seeded_store();
    let portal = portal_with(store.clone()).await;
    let (sid, _) = portal.login("Ana", "stem-2024", None).await.unwrap();

    portal.shutdown().await;
    store.remove("projects/-rover").await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    let cards = portal.list(sid, &ListQuery::default()).await.unwrap();
    assert_eq!(cards.len(), 2);
}
