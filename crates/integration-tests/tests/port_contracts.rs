//! Behaviour every storage adapter must share.
//!
//! Each contract runs against `InMemoryStore`; with the `db-postgres` feature
//! the same contracts also run against `PgStore` on a throwaway container.

use chrono::Utc;
use domains::{
    AdminAccount, AdminRepository, Blocklist, BlocklistRepository, Comment, DomainError, NewPost,
    Post, PostLookup, PostRepository,
};
use uuid::Uuid;

fn post(title: &str, legacy_id: Option<&str>, visible: bool) -> Post {
    Post::create(
        NewPost {
            title: title.to_string(),
            body: String::new(),
            legacy_id: legacy_id.map(str::to_string),
            visible,
            comments_allowed: true,
        },
        Utc::now(),
    )
    .unwrap()
}

fn texts(comments: &[Comment]) -> Vec<String> {
    comments.iter().map(|c| c.text.clone()).collect()
}

fn comment(text: &str) -> Comment {
    Comment::new(text, Utc::now())
}

async fn finds_posts_by_either_identifier<S: PostRepository>(store: &S) {
    let welcome = post("Welcome", Some("legacy-1"), true);
    store.insert(&welcome).await.unwrap();

    let by_native = store.find(&PostLookup::from(welcome.id)).await.unwrap();
    let by_simple = store
        .find(&PostLookup::parse(&welcome.id.simple().to_string()))
        .await
        .unwrap();
    let by_legacy = store.find(&PostLookup::parse("legacy-1")).await.unwrap();

    assert_eq!(by_native.map(|p| p.id), Some(welcome.id));
    assert_eq!(by_simple.map(|p| p.id), Some(welcome.id));
    assert_eq!(by_legacy.map(|p| p.id), Some(welcome.id));
    assert!(store.find(&PostLookup::parse("nope")).await.unwrap().is_none());
}

async fn native_match_wins_over_a_legacy_match<S: PostRepository>(store: &S) {
    let native = post("Native", None, true);
    let shadow = post("Shadow", Some(&native.id.to_string()), true);
    store.insert(&shadow).await.unwrap();
    store.insert(&native).await.unwrap();

    let found = store
        .find(&PostLookup::parse(&native.id.to_string()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, native.id);
}

async fn duplicate_legacy_id_is_a_conflict<S: PostRepository>(store: &S) {
    store.insert(&post("First", Some("dup"), true)).await.unwrap();
    let err = store
        .insert(&post("Second", Some("dup"), true))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)), "{err:?}");
}

async fn appends_accumulate_in_order<S: PostRepository>(store: &S) {
    let target = post("Target", None, true);
    store.insert(&target).await.unwrap();

    store.append_comment(target.id, &comment("A")).await.unwrap();
    let returned = store.append_comment(target.id, &comment("B")).await.unwrap();
    assert_eq!(texts(&returned), ["A", "B"]);

    let stored = store.find(&PostLookup::from(target.id)).await.unwrap().unwrap();
    assert_eq!(texts(&stored.comments), ["A", "B"]);

    let err = store
        .append_comment(Uuid::new_v4(), &comment("C"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }), "{err:?}");
}

async fn replace_overwrites_the_sequence<S: PostRepository>(store: &S) {
    let target = post("Target", None, true);
    store.insert(&target).await.unwrap();
    for text in ["A", "B", "C"] {
        store.append_comment(target.id, &comment(text)).await.unwrap();
    }

    let returned = store
        .replace_comments(target.id, &[comment("A"), comment("C")])
        .await
        .unwrap();
    assert_eq!(texts(&returned), ["A", "C"]);

    let stored = store.find(&PostLookup::from(target.id)).await.unwrap().unwrap();
    assert_eq!(texts(&stored.comments), ["A", "C"]);

    let emptied = store.replace_comments(target.id, &[]).await.unwrap();
    assert!(emptied.is_empty());

    let err = store
        .replace_comments(Uuid::new_v4(), &[])
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }), "{err:?}");
}

async fn update_keeps_comments_and_delete_reports_presence<S: PostRepository>(store: &S) {
    let mut target = post("Before", None, true);
    store.insert(&target).await.unwrap();
    store.append_comment(target.id, &comment("kept")).await.unwrap();

    target.title = "After".to_string();
    target.comments_allowed = false;
    store.update(&target).await.unwrap();

    let stored = store.find(&PostLookup::from(target.id)).await.unwrap().unwrap();
    assert_eq!(stored.title, "After");
    assert!(!stored.comments_allowed);
    assert_eq!(texts(&stored.comments), ["kept"]);

    let missing = post("Missing", None, true);
    let err = store.update(&missing).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { .. }), "{err:?}");

    assert!(store.delete(target.id).await.unwrap());
    assert!(!store.delete(target.id).await.unwrap());
    assert!(store.find(&PostLookup::from(target.id)).await.unwrap().is_none());
}

async fn listing_filters_hidden_posts<S: PostRepository>(store: &S) {
    let shown = post("Shown", None, true);
    let hidden = post("Hidden", None, false);
    store.insert(&shown).await.unwrap();
    store.insert(&hidden).await.unwrap();

    let public: Vec<Uuid> = store.list(false).await.unwrap().iter().map(|p| p.id).collect();
    assert_eq!(public, [shown.id]);
    assert_eq!(store.list(true).await.unwrap().len(), 2);
}

async fn blocklist_round_trips<S: BlocklistRepository>(store: &S) {
    assert!(store.load().await.unwrap().is_empty());

    store
        .save(&Blocklist::new(["kelime", "spam"]))
        .await
        .unwrap();
    assert_eq!(store.load().await.unwrap().terms(), ["kelime", "spam"]);

    store.save(&Blocklist::new(["spam"])).await.unwrap();
    assert_eq!(store.load().await.unwrap().terms(), ["spam"]);
}

async fn admin_upsert_keeps_the_first_id<S: AdminRepository>(store: &S) {
    assert!(store.find_admin().await.unwrap().is_none());

    let first = AdminAccount {
        id: Uuid::new_v4(),
        username: "admin".to_string(),
        password_hash: "$argon2id$first".to_string(),
    };
    store.upsert_admin(&first).await.unwrap();

    let second = AdminAccount {
        id: Uuid::new_v4(),
        username: "editor".to_string(),
        password_hash: "$argon2id$second".to_string(),
    };
    store.upsert_admin(&second).await.unwrap();

    let stored = store.find_admin().await.unwrap().unwrap();
    assert_eq!(stored.id, first.id);
    assert_eq!(stored.username, "editor");
    assert_eq!(stored.password_hash, "$argon2id$second");
}

/// One `#[tokio::test]` per contract, each on a fresh store from `fixture()`.
macro_rules! contract_tests {
    ($($contract:ident),* $(,)?) => {
        $(
            #[tokio::test]
            async fn $contract() {
                let (_guard, store) = fixture().await;
                super::$contract(&store).await;
            }
        )*
    };
}

mod memory {
    use storage_adapters::InMemoryStore;

    async fn fixture() -> ((), InMemoryStore) {
        ((), InMemoryStore::new())
    }

    contract_tests!(
        finds_posts_by_either_identifier,
        native_match_wins_over_a_legacy_match,
        duplicate_legacy_id_is_a_conflict,
        appends_accumulate_in_order,
        replace_overwrites_the_sequence,
        update_keeps_comments_and_delete_reports_presence,
        listing_filters_hidden_posts,
        blocklist_round_trips,
        admin_upsert_keeps_the_first_id,
    );
}

#[cfg(feature = "db-postgres")]
mod postgres {
    use storage_adapters::PgStore;
    use testcontainers_modules::postgres::Postgres;
    use testcontainers_modules::testcontainers::runners::AsyncRunner;
    use testcontainers_modules::testcontainers::ContainerAsync;

    /// The container is returned so it outlives the test body.
    async fn fixture() -> (ContainerAsync<Postgres>, PgStore) {
        let container = Postgres::default().start().await.unwrap();
        let host = container.get_host().await.unwrap();
        let port = container.get_host_port_ipv4(5432).await.unwrap();
        let url = format!("postgres://postgres:postgres@{host}:{port}/postgres");

        let store = PgStore::connect(&url, 2).await.unwrap();
        store.migrate().await.unwrap();
        (container, store)
    }

    contract_tests!(
        finds_posts_by_either_identifier,
        native_match_wins_over_a_legacy_match,
        duplicate_legacy_id_is_a_conflict,
        appends_accumulate_in_order,
        replace_overwrites_the_sequence,
        update_keeps_comments_and_delete_reports_presence,
        listing_filters_hidden_posts,
        blocklist_round_trips,
        admin_upsert_keeps_the_first_id,
    );
}
