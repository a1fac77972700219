use std::{sync::Arc, time::Duration};

use client_core::{App, ClientConfig, RouteError, Screen, View};
use server::{build_router, ApiContext, AppState};
use shared::domain::{Hero, HeroId};
use storage::HeroStore;
use tokio::{net::TcpListener, time::timeout};

async fn spawn_backend() -> (String, HeroStore) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let store = HeroStore::new("sqlite::memory:").await.expect("db");
    store.seed_defaults().await.expect("seed");
    let app = build_router(Arc::new(AppState {
        api: ApiContext::new(store.clone()),
    }));
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), store)
}

fn connect(server_url: String) -> App {
    App::connect(ClientConfig {
        server_url,
        search_debounce: Duration::from_millis(20),
    })
    .expect("app")
}

fn ids(heroes: &[Hero]) -> Vec<i64> {
    heroes.iter().map(|hero| hero.id.0).collect()
}

#[tokio::test]
async fn empty_path_redirects_to_summary_of_heroes_two_to_five() {
    let (url, _store) = spawn_backend().await;
    let app = connect(url);

    let Screen::Summary(dashboard) = app.navigate("").await.expect("navigate") else {
        panic!("expected summary");
    };
    assert_eq!(ids(dashboard.heroes()), vec![12, 13, 14, 15]);
    assert_eq!(app.location().path().as_deref(), Some("summary"));
    assert_eq!(app.messages().snapshot(), vec!["HeroService: fetched heroes"]);
}

#[tokio::test]
async fn summary_shows_positions_two_through_five_of_short_list() {
    let (url, store) = spawn_backend().await;
    let six: Vec<Hero> = (1..=6_i64).map(|i| Hero::new(i, format!("Hero {i}"))).collect();
    store.reset(&six).await.expect("reset");
    let app = connect(url);

    let Screen::Summary(dashboard) = app.navigate("summary").await.expect("navigate") else {
        panic!("expected summary");
    };
    assert_eq!(ids(dashboard.heroes()), vec![2, 3, 4, 5]);
}

#[tokio::test]
async fn unknown_path_is_rejected() {
    let (url, _store) = spawn_backend().await;
    let app = connect(url);

    assert_eq!(
        app.navigate("villains").await.err(),
        Some(RouteError::NotFound("villains".to_string()))
    );
    assert_eq!(app.location().depth(), 0);
}

#[tokio::test]
async fn add_from_list_appends_hero_with_next_id() {
    let (url, store) = spawn_backend().await;
    let app = connect(url);

    let Screen::List(mut list) = app.navigate("list").await.expect("navigate") else {
        panic!("expected list");
    };
    let created = list.add("  Zatanna  ").await.cloned().expect("created");
    assert_eq!(created, Hero::new(21, "Zatanna"));
    assert_eq!(list.heroes().last(), Some(&created));
    assert_eq!(store.get(HeroId(21)).await.expect("get"), Some(created));
    assert!(app.messages().contains("added hero w/ id=21"));
}

#[tokio::test]
async fn delete_from_list_removes_hero_on_backend() {
    let (url, store) = spawn_backend().await;
    let app = connect(url);

    let Screen::List(mut list) = app.navigate("list").await.expect("navigate") else {
        panic!("expected list");
    };
    let target = list.heroes()[0].clone();
    let pending = list.delete(&target);
    assert!(!list.heroes().contains(&target));

    assert!(pending.await.expect("join"));
    assert_eq!(store.get(target.id).await.expect("get"), None);
    assert!(app.messages().contains("deleted hero id=11"));
}

#[tokio::test]
async fn detail_rename_and_save_updates_backend_and_goes_back() {
    let (url, store) = spawn_backend().await;
    let app = connect(url);

    app.navigate("summary").await.expect("summary");
    let Screen::Detail(mut detail) = app.navigate("detail/13").await.expect("navigate") else {
        panic!("expected detail");
    };
    assert_eq!(detail.hero(), Some(&Hero::new(13, "Cyborg")));

    assert!(detail.rename("Victor Stone"));
    assert_eq!(detail.save().await, Some(true));
    assert_eq!(app.location().path().as_deref(), Some("summary"));
    assert_eq!(
        store.get(HeroId(13)).await.expect("get"),
        Some(Hero::new(13, "Victor Stone"))
    );
}

#[tokio::test]
async fn detail_of_missing_hero_shows_nothing_and_logs() {
    let (url, _store) = spawn_backend().await;
    let app = connect(url);

    let Screen::Detail(detail) = app.navigate("detail/999").await.expect("navigate") else {
        panic!("expected detail");
    };
    assert!(detail.hero().is_none());
    assert!(app.messages().contains("getHero id=999 failed"));
}

#[tokio::test]
async fn detail_with_non_numeric_id_skips_fetch() {
    let (url, _store) = spawn_backend().await;
    let app = connect(url);

    let screen = app.navigate("detail/abc").await.expect("navigate");
    assert_eq!(screen.view(), View::Detail);
    let Screen::Detail(detail) = screen else {
        unreachable!();
    };
    assert_eq!(detail.hero_id(), HeroId::UNASSIGNED);
    assert!(detail.hero().is_none());
    assert!(app.messages().is_empty());
}

#[tokio::test]
async fn search_stream_returns_matches_for_settled_term() {
    let (url, _store) = spawn_backend().await;
    let app = connect(url);

    let mut search = app.search();
    search.search("ma");
    search.search("man");
    let heroes = timeout(Duration::from_secs(5), search.next_results())
        .await
        .expect("results in time")
        .expect("stream open");
    assert_eq!(ids(&heroes), vec![11, 12, 14, 16, 19]);
    assert_eq!(
        app.messages().snapshot(),
        vec!["HeroService: found heroes matching \"man\""]
    );
}
