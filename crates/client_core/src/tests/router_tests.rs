use super::*;

#[test]
fn empty_path_redirects_to_summary() {
    let resolved = RouteTable::standard().resolve("").expect("route");
    assert_eq!(resolved.view, View::Summary);
    assert_eq!(resolved.path, "summary");

    let resolved = RouteTable::standard().resolve("/").expect("route");
    assert_eq!(resolved.view, View::Summary);
}

#[test]
fn list_route_ignores_surrounding_slashes() {
    let resolved = RouteTable::standard().resolve("/list/").expect("route");
    assert_eq!(resolved.view, View::List);
    assert_eq!(resolved.path, "list");
}

#[test]
fn detail_route_exposes_id_param() {
    let resolved = RouteTable::standard().resolve("detail/13").expect("route");
    assert_eq!(resolved.view, View::Detail);
    assert_eq!(resolved.params.get("id"), Some("13"));
    assert_eq!(resolved.params.get("name"), None);
}

#[test]
fn param_segment_does_not_match_missing_value() {
    let err = RouteTable::standard().resolve("detail").expect_err("no route");
    assert_eq!(err, RouteError::NotFound("detail".to_string()));
    assert!(RouteTable::standard().resolve("detail/1/extra").is_err());
}

#[test]
fn first_matching_route_wins() {
    let table = RouteTable::new()
        .with_route("detail/new", View::List)
        .with_route("detail/:id", View::Detail);
    assert_eq!(table.resolve("detail/new").expect("route").view, View::List);
    assert_eq!(table.resolve("detail/7").expect("route").view, View::Detail);
}

#[test]
fn redirect_cycles_are_reported() {
    let table = RouteTable::new()
        .with_redirect("a", "b")
        .with_redirect("b", "a");
    assert_eq!(
        table.resolve("a").expect_err("loop"),
        RouteError::RedirectLoop("a".to_string())
    );
}

#[test]
fn location_back_returns_previous_path_and_keeps_first_entry() {
    let location = Location::new();
    assert_eq!(location.back(), None);

    location.navigate("summary");
    location.navigate("detail/12");
    location.navigate("detail/12");
    assert_eq!(location.depth(), 2);

    assert_eq!(location.back(), Some("summary".to_string()));
    assert_eq!(location.back(), Some("summary".to_string()));
    assert_eq!(location.path(), Some("summary".to_string()));
}

#[test]
fn location_clones_share_history() {
    let location = Location::new();
    let shared = location.clone();
    location.navigate("list");
    shared.navigate("detail/11");
    assert_eq!(location.path(), Some("detail/11".to_string()));
}
