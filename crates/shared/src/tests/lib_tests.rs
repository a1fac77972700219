use crate::{
    domain::{Hero, HeroId, NewHero},
    error::{ApiError, ErrorCode},
    protocol::hero_route,
};

#[test]
fn hero_serializes_with_plain_integer_id() {
    let hero = Hero::new(11, "Aquaman");
    let json = serde_json::to_value(&hero).expect("json");
    assert_eq!(json, serde_json::json!({ "id": 11, "name": "Aquaman" }));
}

#[test]
fn new_hero_body_has_no_id() {
    let json = serde_json::to_value(NewHero::new("Zatanna")).expect("json");
    assert_eq!(json, serde_json::json!({ "name": "Zatanna" }));
}

#[test]
fn zero_id_is_unassigned() {
    assert!(!HeroId::UNASSIGNED.is_assigned());
    assert!(HeroId(11).is_assigned());
}

#[test]
fn api_error_codes_are_snake_case() {
    let json = serde_json::to_string(&ApiError::not_found("hero 999 not found")).expect("json");
    assert_eq!(json, r#"{"code":"not_found","message":"hero 999 not found"}"#);
    let decoded: ApiError = serde_json::from_str(&json).expect("decode");
    assert_eq!(decoded.code, ErrorCode::NotFound);
}

#[test]
fn hero_route_appends_id() {
    assert_eq!(hero_route(HeroId(17)), "/api/heroes/17");
}
