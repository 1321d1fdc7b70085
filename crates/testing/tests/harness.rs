use serde::Deserialize;
use trellis_routes::RouteMap;
use trellis_testing::TestApp;
use trillium::{Conn, Method};
use trillium_router::Router;

#[derive(Deserialize)]
struct ItemForm {
    name: String,
}

fn app() -> impl trillium::Handler {
    Router::new()
        .get("/items", |conn: Conn| async move { conn.ok("all items") })
        .get("/search", |conn: Conn| async move {
            let query = conn.querystring().to_string();
            conn.ok(query)
        })
        .post("/items", |mut conn: Conn| async move {
            let body = match conn.request_body_string().await {
                Ok(body) => body,
                Err(_) => return conn.with_status(400),
            };
            match serde_urlencoded::from_str::<ItemForm>(&body) {
                Ok(form) => conn.ok(format!("created {}", form.name)),
                Err(_) => conn.with_status(422),
            }
        })
}

#[test]
fn get_dispatch_stores_the_response() {
    let mut app = TestApp::new(app());
    app.get("/items");
    assert_eq!(app.status().map(|status| status as u16), Some(200));
    assert_eq!(app.take_body_string().unwrap(), "all items");
}

#[test]
fn post_data_arrives_as_a_form_body() {
    let mut app = TestApp::new(app());
    app.route("/items", Method::Post, &[("name", "widget")]);
    assert_eq!(app.status().map(|status| status as u16), Some(200));
    assert_eq!(app.take_body_string().unwrap(), "created widget");
}

#[test]
fn post_convenience_matches_route() {
    let mut app = TestApp::new(app());
    app.post("/items", &[("name", "sprocket")]);
    assert_eq!(app.take_body_string().unwrap(), "created sprocket");
}

#[test]
fn get_data_is_merged_into_the_query_string() {
    let mut app = TestApp::new(app());
    app.route("/search", Method::Get, &[("q", "widgets"), ("page", "2")]);
    assert_eq!(app.take_body_string().unwrap(), "q=widgets&page=2");
}

#[test]
fn get_data_extends_an_existing_query_string() {
    let mut app = TestApp::new(app());
    app.route("/search?sort=asc", Method::Get, &[("q", "widgets")]);
    assert_eq!(app.take_body_string().unwrap(), "sort=asc&q=widgets");
}

#[test]
fn each_dispatch_replaces_the_stored_conn() {
    let mut app = TestApp::new(app());
    app.post("/items", &[("name", "widget")]);
    app.get("/items");
    assert_eq!(app.take_body_string().unwrap(), "all items");
}

#[test]
fn unrouted_requests_store_an_unhandled_conn() {
    let mut app = TestApp::new(app());
    app.get("/missing");
    assert_eq!(app.status(), None);
}

#[test]
fn data_is_ignored_for_other_methods() {
    let app = TestApp::new(app());
    let conn = app.build_request("/items", Method::Delete, &[("name", "widget")]);
    assert_eq!(conn.path(), "/items");
}

#[test]
fn url_for_delegates_to_the_route_map() {
    let routes = RouteMap::new().with_route("item", "/items/:id");
    let app = TestApp::new(app()).with_routes(routes);

    assert_eq!(app.url_for("item", &[("id", "3")]).unwrap(), "/items/3");
    assert!(app.url_for("nope", &[]).is_err());
}

#[test]
#[should_panic(expected = "route must be called")]
fn inspecting_before_dispatch_panics() {
    let app = TestApp::new(app());
    app.response();
}
