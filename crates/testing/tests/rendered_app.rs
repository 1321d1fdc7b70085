use trellis_routes::RouteMap;
use trellis_templates::{render_to_response, TemplateConnExt, TemplateHandler};
use trellis_testing::TestApp;
use trillium::Conn;
use trillium_router::Router;

fn app() -> impl trillium::Handler {
    let mut tera = tera::Tera::default();
    tera.add_raw_template("items.html", "{{ heading }}: {{ count }} items")
        .unwrap();

    (
        TemplateHandler::new(tera),
        Router::new().get(
            "/items",
            render_to_response("items.html", |conn: Conn| async move {
                conn.assign("heading", "inventory").assign("count", 12)
            }),
        ),
    )
}

#[test]
fn the_harness_sees_rendered_output() {
    let routes = RouteMap::new().with_route("items", "/items");
    let mut app = TestApp::new(app()).with_routes(routes);

    let path = app.url_for("items", &[]).unwrap();
    app.get(&path);

    assert_eq!(app.status().map(|status| status as u16), Some(200));
    assert_eq!(app.take_body_string().unwrap(), "inventory: 12 items");
}
