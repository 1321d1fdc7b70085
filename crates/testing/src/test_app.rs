use serde::Serialize;
use std::fmt::{self, Debug, Formatter};
use trellis_routes::{RouteError, RouteMap};
use trillium::{Handler, KnownHeaderName, Method, Status};
use trillium_testing::TestConn;

const NO_DATA: [(&str, &str); 0] = [];

/**
Dispatches synthetic requests through an application handler and keeps
the most recent conn for assertions.

Each [`TestApp::route`] call builds a fresh request, runs it through the
application, and replaces the previously stored conn; nothing carries
over between dispatches except the application itself.

```
use trillium::Conn;
use trillium_router::Router;
use trellis_testing::TestApp;

let router = Router::new().post("/items", |mut conn: Conn| async move {
    let body = conn.request_body_string().await.unwrap_or_default();
    conn.ok(body)
});

let mut app = TestApp::new(router);
app.post("/items", &[("name", "widget")]);
assert_eq!(app.take_body_string().unwrap(), "name=widget");
```
*/
pub struct TestApp<H> {
    app: H,
    routes: RouteMap,
    conn: Option<TestConn>,
}

impl<H: Handler> TestApp<H> {
    /// Constructs a harness around `app`.
    pub fn new(app: H) -> Self {
        Self {
            app,
            routes: RouteMap::new(),
            conn: None,
        }
    }

    /// Supplies a [`RouteMap`] for [`TestApp::url_for`] lookups.
    #[must_use]
    pub fn with_routes(mut self, routes: RouteMap) -> Self {
        self.routes = routes;
        self
    }

    /// Builds a request conn for `path` without dispatching it.
    ///
    /// For GET requests, `data` is urlencoded into the query string; for
    /// POST requests it becomes a urlencoded form body with the matching
    /// content type. Other methods ignore `data`.
    pub fn build_request<M>(&self, path: &str, method: M, data: &impl Serialize) -> TestConn
    where
        M: TryInto<Method>,
        M::Error: Debug,
    {
        let method = method.try_into().expect("expected a valid http method");
        let encoded =
            serde_urlencoded::to_string(data).expect("request data must be urlencodable");

        match method {
            Method::Get if !encoded.is_empty() => {
                let separator = if path.contains('?') { '&' } else { '?' };
                TestConn::build(method, format!("{path}{separator}{encoded}"), ())
            }

            Method::Post if !encoded.is_empty() => TestConn::build(method, path, encoded)
                .with_request_header(
                    KnownHeaderName::ContentType,
                    "application/x-www-form-urlencoded",
                ),

            _ => TestConn::build(method, path, ()),
        }
    }

    /// Builds a request for `path` with `method` and `data` (per
    /// [`TestApp::build_request`]), dispatches it through the
    /// application, and stores the resulting conn, replacing any
    /// previous one. Inspect it with [`TestApp::response`],
    /// [`TestApp::status`], and [`TestApp::take_body_string`].
    pub fn route<M>(&mut self, path: &str, method: M, data: &impl Serialize)
    where
        M: TryInto<Method>,
        M::Error: Debug,
    {
        let conn = self.build_request(path, method, data).on(&self.app);
        self.conn = Some(conn);
    }

    /// Dispatches a GET request for `path` with no data.
    pub fn get(&mut self, path: &str) {
        self.route(path, Method::Get, &NO_DATA);
    }

    /// Dispatches a POST request for `path` with `data` as the form
    /// body.
    pub fn post(&mut self, path: &str, data: &impl Serialize) {
        self.route(path, Method::Post, data);
    }

    /// The conn stored by the most recent [`TestApp::route`] call.
    /// Panics if nothing has been dispatched yet.
    pub fn response(&self) -> &TestConn {
        self.conn
            .as_ref()
            .expect("route must be called before inspecting the response")
    }

    /// Mutable access to the stored conn, for assertions that consume
    /// the body.
    pub fn response_mut(&mut self) -> &mut TestConn {
        self.conn
            .as_mut()
            .expect("route must be called before inspecting the response")
    }

    /// The response status of the stored conn.
    pub fn status(&self) -> Option<Status> {
        self.response().status()
    }

    /// Takes the response body of the stored conn as a string.
    pub fn take_body_string(&mut self) -> Option<String> {
        self.response_mut().take_response_body_string()
    }

    /// Reverse-url lookup against the harness's [`RouteMap`], so
    /// handler-side url generation is testable without a live conn.
    pub fn url_for(&self, name: &str, params: &[(&str, &str)]) -> Result<String, RouteError> {
        self.routes.url_for(name, params)
    }

    /// Borrows the application handler.
    pub fn app(&self) -> &H {
        &self.app
    }
}

impl<H: Handler> Debug for TestApp<H> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestApp")
            .field("app", &self.app.name())
            .field("routes", &self.routes)
            .field("conn", &self.conn)
            .finish()
    }
}
