#![forbid(unsafe_code)]
#![deny(
    missing_copy_implementations,
    rustdoc::missing_crate_level_docs,
    missing_debug_implementations,
    missing_docs,
    nonstandard_style,
    unused_qualifications
)]

/*!
# Application testing tools for trellis apps

Two independent pieces:

* [`TestApp`] dispatches synthetic requests through an application handler
  and keeps the resulting conn around for assertions. GET data is merged
  into the query string and POST data becomes a urlencoded form body, so
  tests read the way the request would be made:

```
use trillium::Conn;
use trillium_router::Router;
use trellis_testing::TestApp;

let router = Router::new().get("/greet", |conn: Conn| async move { conn.ok("hello") });

let mut app = TestApp::new(router);
app.get("/greet");
assert_eq!(app.status().map(|status| status as u16), Some(200));
assert_eq!(app.take_body_string().unwrap(), "hello");
```

* [`Testbed`] is a sandbox of named in-memory service stubs for tests
  that exercise code with platform-service dependencies. Activation is
  process-exclusive and deactivation is guaranteed on drop. See
  [`with_stubs`] for per-test usage.

The assertion macros and conn builders from `trillium_testing` are
re-exported for convenience.
*/

mod test_app;
pub use test_app::TestApp;

mod testbed;
pub use testbed::{with_stubs, Initializer, Testbed, TestbedError};

mod stubs;
pub use stubs::{CacheStub, StoreStub};

pub use trellis_routes::{RouteError, RouteMap};
pub use trillium_testing::{
    assert_body, assert_body_contains, assert_headers, assert_not_handled, assert_ok,
    assert_response, assert_status, methods, TestConn,
};
