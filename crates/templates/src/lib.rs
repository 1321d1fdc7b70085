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
# tera template rendering conveniences for trillium

See [the tera site](https://tera.netlify.app/) for more information on the
tera template language.

The [`TemplateHandler`] shares a [`Tera`] instance with every conn and
seeds each conn with a fresh [`View`] for accumulating template data.
Downsequence handlers use [`TemplateConnExt`] to assign values and render:

```
# fn main() -> tera::Result<()> {
use trillium::Conn;
use trellis_templates::{TemplateConnExt, TemplateHandler, Tera};

let mut tera = Tera::default();
tera.add_raw_template("hello.html", "hello {{name}} from {{render_engine}}")?;

let handler = (
    TemplateHandler::new(tera),
    |conn: Conn| async move { conn.assign("render_engine", "tera") },
    |conn: Conn| async move { conn.assign("name", "trellis").render("hello.html") },
);

use trillium_testing::prelude::*;
assert_ok!(
    get("/").on(&handler),
    "hello trellis from tera",
    "content-type" => "text/html"
);
# Ok(()) }
```

Handlers that only accumulate view data can leave rendering to the
[`render_to_response`] and [`render_default`] wrapping handlers, which
render after the wrapped handler returns:

```
# fn main() -> tera::Result<()> {
use trillium::Conn;
use trellis_templates::{render_default, TemplateConnExt, TemplateHandler, Tera};

let mut tera = Tera::default();
tera.add_raw_template("hello.html", "hello {{name}}")?;

let handler = (
    TemplateHandler::new(tera).with_default_template("hello.html"),
    render_default(|conn: Conn| async move { conn.assign("name", "trellis") }),
);

use trillium_testing::prelude::*;
assert_ok!(get("/").on(&handler), "hello trellis");
# Ok(()) }
```
*/

mod template_handler;
pub use template_handler::{LoadError, TemplateHandler};

mod template_conn_ext;
pub use template_conn_ext::TemplateConnExt;

mod render_to_response;
pub use render_to_response::{render_default, render_to_response, RenderToResponse};

mod url_for;

pub use tera::Tera;
pub use trellis_routes::RouteMap;
pub use trellis_view::View;
