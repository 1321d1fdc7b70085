use crate::TemplateConnExt;
use std::{
    borrow::Cow,
    fmt::{self, Debug, Formatter},
};
use trillium::{async_trait, Conn, Handler, Info, Upgrade};

/**
A wrapping handler that renders a template after the wrapped handler runs.

Built with [`render_to_response`] for a named template or
[`render_default`] for the [`TemplateHandler`](crate::TemplateHandler)'s
default template. The wrapped handler only accumulates view data; the
wrapper takes care of rendering:

```
# fn main() -> tera::Result<()> {
use trillium::Conn;
use trellis_templates::{render_to_response, TemplateConnExt, TemplateHandler, Tera};

let mut tera = Tera::default();
tera.add_raw_template("greeting.html", "hello {{name}}")?;

let handler = (
    TemplateHandler::new(tera),
    render_to_response("greeting.html", |conn: Conn| async move {
        conn.assign("name", "trellis")
    }),
);

use trillium_testing::prelude::*;
assert_ok!(get("/").on(&handler), "hello trellis");
# Ok(()) }
```

Rendering only happens when the wrapped handler neither halted the conn
nor set a status. A handler that responds on its own (a redirect, an
error status, a render of its own) passes through untouched.
*/
pub struct RenderToResponse<H> {
    template_name: Option<Cow<'static, str>>,
    handler: H,
}

/// Wraps `handler` so that `template_name` is rendered with the
/// accumulated view after the handler runs. See [`RenderToResponse`].
pub fn render_to_response<H: Handler>(
    template_name: impl Into<Cow<'static, str>>,
    handler: H,
) -> RenderToResponse<H> {
    RenderToResponse {
        template_name: Some(template_name.into()),
        handler,
    }
}

/// Wraps `handler` so that the
/// [`TemplateHandler`](crate::TemplateHandler)'s default template is
/// rendered with the accumulated view after the handler runs. The
/// zero-configuration [`render_to_response`].
pub fn render_default<H: Handler>(handler: H) -> RenderToResponse<H> {
    RenderToResponse {
        template_name: None,
        handler,
    }
}

impl<H: Handler> Debug for RenderToResponse<H> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderToResponse")
            .field("template_name", &self.template_name)
            .field("handler", &self.handler.name())
            .finish()
    }
}

#[async_trait]
impl<H: Handler> Handler for RenderToResponse<H> {
    async fn run(&self, conn: Conn) -> Conn {
        let conn = self.handler.run(conn).await;

        if conn.is_halted() || conn.status().is_some() {
            return conn;
        }

        match &self.template_name {
            Some(template_name) => conn.render(template_name),
            None => conn.render_default(),
        }
    }

    async fn init(&mut self, info: &mut Info) {
        self.handler.init(info).await;
    }

    async fn before_send(&self, conn: Conn) -> Conn {
        self.handler.before_send(conn).await
    }

    fn has_upgrade(&self, upgrade: &Upgrade) -> bool {
        self.handler.has_upgrade(upgrade)
    }

    async fn upgrade(&self, upgrade: Upgrade) {
        self.handler.upgrade(upgrade).await;
    }

    fn name(&self) -> Cow<'static, str> {
        match &self.template_name {
            Some(template_name) => {
                format!("RenderToResponse<{}>({})", template_name, self.handler.name()).into()
            }
            None => format!("RenderToResponse({})", self.handler.name()).into(),
        }
    }
}
