use crate::TemplateHandler;
use serde::Serialize;
use std::path::Path;
use tera::Context;
use trellis_view::View;
use trillium::{Conn, KnownHeaderName};

/**
Extends [`trillium::Conn`] with view accumulation and tera
template-rendering functionality.

All of these must be run downsequence of the [`TemplateHandler`] and will
panic if it has not already run.
*/
pub trait TemplateConnExt {
    /// Stores a key-value pair on this conn's [`View`], where the value
    /// is any [`Serialize`] type.
    fn assign(self, key: impl Into<String>, value: impl Serialize) -> Self;

    /// Renders the template registered under `template_name` with the
    /// accumulated view, halting with a 200 and the rendered body. The
    /// content type is derived from the template name's extension. A
    /// failed render is logged and becomes a 500 carrying the template
    /// engine's error text.
    fn render(self, template_name: &str) -> Self;

    /// Renders the [`TemplateHandler`]'s default template. Panics if no
    /// default template was configured.
    fn render_default(self) -> Self;

    /// Borrows the accumulated view.
    fn view(&self) -> &View;

    /// Mutably borrows the accumulated view.
    fn view_mut(&mut self) -> &mut View;
}

impl TemplateConnExt for Conn {
    fn assign(mut self, key: impl Into<String>, value: impl Serialize) -> Self {
        self.view_mut().set(key, value);
        self
    }

    fn render(self, template_name: &str) -> Self {
        let handler = self
            .state::<TemplateHandler>()
            .cloned()
            .expect("render must be run downsequence of the TemplateHandler");

        let view = self.state::<View>().cloned().unwrap_or_default();

        let rendered = Context::from_serialize(&view)
            .and_then(|context| handler.tera().render(template_name, &context));

        match rendered {
            Ok(body) => {
                let mut conn = self.ok(body);
                if let Some(extension) = Path::new(template_name).extension() {
                    if let Some(mime) = mime_db::lookup(extension.to_string_lossy()) {
                        conn.response_headers_mut()
                            .try_insert(KnownHeaderName::ContentType, mime);
                    }
                }
                conn
            }

            Err(e) => {
                log::error!("{:?}", &e);
                self.with_status(500).with_body(e.to_string())
            }
        }
    }

    fn render_default(self) -> Self {
        let template_name = self
            .state::<TemplateHandler>()
            .expect("render_default must be run downsequence of the TemplateHandler")
            .default_template()
            .expect("render_default requires a default template on the TemplateHandler")
            .to_string();

        self.render(&template_name)
    }

    fn view(&self) -> &View {
        self.state()
            .expect("view must be accessed downsequence of the TemplateHandler")
    }

    fn view_mut(&mut self) -> &mut View {
        self.state_mut()
            .expect("view must be accessed downsequence of the TemplateHandler")
    }
}
