use crate::url_for::UrlFor;
use std::{
    borrow::Cow,
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};
use tera::Tera;
use trellis_routes::RouteMap;
use trellis_view::View;
use trillium::{async_trait, Conn, Handler};

/**
Shares a [`Tera`] instance with every conn and seeds each conn with a
fresh, empty [`View`].

Run this handler upsequence of anything that uses
[`TemplateConnExt`](crate::TemplateConnExt).
*/
#[derive(Clone, Debug)]
pub struct TemplateHandler {
    tera: Arc<Tera>,
    default_template: Option<Cow<'static, str>>,
}

/// Failures encountered while loading preprocessed template sources.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A template source could not be read.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// A template source could not be compiled.
    #[error(transparent)]
    Template(#[from] tera::Error),
}

impl From<Tera> for TemplateHandler {
    fn from(tera: Tera) -> Self {
        Self {
            tera: Arc::new(tera),
            default_template: None,
        }
    }
}

impl From<PathBuf> for TemplateHandler {
    fn from(dir: PathBuf) -> Self {
        dir.to_str().unwrap().into()
    }
}

impl From<&str> for TemplateHandler {
    fn from(dir: &str) -> Self {
        Tera::new(dir).unwrap().into()
    }
}

impl From<&String> for TemplateHandler {
    fn from(dir: &String) -> Self {
        (**dir).into()
    }
}

impl From<String> for TemplateHandler {
    fn from(dir: String) -> Self {
        dir.as_str().into()
    }
}

impl From<&[&str]> for TemplateHandler {
    fn from(dir_parts: &[&str]) -> Self {
        dir_parts.iter().collect::<PathBuf>().into()
    }
}

impl TemplateHandler {
    /// Construct a new `TemplateHandler` from either a `&str` or
    /// [`PathBuf`] that represents a directory glob containing templates,
    /// or from a [`Tera`] instance.
    ///
    /// ```
    /// # fn main() -> tera::Result<()> {
    /// use trellis_templates::TemplateHandler;
    ///
    /// let handler = TemplateHandler::new("templates/**/*.html");
    ///
    /// // or
    ///
    /// let mut tera = trellis_templates::Tera::default();
    /// tera.add_raw_template("hello.html", "hello {{name}}")?;
    /// let handler = TemplateHandler::new(tera);
    /// # Ok(()) }
    /// ```
    pub fn new(tera: impl Into<Self>) -> Self {
        tera.into()
    }

    /// Loads every file under `dir`, pipes its source through
    /// `preprocessor`, and registers the result under its path relative
    /// to `dir` (with `/` separators).
    ///
    /// Use this to write templates in a shorthand markup that a
    /// preprocessor expands to tera's native syntax before compilation.
    /// Read and compile failures are returned, not swallowed.
    pub fn preprocessed(
        dir: impl AsRef<Path>,
        preprocessor: impl Fn(&str) -> String,
    ) -> Result<Self, LoadError> {
        let dir = dir.as_ref();
        let mut sources = Vec::new();
        collect_sources(dir, dir, &mut sources)?;
        Self::preprocessed_sources(sources, preprocessor)
    }

    /// Registers each `(name, source)` pair after piping the source
    /// through `preprocessor`. The non-filesystem variant of
    /// [`TemplateHandler::preprocessed`].
    pub fn preprocessed_sources(
        sources: impl IntoIterator<Item = (String, String)>,
        preprocessor: impl Fn(&str) -> String,
    ) -> Result<Self, LoadError> {
        let mut tera = Tera::default();
        for (name, source) in sources {
            tera.add_raw_template(&name, &preprocessor(&source))?;
        }
        Ok(tera.into())
    }

    /// Sets the template this handler renders when none is named, used by
    /// [`TemplateConnExt::render_default`](crate::TemplateConnExt::render_default)
    /// and the [`render_default`](crate::render_default) wrapping handler.
    #[must_use]
    pub fn with_default_template(mut self, template_name: impl Into<Cow<'static, str>>) -> Self {
        self.default_template = Some(template_name.into());
        self
    }

    /// Registers a `url_for(name=..., param=...)` template function backed
    /// by `routes`, so templates can build urls by route name.
    ///
    /// Call this while configuring the handler, before it is cloned or
    /// run.
    #[must_use]
    pub fn with_routes(mut self, routes: RouteMap) -> Self {
        Arc::get_mut(&mut self.tera)
            .expect("with_routes must be called before the handler is shared")
            .register_function("url_for", UrlFor::new(routes));
        self
    }

    /// The configured default template name, if any.
    pub fn default_template(&self) -> Option<&str> {
        self.default_template.as_deref()
    }

    pub(crate) fn tera(&self) -> &Tera {
        &self.tera
    }
}

fn collect_sources(
    dir: &Path,
    base: &Path,
    sources: &mut Vec<(String, String)>,
) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_sources(&path, base, sources)?;
        } else {
            let name = path
                .strip_prefix(base)
                .unwrap_or(&path)
                .components()
                .map(|component| component.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            sources.push((name, fs::read_to_string(&path)?));
        }
    }
    Ok(())
}

#[async_trait]
impl Handler for TemplateHandler {
    async fn run(&self, conn: Conn) -> Conn {
        conn.with_state(self.clone()).with_state(View::new())
    }
}
