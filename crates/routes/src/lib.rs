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
# Named routes and reverse-url lookup

Routers match urls to handlers; this crate goes the other way. A
[`RouteMap`] associates names with route specs in the same syntax the
router matches (`:param` segments and a `*` wildcard), and
[`RouteMap::url_for`] builds a concrete url from a name and a set of
params.

```
use trellis_routes::RouteMap;

let routes = RouteMap::new()
    .with_route("home", "/")
    .with_route("user", "/users/:id");

assert_eq!(routes.url_for("home", &[]).unwrap(), "/");
assert_eq!(routes.url_for("user", &[("id", "7")]).unwrap(), "/users/7");
```

Params that no segment consumes become the query string:

```
# use trellis_routes::RouteMap;
let routes = RouteMap::new().with_route("user", "/users/:id");
assert_eq!(
    routes.url_for("user", &[("id", "7"), ("tab", "billing")]).unwrap(),
    "/users/7?tab=billing"
);
```
*/

use std::collections::HashMap;
use thiserror::Error;
use url::form_urlencoded;

/// A mapping from route names to route specs.
#[derive(Debug, Clone, Default)]
pub struct RouteMap(HashMap<String, String>);

/// Failures of reverse-url lookup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RouteError {
    /// No route was registered under the requested name.
    #[error("no route registered under the name `{0}`")]
    UnknownRoute(String),

    /// The route spec has a segment that the supplied params don't fill.
    #[error("route `{route}` has no value for its `{segment}` segment")]
    MissingParam {
        /// The route spec that could not be filled in.
        route: String,
        /// The unfilled segment, as written in the spec.
        segment: String,
    },
}

impl RouteMap {
    /// Constructs an empty route map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `spec` under `name`, replacing any previous spec with
    /// that name.
    pub fn add(&mut self, name: impl Into<String>, spec: impl Into<String>) {
        self.0.insert(name.into(), spec.into());
    }

    /// Chainable [`RouteMap::add`].
    #[must_use]
    pub fn with_route(mut self, name: impl Into<String>, spec: impl Into<String>) -> Self {
        self.add(name, spec);
        self
    }

    /// The spec registered under `name`, if any.
    pub fn spec(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Iterates over the registered route names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// The number of registered routes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if no routes are registered.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Builds the url for the route named `name`.
    ///
    /// `:param` segments are filled from the param with the matching key
    /// and a `*` segment is filled from a param named `wildcard`. Params
    /// that no segment consumes are appended as a urlencoded query
    /// string. Param order is preserved in the query string.
    pub fn url_for(&self, name: &str, params: &[(&str, &str)]) -> Result<String, RouteError> {
        let spec = self
            .0
            .get(name)
            .ok_or_else(|| RouteError::UnknownRoute(name.to_string()))?;

        let mut used = vec![false; params.len()];
        let mut lookup = |key: &str| {
            params
                .iter()
                .position(|(param, _)| *param == key)
                .map(|index| {
                    used[index] = true;
                    params[index].1
                })
        };

        let mut segments = Vec::new();
        for segment in spec.split('/') {
            let filled = if let Some(param) = segment.strip_prefix(':') {
                lookup(param)
            } else if segment == "*" {
                lookup("wildcard")
            } else {
                segments.push(segment.to_string());
                continue;
            };

            match filled {
                Some(value) => segments.push(value.to_string()),
                None => {
                    return Err(RouteError::MissingParam {
                        route: spec.clone(),
                        segment: segment.to_string(),
                    })
                }
            }
        }

        let mut url = segments.join("/");
        let extra: Vec<_> = params
            .iter()
            .zip(&used)
            .filter(|(_, used)| !**used)
            .map(|(pair, _)| *pair)
            .collect();

        if !extra.is_empty() {
            let mut query = form_urlencoded::Serializer::new(String::new());
            for (key, value) in extra {
                query.append_pair(key, value);
            }
            url.push('?');
            url.push_str(&query.finish());
        }

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routes() -> RouteMap {
        RouteMap::new()
            .with_route("home", "/")
            .with_route("items", "/items")
            .with_route("item", "/items/:id")
            .with_route("nested", "/users/:user_id/posts/:post_id")
            .with_route("files", "/files/*")
    }

    #[test]
    fn static_routes() {
        assert_eq!(routes().url_for("home", &[]).unwrap(), "/");
        assert_eq!(routes().url_for("items", &[]).unwrap(), "/items");
    }

    #[test]
    fn param_substitution() {
        assert_eq!(routes().url_for("item", &[("id", "42")]).unwrap(), "/items/42");
        assert_eq!(
            routes()
                .url_for("nested", &[("user_id", "1"), ("post_id", "2")])
                .unwrap(),
            "/users/1/posts/2"
        );
    }

    #[test]
    fn wildcard_substitution() {
        assert_eq!(
            routes()
                .url_for("files", &[("wildcard", "a/b/c.txt")])
                .unwrap(),
            "/files/a/b/c.txt"
        );
    }

    #[test]
    fn extra_params_become_the_query_string() {
        assert_eq!(
            routes()
                .url_for("item", &[("id", "42"), ("tab", "reviews"), ("page", "2")])
                .unwrap(),
            "/items/42?tab=reviews&page=2"
        );
    }

    #[test]
    fn query_values_are_urlencoded() {
        assert_eq!(
            routes()
                .url_for("items", &[("q", "a b&c")])
                .unwrap(),
            "/items?q=a+b%26c"
        );
    }

    #[test]
    fn unknown_route_errors() {
        assert_eq!(
            routes().url_for("nope", &[]),
            Err(RouteError::UnknownRoute("nope".to_string()))
        );
    }

    #[test]
    fn missing_param_errors() {
        assert_eq!(
            routes().url_for("item", &[("other", "42")]),
            Err(RouteError::MissingParam {
                route: "/items/:id".to_string(),
                segment: ":id".to_string(),
            })
        );
    }

    #[test]
    fn later_registration_wins() {
        let mut routes = routes();
        routes.add("item", "/catalogue/:id");
        assert_eq!(
            routes.url_for("item", &[("id", "7")]).unwrap(),
            "/catalogue/7"
        );
    }
}
