use std::collections::HashMap;
use tera::{Error, Function, Result, Value};
use trellis_routes::RouteMap;

/// The `url_for(name=..., param=...)` template function. The `name`
/// argument selects the route; every other argument fills a route param
/// or lands in the query string.
#[derive(Debug)]
pub(crate) struct UrlFor {
    routes: RouteMap,
}

impl UrlFor {
    pub(crate) fn new(routes: RouteMap) -> Self {
        Self { routes }
    }
}

impl Function for UrlFor {
    fn call(&self, args: &HashMap<String, Value>) -> Result<Value> {
        let name = args
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::msg("url_for requires a string `name` argument"))?;

        let params: Vec<(&String, String)> = args
            .iter()
            .filter(|(key, _)| *key != "name")
            .map(|(key, value)| {
                let value = match value {
                    Value::String(string) => string.clone(),
                    other => other.to_string(),
                };
                (key, value)
            })
            .collect();

        let pairs: Vec<(&str, &str)> = params
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect();

        self.routes
            .url_for(name, &pairs)
            .map(Value::String)
            .map_err(|e| Error::msg(e.to_string()))
    }
}
