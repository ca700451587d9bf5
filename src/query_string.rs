use std::collections::HashMap;

#[derive(PartialEq, Debug)]
pub struct QueryString {
    items: HashMap<String, String>,
}

impl QueryString {
    pub fn from(buf: &str) -> Self {
        let vs: Vec<(String, String)> = serde_urlencoded::from_str(buf).unwrap_or_else(|_| vec![]);
        let items: HashMap<String, String> = vs.into_iter().collect();

        QueryString { items }
    }

    /// Free-text search query, `q` parameter. Missing and blank are the
    /// same thing to the search endpoint.
    pub fn get_query(&self) -> Option<&str> {
        match self.items.get("q") {
            Some(q) if !q.trim().is_empty() => Some(q.as_str()),
            _ => None,
        }
    }
}
