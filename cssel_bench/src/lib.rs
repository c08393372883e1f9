/// Selectors taken from real stylesheets, used as bench input.
pub fn corpus() -> Result<Vec<String>, serde_json::Error> {
    return serde_json::from_str(include_str!("../corpus.json"));
}

/// The whole corpus as one comma separated list.
pub fn corpus_list() -> Result<String, serde_json::Error> {
    return Ok(corpus()?.join(", "));
}
