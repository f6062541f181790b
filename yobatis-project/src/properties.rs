//! Java `.properties` files.

use indexmap::IndexMap;

/// Parse properties text. Keys with blank values are dropped; the rest come
/// back sorted by key.
pub fn parse_properties(text: &str) -> Result<IndexMap<String, String>, String> {
    let raw = java_properties::read(text.as_bytes()).map_err(|e| e.to_string())?;
    let mut entries: Vec<(String, String)> = raw
        .into_iter()
        .filter(|(_, value)| !value.trim().is_empty())
        .collect();
    entries.sort();
    Ok(entries.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_properties() {
        let text = "# database\njdbc.url = jdbc:mysql://localhost:3306/demo\njdbc.username:root\njdbc.password=\nmulti=a \\\n  b\n";
        let props = parse_properties(text).unwrap();
        assert_eq!(
            props.get("jdbc.url").map(String::as_str),
            Some("jdbc:mysql://localhost:3306/demo")
        );
        assert_eq!(props.get("jdbc.username").map(String::as_str), Some("root"));
        assert!(!props.contains_key("jdbc.password"), "blank values are dropped");
        assert_eq!(props.get("multi").map(String::as_str), Some("a b"));
        assert_eq!(
            props.keys().collect::<Vec<_>>(),
            vec!["jdbc.url", "jdbc.username", "multi"]
        );
    }
}
