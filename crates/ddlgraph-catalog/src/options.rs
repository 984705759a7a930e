/// Options that control which catalog objects are loaded.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Only load objects whose schema is listed; `None` loads every schema.
    pub schemas: Option<Vec<String>>,
    pub include_views: bool,
    pub include_routines: bool,
    pub include_triggers: bool,
    /// Run the identity restart post-pass after rendering.
    pub resync_identities: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            schemas: None,
            include_views: true,
            include_routines: true,
            include_triggers: true,
            resync_identities: true,
        }
    }
}

impl ExtractOptions {
    pub fn includes_schema(&self, schema: &str) -> bool {
        let schema = schema.trim();
        match &self.schemas {
            Some(list) => list.iter().any(|item| item.trim().eq_ignore_ascii_case(schema)),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_filter_ignores_padding_and_case() {
        let opts = ExtractOptions {
            schemas: Some(vec!["APP".to_string()]),
            ..ExtractOptions::default()
        };
        assert!(opts.includes_schema("APP     "));
        assert!(opts.includes_schema("app"));
        assert!(!opts.includes_schema("SALES"));
        assert!(ExtractOptions::default().includes_schema("ANY"));
    }
}
