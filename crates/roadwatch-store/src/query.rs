//! Query-string builder for the store's filtered-select interface.
//!
//! The store speaks PostgREST filter syntax: `col=eq.value` conjunctions, an
//! `or=(colA.eq.x,colB.eq.y)` disjunction, and `order=col.desc`.

/// A filtered select over one table. Renders to request query parameters.
#[derive(Debug, Clone)]
pub struct Select {
    params: Vec<(String, String)>,
}

impl Select {
    pub fn new() -> Self {
        Self {
            params: vec![("select".to_string(), "*".to_string())],
        }
    }

    /// `column = value` conjunction.
    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.params.push((column.to_string(), format!("eq.{value}")));
        self
    }

    /// Disjunction over equality checks: matches rows where ANY of the given
    /// `(column, value)` pairs holds.
    pub fn any_of(mut self, filters: &[(&str, &str)]) -> Self {
        let clauses: Vec<String> = filters
            .iter()
            .map(|(column, value)| format!("{column}.eq.{}", quoted(value)))
            .collect();
        self.params
            .push(("or".to_string(), format!("({})", clauses.join(","))));
        self
    }

    pub fn order_desc(mut self, column: &str) -> Self {
        self.params
            .push(("order".to_string(), format!("{column}.desc")));
        self
    }

    pub fn into_params(self) -> Vec<(String, String)> {
        self.params
    }
}

impl Default for Select {
    fn default() -> Self {
        Self::new()
    }
}

/// Values inside an `or=(...)` grouping must be double-quoted when they carry
/// characters the filter grammar reserves, or the store would mis-parse the
/// clause boundaries.
fn quoted(value: &str) -> String {
    let reserved = |c: char| matches!(c, ',' | '.' | ':' | '(' | ')' | '"' | '\\') || c.is_whitespace();
    if value.is_empty() || value.chars().any(reserved) {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(select: Select) -> Vec<(String, String)> {
        select.into_params()
    }

    #[test]
    fn select_star_is_always_first() {
        let params = rendered(Select::new());
        assert_eq!(params, vec![("select".into(), "*".into())]);
    }

    #[test]
    fn renders_or_disjunction() {
        let params = rendered(
            Select::new().any_of(&[("username", "alice"), ("phone_number", "555")]),
        );
        assert_eq!(
            params[1],
            (
                "or".to_string(),
                "(username.eq.alice,phone_number.eq.555)".to_string()
            )
        );
    }

    #[test]
    fn renders_eq_conjunction_after_or() {
        let params = rendered(
            Select::new()
                .any_of(&[("username", "alice"), ("phone_number", "alice")])
                .eq("password_hash", "h1"),
        );
        assert_eq!(params[2], ("password_hash".to_string(), "eq.h1".to_string()));
    }

    #[test]
    fn renders_descending_order() {
        let params = rendered(Select::new().order_desc("timestamp"));
        assert_eq!(params[1], ("order".to_string(), "timestamp.desc".to_string()));
    }

    #[test]
    fn quotes_reserved_characters_in_or_values() {
        let params = rendered(Select::new().any_of(&[("username", "smith, jr.")]));
        assert_eq!(
            params[1].1,
            r#"(username.eq."smith, jr.")"#.to_string()
        );
    }

    #[test]
    fn quotes_embedded_quotes_and_empty_values() {
        let params = rendered(Select::new().any_of(&[("username", r#"a"b"#), ("phone_number", "")]));
        assert_eq!(
            params[1].1,
            r#"(username.eq."a\"b",phone_number.eq."")"#.to_string()
        );
    }
}
