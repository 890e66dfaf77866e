use serde_json::Value;

/// Render a scalar read from a configuration source as the string an
/// operator would have written. Control characters are dropped so a stray
/// newline from a secrets file cannot end up inside an identifier.
pub fn value_to_string(value: Value) -> String {
    let raw = match value {
        Value::String(s) => s,
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    };
    raw.chars().filter(|c| !c.is_control()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_and_bools_keep_their_spelling() {
        assert_eq!(value_to_string(json!(5000)), "5000");
        assert_eq!(value_to_string(json!(true)), "true");
    }

    #[test]
    fn control_characters_are_removed() {
        assert_eq!(value_to_string(json!("client-id\r\n")), "client-id");
    }
}
