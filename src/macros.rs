/// Builds a [`Value`](crate::Value) tree from JSON-like literal syntax.
///
/// ```rust
/// use confdoc::{tree, Value};
///
/// let doc = tree!({
///     "name": "app",
///     "ports": [80, 443],
///     "database": {"host": "localhost"},
///     "nickname": null
/// });
/// assert_eq!(doc.pointer(&["database", "host"]), Some(&Value::from("localhost")));
/// ```
#[macro_export]
macro_rules! tree {
    (null) => {
        $crate::Value::Null
    };

    (true) => {
        $crate::Value::Bool(true)
    };

    (false) => {
        $crate::Value::Bool(false)
    };

    ([]) => {
        $crate::Value::Sequence(vec![])
    };

    ([ $($elem:tt),* $(,)? ]) => {
        $crate::Value::Sequence(vec![$($crate::tree!($elem)),*])
    };

    ({}) => {
        $crate::Value::Mapping($crate::Map::new())
    };

    ({ $($key:literal : $value:tt),* $(,)? }) => {{
        let mut mapping = $crate::Map::new();
        $(
            mapping.insert($key.to_string(), $crate::tree!($value));
        )*
        $crate::Value::Mapping(mapping)
    }};

    // Any other expression goes through the tree builder
    ($s:expr) => {{
        $crate::to_tree(&$s).unwrap_or($crate::Value::Null)
    }};
}

#[cfg(test)]
mod tests {
    use crate::{Map, Number, Value};

    #[test]
    fn test_tree_macro_primitives() {
        assert_eq!(tree!(null), Value::Null);
        assert_eq!(tree!(true), Value::Bool(true));
        assert_eq!(tree!(false), Value::Bool(false));
        assert_eq!(tree!(42), Value::Number(Number::Integer(42)));
        assert_eq!(tree!(3.5), Value::Number(Number::Float(3.5)));
        assert_eq!(tree!("hello"), Value::String("hello".to_string()));
    }

    #[test]
    fn test_tree_macro_sequences() {
        assert_eq!(tree!([]), Value::Sequence(vec![]));
        assert_eq!(
            tree!([1, "two", null]),
            Value::Sequence(vec![
                Value::from(1),
                Value::from("two"),
                Value::Null
            ])
        );
    }

    #[test]
    fn test_tree_macro_mappings() {
        assert_eq!(tree!({}), Value::Mapping(Map::new()));

        let obj = tree!({
            "name": "Alice",
            "age": 30
        });
        let map = obj.as_mapping().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("name"), Some(&Value::from("Alice")));
        assert_eq!(map.get("age"), Some(&Value::from(30)));
    }
}
