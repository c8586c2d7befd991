/// Builds a [`Document`](crate::Document) from `"name": value` pairs.
///
/// ```
/// use ming_core::doc;
///
/// let widget = doc! { "name": "a", "tags": vec!["x", "y"], "size": doc! { "w": 3 } };
/// assert_eq!(widget.len(), 3);
/// ```
#[macro_export]
macro_rules! doc {
    () => {
        $crate::Document::new()
    };
    ( $( $name:literal : $value:expr ),+ $(,)? ) => {{
        let mut doc = $crate::Document::new();
        $(
            doc.insert($name, $value);
        )+
        doc
    }};
}
