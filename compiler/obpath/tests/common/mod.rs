//! Shared bookstore fixture.

use obpath::Value;

fn book(author: &str, category: &str, isbn: Option<&str>, price: f64, title: &str) -> Value {
    let mut fields = vec![
        ("Author", Value::from(author)),
        ("Category", Value::from(category)),
        ("Price", Value::from(price)),
        ("Title", Value::from(title)),
    ];
    if let Some(isbn) = isbn {
        fields.push(("ISBN", Value::from(isbn)));
    }
    Value::map(fields)
}

/// Five books (three with an ISBN), one bicycle, a list of counts and a
/// wombat tally. Moby Dick carries a nested `Metadata.Author`.
pub fn store() -> Value {
    let mut moby_dick = book(
        "Herman Melville",
        "fiction",
        Some("0-553-21311-3"),
        8.99,
        "Moby Dick",
    );
    if let Value::Map(fields) = &mut moby_dick {
        fields.insert(
            "Metadata".into(),
            Value::map([("Author", "Ishmael"), ("Info", "foobar")]),
        );
    }

    Value::map([
        (
            "books",
            Value::list([
                book("Nigel Rees", "reference", None, 8.95, "Sayings of the Century"),
                book("Evelyn Waugh", "fiction", None, 12.99, "Sword of Honour"),
                book("Louis L'Amour", "fiction", Some("0-553-24766-2"), 5.52, "Westward the Tide"),
                moby_dick,
                book(
                    "J. R. R. Tolkien",
                    "fiction",
                    Some("0-395-19395-8"),
                    22.99,
                    "The Lord of the Rings",
                ),
            ]),
        ),
        (
            "bicycles",
            Value::list([Value::map([
                ("Color", Value::from("red")),
                ("Price", Value::from(19.95)),
            ])]),
        ),
        ("counts", Value::list(["one", "two", "three", "four"])),
        ("wombats", Value::map([("Count", 0)])),
    ])
}

pub fn strings(items: &[&str]) -> Vec<Value> {
    items.iter().map(|s| Value::from(*s)).collect()
}
