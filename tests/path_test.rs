//! Tests for path construction and rendering.

use reqschema::{Path, PathComponent, PathError};

#[test]
fn test_push_pop_and_suffix() {
    let mut path = Path::new();
    path.push(PathComponent::property("foo"));
    path.push(PathComponent::index(1));
    path.push(PathComponent::property("bar"));
    assert_eq!(path.to_string(), "foo[1].bar");

    assert_eq!(path.pop(), Ok(PathComponent::property("bar")));
    assert_eq!(path.to_string(), "foo[1]");
    assert_eq!(path.current_index_suffix().to_string(), "[1]");
}

#[test]
fn test_suffix_stops_at_last_property() {
    let path: Path = vec![
        PathComponent::index(9),
        PathComponent::property("grid"),
        PathComponent::index(2),
        PathComponent::index(0),
    ]
    .into_iter()
    .collect();

    assert_eq!(path.to_string(), "[9].grid[2][0]");
    assert_eq!(path.current_index_suffix().to_string(), "[2][0]");
}

#[test]
fn test_suffix_of_indices_only() {
    let path: Path = vec![PathComponent::index(0), PathComponent::index(1)]
        .into_iter()
        .collect();
    assert_eq!(path.current_index_suffix(), path);
}

#[test]
fn test_pop_many_order_and_underflow() {
    let mut path = Path::from_property("body");
    path.push_many([PathComponent::property("bar"), PathComponent::index(0)]);

    assert_eq!(
        path.pop_many(2).unwrap(),
        vec![PathComponent::index(0), PathComponent::property("bar")]
    );
    assert_eq!(
        path.pop_many(3),
        Err(PathError::Empty {
            requested: 3,
            len: 1
        })
    );
    assert_eq!(path.to_string(), "body");
}

#[test]
fn test_last_and_components() {
    let mut path = Path::from_property("query");
    assert_eq!(path.last(), Some(&PathComponent::property("query")));

    path.with_index(3, |p| {
        assert_eq!(p.last(), Some(&PathComponent::index(3)));
        assert_eq!(p.components().count(), 2);
    });
    assert_eq!(path.len(), 1);
}
