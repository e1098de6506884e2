use daybook_core::Post;
use serde_json::json;

#[test]
fn with_content_replaces_text_and_keeps_identity() {
    let original = Post::new(7, "before");
    let edited = original.with_content("after");

    assert_eq!(edited.id, original.id);
    assert_eq!(edited.content, "after");
    assert_eq!(original.content, "before");
}

#[test]
fn post_serializes_to_stable_json_shape() {
    let post = Post::new(1, "hello");

    let value = serde_json::to_value(&post).unwrap();
    assert_eq!(value, json!({ "id": 1, "content": "hello" }));
}

#[test]
fn post_deserializes_from_json() {
    let post: Post = serde_json::from_value(json!({ "id": 42, "content": "" })).unwrap();

    assert_eq!(post, Post::new(42, ""));
}
