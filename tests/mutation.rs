use nodepath::{JsonPath, Segment, Value, get, path, set};
use pretty_assertions::assert_eq;

fn parse(text: &str) -> Value {
    Value::parse_json(text).expect("fixture parses")
}

fn sample_documents() -> Vec<Value> {
    [
        "{}",
        "[]",
        "null",
        "42",
        r#"{"a": [{"b": 5}, {"c": [1, 2, 3]}], "d": {"e": null, "f": "text"}, "g": [[], {}]}"#,
        r#"[{"id": 1, "tags": ["x", "y"]}, {"id": 2, "tags": []}, "loose"]"#,
    ]
    .into_iter()
    .map(parse)
    .collect()
}

fn sample_paths() -> Vec<JsonPath> {
    vec![
        JsonPath::root(),
        path!("a"),
        path!(0),
        path!("a", 0, "b"),
        path!("a", 1, "c", 2),
        path!("a", 1, "c", 5),
        path!("d", "e", "deep"),
        path!(0, "tags", 1),
        path!(2, "k"),
        path!("new", 0, "more", 1),
        path!("g", 1, "x"),
    ]
}

fn sample_values() -> Vec<Value> {
    vec![
        Value::from(7),
        Value::Null,
        Value::from("s"),
        parse(r#"{"obj": [1, {"x": true}]}"#),
        parse("[]"),
    ]
}

#[test]
fn write_then_read_returns_written_value() {
    for doc in sample_documents() {
        for p in sample_paths() {
            for v in sample_values() {
                let out = set(&doc, &p, v.clone()).expect("write");
                assert_eq!(get(&out, &p), Some(&v), "doc {} path {p}", doc.to_json_compact());
            }
        }
    }
}

/// Every container of `before` that is not an ancestor of `path` must be
/// shared by `after`, and everything off the path must read the same.
fn assert_untouched_off_path(before: &Value, after: &Value, path: &[Segment]) {
    let Some((head, rest)) = path.split_first() else {
        return;
    };
    match before {
        Value::Object(map) => {
            let written_key = match head {
                Segment::Key(k) => k.clone(),
                Segment::Index(i) => i.to_string(),
            };
            for (key, child) in map.iter() {
                let Some(after_child) = after.get(key) else {
                    panic!("member {key} lost");
                };
                if *key == written_key {
                    assert_untouched_off_path(child, after_child, rest);
                } else {
                    assert_eq!(child, after_child);
                    if child.is_container() {
                        assert!(child.ptr_eq(after_child), "member {key} was copied");
                    }
                }
            }
        }
        Value::Array(items) => {
            let Some(after_items) = after.as_array() else {
                // A key written into an array promotes it; members keep their values.
                for (i, child) in items.iter().enumerate() {
                    let after_child = after.get(&i.to_string()).expect("promoted member");
                    if child.is_container() {
                        assert!(child.ptr_eq(after_child));
                    }
                }
                return;
            };
            for (i, child) in items.iter().enumerate() {
                if head == &Segment::Index(i) {
                    assert_untouched_off_path(child, &after_items[i], rest);
                } else {
                    assert_eq!(child, &after_items[i]);
                    if child.is_container() {
                        assert!(child.ptr_eq(&after_items[i]), "element {i} was copied");
                    }
                }
            }
        }
        _ => {}
    }
}

#[test]
fn subtrees_off_the_path_are_shared() {
    for doc in sample_documents() {
        for p in sample_paths() {
            let snapshot = doc.to_json_compact();
            let out = set(&doc, &p, Value::from("written")).expect("write");
            assert_untouched_off_path(&doc, &out, p.segments());
            assert_eq!(doc.to_json_compact(), snapshot, "input modified");
        }
    }
}

#[test]
fn materialization_builds_nested_structure() {
    let out = set(&Value::empty_object(), &JsonPath::decode(r#"$["a"][0]["b"]"#), 5.into()).expect("write");
    assert_eq!(out.to_json_compact(), r#"{"a":[{"b":5}]}"#);
}

#[test]
fn root_replace_ignores_previous_shape() {
    for doc in sample_documents() {
        let out = set(&doc, &JsonPath::root(), parse(r#"{"x": 1}"#)).expect("write");
        assert_eq!(out.to_json_compact(), r#"{"x":1}"#);
    }
}

#[test]
fn writing_past_the_end_pads_with_null() {
    let doc = parse(r#"{"list": [1]}"#);
    let out = set(&doc, &path!("list", 3), 4.into()).expect("write");
    assert_eq!(out.to_json_compact(), r#"{"list":[1,null,null,4]}"#);
}

#[test]
fn repeated_writes_keep_earlier_versions_intact() {
    let v0 = parse(r#"{"a": {"n": 0}, "b": {"n": 0}}"#);
    let v1 = set(&v0, &path!("a", "n"), 1.into()).expect("write");
    let v2 = set(&v1, &path!("b", "n"), 2.into()).expect("write");

    assert_eq!(v0.to_json_compact(), r#"{"a":{"n":0},"b":{"n":0}}"#);
    assert_eq!(v1.to_json_compact(), r#"{"a":{"n":1},"b":{"n":0}}"#);
    assert_eq!(v2.to_json_compact(), r#"{"a":{"n":1},"b":{"n":2}}"#);
    assert!(v1.get("a").unwrap().ptr_eq(v2.get("a").unwrap()));
    assert!(v0.get("b").unwrap().ptr_eq(v1.get("b").unwrap()));
}
