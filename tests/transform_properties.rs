//! Property-based tests for error tree transformation

use std::collections::HashSet;

use errtree::testing::{messages_match, shape_preserved};
use errtree::{
    concatenate_messages, flatten_value, transform_errors, try_transform_errors, ErrorMap, Node,
    PreserveKeys,
};
use proptest::prelude::*;

fn message() -> impl Strategy<Value = String> {
    "[A-Za-z ]{1,12}"
}

/// Lists of messages under maps, nested a few levels deep.
fn field_errors() -> impl Strategy<Value = ErrorMap> {
    let leaf = prop::collection::vec(message(), 0..5).prop_map(Node::list);
    let tree = leaf.prop_recursive(3, 24, 4, |inner| {
        prop::collection::vec(("[a-z]{1,5}", inner), 0..4).prop_map(Node::map)
    });
    prop::collection::vec(("[a-z]{1,5}", tree), 0..5)
        .prop_map(|entries| entries.into_iter().collect::<ErrorMap>())
}

fn leaves(node: &Node, out: &mut Vec<String>) {
    match node {
        Node::Message(text) => out.push(text.clone()),
        Node::List(items) => items.iter().for_each(|item| leaves(item, out)),
        Node::Map(map) => map.values().for_each(|value| leaves(value, out)),
    }
}

proptest! {
    #[test]
    fn prop_flatten_keeps_every_leaf(errors in field_errors()) {
        let node = Node::from(errors);
        let mut expected = Vec::new();
        leaves(&node, &mut expected);

        prop_assert_eq!(flatten_value(&node), expected);
    }

    #[test]
    fn prop_concatenate_has_each_distinct_message_once(
        messages in prop::collection::vec(message(), 0..10)
    ) {
        let sentence = concatenate_messages(&messages);
        let distinct: Vec<&str> = messages.iter().map(String::as_str).collect();

        prop_assert!(messages_match(&sentence, &distinct));
    }

    #[test]
    fn prop_concatenate_ignores_repetition(
        messages in prop::collection::vec(message(), 1..6),
        times in 2usize..4
    ) {
        let repeated: Vec<&String> = std::iter::repeat(&messages).take(times).flatten().collect();
        prop_assert_eq!(concatenate_messages(repeated), concatenate_messages(&messages));
    }

    #[test]
    fn prop_flattened_keys_become_single_messages(errors in field_errors()) {
        let display = transform_errors(&errors, &PreserveKeys::default());

        prop_assert_eq!(display.keys().collect::<Vec<_>>(), errors.keys().collect::<Vec<_>>());
        prop_assert!(display.values().all(Node::is_message));
    }

    #[test]
    fn prop_preserved_keys_keep_their_shape(errors in field_errors()) {
        let preserve: PreserveKeys = errors.keys().collect();
        let display = transform_errors(&errors, &preserve);

        for ((_, before), (_, after)) in errors.iter().zip(display.iter()) {
            match before {
                // A preserved list is treated as a list of per-element maps;
                // here it holds messages, which are carried through.
                Node::List(_) => prop_assert_eq!(before, after),
                _ => prop_assert!(shape_preserved(before, after)),
            }
        }
    }

    #[test]
    fn prop_strict_agrees_with_lenient_on_maps(errors in field_errors()) {
        let map_keys: HashSet<&str> = errors
            .iter()
            .filter(|(_, value)| value.is_map())
            .map(|(key, _)| key)
            .collect();
        let preserve: PreserveKeys = map_keys.into_iter().collect();

        prop_assert_eq!(
            try_transform_errors(&errors, &preserve),
            Ok(transform_errors(&errors, &preserve))
        );
    }

    #[test]
    fn prop_transform_is_pure(errors in field_errors()) {
        let snapshot = errors.clone();
        let preserve: PreserveKeys = errors.keys().take(1).collect();

        let first = transform_errors(&errors, &preserve);
        let second = transform_errors(&errors, &preserve);

        prop_assert_eq!(&errors, &snapshot);
        prop_assert_eq!(first, second);
    }
}
