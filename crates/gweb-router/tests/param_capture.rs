//! Property tests for parameter capture.

use std::sync::Arc;

use gweb_router::{Params, PathTree, Router};
use proptest::prelude::*;

fn segment() -> impl Strategy<Value = String> {
    "[a-z0-9_.-]{1,8}"
}

proptest! {
    /// A pattern with k params yields exactly k captures, in order.
    #[test]
    fn captures_every_param_in_order(
        statics in prop::collection::vec(segment(), 1..5),
        values in prop::collection::vec(segment(), 5),
    ) {
        let mut pattern = String::new();
        let mut path = String::new();
        for (i, literal) in statics.iter().enumerate() {
            pattern.push_str(&format!("/{literal}/:p{i}"));
            path.push_str(&format!("/{literal}/{}", values[i]));
        }

        let mut tree = PathTree::new();
        tree.add(&pattern, Arc::from(vec![1u8])).unwrap();

        let mut params = Params::new();
        let found = tree.find(&path, &mut params);
        prop_assert!(found.is_match());
        prop_assert_eq!(params.len(), statics.len());
        for (i, (key, value)) in params.iter().enumerate() {
            prop_assert_eq!(key, format!("p{i}"));
            prop_assert_eq!(value, values[i].as_str());
        }
    }

    /// Catch-alls hand back the remainder verbatim.
    #[test]
    fn catch_all_returns_remainder(rest in prop::collection::vec(segment(), 0..6)) {
        let mut tree = PathTree::new();
        tree.add("/static/*filepath", Arc::from(vec![1u8])).unwrap();

        let remainder = rest.join("/");
        let mut params = Params::new();
        let found = tree.find(&format!("/static/{remainder}"), &mut params);
        prop_assert!(found.is_match());
        prop_assert_eq!(params.get("filepath"), Some(remainder.as_str()));
    }
}
