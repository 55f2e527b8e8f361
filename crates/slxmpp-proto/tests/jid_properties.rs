//! Property tests for address normalization.

use proptest::prelude::*;
use slxmpp_proto::Jid;

fn node() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9._-]{1,16}"
}

fn domain() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9-]{1,12}(\\.[a-zA-Z]{2,6}){0,2}"
}

fn resource() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 @/._-]{1,16}"
}

proptest! {
    #[test]
    fn normalization_is_stable(n in node(), d in domain(), r in proptest::option::of(resource())) {
        let raw = match &r {
            Some(r) => format!("{n}@{d}/{r}"),
            None => format!("{n}@{d}"),
        };
        let jid = Jid::parse(&raw).unwrap();
        let again = Jid::parse(&jid.to_string()).unwrap();
        prop_assert_eq!(&jid, &again);
        prop_assert_eq!(jid.is_bare(), r.is_none());
    }

    #[test]
    fn case_never_affects_bare_equality(n in node(), d in domain()) {
        let lower = Jid::parse(&format!("{n}@{d}")).unwrap();
        let upper = Jid::parse(&format!("{}@{}", n.to_uppercase(), d.to_uppercase())).unwrap();
        prop_assert_eq!(lower, upper);
    }

    #[test]
    fn bare_drops_only_the_resource(n in node(), d in domain(), r in resource()) {
        let full = Jid::parse(&format!("{n}@{d}/{r}")).unwrap();
        let bare = full.bare();
        prop_assert!(bare.is_bare());
        prop_assert!(bare.bare_eq(&full));
        prop_assert_eq!(bare.node(), full.node());
        prop_assert_eq!(bare.domain(), full.domain());
    }
}
