//! Property-based tests using proptest
//!
//! These tests verify the matching rules of the filter predicate and the
//! page-boundary independence of the collector using randomized inputs.

use proptest::prelude::*;
use serde::Serialize;
use std::future::{ready, Ready};
use tokio_test::block_on;
use vultr_lookup::resource::{
    collect, collect_matches, project, AttributeValue, FilterSpec, LookupError, Page, PageLimits,
    Predicate,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
struct Instance {
    label: String,
    status: String,
    region: String,
    vcpu_count: i64,
    backups: bool,
    tags: Vec<String>,
}

/// Generate arbitrary instance data for testing
fn arb_instance() -> impl Strategy<Value = Instance> {
    (
        "[a-z][a-z0-9-]{0,15}",
        prop_oneof!["active", "pending", "suspended", "resizing"],
        prop_oneof!["ewr", "lax", "ams", "fra", "sgp"],
        1i64..16,
        any::<bool>(),
        prop::collection::vec("[a-z]{1,6}", 0..4),
    )
        .prop_map(|(label, status, region, vcpu_count, backups, tags)| Instance {
            label,
            status: status.to_string(),
            region: region.to_string(),
            vcpu_count,
            backups,
            tags,
        })
}

/// Generate a list of instances
fn arb_instance_list() -> impl Strategy<Value = Vec<Instance>> {
    prop::collection::vec(arb_instance(), 0..60)
}

/// Serve `items` in pages of `chunk` with cursors "1", "2", ...
fn paged(
    items: &[Instance],
    chunk: usize,
) -> impl FnMut(Option<String>) -> Ready<anyhow::Result<Page<Instance>>> {
    let pages: Vec<Vec<Instance>> = if items.is_empty() {
        vec![vec![]]
    } else {
        items.chunks(chunk).map(|c| c.to_vec()).collect()
    };

    move |cursor| {
        let idx: usize = cursor.map(|c| c.parse().unwrap()).unwrap_or(0);
        let next = (idx + 1 < pages.len()).then(|| (idx + 1).to_string());
        ready(Ok(Page::new(pages[idx].clone(), next)))
    }
}

fn canonical(value: &AttributeValue) -> Option<String> {
    match value {
        AttributeValue::List(items) => items.first().and_then(canonical),
        scalar => scalar.as_canonical().map(|s| s.into_owned()),
    }
}

proptest! {
    /// Filtering on an attribute's own value always matches the resource
    #[test]
    fn projection_matches_itself(instance in arb_instance()) {
        let attrs = project(&instance);
        for (name, value) in attrs.iter() {
            let Some(text) = canonical(value) else {
                continue; // empty list: nothing to filter on
            };
            let predicate = Predicate::compile(&FilterSpec::new().with(name, &[text.as_str()])).unwrap();
            prop_assert!(predicate.matches(&attrs), "{} = {} did not match", name, text);
        }
    }

    /// Clauses on attributes the resource does not have never match
    #[test]
    fn absent_attribute_never_matches(
        instance in arb_instance(),
        value in "[a-z0-9]{0,8}"
    ) {
        let predicate = Predicate::compile(
            &FilterSpec::new().with("not_an_attribute", &[value.as_str()])
        ).unwrap();
        prop_assert!(!predicate.matches(&project(&instance)));
    }

    /// Adding a clause never increases the match count
    #[test]
    fn extra_clause_only_narrows(
        items in arb_instance_list(),
        status in prop_oneof!["active", "pending"],
        region in prop_oneof!["ewr", "lax"]
    ) {
        let loose = Predicate::compile(&FilterSpec::new().with("status", &[status.as_str()])).unwrap();
        let tight = Predicate::compile(
            &FilterSpec::new().with("status", &[status.as_str()]).with("region", &[region.as_str()])
        ).unwrap();

        let loose_count = items.iter().filter(|i| loose.matches(&project(i))).count();
        let tight_count = items.iter().filter(|i| tight.matches(&project(i))).count();
        prop_assert!(tight_count <= loose_count);
    }

    /// Matching is case-sensitive
    #[test]
    fn matching_is_case_sensitive(instance in arb_instance()) {
        let upper = instance.status.to_uppercase();
        let predicate = Predicate::compile(&FilterSpec::new().with("status", &[upper.as_str()])).unwrap();
        prop_assert!(!predicate.matches(&project(&instance)));
    }

    /// Page boundaries do not change which items match
    #[test]
    fn page_split_does_not_change_matches(
        items in arb_instance_list(),
        chunk in 1usize..10,
        status in prop_oneof!["active", "pending", "suspended"]
    ) {
        let predicate = Predicate::compile(&FilterSpec::new().with("status", &[status.as_str()])).unwrap();

        let single = block_on(collect_matches(
            "instances", &predicate, PageLimits::default(), paged(&items, items.len().max(1)),
        )).unwrap();
        let split = block_on(collect_matches(
            "instances", &predicate, PageLimits::default(), paged(&items, chunk),
        )).unwrap();

        let expected: Vec<_> = items.iter().filter(|i| i.status == status).cloned().collect();
        prop_assert_eq!(&single, &expected);
        prop_assert_eq!(&split, &expected);
    }

    /// Zero matches is NotFound, one is success, more is Ambiguous with the true count
    #[test]
    fn arity_contract(
        items in arb_instance_list(),
        chunk in 1usize..10,
        region in prop_oneof!["ewr", "lax", "ams"]
    ) {
        let predicate = Predicate::compile(&FilterSpec::new().with("region", &[region.as_str()])).unwrap();
        let expected: Vec<_> = items.iter().filter(|i| i.region == region).cloned().collect();

        let result = block_on(collect(
            "instances", &predicate, PageLimits::default(), paged(&items, chunk),
        ));

        match expected.len() {
            0 => {
                let is_not_found = matches!(result, Err(LookupError::NotFound { .. }));
                prop_assert!(is_not_found)
            }
            1 => prop_assert_eq!(result.unwrap(), expected[0].clone()),
            n => prop_assert_eq!(result.unwrap_err().ambiguous_count(), Some(n)),
        }
    }

    /// List attributes match when any element is acceptable
    #[test]
    fn list_attribute_any_element(instance in arb_instance()) {
        let predicate = Predicate::compile(
            &FilterSpec::new().with("tags", &["zzzzzzz"])
        ).unwrap();
        prop_assert!(!predicate.matches(&project(&instance)));

        for tag in &instance.tags {
            let predicate = Predicate::compile(&FilterSpec::new().with("tags", &[tag.as_str()])).unwrap();
            prop_assert!(predicate.matches(&project(&instance)));
        }
    }
}

/// Fixed scenarios for the collector contract
mod scenarios {
    use super::*;
    use std::cell::Cell;

    #[derive(Debug, Clone, PartialEq, Serialize)]
    struct Named {
        name: String,
    }

    fn named(name: &str) -> Named {
        Named {
            name: name.to_string(),
        }
    }

    fn by_name(value: &str) -> Predicate {
        Predicate::compile(&FilterSpec::new().with("name", &[value])).unwrap()
    }

    #[test]
    fn empty_filter_fails_before_listing() {
        let calls = Cell::new(0);
        let result = Predicate::compile(&FilterSpec::new()).map(|predicate| {
            block_on(collect::<Named, _, _>(
                "things",
                &predicate,
                PageLimits::default(),
                |_| {
                    calls.set(calls.get() + 1);
                    ready(Ok(Page::last(vec![])))
                },
            ))
        });

        assert!(matches!(result, Err(LookupError::EmptyFilter)));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn single_page_single_match() {
        let found = block_on(collect(
            "things",
            &by_name("a"),
            PageLimits::default(),
            |_| ready(Ok(Page::last(vec![named("a")]))),
        ))
        .unwrap();
        assert_eq!(found, named("a"));
    }

    #[test]
    fn same_item_on_two_pages_is_ambiguous() {
        let err = block_on(collect(
            "things",
            &by_name("a"),
            PageLimits::default(),
            |cursor: Option<String>| {
                ready(Ok(match cursor {
                    None => Page::new(vec![named("a")], Some("next".into())),
                    Some(_) => Page::new(vec![named("a")], Some(String::new())),
                }))
            },
        ))
        .unwrap_err();
        assert_eq!(err.ambiguous_count(), Some(2));
    }

    #[test]
    fn no_match_is_not_found() {
        let err = block_on(collect(
            "things",
            &by_name("c"),
            PageLimits::default(),
            |_| ready(Ok(Page::last(vec![named("a"), named("b")]))),
        ))
        .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn first_call_error_is_upstream() {
        let calls = Cell::new(0);
        let err = block_on(collect::<Named, _, _>(
            "things",
            &by_name("a"),
            PageLimits::default(),
            |_| {
                calls.set(calls.get() + 1);
                ready(Err(anyhow::anyhow!("API request failed: 500")))
            },
        ))
        .unwrap_err();

        assert!(matches!(err, LookupError::UpstreamList { .. }));
        assert_eq!(calls.get(), 1);
    }
}
