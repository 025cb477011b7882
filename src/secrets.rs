//! Reconciliation of server-masked secrets.
//!
//! The server never returns real secret values: reads come back with the
//! secret replaced by a mask, emptied, or dropped entirely. Persisting
//! that would wipe the secret from state and produce a phantom diff on
//! the next plan. The reconciler overlays the known values from the
//! previous state onto the freshly observed record before it is stored.

use crate::value::{AttrValue, Record};

/// The mask the server substitutes for secret values on read.
pub const SENSITIVE_PLACEHOLDER: &str = "********";

fn is_masked(observed: Option<&AttrValue>) -> bool {
    match observed {
        None | Some(AttrValue::Null) => true,
        Some(AttrValue::Str(s)) => s.is_empty() || s == SENSITIVE_PLACEHOLDER,
        Some(_) => false,
    }
}

/// Overlay known secrets from `prior` onto `observed`, in place.
///
/// For each sensitive attribute: when the prior state holds a real,
/// non-empty value and the observation is masked (placeholder, empty
/// string, null, or absent), the prior value wins. A genuinely new
/// server-side value (anything that is not a mask) is kept as observed,
/// and an attribute the user never set stays unset.
pub fn reconcile(observed: &mut Record, prior: &Record, sensitive_attrs: &[String]) {
    for attr in sensitive_attrs {
        let Some(AttrValue::Str(known)) = prior.get(attr) else { continue };
        if known.is_empty() || known == SENSITIVE_PLACEHOLDER {
            continue;
        }
        if is_masked(observed.get(attr)) {
            observed.set(attr.clone(), AttrValue::Str(known.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_placeholder_is_replaced_by_known_value() {
        let mut prior = Record::new();
        prior.set("password", AttrValue::Str("hunter2".into()));
        let mut observed = Record::new();
        observed.set("password", AttrValue::Str(SENSITIVE_PLACEHOLDER.into()));

        reconcile(&mut observed, &prior, &attrs(&["password"]));
        assert_eq!(observed.get("password"), Some(&AttrValue::Str("hunter2".into())));
    }

    #[test]
    fn test_empty_null_and_absent_observations_are_masks() {
        let mut prior = Record::new();
        prior.set("api_key", AttrValue::Str("k".into()));

        for masked in [Some(AttrValue::Str(String::new())), Some(AttrValue::Null), None] {
            let mut observed = Record::new();
            if let Some(value) = masked {
                observed.set("api_key", value);
            }
            reconcile(&mut observed, &prior, &attrs(&["api_key"]));
            assert_eq!(observed.get("api_key"), Some(&AttrValue::Str("k".into())));
        }
    }

    #[test]
    fn test_real_observed_value_wins() {
        let mut prior = Record::new();
        prior.set("password", AttrValue::Str("old".into()));
        let mut observed = Record::new();
        observed.set("password", AttrValue::Str("rotated".into()));

        reconcile(&mut observed, &prior, &attrs(&["password"]));
        assert_eq!(observed.get("password"), Some(&AttrValue::Str("rotated".into())));
    }

    #[test]
    fn test_never_set_secret_stays_unset() {
        let prior = Record::new();
        let mut observed = Record::new();
        reconcile(&mut observed, &prior, &attrs(&["password"]));
        assert!(!observed.is_set("password"));

        // a prior placeholder is not a known value either
        let mut prior = Record::new();
        prior.set("password", AttrValue::Str(SENSITIVE_PLACEHOLDER.into()));
        let mut observed = Record::new();
        observed.set("password", AttrValue::Str(String::new()));
        reconcile(&mut observed, &prior, &attrs(&["password"]));
        assert_eq!(observed.get("password"), Some(&AttrValue::Str(String::new())));
    }

    #[test]
    fn test_non_sensitive_attrs_untouched() {
        let mut prior = Record::new();
        prior.set("host", AttrValue::Str("old-host".into()));
        let mut observed = Record::new();
        reconcile(&mut observed, &prior, &attrs(&["password"]));
        assert!(!observed.is_set("host"));
    }
}
