use super::decision::{
    ClassificationVerdict, DenialReason, RenderDecision, VariantChoice, TARGETS_NOT_FOUND,
};
use crate::classify::{ApiVerdict, ExchangeOutcome, Reply};

/// Read one exchange into a typed verdict.
pub fn verdict_for(outcome: &ExchangeOutcome) -> ClassificationVerdict {
    let verdict = match &outcome.reply {
        Reply::Failed(_) => return ClassificationVerdict::Indeterminate,
        Reply::Verdict(v) => v,
    };

    if let Some(reason) = recognized_denial(verdict) {
        return ClassificationVerdict::Denied { reason };
    }

    match (&verdict.url_white_page, &verdict.url_offer_page) {
        (Some(white), Some(offer)) if !white.is_empty() && !offer.is_empty() => {
            ClassificationVerdict::Allowed {
                permitted_target: offer.clone(),
                restricted_target: white.clone(),
                selected: VariantChoice::from_filter_page(verdict.filter_page.as_deref()),
            }
        }
        _ => ClassificationVerdict::MissingTargets,
    }
}

fn recognized_denial(verdict: &ApiVerdict) -> Option<DenialReason> {
    verdict
        .filter_type
        .as_deref()
        .filter(|t| !t.is_empty())
        .and_then(DenialReason::from_filter_type)
}

/// Derive the terminal action for one page view. Pure and deterministic;
/// first matching rule wins.
///
/// 1. A recognized denial aborts with its fixed message, targets or not.
/// 2. With both targets present the variant follows `filter_page`; an
///    unrecognized selection leaves neither variant chosen and the visitor
///    gets the default page.
/// 3. Fewer than two targets on a successful exchange aborts: the service
///    answered and still withheld the pair.
/// 4. No usable exchange at all fails open to the permitted default, so an
///    outage never blocks real visitors.
pub fn decide(outcome: &ExchangeOutcome) -> RenderDecision {
    match verdict_for(outcome) {
        ClassificationVerdict::Denied { reason } => RenderDecision::Abort(reason.message()),
        ClassificationVerdict::Allowed {
            permitted_target,
            restricted_target,
            selected,
        } => match selected {
            VariantChoice::Restricted => RenderDecision::RenderRestricted(restricted_target),
            VariantChoice::Permitted => RenderDecision::RenderPermitted(Some(permitted_target)),
            VariantChoice::Unselected => RenderDecision::RenderPermitted(None),
        },
        ClassificationVerdict::MissingTargets => RenderDecision::Abort(TARGETS_NOT_FOUND),
        ClassificationVerdict::Indeterminate => RenderDecision::RenderPermitted(None),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::classify::IndeterminateCause;

    fn success_outcome(body: &str) -> ExchangeOutcome {
        ExchangeOutcome {
            status: Some(200),
            elapsed_ms: 5,
            response_size: body.len(),
            error: None,
            body_excerpt: body.to_string(),
            reply: Reply::Verdict(serde_json::from_str(body).unwrap()),
        }
    }

    fn failed_outcome(status: Option<u16>, cause: IndeterminateCause) -> ExchangeOutcome {
        ExchangeOutcome {
            status,
            elapsed_ms: 5,
            response_size: 0,
            error: None,
            body_excerpt: String::new(),
            reply: Reply::Failed(cause),
        }
    }

    #[test]
    fn test_denial_wins_over_targets() {
        let outcome = success_outcome(
            r#"{"filter_type":"flow_banned","filter_page":"offer",
                "url_white_page":"https://a","url_offer_page":"https://b"}"#,
        );
        assert_eq!(decide(&outcome), RenderDecision::Abort("Flow Banned."));
    }

    #[test]
    fn test_each_denial_reason_aborts() {
        for (filter_type, message) in [
            ("subscription_expired", "Your Subscription Expired."),
            ("flow_deleted", "Flow Deleted."),
            ("flow_banned", "Flow Banned."),
        ] {
            let outcome = success_outcome(&format!(r#"{{"filter_type":"{filter_type}"}}"#));
            assert_eq!(decide(&outcome), RenderDecision::Abort(message));
        }
    }

    #[test]
    fn test_unrecognized_denial_falls_through() {
        let outcome = success_outcome(
            r#"{"filter_type":"rate_limited","filter_page":"white",
                "url_white_page":"https://a","url_offer_page":"https://b"}"#,
        );
        assert_eq!(
            decide(&outcome),
            RenderDecision::RenderRestricted("https://a".to_string())
        );
    }

    #[test]
    fn test_white_page_selection() {
        let outcome = success_outcome(
            r#"{"filter_page":"white","url_white_page":"https://a","url_offer_page":"https://b"}"#,
        );
        assert_eq!(
            decide(&outcome),
            RenderDecision::RenderRestricted("https://a".to_string())
        );
    }

    #[test]
    fn test_offer_page_selection() {
        let outcome = success_outcome(
            r#"{"filter_page":"offer","url_white_page":"https://a","url_offer_page":"https://b"}"#,
        );
        assert_eq!(
            decide(&outcome),
            RenderDecision::RenderPermitted(Some("https://b".to_string()))
        );
    }

    #[test]
    fn test_unknown_filter_page_selects_default() {
        let outcome = success_outcome(
            r#"{"filter_page":"gray","url_white_page":"https://a","url_offer_page":"https://b"}"#,
        );
        assert_eq!(decide(&outcome), RenderDecision::RenderPermitted(None));
    }

    #[test]
    fn test_missing_offer_target_aborts() {
        let outcome = success_outcome(r#"{"url_white_page":"https://a"}"#);
        assert_eq!(decide(&outcome), RenderDecision::Abort(TARGETS_NOT_FOUND));
    }

    #[test]
    fn test_missing_both_targets_aborts() {
        let outcome = success_outcome("{}");
        assert_eq!(decide(&outcome), RenderDecision::Abort(TARGETS_NOT_FOUND));
    }

    #[test]
    fn test_empty_string_target_counts_as_missing() {
        let outcome =
            success_outcome(r#"{"url_white_page":"","url_offer_page":"https://b"}"#);
        assert_eq!(decide(&outcome), RenderDecision::Abort(TARGETS_NOT_FOUND));
    }

    #[test]
    fn test_every_indeterminate_cause_fails_open() {
        for (status, cause) in [
            (Some(500u16), IndeterminateCause::NonSuccessStatus),
            (Some(403), IndeterminateCause::NonSuccessStatus),
            (None, IndeterminateCause::TransportError),
            (Some(200), IndeterminateCause::MalformedBody),
        ] {
            let outcome = failed_outcome(status, cause);
            assert_eq!(
                decide(&outcome),
                RenderDecision::RenderPermitted(None),
                "cause {} must fail open",
                cause.as_str()
            );
        }
    }

    #[test]
    fn test_verdict_constructed_once_from_outcome() {
        let outcome = success_outcome(
            r#"{"filter_page":"white","url_white_page":"https://a","url_offer_page":"https://b"}"#,
        );
        let verdict = verdict_for(&outcome);
        assert_eq!(
            verdict,
            ClassificationVerdict::Allowed {
                permitted_target: "https://b".to_string(),
                restricted_target: "https://a".to_string(),
                selected: VariantChoice::Restricted,
            }
        );
    }
}
