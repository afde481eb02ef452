/// Denial verdicts the gate recognizes. Anything else in `filter_type`
/// falls through as if no denial was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    SubscriptionExpired,
    FlowDeleted,
    FlowBanned,
}

impl DenialReason {
    pub fn from_filter_type(value: &str) -> Option<Self> {
        match value {
            "subscription_expired" => Some(Self::SubscriptionExpired),
            "flow_deleted" => Some(Self::FlowDeleted),
            "flow_banned" => Some(Self::FlowBanned),
            _ => None,
        }
    }

    /// User-facing abort message, verbatim what the visitor sees.
    pub fn message(self) -> &'static str {
        match self {
            Self::SubscriptionExpired => "Your Subscription Expired.",
            Self::FlowDeleted => "Flow Deleted.",
            Self::FlowBanned => "Flow Banned.",
        }
    }
}

/// Which variant the service asked for when both targets are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantChoice {
    Permitted,
    Restricted,
    /// `filter_page` absent or carrying a value we do not recognize.
    Unselected,
}

impl VariantChoice {
    pub fn from_filter_page(value: Option<&str>) -> Self {
        match value {
            Some("offer") => Self::Permitted,
            Some("white") => Self::Restricted,
            _ => Self::Unselected,
        }
    }
}

/// Typed reading of one exchange, constructed exactly once per request and
/// immediately consumed by [`decide`](super::decide).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationVerdict {
    Denied {
        reason: DenialReason,
    },
    Allowed {
        permitted_target: String,
        restricted_target: String,
        selected: VariantChoice,
    },
    /// The service answered successfully but without both targets.
    MissingTargets,
    /// No usable answer at all; drives the fail-open path.
    Indeterminate,
}

/// Terminal action for one page view. Everything the gate can conclude
/// lands in one of these three shapes; the renderer takes it from here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderDecision {
    /// Show the permitted variant; `None` means the default page rather
    /// than an explicit target.
    RenderPermitted(Option<String>),
    RenderRestricted(String),
    Abort(&'static str),
}

/// Message shown when a successful verdict lacks its target pair.
pub const TARGETS_NOT_FOUND: &str = "Offer Page or White Page Not Found.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denial_reason_mapping() {
        assert_eq!(
            DenialReason::from_filter_type("subscription_expired"),
            Some(DenialReason::SubscriptionExpired)
        );
        assert_eq!(
            DenialReason::from_filter_type("flow_deleted"),
            Some(DenialReason::FlowDeleted)
        );
        assert_eq!(
            DenialReason::from_filter_type("flow_banned"),
            Some(DenialReason::FlowBanned)
        );
        assert_eq!(DenialReason::from_filter_type("rate_limited"), None);
        assert_eq!(DenialReason::from_filter_type(""), None);
    }

    #[test]
    fn test_denial_messages() {
        assert_eq!(
            DenialReason::SubscriptionExpired.message(),
            "Your Subscription Expired."
        );
        assert_eq!(DenialReason::FlowDeleted.message(), "Flow Deleted.");
        assert_eq!(DenialReason::FlowBanned.message(), "Flow Banned.");
    }

    #[test]
    fn test_variant_choice_mapping() {
        assert_eq!(
            VariantChoice::from_filter_page(Some("offer")),
            VariantChoice::Permitted
        );
        assert_eq!(
            VariantChoice::from_filter_page(Some("white")),
            VariantChoice::Restricted
        );
        assert_eq!(
            VariantChoice::from_filter_page(Some("gray")),
            VariantChoice::Unselected
        );
        assert_eq!(
            VariantChoice::from_filter_page(None),
            VariantChoice::Unselected
        );
    }
}
