//! Entitlement rules, plan catalog, and dashboard navigation.
//!
//! Access to the validator is gated on an active subscription. The
//! entitlement is always passed explicitly by the caller.

use serde::Serialize;

/// Whether the user holds an active subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Entitlement {
    Active,
    None,
}

impl Entitlement {
    pub fn from_subscription(has_active: bool) -> Self {
        if has_active {
            Self::Active
        } else {
            Self::None
        }
    }

    pub fn is_active(self) -> bool {
        self == Self::Active
    }
}

/* --------------------------------------------------------------------------
   Navigation
   -------------------------------------------------------------------------- */

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub name: &'static str,
    pub href: &'static str,
}

pub const NAV_HOME: NavLink = NavLink {
    name: "Home",
    href: "/dashboard",
};

pub const NAV_VALIDATOR: NavLink = NavLink {
    name: "Template Validator",
    href: "/dashboard/validator",
};

/// Dashboard links visible for `entitlement`. "Home" is always present.
pub fn nav_links(entitlement: Entitlement) -> Vec<NavLink> {
    let mut links = vec![NAV_HOME];
    if entitlement.is_active() {
        links.push(NAV_VALIDATOR);
    }
    links
}

/* --------------------------------------------------------------------------
   Plans and features
   -------------------------------------------------------------------------- */

/// A one-time purchase plan. `amount` is in major currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub code: &'static str,
    pub name: &'static str,
    pub price: &'static str,
    pub amount: i64,
    pub features: &'static [&'static str],
}

pub const PLAN_BASIC: Plan = Plan {
    code: "basic",
    name: "Basic Plan",
    price: "$2",
    amount: 2,
    features: &["2 Template Creations", "5 Updates per Template"],
};

pub const PLAN_PRO: Plan = Plan {
    code: "pro",
    name: "Pro Plan",
    price: "$5",
    amount: 5,
    features: &["Unlimited Template Creation", "Unlimited Updates"],
};

pub const PLANS: &[Plan] = &[PLAN_BASIC, PLAN_PRO];

/// Look up the plan purchased for `amount` major units.
pub fn plan_for_amount(amount: i64) -> Option<&'static Plan> {
    PLANS.iter().find(|p| p.amount == amount)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureStatus {
    Implemented,
    Upcoming,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feature {
    pub name: &'static str,
    pub description: Option<&'static str>,
    pub status: FeatureStatus,
}

const fn implemented(name: &'static str, description: &'static str) -> Feature {
    Feature {
        name,
        description: Some(description),
        status: FeatureStatus::Implemented,
    }
}

const fn upcoming(name: &'static str) -> Feature {
    Feature {
        name,
        description: None,
        status: FeatureStatus::Upcoming,
    }
}

pub const IMPLEMENTED_FEATURES: &[Feature] = &[
    implemented(
        "HTML to Email Conversion",
        "Convert HTML code to email-compatible HTML easily.",
    ),
    implemented(
        "Template Preview (Original & Transformed)",
        "View both original and transformed templates side by side.",
    ),
    implemented(
        "Download Minified Files",
        "Download both original and transformed templates in minified form.",
    ),
    implemented(
        "Live Edit Transformed Templates",
        "Make real-time changes to the transformed templates.",
    ),
    implemented(
        "Error Detection for Unsupported Styling/Tags",
        "Warns you about unsupported styles or tags.",
    ),
];

pub const UPCOMING_FEATURES: &[Feature] = &[
    upcoming("Email Client Previews"),
    upcoming("Send Test Email to Yourself"),
    upcoming("Mobile View Email Preview"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_is_always_visible() {
        assert_eq!(nav_links(Entitlement::None), vec![NAV_HOME]);
    }

    #[test]
    fn validator_link_requires_active_entitlement() {
        let links = nav_links(Entitlement::Active);
        assert_eq!(links, vec![NAV_HOME, NAV_VALIDATOR]);
    }

    #[test]
    fn entitlement_from_subscription() {
        assert_eq!(Entitlement::from_subscription(true), Entitlement::Active);
        assert_eq!(Entitlement::from_subscription(false), Entitlement::None);
    }

    #[test]
    fn plans_are_found_by_amount() {
        assert_eq!(plan_for_amount(2).map(|p| p.code), Some("basic"));
        assert_eq!(plan_for_amount(5).map(|p| p.code), Some("pro"));
        assert!(plan_for_amount(3).is_none());
    }

    #[test]
    fn feature_lists_have_expected_status() {
        assert!(IMPLEMENTED_FEATURES
            .iter()
            .all(|f| f.status == FeatureStatus::Implemented && f.description.is_some()));
        assert!(UPCOMING_FEATURES
            .iter()
            .all(|f| f.status == FeatureStatus::Upcoming));
    }
}
