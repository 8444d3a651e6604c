//! Built-in brand presets
//!
//! Each brand is nothing more than a `WidgetConfig`; the engine has no
//! brand-specific code paths.

use super::{
    ColorConfig, CopyConfig, EndpointConfig, FormField, FormSchema, QuickReply, SelectOption,
    WidgetConfig,
};
use std::collections::BTreeMap;

pub const PRESET_NAMES: [&str; 2] = ["ticket99", "eventitans"];

/// Look up a preset by name
#[must_use]
pub fn preset(name: &str) -> Option<WidgetConfig> {
    match name.trim().to_ascii_lowercase().as_str() {
        "ticket99" | "tickets99" => Some(ticket99()),
        "eventitans" => Some(eventitans()),
        _ => None,
    }
}

/// Ticketing brand: partnership form plus a generic "get started" form
#[must_use]
pub fn ticket99() -> WidgetConfig {
    let mut forms = BTreeMap::new();
    forms.insert(
        "partner".to_string(),
        FormSchema {
            title: "Partnership Inquiry".to_string(),
            fields: vec![FormField::select(
                "partnerType",
                "Partnership Type",
                vec![
                    SelectOption::new("sponsor", "Sponsor"),
                    SelectOption::new("venue", "Venue Partner"),
                    SelectOption::new("corporate", "Corporate"),
                    SelectOption::new("reseller", "Reseller"),
                ],
            )],
        },
    );

    WidgetConfig {
        brand_name: Some("Tickets99".to_string()),
        brand_key: Some("ticket99".to_string()),
        prefix: Some("t99".to_string()),
        avatar: Some("\u{1F3AB}".to_string()),
        tagline: Some("AI Assistant".to_string()),
        colors: ColorConfig {
            primary: Some("#f97316".to_string()),
            secondary: Some("#ef4444".to_string()),
            gradient: None,
        },
        position: Some("right".to_string()),
        z_index: Some(99_999),
        endpoints: EndpointConfig {
            chat: Some("/api/ticket99/chat".to_string()),
            leads: Some("/api/leads".to_string()),
            clear: Some("/api/clear".to_string()),
        },
        quick_replies: vec![
            QuickReply::new("Organize an event", "\u{1F3AD}"),
            QuickReply::new("Find events", "\u{1F50D}"),
            QuickReply::new("Partnership", "\u{1F91D}"),
            QuickReply::new("Pricing", "\u{1F4B0}"),
        ],
        forms,
        default_form: Some(FormSchema {
            title: "Get Started".to_string(),
            fields: vec![FormField::text("eventType", "Event Type (optional)")],
        }),
        copy: CopyConfig {
            lead_fallback: Some(
                "Sorry, couldn't submit your details. Please try emailing support@tickets99.com."
                    .to_string(),
            ),
            ..CopyConfig::default()
        },
    }
}

/// Event-management brand: one form with a plan selector
#[must_use]
pub fn eventitans() -> WidgetConfig {
    WidgetConfig {
        brand_name: Some("Eventitans".to_string()),
        brand_key: Some("eventitans".to_string()),
        prefix: Some("et".to_string()),
        avatar: Some("\u{1F31F}".to_string()),
        tagline: Some("Event Management AI".to_string()),
        colors: ColorConfig {
            primary: Some("#6366f1".to_string()),
            secondary: Some("#8b5cf6".to_string()),
            gradient: None,
        },
        position: Some("left".to_string()),
        // Sits below the ticketing widget when both are mounted on one page
        z_index: Some(99_997),
        endpoints: EndpointConfig {
            chat: Some("/api/eventitans/chat".to_string()),
            leads: Some("/api/leads".to_string()),
            clear: Some("/api/clear".to_string()),
        },
        quick_replies: vec![
            QuickReply::new("Plan an event", "\u{1F4CB}"),
            QuickReply::new("Manage venue", "\u{1F3DB}\u{FE0F}"),
            QuickReply::new("Analytics", "\u{1F4CA}"),
            QuickReply::new("Pricing", "\u{1F4B3}"),
        ],
        forms: BTreeMap::new(),
        default_form: Some(FormSchema {
            title: "Get Started with Eventitans".to_string(),
            fields: vec![FormField::select(
                "plan",
                "Interested Plan",
                vec![
                    SelectOption::new("starter", "Starter (Free)"),
                    SelectOption::new("pro", "Pro (Rs 2,999/mo)"),
                    SelectOption::new("enterprise", "Enterprise"),
                ],
            )],
        }),
        copy: CopyConfig {
            welcome: Some(
                "Welcome to Eventitans! How can I help you plan and manage your events?"
                    .to_string(),
            ),
            lead_thanks: Some(
                "Thank you! Our team will contact you within 24 hours to get you started. Anything else I can help with?"
                    .to_string(),
            ),
            lead_fallback: Some(
                "Sorry, couldn't submit your details. Please try emailing support@eventitans.com."
                    .to_string(),
            ),
            ..CopyConfig::default()
        },
    }
}
