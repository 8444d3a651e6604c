//! View to element tree

use super::node::{Element, Node};
use crate::config::{FieldKind, FormField, QuickReply, ResolvedConfig};
use crate::lead::ValidationError;
use crate::transcript::Message;
use crate::view::{ControlSurface, View};

const CHAT_ICON: &str = "M20 2H4c-1.1 0-2 .9-2 2v18l4-4h14c1.1 0 2-.9 2-2V4c0-1.1-.9-2-2-2zm0 14H6l-2 2V4h16v12z";
const SEND_ICON: &str = "M2.01 21L23 12 2.01 3 2 10l15 2-15 2z";

/// Render the whole widget: launcher button plus chat window.
///
/// Interactive elements carry a `data-action` attribute (`toggle`, `send`,
/// `quick-reply`, `submit-lead`) for the host to wire up; element ids are
/// scoped by the config prefix.
#[must_use]
pub fn render_widget(config: &ResolvedConfig, view: &View) -> Node {
    let p = &config.prefix;

    let toggle = Element::new("button")
        .id(format!("{p}-toggle"))
        .attr("data-action", "toggle")
        .attr("aria-label", format!("Chat with {}", config.brand_name))
        .child(icon(CHAT_ICON));

    let mut window = Element::new("div").id(format!("{p}-window"));
    if view.open {
        window = window.class("open");
    }
    let window = window
        .child(header(config))
        .child(messages(config, view))
        .child(
            Element::new("div")
                .id(format!("{p}-quick-container"))
                .children(control_surface(config, &view.control)),
        )
        .child(input_area(config, view.typing))
        .child(
            Element::new("div")
                .id(format!("{p}-powered"))
                .text(&config.copy.powered_by),
        );

    Element::new("div")
        .id(format!("{p}-root"))
        .attr("data-state", view.state.as_str())
        .child(toggle)
        .child(window)
        .into()
}

fn icon(path: &str) -> Element {
    Element::new("svg")
        .attr("viewBox", "0 0 24 24")
        .child(Element::new("path").attr("d", path))
}

fn header(config: &ResolvedConfig) -> Element {
    let p = &config.prefix;
    Element::new("div")
        .id(format!("{p}-header"))
        .child(
            Element::new("div")
                .id(format!("{p}-header-info"))
                .child(
                    Element::new("div")
                        .id(format!("{p}-header-avatar"))
                        .text(&config.avatar),
                )
                .child(
                    Element::new("div")
                        .child(Element::new("h3").text(&config.brand_name))
                        .child(Element::new("p").text(&config.tagline)),
                ),
        )
        .child(
            Element::new("button")
                .id(format!("{p}-close"))
                .attr("data-action", "toggle")
                .text("\u{00D7}"),
        )
}

fn messages(config: &ResolvedConfig, view: &View) -> Element {
    let p = &config.prefix;
    let list = Element::new("div")
        .id(format!("{p}-messages"))
        .children(view.messages.iter().map(|m| message(p, m)));

    if view.typing {
        list.child(
            Element::new("div")
                .id(format!("{p}-typing-indicator"))
                .class(format!("{p}-typing"))
                .children((0..3).map(|_| Element::new("span"))),
        )
    } else {
        list
    }
}

fn message(p: &str, message: &Message) -> Element {
    Element::new("div")
        .class(format!("{p}-msg {}", message.role.as_str()))
        .text(&message.text)
}

fn control_surface(config: &ResolvedConfig, control: &ControlSurface) -> Option<Element> {
    match control {
        ControlSurface::None => None,
        ControlSurface::QuickReplies { replies } => Some(quick_replies(&config.prefix, replies)),
        ControlSurface::LeadForm { form_type, error } => {
            Some(lead_form(config, form_type, error.as_ref()))
        }
    }
}

fn quick_replies(p: &str, replies: &[QuickReply]) -> Element {
    Element::new("div")
        .class(format!("{p}-quick-replies"))
        .children(replies.iter().enumerate().map(|(index, reply)| {
            let label = if reply.icon.is_empty() {
                reply.label.clone()
            } else {
                format!("{} {}", reply.icon, reply.label)
            };
            Element::new("button")
                .class(format!("{p}-quick-btn"))
                .attr("data-action", "quick-reply")
                .attr("data-index", index.to_string())
                .text(label)
        }))
}

fn lead_form(config: &ResolvedConfig, form_type: &str, error: Option<&ValidationError>) -> Element {
    let p = &config.prefix;
    let schema = config.form(form_type);

    let contact = [
        ("name", "text", "Your Name"),
        ("email", "email", "Email Address"),
        ("phone", "tel", "Phone Number"),
    ]
    .into_iter()
    .map(|(key, kind, placeholder)| {
        Element::new("input")
            .attr("type", kind)
            .id(format!("{p}-lead-{key}"))
            .attr("name", key)
            .attr("placeholder", placeholder)
    });

    let mut form = Element::new("div")
        .class(format!("{p}-lead-form"))
        .attr("data-form-type", form_type)
        .child(Element::new("h4").text(&schema.title))
        .children(contact)
        .children(schema.fields.iter().map(|field| form_field(p, field)));

    if let Some(error) = error {
        form = form.child(
            Element::new("p")
                .class(format!("{p}-lead-error"))
                .attr("role", "alert")
                .text(error.prompt(&config.copy)),
        );
    }

    form.child(
        Element::new("button")
            .class(format!("{p}-lead-submit"))
            .attr("data-action", "submit-lead")
            .text("Submit"),
    )
}

fn form_field(p: &str, field: &FormField) -> Element {
    let id = format!("{p}-lead-{}", field.key);
    match field.kind {
        FieldKind::Text => Element::new("input")
            .attr("type", "text")
            .id(id)
            .attr("name", &field.key)
            .attr("placeholder", &field.placeholder),
        FieldKind::Select => Element::new("select")
            .id(id)
            .attr("name", &field.key)
            .child(Element::new("option").attr("value", "").text(&field.placeholder))
            .children(field.options.iter().map(|option| {
                Element::new("option")
                    .attr("value", &option.value)
                    .text(&option.label)
            })),
    }
}

fn input_area(config: &ResolvedConfig, busy: bool) -> Element {
    let p = &config.prefix;
    let mut send = Element::new("button")
        .id(format!("{p}-send"))
        .attr("data-action", "send");
    if busy {
        send = send.attr("disabled", "disabled");
    }

    Element::new("div")
        .id(format!("{p}-input-area"))
        .child(
            Element::new("input")
                .id(format!("{p}-input"))
                .attr("type", "text")
                .attr("placeholder", &config.copy.input_placeholder)
                .attr("autocomplete", "off"),
        )
        .child(send.child(icon(SEND_ICON)))
}
