//! Notification payloads for classified events.
//!
//! Two field sets exist: the deployment view (pod name and deployed image
//! tag) and the general view (namespace, message, object, name, reason,
//! component). [`format`] emits both, deployment fields first.

use crate::types::{Color, EventRecord, Field, NotificationPayload};

/// Prefix stripped from image-pull messages to obtain the image tag.
pub const IMAGE_PULLED_PREFIX: &str = "Successfully pulled image ";

/// Which field sets a payload carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ViewKind {
    /// Deployment fields followed by general fields.
    #[default]
    Composite,
    /// Deployment fields only.
    CustomDeploy,
    /// General fields only.
    General,
}

impl ViewKind {
    /// Returns the view as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Composite => "composite",
            Self::CustomDeploy => "custom_deploy",
            Self::General => "general",
        }
    }
}

impl std::fmt::Display for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Returns the deployed image tag carried by an image-pull message.
///
/// Messages without the prefix are returned unchanged.
#[must_use]
pub fn deployed_image_tag(message: &str) -> &str {
    message.strip_prefix(IMAGE_PULLED_PREFIX).unwrap_or(message)
}

/// Resolves the payload color.
///
/// An explicit color wins; otherwise `Success*` reasons are good and
/// `Fail*` reasons are danger.
#[must_use]
pub fn resolve_color(reason: &str, color: Color) -> Color {
    match color {
        Color::None if reason.starts_with("Success") => Color::Good,
        Color::None if reason.starts_with("Fail") => Color::Danger,
        other => other,
    }
}

/// Builds the deployment view fields.
#[must_use]
pub fn custom_deploy_fields(event: &EventRecord) -> Vec<Field> {
    vec![
        Field::long("Pod-Name", event.name()),
        Field::long("Deployed-Image-Tag", deployed_image_tag(event.message())),
    ]
}

/// Builds the general view fields.
#[must_use]
pub fn general_fields(event: &EventRecord) -> Vec<Field> {
    vec![
        Field::short("Namespace", event.namespace()),
        Field::long("Message", event.message()),
        Field::short("Object", event.involved_object_kind()),
        Field::short("Name", event.name()),
        Field::short("Reason", event.reason()),
        Field::short("Component", event.source_component()),
    ]
}

/// Builds the composite payload for `event`.
#[must_use]
pub fn format(event: &EventRecord, color: Color) -> NotificationPayload {
    format_view(event, color, ViewKind::Composite)
}

/// Builds the payload for `event` with the given view.
#[must_use]
pub fn format_view(event: &EventRecord, color: Color, view: ViewKind) -> NotificationPayload {
    let fields = match view {
        ViewKind::Composite => {
            let mut fields = custom_deploy_fields(event);
            fields.extend(general_fields(event));
            fields
        }
        ViewKind::CustomDeploy => custom_deploy_fields(event),
        ViewKind::General => general_fields(event),
    };

    NotificationPayload {
        fallback_text: event.message().to_string(),
        color: resolve_color(event.reason(), color),
        fields,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn pulled_event() -> EventRecord {
        EventRecord::builder()
            .source_component("kubelet")
            .involved_object_kind("Pod")
            .name("web-7f8")
            .namespace("prod")
            .reason("Pulled")
            .message("Successfully pulled image nginx:1.2")
            .last_seen(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
            .build()
    }

    mod image_tag_tests {
        use super::*;
        use test_case::test_case;

        #[test_case("Successfully pulled image nginx:1.2", "nginx:1.2" ; "prefix stripped")]
        #[test_case("Random text", "Random text" ; "prefix absent")]
        #[test_case("", "" ; "empty message")]
        #[test_case("Successfully pulled image ", "" ; "prefix only")]
        #[test_case("note: Successfully pulled image x", "note: Successfully pulled image x" ; "prefix not leading")]
        fn strips_prefix(message: &str, expected: &str) {
            assert_eq!(deployed_image_tag(message), expected);
        }

        #[test]
        fn payload_carries_stripped_tag() {
            let payload = format(&pulled_event(), Color::None);
            assert_eq!(payload.field("Deployed-Image-Tag"), Some("nginx:1.2"));
        }

        #[test]
        fn payload_keeps_unprefixed_message() {
            let event = EventRecord::builder().message("Random text").build();
            let payload = format(&event, Color::None);
            assert_eq!(payload.field("Deployed-Image-Tag"), Some("Random text"));
        }
    }

    mod color_tests {
        use super::*;
        use test_case::test_case;

        #[test_case("Pulled", Color::Good, Color::Good ; "explicit good")]
        #[test_case("Failed", Color::Good, Color::Good ; "explicit wins over reason")]
        #[test_case("SuccessfulCreate", Color::None, Color::Good ; "success prefix")]
        #[test_case("FailedScheduling", Color::None, Color::Danger ; "fail prefix")]
        #[test_case("Killing", Color::None, Color::None ; "no prefix")]
        #[test_case("successful", Color::None, Color::None ; "case sensitive")]
        fn resolves(reason: &str, given: Color, expected: Color) {
            assert_eq!(resolve_color(reason, given), expected);
        }
    }

    mod layout_tests {
        use super::*;

        fn titles(payload: &NotificationPayload) -> Vec<&str> {
            payload.fields.iter().map(|f| f.title.as_str()).collect()
        }

        #[test]
        fn composite_field_order() {
            let payload = format(&pulled_event(), Color::Good);
            assert_eq!(
                titles(&payload),
                [
                    "Pod-Name",
                    "Deployed-Image-Tag",
                    "Namespace",
                    "Message",
                    "Object",
                    "Name",
                    "Reason",
                    "Component",
                ]
            );
        }

        #[test]
        fn short_flags() {
            let payload = format(&pulled_event(), Color::Good);
            let short: Vec<bool> = payload.fields.iter().map(|f| f.short).collect();
            assert_eq!(short, [false, false, true, false, true, true, true, true]);
        }

        #[test]
        fn field_values() {
            let payload = format(&pulled_event(), Color::Good);
            assert_eq!(payload.field("Pod-Name"), Some("web-7f8"));
            assert_eq!(payload.field("Namespace"), Some("prod"));
            assert_eq!(
                payload.field("Message"),
                Some("Successfully pulled image nginx:1.2")
            );
            assert_eq!(payload.field("Object"), Some("Pod"));
            assert_eq!(payload.field("Name"), Some("web-7f8"));
            assert_eq!(payload.field("Reason"), Some("Pulled"));
            assert_eq!(payload.field("Component"), Some("kubelet"));
        }

        #[test]
        fn fallback_is_message_verbatim() {
            let payload = format(&pulled_event(), Color::None);
            assert_eq!(payload.fallback_text, "Successfully pulled image nginx:1.2");
        }

        #[test]
        fn default_view_is_composite() {
            let event = pulled_event();
            assert_eq!(ViewKind::default(), ViewKind::Composite);
            assert_eq!(
                format(&event, Color::Good),
                format_view(&event, Color::Good, ViewKind::default())
            );
        }

        #[test]
        fn custom_deploy_view() {
            let payload = format_view(&pulled_event(), Color::Good, ViewKind::CustomDeploy);
            assert_eq!(titles(&payload), ["Pod-Name", "Deployed-Image-Tag"]);
        }

        #[test]
        fn general_view() {
            let payload = format_view(&pulled_event(), Color::Good, ViewKind::General);
            assert_eq!(
                titles(&payload),
                ["Namespace", "Message", "Object", "Name", "Reason", "Component"]
            );
        }

        #[test]
        fn empty_strings_propagate() {
            let payload = format(&EventRecord::builder().build(), Color::None);
            assert_eq!(payload.fields.len(), 8);
            assert!(payload.fields.iter().all(|f| f.value.is_empty()));
            assert_eq!(payload.color, Color::None);
        }

        #[test]
        fn formatting_is_idempotent() {
            let event = pulled_event();
            let first = format(&event, Color::None);
            let second = format(&event, Color::None);
            assert_eq!(first, second);
            assert_eq!(
                serde_json::to_vec(&first).unwrap(),
                serde_json::to_vec(&second).unwrap()
            );
        }
    }
}
