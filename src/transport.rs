//! Callback-data codec for button based transports
//!
//! Chat platforms attach a short string to every inline button. This module
//! maps those strings to [`Event`] values and back; free text never goes
//! through here.

use crate::types::Event;

const NEXT: &str = "next";
const CONTINUE: &str = "continue";
const OPTION_PREFIX: &str = "opt_";
const CHOOSE_PREFIX: &str = "choose_";

/// Encode a button event; `None` for free text, which has no button
pub fn encode(event: &Event) -> Option<String> {
    match event {
        Event::Advance => Some(NEXT.to_string()),
        Event::Continue => Some(CONTINUE.to_string()),
        Event::SelectOption(index) => Some(format!("{OPTION_PREFIX}{index}")),
        Event::Choose(text) => Some(format!("{CHOOSE_PREFIX}{text}")),
        Event::TextInput(_) => None,
    }
}

/// Decode callback data into an event
pub fn decode(data: &str) -> Option<Event> {
    match data {
        NEXT => Some(Event::Advance),
        CONTINUE => Some(Event::Continue),
        _ => {
            if let Some(index) = data.strip_prefix(OPTION_PREFIX) {
                index.parse().ok().map(Event::SelectOption)
            } else {
                data.strip_prefix(CHOOSE_PREFIX)
                    .map(|text| Event::Choose(text.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_button_data() {
        assert_eq!(decode("next"), Some(Event::Advance));
        assert_eq!(decode("continue"), Some(Event::Continue));
        assert_eq!(decode("opt_3"), Some(Event::SelectOption(3)));
        assert_eq!(decode("choose_yes_no"), Some(Event::Choose("yes_no".to_string())));
    }

    #[test]
    fn rejects_unknown_data() {
        assert_eq!(decode("opt_x"), None);
        assert_eq!(decode("opt_-1"), None);
        assert_eq!(decode("answer_0_a"), None);
        assert_eq!(decode(""), None);
    }

    #[test]
    fn free_text_is_not_encoded() {
        assert_eq!(encode(&Event::TextInput("hello".to_string())), None);
        assert_eq!(encode(&Event::SelectOption(2)).as_deref(), Some("opt_2"));
        assert_eq!(encode(&Event::Choose("b".to_string())).as_deref(), Some("choose_b"));
    }
}
