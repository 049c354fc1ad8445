//! JSON entry point for popup messages.

use serde_json::Value;

use autovolume_core::{AggregatorRequest, AggregatorResponse};

const KNOWN_TYPES: [&str; 7] = [
    "SETTINGS_UPDATED",
    "GET_SETTINGS",
    "GET_ALL_TAB_VOLUMES",
    "ENABLE_EXTENSION",
    "DISABLE_EXTENSION",
    "UPDATE_MIN_VOLUME",
    "UPDATE_MAX_VOLUME",
];

/// Parses a raw message, or produces the failure reply it deserves.
pub(crate) fn parse_request(message: Value) -> Result<AggregatorRequest, AggregatorResponse> {
    let kind = message
        .get("type")
        .and_then(Value::as_str)
        .map(str::to_owned);
    serde_json::from_value(message).map_err(|err| match kind {
        Some(kind) if KNOWN_TYPES.contains(&kind.as_str()) => {
            AggregatorResponse::failure(format!("Malformed {kind} message: {err}"))
        },
        _ => AggregatorResponse::failure("Unknown message type"),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use autovolume_core::{AggregatorRequest, AggregatorResponse};

    use super::parse_request;

    #[test]
    fn known_messages_parse() {
        assert_eq!(
            parse_request(json!({"type": "UPDATE_MIN_VOLUME", "value": 30})).unwrap(),
            AggregatorRequest::UpdateMinVolume { value: 30 }
        );
        assert_eq!(
            parse_request(json!({"type": "GET_ALL_TAB_VOLUMES"})).unwrap(),
            AggregatorRequest::GetAllTabVolumes
        );
    }

    #[test]
    fn unknown_type_gets_the_generic_failure() {
        let reply = parse_request(json!({"type": "PING"})).unwrap_err();
        assert_eq!(reply, AggregatorResponse::failure("Unknown message type"));
        let reply = parse_request(json!({"value": 1})).unwrap_err();
        assert_eq!(reply, AggregatorResponse::failure("Unknown message type"));
    }

    #[test]
    fn malformed_known_type_names_the_type() {
        let reply = parse_request(json!({"type": "UPDATE_MAX_VOLUME"})).unwrap_err();
        let AggregatorResponse::Ack { success, error } = reply else {
            panic!("expected failure ack");
        };
        assert!(!success);
        assert!(error.unwrap().starts_with("Malformed UPDATE_MAX_VOLUME"));
    }
}
