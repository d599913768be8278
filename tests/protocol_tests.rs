// Host-side tests for the envelope codec.

#![allow(dead_code)]
mod constants {
    include!("../src/core/constants.rs");
}
mod reactor {
    include!("../src/core/reactor.rs");
}
mod protocol {
    include!("../src/core/protocol.rs");
}

use protocol::*;
use reactor::CognitiveState;
use serde_json::json;

#[test]
fn decodes_state_with_payload() {
    let msg = decode(
        r#"{"type":"state","state":"listening","data":{"speaking":true,"volume":0.5,"particle_mode":"galaxy"}}"#,
    )
    .unwrap();
    assert_eq!(
        msg,
        Inbound::State {
            state: CognitiveState::Listening,
            data: StateData {
                speaking: Some(true),
                volume: Some(0.5),
                particle_mode: Some("galaxy".to_string()),
            },
        }
    );
}

#[test]
fn state_payload_is_optional() {
    let msg = decode(r#"{"type":"state","state":"idle"}"#).unwrap();
    assert_eq!(
        msg,
        Inbound::State {
            state: CognitiveState::Idle,
            data: StateData::default(),
        }
    );
}

#[test]
fn message_role_defaults_to_assistant() {
    let msg = decode(r#"{"type":"message","content":"hello"}"#).unwrap();
    assert_eq!(
        msg,
        Inbound::Message {
            content: "hello".to_string(),
            role: "assistant".to_string(),
        }
    );
    let user = decode(r#"{"type":"message","content":"hi","role":"user"}"#).unwrap();
    assert!(matches!(user, Inbound::Message { role, .. } if role == "user"));
}

#[test]
fn decodes_remaining_envelope_types() {
    assert_eq!(
        decode(r#"{"type":"audio_level","level":0.25}"#).unwrap(),
        Inbound::AudioLevel { level: 0.25 }
    );
    assert_eq!(
        decode(r#"{"type":"error","message":"boom"}"#).unwrap(),
        Inbound::Error {
            message: "boom".to_string()
        }
    );
    assert_eq!(
        decode(r#"{"type":"system","message":"ready"}"#).unwrap(),
        Inbound::System {
            message: "ready".to_string()
        }
    );
    assert_eq!(
        decode(r#"{"type":"particle_mode","mode":"helix"}"#).unwrap(),
        Inbound::ParticleMode {
            mode: "helix".to_string()
        }
    );
    assert_eq!(
        decode(r#"{"type":"system_info","data":{"cpu":12}}"#).unwrap(),
        Inbound::SystemInfo {
            data: json!({"cpu": 12})
        }
    );
}

#[test]
fn unknown_types_are_reported_by_name() {
    match decode(r#"{"type":"telemetry","x":1}"#) {
        Err(ProtocolError::UnknownType(kind)) => assert_eq!(kind, "telemetry"),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn missing_type_and_bad_json() {
    assert!(matches!(
        decode(r#"{"state":"idle"}"#),
        Err(ProtocolError::MissingType)
    ));
    assert!(matches!(decode("[1,2]"), Err(ProtocolError::MissingType)));
    assert!(matches!(
        decode(r#"{"type":7}"#),
        Err(ProtocolError::MissingType)
    ));
    assert!(matches!(decode("{nope"), Err(ProtocolError::Json(_))));
}

#[test]
fn malformed_known_types_keep_their_kind() {
    match decode(r#"{"type":"audio_level"}"#) {
        Err(ProtocolError::Malformed { kind, .. }) => assert_eq!(kind, "audio_level"),
        other => panic!("unexpected: {other:?}"),
    }
    assert!(matches!(
        decode(r#"{"type":"state","state":"sleeping"}"#),
        Err(ProtocolError::Malformed { .. })
    ));
}

#[test]
fn outbound_envelopes_have_the_wire_shape() {
    let as_value = |m: &Outbound| -> serde_json::Value {
        serde_json::from_str(&encode(m).unwrap()).unwrap()
    };
    assert_eq!(
        as_value(&Outbound::Message {
            content: "hi".to_string()
        }),
        json!({"type": "message", "content": "hi"})
    );
    assert_eq!(
        as_value(&Outbound::Command {
            action: Command::StartListening
        }),
        json!({"type": "command", "action": "start_listening"})
    );
    assert_eq!(
        as_value(&Outbound::Command {
            action: Command::SystemInfo
        }),
        json!({"type": "command", "action": "system_info"})
    );
    assert_eq!(
        as_value(&Outbound::Particle {
            mode: "wave".to_string()
        }),
        json!({"type": "particle", "mode": "wave"})
    );
}

#[test]
fn transcription_responses() {
    let ok = TranscribeResponse::parse(r#"{"text":"  open the pod bay doors ","success":true}"#)
        .unwrap()
        .into_text()
        .unwrap();
    assert_eq!(ok, "open the pod bay doors");

    let failed = TranscribeResponse::parse(r#"{"success":false,"error":"no speech"}"#)
        .unwrap()
        .into_text();
    assert!(matches!(failed, Err(ProtocolError::Transcription(e)) if e == "no speech"));

    let blank = TranscribeResponse::parse(r#"{"text":"   "}"#).unwrap().into_text();
    assert!(matches!(blank, Err(ProtocolError::Transcription(_))));

    assert!(TranscribeResponse::parse("<html>").is_err());
}
