//! JSON export
//!
//! ```json
//! {
//!   "schema_version": "1.0.0",
//!   "exported_at": "2024-01-01T00:00:00Z",
//!   "circuit": {
//!     "components": [
//!       {
//!         "id": "g1",
//!         "type": "AND_GATE",
//!         "position": { "x": 0.0, "y": 0.0, "z": 0.0 },
//!         "color": { "r": 0.5, "g": 0.5, "b": 0.5, "a": 1.0 },
//!         "state": { "signal_value": 0, "bit_width": 1 }
//!       }
//!     ]
//!   }
//! }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{sorted, ExportError, SCHEMA_VERSION};
use crate::scene::Entity;

#[derive(Debug, Serialize, Deserialize)]
struct JsonScene {
    schema_version: String,
    exported_at: DateTime<Utc>,
    circuit: JsonCircuit,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonCircuit {
    #[serde(default)]
    components: Vec<JsonComponent>,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonComponent {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    position: JsonPosition,
    color: JsonColor,
    state: JsonState,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonPosition {
    x: f32,
    y: f32,
    z: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonColor {
    r: f32,
    g: f32,
    b: f32,
    a: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonState {
    signal_value: i32,
    bit_width: u32,
}

impl From<&Entity> for JsonComponent {
    fn from(entity: &Entity) -> Self {
        let position = entity.position();
        let color = entity.color();
        let signal = entity.signal();
        Self {
            id: entity.id().to_string(),
            kind: entity.kind().as_str().to_string(),
            position: JsonPosition {
                x: position.x,
                y: position.y,
                z: position.z,
            },
            color: JsonColor {
                r: color.r,
                g: color.g,
                b: color.b,
                a: color.a,
            },
            state: JsonState {
                signal_value: signal.value,
                bit_width: signal.bit_width,
            },
        }
    }
}

/// Pretty-printed JSON document for `entities`
pub fn to_json(entities: &[Entity]) -> Result<String, ExportError> {
    let document = JsonScene {
        schema_version: SCHEMA_VERSION.to_string(),
        exported_at: Utc::now(),
        circuit: JsonCircuit {
            components: sorted(entities).into_iter().map(JsonComponent::from).collect(),
        },
    };

    serde_json::to_string_pretty(&document).map_err(|e| ExportError::Serialize(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::EntityKind;

    fn sample() -> Vec<Entity> {
        let mut ff = Entity::new("ff1", EntityKind::FlipFlopJk).with_position(12.5, -3.25, 0.0);
        ff.set_color(0.1, 0.9, 0.3, 0.75);
        ff.set_signal(1, 1);

        let mut bus = Entity::new("bus", EntityKind::Wire).with_position(1.0, 2.0, 3.0);
        bus.set_signal(-77, 8);

        vec![ff, bus, Entity::new("odd", EntityKind::Unknown)]
    }

    #[test]
    fn test_round_trip_preserves_exported_fields() {
        let entities = sample();
        let document = to_json(&entities).unwrap();
        let parsed: JsonScene = serde_json::from_str(&document).unwrap();

        assert_eq!(parsed.schema_version, SCHEMA_VERSION);
        let ids: Vec<&str> = parsed.circuit.components.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["bus", "ff1", "odd"]);

        for record in &parsed.circuit.components {
            let entity = entities.iter().find(|e| e.id() == record.id).unwrap();
            assert_eq!(EntityKind::from_tag(&record.kind), entity.kind());
            assert_eq!(
                [record.position.x, record.position.y, record.position.z],
                [entity.position().x, entity.position().y, entity.position().z]
            );
            let color = entity.color();
            assert_eq!(
                [record.color.r, record.color.g, record.color.b, record.color.a],
                [color.r, color.g, color.b, color.a]
            );
            assert_eq!(record.state.signal_value, entity.signal().value);
            assert_eq!(record.state.bit_width, entity.signal().bit_width);
        }
    }

    #[test]
    fn test_only_logical_fields_are_written() {
        let document = to_json(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&document).unwrap();
        let first = &value["circuit"]["components"][0];

        let mut keys: Vec<&str> = first.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec!["color", "id", "position", "state", "type"]);
        assert_eq!(first["type"], "WIRE");
    }

    #[test]
    fn test_empty_scene() {
        let document = to_json(&[]).unwrap();
        let parsed: JsonScene = serde_json::from_str(&document).unwrap();
        assert!(parsed.circuit.components.is_empty());
    }
}
