//! XML export
//!
//! ```xml
//! <?xml version='1.0'?>
//! <logic_scene schema_version="1.0.0" exported_at="2024-01-01T00:00:00+00:00">
//!   <circuit>
//!     <component id="g1" type="AND_GATE">
//!       <position x="0" y="0" z="0"/>
//!       <color r="0.5" g="0.5" b="0.5" a="1"/>
//!       <state signal_value="0" bit_width="1"/>
//!     </component>
//!   </circuit>
//! </logic_scene>
//! ```

use chrono::Utc;
use quick_xml::se::to_string;
use serde::{Deserialize, Serialize};

use super::{sorted, ExportError, SCHEMA_VERSION};
use crate::scene::Entity;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "logic_scene")]
struct XmlScene {
    #[serde(rename = "@schema_version")]
    schema_version: String,
    #[serde(rename = "@exported_at")]
    exported_at: String,
    circuit: XmlCircuit,
}

#[derive(Debug, Serialize, Deserialize)]
struct XmlCircuit {
    #[serde(default)]
    component: Vec<XmlComponent>,
}

#[derive(Debug, Serialize, Deserialize)]
struct XmlComponent {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@type")]
    kind: String,
    position: XmlPosition,
    color: XmlColor,
    state: XmlState,
}

#[derive(Debug, Serialize, Deserialize)]
struct XmlPosition {
    #[serde(rename = "@x")]
    x: f32,
    #[serde(rename = "@y")]
    y: f32,
    #[serde(rename = "@z")]
    z: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct XmlColor {
    #[serde(rename = "@r")]
    r: f32,
    #[serde(rename = "@g")]
    g: f32,
    #[serde(rename = "@b")]
    b: f32,
    #[serde(rename = "@a")]
    a: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct XmlState {
    #[serde(rename = "@signal_value")]
    signal_value: i32,
    #[serde(rename = "@bit_width")]
    bit_width: u32,
}

impl From<&Entity> for XmlComponent {
    fn from(entity: &Entity) -> Self {
        let position = entity.position();
        let color = entity.color();
        let signal = entity.signal();
        Self {
            id: entity.id().to_string(),
            kind: entity.kind().as_str().to_string(),
            position: XmlPosition {
                x: position.x,
                y: position.y,
                z: position.z,
            },
            color: XmlColor {
                r: color.r,
                g: color.g,
                b: color.b,
                a: color.a,
            },
            state: XmlState {
                signal_value: signal.value,
                bit_width: signal.bit_width,
            },
        }
    }
}

/// XML document for `entities`
pub fn to_xml(entities: &[Entity]) -> Result<String, ExportError> {
    let document = XmlScene {
        schema_version: SCHEMA_VERSION.to_string(),
        exported_at: Utc::now().to_rfc3339(),
        circuit: XmlCircuit {
            component: sorted(entities).into_iter().map(XmlComponent::from).collect(),
        },
    };

    let xml = to_string(&document).map_err(|e| ExportError::Serialize(e.to_string()))?;
    Ok(format!("<?xml version='1.0'?>\n{xml}"))
}
