use super::xml_tree::XmlElement;
use geojson::{JsonObject, JsonValue};

/// Collect the feature properties of a placemark.
///
/// Values stay strings, the way they appear in the document.
pub fn build_properties(placemark: &XmlElement) -> JsonObject {
    let mut props = JsonObject::new();

    for key in ["name", "description", "styleUrl"] {
        if let Some(value) = placemark.child_text(key) {
            props.insert(key.to_string(), JsonValue::String(value.to_string()));
        }
    }

    if let Some(when) = placemark
        .child("TimeStamp")
        .and_then(|stamp| stamp.child_text("when"))
    {
        props.insert("time".into(), JsonValue::String(when.to_string()));
    }

    if let Some(span) = placemark.child("TimeSpan") {
        for key in ["begin", "end"] {
            if let Some(value) = span.child_text(key) {
                props.insert(key.to_string(), JsonValue::String(value.to_string()));
            }
        }
    }

    if let Some(extended) = placemark.child("ExtendedData") {
        for data in extended.children_named("Data") {
            if let Some(name) = data.attribute("name") {
                let value = data.child("value").map(|v| v.text.trim()).unwrap_or_default();
                props.insert(name.to_string(), JsonValue::String(value.to_string()));
            }
        }
        for schema_data in extended.children_named("SchemaData") {
            for simple in schema_data.children_named("SimpleData") {
                if let Some(name) = simple.attribute("name") {
                    props.insert(
                        name.to_string(),
                        JsonValue::String(simple.text.trim().to_string()),
                    );
                }
            }
        }
    }

    props
}
