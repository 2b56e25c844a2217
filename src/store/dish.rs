// Dish record

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A single dish in the collection.
///
/// Decoding is lenient the way existing data files and clients expect:
/// absent or `null` fields take their empty value, keys match regardless of
/// case (`"Name"` sets `name`), and unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct Dish {
    /// Assigned by the store, never taken from a request body
    pub id: i64,
    pub name: String,
    pub history: String,
    pub ingredients: Vec<String>,
    pub recipe: String,
    pub instructions: Vec<String>,
    pub picture_url: String,
}

/// Field-by-field decode target, keys already lowercased
#[derive(Default, Deserialize)]
#[serde(default)]
struct DishFields {
    #[serde(deserialize_with = "null_as_default")]
    id: i64,
    #[serde(deserialize_with = "null_as_default")]
    name: String,
    #[serde(deserialize_with = "null_as_default")]
    history: String,
    #[serde(deserialize_with = "null_as_default")]
    ingredients: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    recipe: String,
    #[serde(deserialize_with = "null_as_default")]
    instructions: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    picture_url: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl TryFrom<Map<String, Value>> for Dish {
    type Error = serde_json::Error;

    fn try_from(object: Map<String, Value>) -> Result<Self, Self::Error> {
        // Only one spelling of a key survives folding when several are sent
        let folded: Map<String, Value> = object
            .into_iter()
            .map(|(key, value)| (key.to_lowercase(), value))
            .collect();
        let fields: DishFields = serde_json::from_value(Value::Object(folded))?;

        Ok(Self {
            id: fields.id,
            name: fields.name,
            history: fields.history,
            ingredients: fields.ingredients,
            recipe: fields.recipe,
            instructions: fields.instructions,
            picture_url: fields.picture_url,
        })
    }
}

impl Dish {
    /// Overwrite every field except `id` with the values from `other`
    pub fn replace_with(&mut self, other: Self) {
        let id = self.id;
        *self = Self { id, ..other };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_body_decodes_with_defaults() {
        let dish: Dish = serde_json::from_str(r#"{"name":"Paella","extra":true}"#).unwrap();
        assert_eq!(dish.name, "Paella");
        assert_eq!(dish.id, 0);
        assert!(dish.ingredients.is_empty());
        assert!(dish.picture_url.is_empty());
    }

    #[test]
    fn test_null_fields_decode_as_empty() {
        let dish: Dish = serde_json::from_str(
            r#"{"id":null,"name":"Paella","history":null,"ingredients":null,"recipe":null,"instructions":null,"picture_url":null}"#,
        )
        .unwrap();
        assert_eq!(dish.id, 0);
        assert_eq!(dish.name, "Paella");
        assert!(dish.ingredients.is_empty());
        assert!(dish.instructions.is_empty());
        assert_eq!(dish.picture_url, "");
    }

    #[test]
    fn test_keys_match_case_insensitively() {
        let dish: Dish = serde_json::from_str(
            r#"{"Name":"Paella","HISTORY":"Valencia","Ingredients":["rice"],"Picture_URL":"http://img/p.png"}"#,
        )
        .unwrap();
        assert_eq!(dish.name, "Paella");
        assert_eq!(dish.history, "Valencia");
        assert_eq!(dish.ingredients, vec!["rice".to_string()]);
        assert_eq!(dish.picture_url, "http://img/p.png");
    }

    #[test]
    fn test_field_names() {
        let dish = Dish {
            id: 7,
            picture_url: "http://img/1.png".to_string(),
            ..Dish::default()
        };
        let value = serde_json::to_value(&dish).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["picture_url"], "http://img/1.png");
        assert_eq!(value["ingredients"], serde_json::json!([]));
        assert_eq!(value["instructions"], serde_json::json!([]));
    }

    #[test]
    fn test_replace_with_keeps_id() {
        let mut dish = Dish {
            id: 3,
            name: "Old".to_string(),
            recipe: "old recipe".to_string(),
            ..Dish::default()
        };
        dish.replace_with(Dish {
            id: 99,
            name: "New".to_string(),
            ingredients: vec!["rice".to_string()],
            ..Dish::default()
        });
        assert_eq!(dish.id, 3);
        assert_eq!(dish.name, "New");
        assert_eq!(dish.recipe, "");
        assert_eq!(dish.ingredients, vec!["rice".to_string()]);
    }

    #[test]
    fn test_non_object_body_rejected() {
        assert!(serde_json::from_str::<Dish>("[1, 2]").is_err());
        assert!(serde_json::from_str::<Dish>(r#"{"name": 5}"#).is_err());
        assert!(serde_json::from_str::<Dish>("").is_err());
    }
}
