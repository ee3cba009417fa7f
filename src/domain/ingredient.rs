use serde::{Deserialize, Serialize};

/// Domain representation of an ingredient from the shared catalogue.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ingredient {
    /// Unique identifier of the ingredient.
    pub id: i32,
    /// Name of the ingredient.
    pub name: String,
    /// Unit the ingredient is measured in (for example `g` or `ml`).
    pub measurement_unit: String,
}

/// Payload required to insert a new ingredient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIngredient {
    /// Name of the ingredient.
    pub name: String,
    /// Unit the ingredient is measured in.
    pub measurement_unit: String,
}

impl NewIngredient {
    /// Construct a new ingredient payload with trimmed fields.
    pub fn new(name: impl Into<String>, measurement_unit: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            measurement_unit: measurement_unit.into().trim().to_string(),
        }
    }
}

/// Query definition used to list catalogue ingredients.
#[derive(Debug, Clone, Default)]
pub struct IngredientListQuery {
    /// Optional case-insensitive name prefix.
    pub name: Option<String>,
}

impl IngredientListQuery {
    /// Construct a query that targets the whole catalogue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the results to ingredients whose name starts with `prefix`.
    pub fn name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name = Some(prefix.into());
        self
    }
}
