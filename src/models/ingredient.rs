use diesel::prelude::*;

use crate::domain::ingredient::{
    Ingredient as DomainIngredient, NewIngredient as DomainNewIngredient,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::ingredients)]
pub struct Ingredient {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::ingredients)]
pub struct NewIngredient<'a> {
    pub name: &'a str,
    pub measurement_unit: &'a str,
}

impl From<Ingredient> for DomainIngredient {
    fn from(value: Ingredient) -> Self {
        Self {
            id: value.id,
            name: value.name,
            measurement_unit: value.measurement_unit,
        }
    }
}

impl<'a> From<&'a DomainNewIngredient> for NewIngredient<'a> {
    fn from(value: &'a DomainNewIngredient) -> Self {
        Self {
            name: value.name.as_str(),
            measurement_unit: value.measurement_unit.as_str(),
        }
    }
}
