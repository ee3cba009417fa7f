use std::collections::BTreeMap;

use serde::Serialize;

/// Header line placed at the top of every rendered shopping list.
pub const SHOPPING_LIST_HEADER: &str = "Список покупок:";

/// One ingredient row of a recipe that sits in a user's shopping cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartIngredient {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

impl CartIngredient {
    pub fn new(name: impl Into<String>, measurement_unit: impl Into<String>, amount: i32) -> Self {
        Self {
            name: name.into(),
            measurement_unit: measurement_unit.into(),
            amount,
        }
    }
}

/// Total amount of a single `(name, unit)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShoppingListItem {
    pub name: String,
    pub measurement_unit: String,
    pub total: i64,
}

/// Ingredient totals across every recipe in a shopping cart, sorted by
/// ingredient name and then by measurement unit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ShoppingList {
    pub items: Vec<ShoppingListItem>,
}

impl ShoppingList {
    /// Sum the amounts of all rows sharing the same ingredient name and unit.
    pub fn aggregate<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = CartIngredient>,
    {
        let mut totals: BTreeMap<(String, String), i64> = BTreeMap::new();
        for row in rows {
            *totals.entry((row.name, row.measurement_unit)).or_default() += i64::from(row.amount);
        }

        let items = totals
            .into_iter()
            .map(|((name, measurement_unit), total)| ShoppingListItem {
                name,
                measurement_unit,
                total,
            })
            .collect();

        Self { items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Render the list as the plain-text document offered for download.
    pub fn render(&self) -> String {
        let mut text = format!("{SHOPPING_LIST_HEADER}\n\n");
        for item in &self.items {
            text.push_str(&format!(
                "{} ({}) — {}\n",
                item.name, item.measurement_unit, item.total
            ));
        }
        text
    }
}
