use crate::domain::shopping_list::ShoppingList;
use crate::domain::user::User;
use crate::repository::ShoppingListReader;
use crate::services::{ServiceError, ServiceResult};

/// File name offered to clients downloading the shopping list.
pub const SHOPPING_LIST_FILE_NAME: &str = "shopping_cart.txt";

/// Sums ingredient amounts across every recipe in the user's shopping cart
/// and renders them as a plain text document.
pub fn build_shopping_list<R>(repo: &R, user: &User) -> ServiceResult<String>
where
    R: ShoppingListReader + ?Sized,
{
    let rows = repo.list_cart_ingredients(user.id)?;
    let list = ShoppingList::aggregate(rows);

    if list.is_empty() {
        return Err(ServiceError::EmptyCart);
    }

    Ok(list.render())
}
