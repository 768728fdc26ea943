//! Restaurant Menu Models

use serde::{Deserialize, Serialize};

use super::food_item::FoodItem;

/// One row of the customer shop: a restaurant with its purchasable items
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RestaurantMenu {
    pub id: i64,
    pub restaurant_name: String,
    #[serde(default)]
    pub food_items: Vec<FoodItem>,
}

/// Restaurant-admin menu view: the restaurant's items grouped by food type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RestaurantMenuGrouped {
    pub restaurant_name: String,
    #[serde(default)]
    pub food_items: Vec<FoodTypeGroup>,
}

/// Items of one food type within a grouped menu
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoodTypeGroup {
    #[serde(rename = "type")]
    pub food_type: String,
    #[serde(default)]
    pub food_items: Vec<FoodItem>,
}

/// Case-insensitive prefix search over item name and food type.
///
/// Menus left with no matching item are dropped. An empty query matches
/// everything.
pub fn search_menus(menus: &[RestaurantMenu], query: &str) -> Vec<RestaurantMenu> {
    let query = query.to_lowercase();
    menus
        .iter()
        .map(|menu| RestaurantMenu {
            id: menu.id,
            restaurant_name: menu.restaurant_name.clone(),
            food_items: menu
                .food_items
                .iter()
                .filter(|item| {
                    item.name.to_lowercase().starts_with(&query)
                        || item.food_type.to_lowercase().starts_with(&query)
                })
                .cloned()
                .collect(),
        })
        .filter(|menu| !menu.food_items.is_empty())
        .collect()
}
