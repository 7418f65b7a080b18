use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::{keys, new_id};
use crate::error::{CoreError, ValidationError};
use crate::storage::{load_json, save_json, KvStore};

pub const DEFAULT_CALORIE_GOAL: u32 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MealCategory {
    #[serde(rename = "Veg")]
    Veg,
    #[serde(rename = "Non-Veg")]
    NonVeg,
    #[serde(rename = "Fruit")]
    Fruit,
    #[serde(rename = "Dry Fruits")]
    DryFruits,
}

impl MealCategory {
    pub const ALL: [MealCategory; 4] = [
        MealCategory::Veg,
        MealCategory::NonVeg,
        MealCategory::Fruit,
        MealCategory::DryFruits,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MealCategory::Veg => "Veg",
            MealCategory::NonVeg => "Non-Veg",
            MealCategory::Fruit => "Fruit",
            MealCategory::DryFruits => "Dry Fruits",
        }
    }
}

impl fmt::Display for MealCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MealCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        MealCategory::ALL
            .into_iter()
            .find(|c| {
                c.name()
                    .chars()
                    .filter(|ch| ch.is_ascii_alphanumeric())
                    .collect::<String>()
                    .eq_ignore_ascii_case(&wanted)
            })
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "category".into(),
                message: format!("unknown category '{s}'"),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub id: String,
    pub name: String,
    pub calories: u32,
    pub time: NaiveTime,
    pub date: NaiveDate,
    pub category: MealCategory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MealSuggestion {
    pub name: &'static str,
    pub calories: u32,
    pub category: MealCategory,
}

const fn suggestion(name: &'static str, calories: u32, category: MealCategory) -> MealSuggestion {
    MealSuggestion {
        name,
        calories,
        category,
    }
}

/// Built-in suggestions. On equal calories the later entry is picked.
pub const MEAL_SUGGESTIONS: [MealSuggestion; 28] = [
    suggestion("Grilled Chicken Salad", 350, MealCategory::NonVeg),
    suggestion("Turkey Sandwich", 400, MealCategory::NonVeg),
    suggestion("Grilled Fish & Veggies", 450, MealCategory::NonVeg),
    suggestion("Egg Curry with Rice", 420, MealCategory::NonVeg),
    suggestion("Chicken Stir Fry", 380, MealCategory::NonVeg),
    suggestion("Tuna Wrap", 320, MealCategory::NonVeg),
    suggestion("Shrimp Tacos", 370, MealCategory::NonVeg),
    suggestion("Veggie Omelette", 200, MealCategory::Veg),
    suggestion("Quinoa Bowl", 500, MealCategory::Veg),
    suggestion("Rice & Beans", 300, MealCategory::Veg),
    suggestion("Paneer Tikka", 350, MealCategory::Veg),
    suggestion("Vegetable Stir Fry", 250, MealCategory::Veg),
    suggestion("Chickpea Salad", 280, MealCategory::Veg),
    suggestion("Dal with Brown Rice", 330, MealCategory::Veg),
    suggestion("Oatmeal with Fruits", 250, MealCategory::Fruit),
    suggestion("Fruit Smoothie", 180, MealCategory::Fruit),
    suggestion("Yogurt Parfait", 220, MealCategory::Fruit),
    suggestion("Apple & Banana Bowl", 160, MealCategory::Fruit),
    suggestion("Mango Chia Pudding", 210, MealCategory::Fruit),
    suggestion("Berry Medley", 140, MealCategory::Fruit),
    suggestion("Citrus Salad", 130, MealCategory::Fruit),
    suggestion("Mixed Dry Fruits", 150, MealCategory::DryFruits),
    suggestion("Almond & Date Balls", 120, MealCategory::DryFruits),
    suggestion("Cashew & Raisin Mix", 160, MealCategory::DryFruits),
    suggestion("Walnut & Fig Mix", 170, MealCategory::DryFruits),
    suggestion("Pistachio Trail Mix", 180, MealCategory::DryFruits),
    suggestion("Apricot & Nut Bites", 140, MealCategory::DryFruits),
    suggestion("Peanut & Cranberry Mix", 155, MealCategory::DryFruits),
];

/// Pick a suggestion for the calories still available.
///
/// The largest meal in `category` that fits `remaining` wins; when nothing
/// fits, the smallest meal in the category is offered instead. Ties go to
/// the later table entry.
pub fn suggest(
    suggestions: &[MealSuggestion],
    remaining: u32,
    category: MealCategory,
) -> Option<MealSuggestion> {
    let in_category = || suggestions.iter().filter(move |s| s.category == category);

    let best_fit = in_category()
        .filter(|s| s.calories <= remaining)
        .fold(None::<&MealSuggestion>, |best, s| match best {
            Some(b) if b.calories > s.calories => Some(b),
            _ => Some(s),
        });

    best_fit
        .or_else(|| {
            in_category().fold(None, |low, s| match low {
                Some(l) if l.calories < s.calories => Some(l),
                _ => Some(s),
            })
        })
        .copied()
}

pub struct MealTracker<'a> {
    store: &'a dyn KvStore,
}

impl<'a> MealTracker<'a> {
    pub fn new(store: &'a dyn KvStore) -> Self {
        Self { store }
    }

    pub fn meals(&self) -> Result<Vec<Meal>, CoreError> {
        Ok(load_json(self.store, keys::MEALS)?)
    }

    pub fn add(
        &self,
        date: NaiveDate,
        time: NaiveTime,
        name: &str,
        calories: u32,
        category: MealCategory,
    ) -> Result<Meal, CoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::Empty("name".into()).into());
        }
        if calories == 0 {
            return Err(ValidationError::Empty("calories".into()).into());
        }
        let meal = Meal {
            id: new_id(),
            name: name.to_string(),
            calories,
            time,
            date,
            category,
        };
        let mut meals = self.meals()?;
        meals.push(meal.clone());
        save_json(self.store, keys::MEALS, &meals)?;
        Ok(meal)
    }

    pub fn delete(&self, id: &str) -> Result<(), CoreError> {
        let mut meals = self.meals()?;
        let before = meals.len();
        meals.retain(|m| m.id != id);
        if meals.len() == before {
            return Err(ValidationError::NotFound(id.to_string()).into());
        }
        save_json(self.store, keys::MEALS, &meals)?;
        Ok(())
    }

    pub fn for_date(&self, date: NaiveDate) -> Result<Vec<Meal>, CoreError> {
        Ok(self.meals()?.into_iter().filter(|m| m.date == date).collect())
    }

    /// Calories logged on `date`, saturating at `u32::MAX`.
    pub fn total_calories(&self, date: NaiveDate) -> Result<u32, CoreError> {
        Ok(self
            .for_date(date)?
            .iter()
            .fold(0u32, |acc, m| acc.saturating_add(m.calories)))
    }

    /// Calories left before reaching `goal`, never below zero.
    pub fn remaining_calories(&self, date: NaiveDate, goal: u32) -> Result<u32, CoreError> {
        Ok(goal.saturating_sub(self.total_calories(date)?))
    }

    /// Suggest a built-in meal for what is left of today's budget.
    pub fn suggest_for(
        &self,
        date: NaiveDate,
        goal: u32,
        category: MealCategory,
    ) -> Result<Option<MealSuggestion>, CoreError> {
        let remaining = self.remaining_calories(date, goal)?;
        Ok(suggest(&MEAL_SUGGESTIONS, remaining, category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn noon() -> NaiveTime {
        NaiveTime::from_hms_opt(12, 0, 0).unwrap()
    }

    #[test]
    fn suggests_largest_meal_that_fits() {
        let pick = suggest(&MEAL_SUGGESTIONS, 400, MealCategory::NonVeg).unwrap();
        assert_eq!(pick.name, "Turkey Sandwich");
        let pick = suggest(&MEAL_SUGGESTIONS, 2000, MealCategory::Veg).unwrap();
        assert_eq!(pick.name, "Quinoa Bowl");
    }

    #[test]
    fn falls_back_to_smallest_when_nothing_fits() {
        let pick = suggest(&MEAL_SUGGESTIONS, 100, MealCategory::Fruit).unwrap();
        assert_eq!(pick.name, "Citrus Salad");
        let pick = suggest(&MEAL_SUGGESTIONS, 0, MealCategory::DryFruits).unwrap();
        assert_eq!(pick.name, "Almond & Date Balls");
    }

    #[test]
    fn ties_go_to_the_later_entry() {
        let table = [
            suggestion("First", 300, MealCategory::Veg),
            suggestion("Second", 300, MealCategory::Veg),
            suggestion("Third", 200, MealCategory::Veg),
        ];
        assert_eq!(suggest(&table, 300, MealCategory::Veg).unwrap().name, "Second");
        assert_eq!(suggest(&table, 250, MealCategory::Veg).unwrap().name, "Third");

        let table = [
            suggestion("First", 300, MealCategory::Veg),
            suggestion("Second", 300, MealCategory::Veg),
        ];
        assert_eq!(suggest(&table, 10, MealCategory::Veg).unwrap().name, "Second");
    }

    #[test]
    fn empty_category_has_no_suggestion() {
        let table = [suggestion("Only", 300, MealCategory::Veg)];
        assert!(suggest(&table, 500, MealCategory::Fruit).is_none());
    }

    #[test]
    fn remaining_calories_saturates() {
        let store = MemoryStore::new();
        let meals = MealTracker::new(&store);
        meals.add(day(1), noon(), "Lunch", 1500, MealCategory::Veg).unwrap();
        meals.add(day(1), noon(), "Dinner", 800, MealCategory::NonVeg).unwrap();
        meals.add(day(2), noon(), "Snack", 100, MealCategory::Fruit).unwrap();
        assert_eq!(meals.total_calories(day(1)).unwrap(), 2300);
        assert_eq!(meals.remaining_calories(day(1), 2000).unwrap(), 0);
        assert_eq!(meals.remaining_calories(day(2), 2000).unwrap(), 1900);
    }

    #[test]
    fn huge_day_totals_do_not_overflow() {
        let store = MemoryStore::new();
        let meals = MealTracker::new(&store);
        meals.add(day(1), noon(), "Feast", 3_000_000_000, MealCategory::Veg).unwrap();
        meals.add(day(1), noon(), "Encore", 3_000_000_000, MealCategory::Veg).unwrap();
        assert_eq!(meals.total_calories(day(1)).unwrap(), u32::MAX);
        assert_eq!(meals.remaining_calories(day(1), 2000).unwrap(), 0);
        let pick = meals
            .suggest_for(day(1), 2000, MealCategory::Veg)
            .unwrap()
            .unwrap();
        assert_eq!(pick.name, "Veggie Omelette");
    }

    #[test]
    fn suggest_for_uses_todays_budget() {
        let store = MemoryStore::new();
        let meals = MealTracker::new(&store);
        meals.add(day(1), noon(), "Big lunch", 1750, MealCategory::Veg).unwrap();
        let pick = meals
            .suggest_for(day(1), 2000, MealCategory::Veg)
            .unwrap()
            .unwrap();
        assert_eq!(pick.name, "Vegetable Stir Fry");
    }

    #[test]
    fn add_validates_and_delete_removes() {
        let store = MemoryStore::new();
        let meals = MealTracker::new(&store);
        assert!(meals.add(day(1), noon(), " ", 100, MealCategory::Veg).is_err());
        assert!(meals.add(day(1), noon(), "Air", 0, MealCategory::Veg).is_err());
        let meal = meals.add(day(1), noon(), "Toast", 150, MealCategory::Veg).unwrap();
        meals.delete(&meal.id).unwrap();
        assert!(meals.meals().unwrap().is_empty());
    }

    #[test]
    fn category_parsing() {
        assert_eq!("non-veg".parse::<MealCategory>().unwrap(), MealCategory::NonVeg);
        assert_eq!("dry fruits".parse::<MealCategory>().unwrap(), MealCategory::DryFruits);
        assert_eq!("DryFruits".parse::<MealCategory>().unwrap(), MealCategory::DryFruits);
        assert!("dessert".parse::<MealCategory>().is_err());
    }
}
