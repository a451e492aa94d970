//! The coffee library: manual entry, favourites and the recovery bin

use std::cmp::Reverse;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::{EngineError, EngineResult};
use crate::models::Coffee;
use crate::sync::stable_coffee_id;
use crate::types::Dose;
use crate::validation::validate_manual_entry;

/// Persistence seam for the coffee list. The browser stores it in
/// local storage, the backend in Postgres.
pub trait CoffeeStore {
    type Error;

    fn load_coffee_list(&self) -> Result<Vec<Coffee>, Self::Error>;
    fn save_coffee_list(&mut self, coffees: &[Coffee]) -> Result<(), Self::Error>;
}

/// Store that keeps the list in memory, used by tests and the WASM shell
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    coffees: Vec<Coffee>,
}

impl CoffeeStore for MemoryStore {
    type Error = std::convert::Infallible;

    fn load_coffee_list(&self) -> Result<Vec<Coffee>, Self::Error> {
        Ok(self.coffees.clone())
    }

    fn save_coffee_list(&mut self, coffees: &[Coffee]) -> Result<(), Self::Error> {
        self.coffees = coffees.to_vec();
        Ok(())
    }
}

/// Fields of the manual entry form. Blank optional fields get defaults.
#[derive(Debug, Clone, Default)]
pub struct ManualEntry {
    pub name: String,
    pub origin: String,
    pub process: String,
    pub cultivar: String,
    pub altitude: String,
    pub roaster: String,
    pub tasting_notes: String,
}

fn or_default(value: &str, default: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

/// Ordered list of coffees. Indices are positions in the stored list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoffeeLibrary {
    coffees: Vec<Coffee>,
}

impl CoffeeLibrary {
    pub fn new(coffees: Vec<Coffee>) -> Self {
        Self { coffees }
    }

    pub fn load<S: CoffeeStore>(store: &S) -> Result<Self, S::Error> {
        store.load_coffee_list().map(Self::new)
    }

    pub fn save<S: CoffeeStore>(&self, store: &mut S) -> Result<(), S::Error> {
        store.save_coffee_list(&self.coffees)
    }

    pub fn coffees(&self) -> &[Coffee] {
        &self.coffees
    }

    pub fn coffees_mut(&mut self) -> &mut [Coffee] {
        &mut self.coffees
    }

    pub fn into_inner(self) -> Vec<Coffee> {
        self.coffees
    }

    pub fn get(&self, index: usize) -> EngineResult<&Coffee> {
        self.coffees.get(index).ok_or(EngineError::CoffeeNotFound(index))
    }

    pub fn get_mut(&mut self, index: usize) -> EngineResult<&mut Coffee> {
        self.coffees.get_mut(index).ok_or(EngineError::CoffeeNotFound(index))
    }

    /// Validate the form and insert the new coffee at the front.
    pub fn add_manual_entry(&mut self, entry: ManualEntry, now: DateTime<Utc>) -> EngineResult<&Coffee> {
        validate_manual_entry(&entry.name, &entry.origin, &entry.process).map_err(EngineError::InvalidEntry)?;

        let mut coffee = Coffee {
            cultivar: or_default(&entry.cultivar, "Unknown"),
            altitude: or_default(&entry.altitude, "1500"),
            roaster: or_default(&entry.roaster, "Unknown"),
            tasting_notes: or_default(&entry.tasting_notes, "No notes"),
            added_date: Some(now.to_rfc3339_opts(SecondsFormat::Millis, true)),
            ..Coffee::new(entry.name.trim(), entry.origin.trim(), entry.process.trim())
        };
        coffee.id = Some(stable_coffee_id(&coffee, 0, now));
        tracing::debug!(name = %coffee.name, "added coffee");

        self.coffees.insert(0, coffee);
        Ok(&self.coffees[0])
    }

    /// Indices of coffees not in the bin: favourites first (most recently
    /// favourited on top), then newest first.
    pub fn active_coffees(&self) -> Vec<usize> {
        let mut active: Vec<usize> = (0..self.coffees.len())
            .filter(|&i| !self.coffees[i].deleted)
            .collect();
        active.sort_by_key(|&i| {
            let c = &self.coffees[i];
            (Reverse(c.favorite), Reverse(c.favorite.then_some(c.favorited_at).flatten()), Reverse(c.added_at()))
        });
        active
    }

    /// Indices of deleted coffees, most recently deleted first
    pub fn recovery_bin(&self) -> Vec<usize> {
        let mut bin: Vec<usize> = (0..self.coffees.len())
            .filter(|&i| self.coffees[i].deleted)
            .collect();
        bin.sort_by_key(|&i| Reverse(self.coffees[i].deleted_at));
        bin
    }

    pub fn soft_delete(&mut self, index: usize, now: DateTime<Utc>) -> EngineResult<()> {
        let coffee = self.get_mut(index)?;
        coffee.deleted = true;
        coffee.deleted_at = Some(now);
        Ok(())
    }

    pub fn restore(&mut self, index: usize) -> EngineResult<()> {
        let coffee = self.get_mut(index)?;
        coffee.deleted = false;
        coffee.deleted_at = None;
        Ok(())
    }

    pub fn permanent_delete(&mut self, index: usize) -> EngineResult<Coffee> {
        if index >= self.coffees.len() {
            return Err(EngineError::CoffeeNotFound(index));
        }
        Ok(self.coffees.remove(index))
    }

    /// Returns the new favourite state
    pub fn toggle_favorite(&mut self, index: usize, now: DateTime<Utc>) -> EngineResult<bool> {
        let coffee = self.get_mut(index)?;
        coffee.favorite = !coffee.favorite;
        coffee.favorited_at = coffee.favorite.then_some(now);
        Ok(coffee.favorite)
    }

    /// `None` clears the per-coffee dose and falls back to the default.
    pub fn set_custom_amount(&mut self, index: usize, grams: Option<i64>) -> EngineResult<()> {
        let dose = grams.map(Dose::new).transpose()?;
        self.get_mut(index)?.custom_amount = dose;
        Ok(())
    }

    /// Blank input clears the roast date
    pub fn set_roast_date(&mut self, index: usize, roast_date: &str) -> EngineResult<()> {
        let roast_date = roast_date.trim();
        self.get_mut(index)?.roast_date = (!roast_date.is_empty()).then(|| roast_date.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, 1, 9, 0, 0).unwrap()
    }

    fn entry(name: &str) -> ManualEntry {
        ManualEntry {
            name: name.into(),
            origin: "Colombia".into(),
            process: "Washed".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_manual_entry_defaults() {
        let mut library = CoffeeLibrary::default();
        let coffee = library.add_manual_entry(entry("Huila"), t0()).unwrap();
        assert_eq!(coffee.cultivar, "Unknown");
        assert_eq!(coffee.altitude, "1500");
        assert_eq!(coffee.roaster, "Unknown");
        assert_eq!(coffee.tasting_notes, "No notes");
        assert_eq!(coffee.added_date.as_deref(), Some("2025-02-01T09:00:00.000Z"));
        assert!(coffee.id.as_deref().unwrap().starts_with("coffee-huila|unknown|colombia|"));
    }

    #[test]
    fn test_manual_entry_requires_fields() {
        let mut library = CoffeeLibrary::default();
        let err = library
            .add_manual_entry(ManualEntry { origin: String::new(), ..entry("X") }, t0())
            .unwrap_err();
        assert_eq!(err, EngineError::InvalidEntry("Origin is required"));
        assert!(library.coffees().is_empty());
    }

    #[test]
    fn test_new_entries_go_first() {
        let mut library = CoffeeLibrary::default();
        library.add_manual_entry(entry("First"), t0()).unwrap();
        library.add_manual_entry(entry("Second"), t0() + Duration::minutes(1)).unwrap();
        assert_eq!(library.coffees()[0].name, "Second");
    }

    #[test]
    fn test_active_ordering() {
        let mut library = CoffeeLibrary::default();
        for (i, name) in ["A", "B", "C", "D"].iter().enumerate() {
            library.add_manual_entry(entry(name), t0() + Duration::hours(i as i64)).unwrap();
        }
        // stored order: D C B A
        library.toggle_favorite(3, t0()).unwrap(); // A
        library.toggle_favorite(2, t0() + Duration::days(1)).unwrap(); // B
        library.soft_delete(0, t0()).unwrap(); // D

        let names: Vec<&str> = library
            .active_coffees()
            .into_iter()
            .map(|i| library.coffees()[i].name.as_str())
            .collect();
        assert_eq!(names, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_recovery_bin_round_trip() {
        let mut library = CoffeeLibrary::default();
        library.add_manual_entry(entry("A"), t0()).unwrap();
        library.add_manual_entry(entry("B"), t0()).unwrap();
        library.soft_delete(0, t0()).unwrap();
        library.soft_delete(1, t0() + Duration::hours(1)).unwrap();
        assert_eq!(library.recovery_bin(), vec![1, 0]);

        library.restore(1).unwrap();
        assert_eq!(library.recovery_bin(), vec![0]);
        assert!(library.coffees()[1].deleted_at.is_none());

        let removed = library.permanent_delete(0).unwrap();
        assert_eq!(removed.name, "B");
        assert_eq!(library.coffees().len(), 1);
    }

    #[test]
    fn test_out_of_range_index() {
        let mut library = CoffeeLibrary::default();
        assert_eq!(library.soft_delete(4, t0()), Err(EngineError::CoffeeNotFound(4)));
        assert!(library.permanent_delete(0).is_err());
        assert!(library.toggle_favorite(1, t0()).is_err());
    }

    #[test]
    fn test_custom_amount_and_roast_date() {
        let mut library = CoffeeLibrary::default();
        library.add_manual_entry(entry("A"), t0()).unwrap();
        library.set_custom_amount(0, Some(18)).unwrap();
        assert_eq!(library.coffees()[0].custom_amount.map(Dose::grams), Some(18));
        assert!(matches!(library.set_custom_amount(0, Some(0)), Err(EngineError::InvalidDose(_))));
        library.set_custom_amount(0, None).unwrap();
        assert!(library.coffees()[0].custom_amount.is_none());

        library.set_roast_date(0, "2025-01-20").unwrap();
        assert_eq!(library.coffees()[0].roast_date.as_deref(), Some("2025-01-20"));
        library.set_roast_date(0, "  ").unwrap();
        assert!(library.coffees()[0].roast_date.is_none());
    }

    #[test]
    fn test_store_round_trip() {
        let mut store = MemoryStore::default();
        let mut library = CoffeeLibrary::default();
        library.add_manual_entry(entry("A"), t0()).unwrap();
        library.save(&mut store).unwrap();
        let loaded = CoffeeLibrary::load(&store).unwrap();
        assert_eq!(loaded, library);
    }
}
