//! Car age relative to an injected calendar year.
use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// Source of the current calendar year.
pub trait Clock: Send + Sync {
    fn current_year(&self) -> i32;
}

/// Local wall-clock year.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn current_year(&self) -> i32 {
        chrono::Local::now().year()
    }
}

/// A pinned year, for reproducible output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedYear(pub i32);

impl Clock for FixedYear {
    fn current_year(&self) -> i32 {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn current_year(&self) -> i32 {
        (**self).current_year()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Car {
    make: String,
    model: String,
    year: i32,
}

impl Car {
    pub const FIELDS: [&'static str; 3] = ["make", "model", "year"];

    pub fn new(make: impl Into<String>, model: impl Into<String>, year: i32) -> Self {
        Self { make: make.into(), model: model.into(), year }
    }

    pub fn make(&self) -> &str {
        &self.make
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// May be zero or negative for future model years. Widened to `i64` so
    /// every pair of `i32` years has an exact difference.
    pub fn age_in(&self, current_year: i32) -> i64 {
        i64::from(current_year) - i64::from(self.year)
    }

    pub fn describe_age(&self, clock: &impl Clock) -> String {
        let current = clock.current_year();
        format!("{} years old (assuming current year is {current})", self.age_in(current))
    }

    /// [`Car::describe_age`] against the system clock. Not reproducible across
    /// a year boundary.
    pub fn get_car_age(&self) -> String {
        self.describe_age(&SystemClock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn age_is_current_minus_model_year() {
        let car = Car::new("Toyota", "Corolla", 2015);
        assert_eq!(car.age_in(2026), 11);
        assert_eq!(
            car.describe_age(&FixedYear(2026)),
            "11 years old (assuming current year is 2026)"
        );
    }

    #[test]
    fn future_and_current_years_are_not_rejected() {
        let car = Car::new("Rivian", "R3", 2030);
        assert_eq!(car.age_in(2030), 0);
        assert!(car.describe_age(&FixedYear(2026)).starts_with("-4 years old"));
    }

    #[test]
    fn extreme_years_do_not_overflow() {
        let ancient = Car::new("Old", "Cart", i32::MIN);
        assert_eq!(ancient.age_in(2026), 2026 + 2_147_483_648);
        assert_eq!(
            ancient.describe_age(&FixedYear(2026)),
            "2147485674 years old (assuming current year is 2026)"
        );

        let distant = Car::new("New", "Pod", i32::MAX);
        assert_eq!(distant.age_in(i32::MIN), -4_294_967_295);
        assert!(distant.describe_age(&FixedYear(i32::MIN)).starts_with("-4294967295 years old"));
    }

    #[test]
    fn clocks_are_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SystemClock>();
        assert_send_sync::<FixedYear>();
        assert_send_sync::<Box<dyn Clock>>();
    }

    #[test]
    fn system_clock_message_contains_the_age() {
        let car = Car::new("Ford", "Model T", 1908);
        let year = SystemClock.current_year();
        let msg = car.get_car_age();
        assert!(msg.contains(&(year - 1908).to_string()), "{msg}");
    }

    #[test]
    fn decodes_from_record() {
        let car: Car = serde_json::from_str(r#"{"make":"VW","model":"Golf","year":1999}"#).unwrap();
        assert_eq!(car, Car::new("VW", "Golf", 1999));
        assert_eq!(car.make(), "VW");
        assert_eq!(car.model(), "Golf");
    }

    proptest! {
        #[test]
        fn message_carries_current_minus_model_year(year in any::<i32>(), current in any::<i32>()) {
            let car = Car::new("Any", "Model", year);
            let age = i64::from(current) - i64::from(year);
            prop_assert_eq!(car.age_in(current), age);
            let msg = car.describe_age(&FixedYear(current));
            let expected_prefix = format!("{age} years old");
            prop_assert!(msg.starts_with(&expected_prefix), "{}", msg);
        }
    }
}
