use serde::{Deserialize, Serialize};

use crate::models::passenger::{Embarked, PassengerFeatures, Sex};

/// Column order of the vector produced by [`Preprocessor::transform`].
pub const FEATURE_NAMES: [&str; 12] = [
    "sex_female",
    "sex_male",
    "embarked_C",
    "embarked_Q",
    "embarked_S",
    "age",
    "fare",
    "pclass",
    "sibsp",
    "parch",
    "family_size",
    "is_alone",
];

/// Fitted statistics for one standardised numeric column.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Scaler {
    pub mean: f64,
    pub std: f64,
}

impl Scaler {
    fn scale(&self, value: f64) -> f64 {
        if self.std > 0.0 {
            (value - self.mean) / self.std
        } else {
            value - self.mean
        }
    }
}

/// Imputation and scaling parameters fitted on the training set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Preprocessor {
    pub age_median: f64,
    pub fare_median: f64,
    pub default_embarked: Embarked,
    pub age: Scaler,
    pub fare: Scaler,
    pub sibsp: Scaler,
    pub parch: Scaler,
}

/// Number of relatives aboard plus the passenger.
///
/// Counted in `f64` so arbitrarily large relative counts cannot overflow.
pub fn family_size(sibsp: i32, parch: i32) -> f64 {
    f64::from(sibsp.max(0)) + f64::from(parch.max(0)) + 1.0
}

impl Preprocessor {
    /// Turn a passenger into the model's feature vector, in [`FEATURE_NAMES`] order.
    pub fn transform(&self, features: &PassengerFeatures) -> [f64; FEATURE_NAMES.len()] {
        let embarked = features.embarked.unwrap_or(self.default_embarked);
        let age = features.age.unwrap_or(self.age_median);
        let fare = features.fare.unwrap_or(self.fare_median);
        let family = family_size(features.sibsp, features.parch);

        [
            one_hot(features.sex == Sex::Female),
            one_hot(features.sex == Sex::Male),
            one_hot(embarked == Embarked::Cherbourg),
            one_hot(embarked == Embarked::Queenstown),
            one_hot(embarked == Embarked::Southampton),
            self.age.scale(age),
            self.fare.scale(fare),
            f64::from(features.pclass),
            self.sibsp.scale(f64::from(features.sibsp)),
            self.parch.scale(f64::from(features.parch)),
            family,
            one_hot(family == 1.0),
        ]
    }
}

fn one_hot(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}
