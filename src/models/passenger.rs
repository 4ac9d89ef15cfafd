use garde::Validate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Passenger sex as recorded on the manifest.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, EnumString, Display, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

/// Port of embarkation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, EnumString, Display, PartialEq, Eq)]
pub enum Embarked {
    /// Cherbourg
    #[serde(rename = "C")]
    #[strum(serialize = "C")]
    Cherbourg,
    /// Queenstown
    #[serde(rename = "Q")]
    #[strum(serialize = "Q")]
    Queenstown,
    /// Southampton
    #[serde(rename = "S")]
    #[strum(serialize = "S")]
    Southampton,
}

/// Passenger features accepted by both prediction endpoints.
///
/// Required fields are enforced by deserialization; value ranges are
/// enforced by [`Validate`].
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PassengerFeatures {
    #[garde(range(min = 1, max = 3))]
    pub pclass: u8,

    #[garde(skip)]
    pub sex: Sex,

    #[garde(custom(age_in_range))]
    #[serde(default)]
    pub age: Option<f64>,

    #[garde(range(min = 0))]
    pub sibsp: i32,

    #[garde(range(min = 0))]
    pub parch: i32,

    #[garde(range(min = 0.0))]
    #[serde(default)]
    pub fare: Option<f64>,

    #[garde(skip)]
    #[serde(default)]
    pub embarked: Option<Embarked>,

    #[garde(length(max = 200))]
    #[serde(default)]
    pub name: Option<String>,

    #[garde(length(max = 200))]
    #[serde(default)]
    pub cabin: Option<String>,

    #[garde(length(max = 200))]
    #[serde(default)]
    pub ticket: Option<String>,
}

/// Ages are accepted from zero up to, but not including, this value.
pub const AGE_LIMIT: f64 = 120.0;

fn age_in_range(age: &Option<f64>, _ctx: &()) -> garde::Result {
    match age {
        Some(age) if !(0.0..AGE_LIMIT).contains(age) => Err(garde::Error::new(format!(
            "age must be at least 0 and below {AGE_LIMIT}"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "pclass": 3,
            "sex": "male",
            "age": 22,
            "sibsp": 1,
            "parch": 0,
            "fare": 7.25,
            "embarked": "S"
        })
    }

    #[test]
    fn deserializes_manifest_row() {
        let features: PassengerFeatures = serde_json::from_value(sample()).unwrap();
        assert_eq!(features.pclass, 3);
        assert_eq!(features.sex, Sex::Male);
        assert_eq!(features.age, Some(22.0));
        assert_eq!(features.embarked, Some(Embarked::Southampton));
        assert!(features.validate().is_ok());
    }

    #[test]
    fn missing_pclass_is_rejected_by_deserialization() {
        let mut value = sample();
        value.as_object_mut().unwrap().remove("pclass");
        assert!(serde_json::from_value::<PassengerFeatures>(value).is_err());
    }

    #[test]
    fn out_of_range_values_fail_validation() {
        let mut value = sample();
        value["pclass"] = json!(4);
        let features: PassengerFeatures = serde_json::from_value(value).unwrap();
        assert!(features.validate().is_err());

        let mut value = sample();
        value["fare"] = json!(-1.0);
        let features: PassengerFeatures = serde_json::from_value(value).unwrap();
        assert!(features.validate().is_err());
    }

    #[test]
    fn age_upper_bound_is_exclusive() {
        let mut value = sample();
        value["age"] = json!(120);
        let features: PassengerFeatures = serde_json::from_value(value).unwrap();
        let report = features.validate().unwrap_err();
        assert!(report.to_string().contains("age"));

        let mut value = sample();
        value["age"] = json!(119.5);
        let features: PassengerFeatures = serde_json::from_value(value).unwrap();
        assert!(features.validate().is_ok());

        let mut value = sample();
        value["age"] = json!(0);
        let features: PassengerFeatures = serde_json::from_value(value).unwrap();
        assert!(features.validate().is_ok());
    }

    #[test]
    fn optional_fields_may_be_omitted() {
        let features: PassengerFeatures = serde_json::from_value(json!({
            "pclass": 1,
            "sex": "female",
            "sibsp": 0,
            "parch": 0
        }))
        .unwrap();
        assert!(features.age.is_none());
        assert!(features.embarked.is_none());
        assert!(features.validate().is_ok());
    }

    #[test]
    fn unknown_port_is_rejected() {
        let mut value = sample();
        value["embarked"] = json!("X");
        assert!(serde_json::from_value::<PassengerFeatures>(value).is_err());
    }
}
