//! Passenger payload fixtures
#![allow(dead_code)]

use serde_json::{json, Value};

/// A request body and whether the service should accept it.
#[derive(Debug, Clone)]
pub struct PassengerFixture {
    pub body: &'static str,
    pub valid: bool,
    pub description: &'static str,
}

pub const PASSENGER_FIXTURES: &[PassengerFixture] = &[
    PassengerFixture {
        body: r#"{"pclass":3,"sex":"male","age":22,"sibsp":1,"parch":0,"fare":7.25,"embarked":"S"}"#,
        valid: true,
        description: "Third-class man from Southampton",
    },
    PassengerFixture {
        body: r#"{"pclass":1,"sex":"female","age":38,"sibsp":1,"parch":0,"fare":71.2833,"embarked":"C","name":"Cumings, Mrs. John Bradley","cabin":"C85","ticket":"PC 17599"}"#,
        valid: true,
        description: "First-class woman with every optional field",
    },
    PassengerFixture {
        body: r#"{"pclass":2,"sex":"female","sibsp":0,"parch":2}"#,
        valid: true,
        description: "Only the required fields",
    },
    PassengerFixture {
        body: r#"{"sex":"male","age":22,"sibsp":1,"parch":0,"fare":7.25,"embarked":"S"}"#,
        valid: false,
        description: "Missing pclass",
    },
    PassengerFixture {
        body: r#"{"pclass":4,"sex":"male","sibsp":0,"parch":0}"#,
        valid: false,
        description: "pclass out of range",
    },
    PassengerFixture {
        body: r#"{"pclass":1,"sex":"other","sibsp":0,"parch":0}"#,
        valid: false,
        description: "Unknown sex",
    },
    PassengerFixture {
        body: r#"{"pclass":1,"sex":"male","age":-3,"sibsp":0,"parch":0}"#,
        valid: false,
        description: "Negative age",
    },
    PassengerFixture {
        body: r#"{"pclass":1,"sex":"male","sibsp":0,"parch":0,"embarked":"X"}"#,
        valid: false,
        description: "Unknown port",
    },
];

/// The reference passenger used throughout the tests.
pub fn sample_passenger() -> Value {
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

/// The reference passenger with a name that steers the scripted predictor.
pub fn named_passenger(name: &str) -> Value {
    let mut passenger = sample_passenger();
    passenger["name"] = json!(name);
    passenger
}
