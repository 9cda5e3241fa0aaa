//! Prediction request/response model

use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const FALLBACK_VIOLATION: &str = "Speeding";
pub const FALLBACK_OUTCOME: &str = "Warning";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields used to narrow the historical dataset. `None` matches anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub gender: Option<Gender>,
    pub age: Option<i32>,
    pub search_conducted: Option<bool>,
    pub drug_related: Option<bool>,
    pub stop_duration: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prediction {
    pub predicted_violation: String,
    pub predicted_outcome: String,
}

impl Default for Prediction {
    fn default() -> Self {
        Self {
            predicted_violation: FALLBACK_VIOLATION.to_string(),
            predicted_outcome: FALLBACK_OUTCOME.to_string(),
        }
    }
}

/// "Add new police log" form. Flags arrive as 0/1 like the form's select
/// boxes; everything besides the five filter fields is echoed back as given.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct PredictionForm {
    pub stop_date: Option<NaiveDate>,
    pub stop_time: Option<NaiveTime>,
    pub country_name: Option<String>,
    pub driver_gender: Option<Gender>,

    #[validate(range(min = 16, max = 100, message = "driver_age must be between 16 and 100"))]
    pub driver_age: Option<i32>,

    #[validate(range(min = 0, max = 1, message = "search_conducted must be 0 or 1"))]
    pub search_conducted: Option<i32>,

    pub search_type: Option<String>,

    #[validate(range(min = 0, max = 1, message = "drug_related_stop must be 0 or 1"))]
    pub drug_related_stop: Option<i32>,

    pub stop_duration: Option<String>,
    pub vehicle_number: Option<String>,
}

impl PredictionForm {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            gender: self.driver_gender,
            age: self.driver_age,
            search_conducted: self.search_conducted.map(|f| f == 1),
            drug_related: self.drug_related_stop.map(|f| f == 1),
            stop_duration: self.stop_duration.clone(),
        }
    }

    fn search_text(&self) -> &'static str {
        if self.search_conducted == Some(1) {
            "a search was conducted"
        } else {
            "no search was conducted"
        }
    }

    fn drug_text(&self) -> &'static str {
        if self.drug_related_stop == Some(1) {
            "was drug-related"
        } else {
            "was not drug-related"
        }
    }

    /// Natural-language summary shown under the prediction.
    pub fn summary(&self, prediction: &Prediction) -> String {
        let mut driver = String::from("A");
        if let Some(age) = self.driver_age {
            driver.push_str(&format!(" {age}-year-old"));
        }
        if let Some(gender) = self.driver_gender {
            driver.push_str(&format!(" {gender}"));
        }
        driver.push_str(" driver");
        if let Some(country) = self.country_name.as_deref().filter(|c| !c.is_empty()) {
            driver.push_str(&format!(" in {country}"));
        }
        driver.push_str(" was stopped");
        if let Some(time) = self.stop_time {
            driver.push_str(&format!(" at {}", time.format("%I:%M %p")));
        }
        if let Some(date) = self.stop_date {
            driver.push_str(&format!(" on {date}"));
        }

        let mut lines = vec![
            format!("The stop {} and {}.", self.search_text(), self.drug_text()),
            format!("Predicted Violation: {}", prediction.predicted_violation),
            format!("Predicted Stop Outcome: {}", prediction.predicted_outcome),
            format!("{driver}."),
        ];
        if let Some(duration) = &self.stop_duration {
            lines.push(format!("Stop duration: {duration}."));
        }
        if let Some(vehicle) = &self.vehicle_number {
            lines.push(format!("Vehicle number: {vehicle}."));
        }
        lines.join("\n")
    }
}

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    #[serde(flatten)]
    pub prediction: Prediction,
    pub matched_records: usize,
    pub summary: String,
    pub input: PredictionForm,
    pub notices: Vec<String>,
}
