//! Query catalog
//!
//! Fixed analytical questions over `police_logs`, written for PostgreSQL.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryGroup {
    Simple,
    Advanced,
}

impl QueryGroup {
    pub fn entries(&self) -> &'static [CatalogEntry] {
        match self {
            QueryGroup::Simple => SIMPLE_QUERIES,
            QueryGroup::Advanced => ADVANCED_QUERIES,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CatalogEntry {
    pub id: &'static str,
    pub label: &'static str,
    #[serde(skip_serializing)]
    pub sql: &'static str,
}

pub fn find(group: QueryGroup, id: &str) -> Option<&'static CatalogEntry> {
    group.entries().iter().find(|e| e.id == id)
}

/// Midpoint of a "16-30 Min" style label, or the number itself; NULL otherwise.
macro_rules! duration_minutes {
    () => {
        r#"CASE
            WHEN stop_duration ~ '^[0-9]+-[0-9]+' THEN
                (split_part(stop_duration, '-', 1)::numeric
                 + split_part(split_part(stop_duration, '-', 2), ' ', 1)::numeric) / 2
            WHEN stop_duration ~ '^[0-9]+$' THEN stop_duration::numeric
            ELSE NULL
        END"#
    };
}

// Dashboard summary queries

pub const AVG_STOP_DURATION: &str = concat!(
    "SELECT ROUND(AVG(",
    duration_minutes!(),
    "), 2) AS average_stop_duration FROM police_logs"
);

pub const AVG_DRIVER_AGE: &str =
    "SELECT ROUND(AVG(driver_age), 1) AS avg_driver_age FROM police_logs";

pub const ARREST_RATE: &str = r#"
SELECT ROUND(SUM(CASE WHEN is_arrested THEN 1 ELSE 0 END) * 100.0 / NULLIF(COUNT(*), 0), 2) AS arrest_rate
FROM police_logs
"#;

pub const PEAK_HOUR: &str = r#"
SELECT EXTRACT(HOUR FROM stop_time)::int AS peak_hour, COUNT(*) AS cnt
FROM police_logs
WHERE stop_time IS NOT NULL
GROUP BY peak_hour
ORDER BY cnt DESC
LIMIT 1
"#;

pub const TOP_VIOLATION: &str = r#"
SELECT violation, COUNT(*) AS cnt
FROM police_logs
GROUP BY violation
ORDER BY cnt DESC
LIMIT 1
"#;

pub const VIOLATION_COUNTS: &str = r#"
SELECT violation, COUNT(*) AS total_stops
FROM police_logs
GROUP BY violation
ORDER BY total_stops DESC
LIMIT 10
"#;

pub const GENDER_DISTRIBUTION: &str = r#"
SELECT driver_gender, COUNT(*) AS total
FROM police_logs
GROUP BY driver_gender
"#;

pub static SIMPLE_QUERIES: &[CatalogEntry] = &[
    CatalogEntry {
        id: "drug-stop-vehicles",
        label: "1. What are the top 10 vehicle numbers involved in drug-related stops?",
        sql: r#"
SELECT vehicle_number, COUNT(*) AS total_drug_stops
FROM police_logs
WHERE drug_related_stop
GROUP BY vehicle_number
ORDER BY total_drug_stops DESC
LIMIT 10"#,
    },
    CatalogEntry {
        id: "most-searched-vehicles",
        label: "2. Which vehicles were most frequently searched?",
        sql: r#"
SELECT vehicle_number, COUNT(*) AS total_searches
FROM police_logs
WHERE search_conducted
GROUP BY vehicle_number
ORDER BY total_searches DESC
LIMIT 10"#,
    },
    CatalogEntry {
        id: "age-group-arrest-rate",
        label: "3. Which driver age group had the highest arrest rate?",
        sql: r#"
SELECT CASE
         WHEN driver_age < 25 THEN 'Under 25'
         WHEN driver_age BETWEEN 25 AND 40 THEN '25-40'
         WHEN driver_age BETWEEN 41 AND 60 THEN '41-60'
         ELSE '60+'
       END AS age_group,
       AVG(CASE WHEN is_arrested THEN 1 ELSE 0 END) * 100 AS arrest_rate
FROM police_logs
GROUP BY age_group
ORDER BY arrest_rate DESC"#,
    },
    CatalogEntry {
        id: "gender-by-country",
        label: "4. What is the gender distribution of drivers stopped in each country?",
        sql: r#"
SELECT country_name, driver_gender, COUNT(*) AS total_stops
FROM police_logs
GROUP BY country_name, driver_gender
ORDER BY country_name"#,
    },
    CatalogEntry {
        id: "race-gender-search-rate",
        label: "5. Which race and gender combination has the highest search rate?",
        sql: r#"
SELECT driver_gender, driver_race,
       AVG(CASE WHEN search_conducted THEN 1 ELSE 0 END) * 100 AS search_rate
FROM police_logs
GROUP BY driver_gender, driver_race
ORDER BY search_rate DESC
LIMIT 5"#,
    },
    CatalogEntry {
        id: "stops-by-hour",
        label: "6. What time of day sees the most traffic stops?",
        sql: r#"
SELECT EXTRACT(HOUR FROM stop_time)::int AS hour_of_day, COUNT(*) AS total_stops
FROM police_logs
GROUP BY hour_of_day
ORDER BY total_stops DESC"#,
    },
    CatalogEntry {
        id: "duration-by-violation",
        label: "7. What is the average stop duration for different violations?",
        sql: concat!(
            "SELECT violation, ROUND(AVG(",
            duration_minutes!(),
            "), 2) AS avg_duration FROM police_logs GROUP BY violation ORDER BY avg_duration DESC NULLS LAST"
        ),
    },
    CatalogEntry {
        id: "night-arrest-rate",
        label: "8. Are stops during the night more likely to lead to arrests?",
        sql: r#"
SELECT CASE
         WHEN EXTRACT(HOUR FROM stop_time) BETWEEN 20 AND 23
           OR EXTRACT(HOUR FROM stop_time) BETWEEN 0 AND 4 THEN 'Night'
         ELSE 'Day'
       END AS period,
       AVG(CASE WHEN is_arrested THEN 1 ELSE 0 END) * 100 AS arrest_rate
FROM police_logs
GROUP BY period"#,
    },
    CatalogEntry {
        id: "violation-search-arrest",
        label: "9. Which violations are most associated with searches or arrests?",
        sql: r#"
SELECT violation,
       AVG(CASE WHEN search_conducted THEN 1 ELSE 0 END) * 100 AS search_rate,
       AVG(CASE WHEN is_arrested THEN 1 ELSE 0 END) * 100 AS arrest_rate
FROM police_logs
GROUP BY violation
ORDER BY search_rate DESC, arrest_rate DESC
LIMIT 10"#,
    },
    CatalogEntry {
        id: "young-driver-violations",
        label: "10. Which violations are most common among younger drivers (<25)?",
        sql: r#"
SELECT violation, COUNT(*) AS total_stops
FROM police_logs
WHERE driver_age < 25
GROUP BY violation
ORDER BY total_stops DESC"#,
    },
    CatalogEntry {
        id: "rarely-searched-violations",
        label: "11. Is there a violation that rarely results in search or arrest?",
        sql: r#"
SELECT violation,
       AVG(CASE WHEN search_conducted THEN 1 ELSE 0 END) * 100 AS search_rate,
       AVG(CASE WHEN is_arrested THEN 1 ELSE 0 END) * 100 AS arrest_rate
FROM police_logs
GROUP BY violation
ORDER BY AVG(CASE WHEN search_conducted THEN 1 ELSE 0 END)
       + AVG(CASE WHEN is_arrested THEN 1 ELSE 0 END) ASC
LIMIT 5"#,
    },
    CatalogEntry {
        id: "country-drug-stop-rate",
        label: "12. Which countries report the highest rate of drug-related stops?",
        sql: r#"
SELECT country_name,
       COUNT(*) AS total_stops,
       SUM(CASE WHEN drug_related_stop THEN 1 ELSE 0 END) AS total_drug_stops,
       ROUND(SUM(CASE WHEN drug_related_stop THEN 1 ELSE 0 END) * 100.0 / COUNT(*), 2) AS drug_stop_rate
FROM police_logs
GROUP BY country_name
ORDER BY drug_stop_rate DESC"#,
    },
    CatalogEntry {
        id: "arrest-rate-by-country-violation",
        label: "13. What is the arrest rate by country and violation?",
        sql: r#"
SELECT country_name, violation,
       AVG(CASE WHEN is_arrested THEN 1 ELSE 0 END) * 100 AS arrest_rate
FROM police_logs
GROUP BY country_name, violation
ORDER BY arrest_rate DESC"#,
    },
    CatalogEntry {
        id: "country-most-searches",
        label: "14. Which country has the most stops with search conducted?",
        sql: r#"
SELECT country_name, COUNT(*) AS total_searches
FROM police_logs
WHERE search_conducted
GROUP BY country_name
ORDER BY total_searches DESC
LIMIT 10"#,
    },
];

pub static ADVANCED_QUERIES: &[CatalogEntry] = &[
    CatalogEntry {
        id: "yearly-stops-arrests",
        label: "1. Yearly Breakdown of Stops and Arrests by Country",
        sql: r#"
SELECT country_name,
       EXTRACT(YEAR FROM stop_date)::int AS year,
       COUNT(*) AS total_stops,
       SUM(CASE WHEN is_arrested THEN 1 ELSE 0 END) AS total_arrests
FROM police_logs
GROUP BY country_name, year
ORDER BY country_name, year"#,
    },
    CatalogEntry {
        id: "violation-trends-age-gender",
        label: "2. Driver Violation Trends Based on Age and Gender",
        sql: r#"
SELECT sub.age_group, sub.driver_gender, sub.violation, COUNT(*) AS total_violations
FROM (
    SELECT driver_gender,
           violation,
           CASE
             WHEN driver_age < 25 THEN 'Under 25'
             WHEN driver_age BETWEEN 25 AND 40 THEN '25-40'
             WHEN driver_age BETWEEN 41 AND 60 THEN '41-60'
             ELSE '60+'
           END AS age_group
    FROM police_logs
    WHERE driver_age IS NOT NULL AND driver_gender IS NOT NULL
) AS sub
GROUP BY sub.age_group, sub.driver_gender, sub.violation
ORDER BY sub.age_group, sub.driver_gender, total_violations DESC"#,
    },
    CatalogEntry {
        id: "time-period-analysis",
        label: "3. Time Period Analysis of Stops (Year, Month, Hour)",
        sql: r#"
SELECT EXTRACT(YEAR FROM stop_date)::int AS year,
       EXTRACT(MONTH FROM stop_date)::int AS month,
       EXTRACT(HOUR FROM stop_time)::int AS hour,
       COUNT(*) AS total_stops
FROM police_logs
GROUP BY year, month, hour
ORDER BY year, month, hour"#,
    },
    CatalogEntry {
        id: "ranked-search-arrest-rates",
        label: "4. Violations with High Search and Arrest Rates",
        sql: r#"
WITH violation_stats AS (
    SELECT violation,
           COUNT(*) AS total_stops,
           SUM(CASE WHEN search_conducted THEN 1 ELSE 0 END) AS total_searches,
           SUM(CASE WHEN is_arrested THEN 1 ELSE 0 END) AS total_arrests,
           ROUND(SUM(CASE WHEN search_conducted THEN 1 ELSE 0 END) * 100.0 / COUNT(*), 2) AS search_rate_percent,
           ROUND(SUM(CASE WHEN is_arrested THEN 1 ELSE 0 END) * 100.0 / COUNT(*), 2) AS arrest_rate_percent
    FROM police_logs
    GROUP BY violation
)
SELECT violation, total_stops, total_searches, total_arrests,
       search_rate_percent, arrest_rate_percent,
       RANK() OVER (ORDER BY search_rate_percent DESC) AS search_rank,
       RANK() OVER (ORDER BY arrest_rate_percent DESC) AS arrest_rank
FROM violation_stats
ORDER BY search_rate_percent DESC, arrest_rate_percent DESC
LIMIT 10"#,
    },
    CatalogEntry {
        id: "demographics-by-country",
        label: "5. Driver Demographics by Country (Age, Gender)",
        sql: r#"
SELECT country_name,
       driver_gender,
       ROUND(AVG(driver_age), 1) AS avg_age,
       COUNT(*) AS total_stops
FROM police_logs
GROUP BY country_name, driver_gender
ORDER BY country_name, total_stops DESC"#,
    },
    CatalogEntry {
        id: "top-arrest-rate-violations",
        label: "6. Top 5 Violations with Highest Arrest Rates",
        sql: r#"
SELECT violation,
       AVG(CASE WHEN is_arrested THEN 1 ELSE 0 END) * 100 AS arrest_rate,
       COUNT(*) AS total_stops
FROM police_logs
GROUP BY violation
ORDER BY arrest_rate DESC
LIMIT 5"#,
    },
];
