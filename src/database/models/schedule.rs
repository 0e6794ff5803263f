use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Recurrence frequency, stored by label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Frequency {
    Yearly,
    Monthly,
    Weekly,
    Daily,
    Hourly,
    Minutely,
    Secondly,
}

impl Frequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Yearly => "Yearly",
            Frequency::Monthly => "Monthly",
            Frequency::Weekly => "Weekly",
            Frequency::Daily => "Daily",
            Frequency::Hourly => "Hourly",
            Frequency::Minutely => "Minutely",
            Frequency::Secondly => "Secondly",
        }
    }
}

/// Mailing schedule for one notification (`notifications.schedule`).
///
/// The recurrence fields follow RFC 5545 RRULE semantics; the scheduler
/// service expands them, this side only stores and forwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub notification_id: Uuid,
    pub freq: Option<Frequency>,
    pub dtstart: Option<DateTime<Utc>>,
    pub interval: Option<i16>,
    #[serde(default)]
    pub wkst: String,
    pub count: Option<i16>,
    pub until: Option<DateTime<Utc>>,
    #[serde(default)]
    pub bysetpos: Vec<i16>,
    #[serde(default)]
    pub bymonth: Vec<i16>,
    #[serde(default)]
    pub bymonthday: Vec<i16>,
    #[serde(default)]
    pub byyearday: Vec<i16>,
    #[serde(default)]
    pub byeaster: Vec<i16>,
    #[serde(default)]
    pub byweekno: Vec<i16>,
    #[serde(default)]
    pub byhour: Vec<i16>,
    #[serde(default)]
    pub byminute: Vec<i16>,
    #[serde(default)]
    pub bysecond: Vec<i16>,
}

impl Schedule {
    /// Array columns in storage order
    pub fn rule_lists(&self) -> [(&'static str, &Vec<i16>); 9] {
        [
            ("bysetpos", &self.bysetpos),
            ("bymonth", &self.bymonth),
            ("bymonthday", &self.bymonthday),
            ("byyearday", &self.byyearday),
            ("byeaster", &self.byeaster),
            ("byweekno", &self.byweekno),
            ("byhour", &self.byhour),
            ("byminute", &self.byminute),
            ("bysecond", &self.bysecond),
        ]
    }

    /// JSON body sent to the scheduler service. Empty or zero values are
    /// sent as `null`; ids and timestamps as strings.
    pub fn scheduler_payload(&self) -> Value {
        let mut body = Map::new();
        body.insert("id".into(), Value::String(self.id.to_string()));
        body.insert(
            "notification_id".into(),
            Value::String(self.notification_id.to_string()),
        );
        body.insert(
            "freq".into(),
            self.freq.map_or(Value::Null, |f| Value::String(f.as_str().into())),
        );
        body.insert("dtstart".into(), timestamp(self.dtstart));
        body.insert("interval".into(), small_int(self.interval));
        body.insert(
            "wkst".into(),
            if self.wkst.is_empty() {
                Value::Null
            } else {
                Value::String(self.wkst.clone())
            },
        );
        body.insert("count".into(), small_int(self.count));
        body.insert("until".into(), timestamp(self.until));

        for (name, values) in self.rule_lists() {
            let value = if values.is_empty() {
                Value::Null
            } else {
                Value::from(values.clone())
            };
            body.insert(name.into(), value);
        }

        Value::Object(body)
    }
}

fn timestamp(value: Option<DateTime<Utc>>) -> Value {
    value.map_or(Value::Null, |ts| Value::String(ts.to_rfc3339()))
}

fn small_int(value: Option<i16>) -> Value {
    match value {
        Some(0) | None => Value::Null,
        Some(n) => Value::from(n),
    }
}
