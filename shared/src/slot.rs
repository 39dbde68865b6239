//! Booking time slots
//!
//! Start and end times are picked from a fixed set of hour-aligned slots,
//! 08:00 through 18:00 inclusive. The slot value is the zero-padded
//! `"HH:MM"` string, so lexical order of values equals chronological order.

use std::fmt;

use chrono::NaiveTime;
use thiserror::Error;

/// First bookable hour
pub const FIRST_HOUR: u8 = 8;
/// Last bookable hour (inclusive)
pub const LAST_HOUR: u8 = 18;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    #[error("invalid time slot format: {0:?} (expected HH:MM)")]
    Format(String),
    #[error("time slot {0} is not offered (08:00 - 18:00 on the hour)")]
    NotOffered(String),
}

/// One hour-aligned slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimeSlot {
    hour: u8,
}

impl TimeSlot {
    /// All offered slots in chronological order
    pub fn all() -> impl Iterator<Item = TimeSlot> {
        (FIRST_HOUR..=LAST_HOUR).map(|hour| TimeSlot { hour })
    }

    /// Slot for a given hour, if offered
    pub fn at_hour(hour: u8) -> Option<Self> {
        (FIRST_HOUR..=LAST_HOUR)
            .contains(&hour)
            .then_some(TimeSlot { hour })
    }

    /// Parse a slot value such as `"09:00"`
    pub fn parse(value: &str) -> Result<Self, SlotError> {
        let value = value.trim();
        let (h, m) = value
            .split_once(':')
            .ok_or_else(|| SlotError::Format(value.to_string()))?;
        if h.len() != 2 || m.len() != 2 {
            return Err(SlotError::Format(value.to_string()));
        }
        let hour: u8 = h.parse().map_err(|_| SlotError::Format(value.to_string()))?;
        let minute: u8 = m.parse().map_err(|_| SlotError::Format(value.to_string()))?;

        if minute != 0 {
            return Err(SlotError::NotOffered(value.to_string()));
        }
        Self::at_hour(hour).ok_or_else(|| SlotError::NotOffered(value.to_string()))
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        0
    }

    /// Slot value, e.g. `"09:00"`
    pub fn value(&self) -> String {
        format!("{:02}:{:02}", self.hour, self.minute())
    }

    /// 12-hour display label, e.g. `"9:00 AM"`, `"12:00 PM"`, `"6:00 PM"`
    pub fn label(&self) -> String {
        match self.hour {
            h if h > 12 => format!("{}:00 PM", h - 12),
            12 => "12:00 PM".to_string(),
            h => format!("{h}:00 AM"),
        }
    }

    pub fn to_naive_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour as u32, self.minute() as u32, 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offered_slots() {
        let slots: Vec<String> = TimeSlot::all().map(|s| s.value()).collect();
        assert_eq!(slots.len(), 11);
        assert_eq!(slots.first().map(String::as_str), Some("08:00"));
        assert_eq!(slots.last().map(String::as_str), Some("18:00"));
    }

    #[test]
    fn test_labels() {
        let label = |h| TimeSlot::at_hour(h).unwrap().label();
        assert_eq!(label(8), "8:00 AM");
        assert_eq!(label(11), "11:00 AM");
        assert_eq!(label(12), "12:00 PM");
        assert_eq!(label(18), "6:00 PM");
    }

    #[test]
    fn test_parse() {
        assert_eq!(TimeSlot::parse("09:00").unwrap().hour(), 9);
        assert_eq!(TimeSlot::parse(" 18:00 ").unwrap().hour(), 18);
        assert!(matches!(TimeSlot::parse("07:00"), Err(SlotError::NotOffered(_))));
        assert!(matches!(TimeSlot::parse("19:00"), Err(SlotError::NotOffered(_))));
        assert!(matches!(TimeSlot::parse("09:30"), Err(SlotError::NotOffered(_))));
        assert!(matches!(TimeSlot::parse("9:00"), Err(SlotError::Format(_))));
        assert!(matches!(TimeSlot::parse("nine"), Err(SlotError::Format(_))));
    }

    #[test]
    fn test_lexical_order_matches_chronological() {
        let slots: Vec<TimeSlot> = TimeSlot::all().collect();
        for a in &slots {
            for b in &slots {
                assert_eq!(a.value() < b.value(), a < b, "{a} vs {b}");
            }
        }
    }
}
