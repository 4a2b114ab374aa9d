use crate::model::{Ms, ReservationRequest};

const MINUTE: Ms = 60_000;
const HOUR: Ms = 3_600_000;

/// Temporal business rules for reservation requests.
///
/// `validate` never short-circuits across rules: the caller always gets the
/// complete violation list, one message per broken rule. The cap and horizon
/// are optional so the looser historical policy stays expressible; the
/// defaults are the full rule set (5 min lead, 2 h cap, 24 h horizon).
#[derive(Debug, Clone)]
pub struct ReservationPolicy {
    /// Minimum gap between "now" and the reservation start.
    pub lead_time: Ms,
    /// Longest allowed reservation; `None` disables the cap.
    pub max_duration: Option<Ms>,
    /// How far ahead a reservation may start; `None` disables the bound.
    pub booking_horizon: Option<Ms>,
}

impl Default for ReservationPolicy {
    fn default() -> Self {
        Self {
            lead_time: 5 * MINUTE,
            max_duration: Some(2 * HOUR),
            booking_horizon: Some(24 * HOUR),
        }
    }
}

impl ReservationPolicy {
    /// Empty vec means the request is valid.
    ///
    /// The lead-time and horizon rules are skipped when the start is the
    /// zero sentinel — an unset instant is not a meaningful point to measure
    /// distances from, and the sentinel already gets its own message.
    pub fn validate(&self, request: &ReservationRequest, now: Ms) -> Vec<String> {
        let mut violations = Vec::new();

        if request.start == 0 {
            violations.push("The start time must not be empty.".to_string());
        } else {
            if request.start < now + self.lead_time {
                violations.push(format!(
                    "The start time must be at least {} minutes from now.",
                    self.lead_time / MINUTE
                ));
            }
            if let Some(horizon) = self.booking_horizon
                && request.start > now + horizon
            {
                violations.push(format!(
                    "The reservation can be taken up to {} hours ahead.",
                    horizon / HOUR
                ));
            }
        }

        if request.duration <= 0 {
            violations.push("The duration must be greater than zero.".to_string());
        } else if let Some(max) = self.max_duration
            && request.duration > max
        {
            violations.push(format!(
                "The reservation can last at most {} minutes.",
                max / MINUTE
            ));
        }

        violations
    }
}
