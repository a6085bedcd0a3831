// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::OffsetDateTime;
use time::macros::datetime;
use timeclock_domain::{ClockEvent, PunchType, UserId};

pub fn test_user() -> UserId {
    UserId::new(1)
}

pub fn event(timestamp: OffsetDateTime, punch_type: PunchType, event_id: i64) -> ClockEvent {
    ClockEvent::new(test_user(), timestamp, punch_type, None, timestamp).with_id(event_id)
}

/// A standard 9-12 / 13-17 work day: seven hours of closed segments.
pub fn full_work_day() -> Vec<ClockEvent> {
    vec![
        event(datetime!(2026-04-01 09:00:00 UTC), PunchType::ClockIn, 1),
        event(datetime!(2026-04-01 12:00:00 UTC), PunchType::BreakStart, 2),
        event(datetime!(2026-04-01 13:00:00 UTC), PunchType::BreakEnd, 3),
        event(datetime!(2026-04-01 17:00:00 UTC), PunchType::ClockOut, 4),
    ]
}
