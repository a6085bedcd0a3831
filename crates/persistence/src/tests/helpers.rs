// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::Persistence;
use time::OffsetDateTime;
use timeclock_domain::{ClockEvent, PunchType, UserId};

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory database")
}

pub fn create_test_user(persistence: &mut Persistence, email: &str) -> UserId {
    let user_id: i64 = persistence
        .create_user(email, "Test User", None, "Passw0rd", "Employee")
        .expect("Failed to create user");
    UserId::new(user_id)
}

pub fn insert_event(
    persistence: &mut Persistence,
    user_id: UserId,
    timestamp: OffsetDateTime,
    punch_type: PunchType,
) -> ClockEvent {
    let event: ClockEvent = ClockEvent::new(user_id, timestamp, punch_type, None, timestamp);
    persistence
        .insert_clock_event(&event)
        .expect("Failed to insert clock event")
}
