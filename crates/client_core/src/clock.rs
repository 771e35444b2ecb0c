use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Offset, TimeZone, Utc};

/// Source of the current wall-clock reading and of the local time zone the form is filled in.
pub trait Clock: Send + Sync {
    /// The current wall-clock reading in the user's zone.
    fn local_now(&self) -> NaiveDateTime;

    /// Maps a wall-clock reading to an instant. `None` when the reading does
    /// not exist in the zone (for example inside a DST gap).
    fn local_to_utc(&self, local: NaiveDateTime) -> Option<DateTime<Utc>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn local_now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn local_to_utc(&self, local: NaiveDateTime) -> Option<DateTime<Utc>> {
        Local
            .from_local_datetime(&local)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// A clock frozen at one instant in a fixed-offset zone.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
    offset: FixedOffset,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self { now, offset }
    }

    pub fn utc(now: DateTime<Utc>) -> Self {
        Self::new(now, Utc.fix())
    }
}

impl Clock for FixedClock {
    fn local_now(&self) -> NaiveDateTime {
        self.now.with_timezone(&self.offset).naive_local()
    }

    fn local_to_utc(&self, local: NaiveDateTime) -> Option<DateTime<Utc>> {
        self.offset
            .from_local_datetime(&local)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
    }
}
