//! Directory entries, attributes and packed DOS timestamps.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::time::SystemTime;

use bitflags::bitflags;
use chrono::{DateTime, Datelike, Local, TimeZone, Timelike};

bitflags! {
    /// DOS attribute byte.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Attributes: u8 {
        const READ_ONLY = 0x01;
        const HIDDEN = 0x02;
        const SYSTEM = 0x04;
        const VOLUME = 0x08;
        const DIRECTORY = 0x10;
        const ARCHIVE = 0x20;
        const DEVICE = 0x40;
    }
}

impl Attributes {
    /// Search mask that returns every entry except volume labels.
    pub const ALL_BUT_VOLUME: Self = Self::all().difference(Self::VOLUME);
    /// Search mask for plain files only.
    pub const FILES_ONLY: Self = Self::ALL_BUT_VOLUME.difference(Self::DIRECTORY);
}

/// Packed DOS date and time fields.
///
/// `date` is `(year - 1980) << 9 | month << 5 | day` and `time` is
/// `hour << 11 | minute << 5 | second / 2`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DosDateTime {
    /// Packed date.
    pub date: u16,
    /// Packed time.
    pub time: u16,
}

impl DosDateTime {
    /// Pack calendar fields. Years before 1980 clamp to 1980.
    #[must_use]
    pub fn new(year: u16, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> Self {
        let year = year.clamp(1980, 2107) - 1980;
        Self {
            date: (year << 9) | (u16::from(month & 0x0f) << 5) | u16::from(day & 0x1f),
            time: (u16::from(hour & 0x1f) << 11)
                | (u16::from(minute & 0x3f) << 5)
                | u16::from((second / 2) & 0x1f),
        }
    }

    /// Convert a host timestamp in local time.
    #[must_use]
    pub fn from_system_time(stamp: SystemTime) -> Self {
        let local: DateTime<Local> = stamp.into();
        Self::new(
            u16::try_from(local.year()).unwrap_or(1980),
            u8::try_from(local.month()).unwrap_or(1),
            u8::try_from(local.day()).unwrap_or(1),
            u8::try_from(local.hour()).unwrap_or(0),
            u8::try_from(local.minute()).unwrap_or(0),
            u8::try_from(local.second()).unwrap_or(0),
        )
    }

    /// Convert back to a host timestamp, if the fields form a valid local time.
    #[must_use]
    pub fn to_system_time(self) -> Option<SystemTime> {
        Local
            .with_ymd_and_hms(
                i32::from(self.year()),
                u32::from(self.month()),
                u32::from(self.day()),
                u32::from(self.hour()),
                u32::from(self.minute()),
                u32::from(self.second()),
            )
            .single()
            .map(SystemTime::from)
    }

    #[must_use]
    pub const fn year(self) -> u16 {
        (self.date >> 9) + 1980
    }

    #[must_use]
    pub const fn month(self) -> u8 {
        ((self.date >> 5) & 0x0f) as u8
    }

    #[must_use]
    pub const fn day(self) -> u8 {
        (self.date & 0x1f) as u8
    }

    #[must_use]
    pub const fn hour(self) -> u8 {
        (self.time >> 11) as u8
    }

    #[must_use]
    pub const fn minute(self) -> u8 {
        ((self.time >> 5) & 0x3f) as u8
    }

    #[must_use]
    pub const fn second(self) -> u8 {
        ((self.time & 0x1f) * 2) as u8
    }
}

/// Immutable snapshot of one enumerator match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Upper-case 8.3 name.
    pub short_name: String,
    /// Display name as stored on the host.
    pub long_name: String,
    /// File size in bytes (0 for directories).
    pub size: u32,
    /// Last write stamp.
    pub stamp: DosDateTime,
    /// Attribute bits.
    pub attributes: Attributes,
}

impl DirectoryEntry {
    #[must_use]
    pub const fn is_directory(&self) -> bool {
        self.attributes.contains(Attributes::DIRECTORY)
    }

    /// `.` or `..`.
    #[must_use]
    pub fn is_dot_entry(&self) -> bool {
        self.short_name == "." || self.short_name == ".."
    }

    /// The name to use in the requested naming mode.
    #[must_use]
    pub fn name(&self, long_names: bool) -> &str {
        if long_names {
            &self.long_name
        } else {
            &self.short_name
        }
    }

    /// Extension of the short name including the dot, or `""`.
    #[must_use]
    pub fn extension(&self) -> &str {
        if self.short_name.starts_with('.') {
            return "";
        }
        self.short_name
            .rfind('.')
            .map_or("", |idx| &self.short_name[idx..])
    }
}
