// MS-DOS packed date/time fields used by FAT directory entries
//
// FAT date: bits 15-9: year (0=1980), bits 8-5: month, bits 4-0: day
// FAT time: bits 15-11: hours, bits 10-5: minutes, bits 4-0: seconds/2

use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FatTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl FatTime {
    pub fn from_packed(time: u16) -> Self {
        Self {
            hour: ((time >> 11) & 0x1F) as u8,
            minute: ((time >> 5) & 0x3F) as u8,
            second: ((time & 0x1F) << 1) as u8, // FAT stores seconds/2
        }
    }
}

impl fmt::Display for FatTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.hour, self.minute, self.second)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FatDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl FatDate {
    pub fn from_packed(date: u16) -> Self {
        Self {
            year: ((date >> 9) & 0x7F) + 1980,
            month: ((date >> 5) & 0x0F) as u8,
            day: (date & 0x1F) as u8,
        }
    }

    /// None for the all-zero date and other impossible calendar values
    pub fn to_naive_date(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year as i32, self.month as u32, self.day as u32)
    }
}

impl fmt::Display for FatDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.year, self.month, self.day)
    }
}

/// Combine a packed date and time into a calendar timestamp
pub fn fat_datetime(date: u16, time: u16) -> Option<NaiveDateTime> {
    let t = FatTime::from_packed(time);
    FatDate::from_packed(date)
        .to_naive_date()?
        .and_hms_opt(t.hour as u32, t.minute as u32, t.second as u32)
}
