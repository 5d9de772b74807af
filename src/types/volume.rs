// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Volume level type.
//!
//! Denon receivers report and accept volume as an ASCII level: two digits
//! for whole steps (`"50"`) or three digits ending in `5` for a half step
//! (`"505"` means 50.5). The level maps to decibels relative to a zero
//! reference, which differs between the master volume and channel levels.

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// A volume level in half-dB steps.
///
/// # Examples
///
/// ```
/// use denon_avr::types::Volume;
///
/// let vol: Volume = "505".parse().unwrap();
/// assert_eq!(vol.level(), 50);
/// assert!(vol.has_half_step());
/// assert!((vol.to_db(Volume::MASTER_ZERO_DB) - (-29.5)).abs() < f32::EPSILON);
///
/// let back = Volume::from_db(-29.5, Volume::MASTER_ZERO_DB).unwrap();
/// assert_eq!(back.as_ascii(), "505");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Volume {
    half_steps: u8,
}

impl Volume {
    /// Highest whole level the receiver accepts.
    pub const MAX_LEVEL: u8 = 98;

    /// Zero-dB reference for the master volume (80 = 0 dB).
    pub const MASTER_ZERO_DB: u8 = 80;

    /// Zero-dB reference for channel levels (50 = 0 dB).
    pub const CHANNEL_ZERO_DB: u8 = 50;

    /// Silence.
    pub const MIN: Self = Self { half_steps: 0 };

    /// Creates a volume at a whole level.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if `level` exceeds [`Self::MAX_LEVEL`].
    pub fn new(level: u8) -> Result<Self, ValueError> {
        Self::with_half_step(level, false)
    }

    /// Creates a volume at `level`, optionally half a step above it.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::OutOfRange` if the result exceeds [`Self::MAX_LEVEL`].
    pub fn with_half_step(level: u8, half_step: bool) -> Result<Self, ValueError> {
        if level > Self::MAX_LEVEL || (level == Self::MAX_LEVEL && half_step) {
            return Err(ValueError::OutOfRange {
                min: 0,
                max: u16::from(Self::MAX_LEVEL),
                actual: u16::from(level),
            });
        }
        Ok(Self {
            half_steps: level * 2 + u8::from(half_step),
        })
    }

    /// Parses the receiver's ASCII level (`"50"`, `"505"`).
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidVolume` for text that is not two digits or
    /// two digits followed by `5`, and `ValueError::OutOfRange` for levels
    /// above the maximum.
    pub fn from_ascii(text: &str) -> Result<Self, ValueError> {
        let text = text.trim();
        let invalid = || ValueError::InvalidVolume(text.to_string());

        if !text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let (whole, half_step) = match text.len() {
            2 => (text, false),
            3 if text.ends_with('5') => (&text[..2], true),
            _ => return Err(invalid()),
        };

        let level = whole.parse::<u8>().map_err(|_| invalid())?;
        Self::with_half_step(level, half_step)
    }

    /// Converts a dB value to a level against the given zero reference.
    ///
    /// Any fractional part selects the half step above the floor, so
    /// `-29.5` and `-29.3` both map to `"505"` with the master reference.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidVolume` if the value is not finite or falls
    /// outside the receiver's range.
    pub fn from_db(db: f32, zero_reference: u8) -> Result<Self, ValueError> {
        let invalid = || ValueError::InvalidVolume(format!("{db} dB"));

        if !db.is_finite() {
            return Err(invalid());
        }

        let floor = db.floor();
        let level = floor + f32::from(zero_reference);
        if !(0.0..=f32::from(Self::MAX_LEVEL)).contains(&level) {
            return Err(invalid());
        }

        // Range checked above.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let level = level as u8;
        Self::with_half_step(level, db - floor > 0.0).map_err(|_| invalid())
    }

    /// Returns the whole level (0-98).
    #[must_use]
    pub const fn level(&self) -> u8 {
        self.half_steps / 2
    }

    /// Returns `true` if the volume sits half a step above [`Self::level`].
    #[must_use]
    pub const fn has_half_step(&self) -> bool {
        self.half_steps % 2 == 1
    }

    /// Returns the ASCII form sent after the `MV` code.
    #[must_use]
    pub fn as_ascii(&self) -> String {
        if self.has_half_step() {
            format!("{:02}5", self.level())
        } else {
            format!("{:02}", self.level())
        }
    }

    /// Returns the level in dB relative to `zero_reference`.
    #[must_use]
    pub fn to_db(&self, zero_reference: u8) -> f32 {
        f32::from(self.half_steps) / 2.0 - f32::from(zero_reference)
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_ascii())
    }
}

impl FromStr for Volume {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_ascii(s)
    }
}
