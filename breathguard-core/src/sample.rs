//! Sample Types for Breath Measurement Ingestion
//!
//! ## Overview
//!
//! One breath measurement event carries four gas-sensor channels
//! (`s0..s3`, raw 10-bit ADC counts) plus the temperature and relative
//! humidity of the exhaled air. This module defines both shapes a
//! measurement takes on its way through the system:
//!
//! 1. [`SamplePayload`] — the *unvalidated* form as it arrives at the
//!    ingestion boundary. Every measurement field is optional so that
//!    an incomplete submission is representable and can be reported
//!    precisely (which fields are missing, in a deterministic order).
//! 2. [`RawSample`] — the *validated*, immutable form. Constructed only
//!    by a successful [`SampleValidator`](crate::validator::SampleValidator)
//!    pass; consumed to derive features and anomaly reports, never
//!    mutated.
//!
//! ## Field identity
//!
//! [`Channel`] names the four gas channels and [`SampleField`] names
//! all six required measurement fields. [`FieldSet`] is a small bitmask
//! over `SampleField` used to report missing fields without allocating;
//! iteration order is the canonical field order (s0, s1, s2, s3, temp,
//! humidity), so error messages are deterministic.

use core::fmt;

use crate::constants::sampling::DEFAULT_SAMPLE_DURATION_S;

/// Number of gas-sensor channels in a sample.
pub const CHANNEL_COUNT: usize = 4;

/// Gas-sensor channel identifier.
///
/// Maps to one slot of the sample's channel array and to the wire
/// names `s0..s3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Channel {
    S0 = 0,
    S1 = 1,
    S2 = 2,
    S3 = 3,
}

impl Channel {
    /// All channels in canonical order.
    pub const ALL: [Channel; CHANNEL_COUNT] = [Channel::S0, Channel::S1, Channel::S2, Channel::S3];

    /// Get human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            Channel::S0 => "s0",
            Channel::S1 => "s1",
            Channel::S2 => "s2",
            Channel::S3 => "s3",
        }
    }

    /// Index into a sample's channel array.
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Unit of measurement for channel readings.
    pub const fn unit(&self) -> &'static str {
        "counts"
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One of the six required measurement fields of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SampleField {
    S0 = 0,
    S1 = 1,
    S2 = 2,
    S3 = 3,
    Temperature = 4,
    Humidity = 5,
}

impl SampleField {
    /// All required fields in canonical order. This order fixes how
    /// missing fields are listed in validation errors.
    pub const ALL: [SampleField; 6] = [
        SampleField::S0,
        SampleField::S1,
        SampleField::S2,
        SampleField::S3,
        SampleField::Temperature,
        SampleField::Humidity,
    ];

    /// Wire name of the field.
    pub const fn name(&self) -> &'static str {
        match self {
            SampleField::S0 => "s0",
            SampleField::S1 => "s1",
            SampleField::S2 => "s2",
            SampleField::S3 => "s3",
            SampleField::Temperature => "temp",
            SampleField::Humidity => "humidity",
        }
    }
}

/// Bit flags over [`SampleField`]
///
/// Tracks a subset of the six required fields. Kept to a single byte so
/// validation errors stay `Copy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSet(u8);

impl FieldSet {
    /// The empty set.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// All six required fields.
    pub const fn all() -> Self {
        Self(0b11_1111)
    }

    /// Add a field to the set.
    pub fn insert(&mut self, field: SampleField) {
        self.0 |= 1 << field as u8;
    }

    /// Check membership.
    pub const fn contains(&self, field: SampleField) -> bool {
        (self.0 >> field as u8) & 1 == 1
    }

    /// True if no field is set.
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Number of fields in the set.
    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate members in canonical field order.
    pub fn iter(&self) -> impl Iterator<Item = SampleField> + '_ {
        SampleField::ALL.into_iter().filter(|f| self.contains(*f))
    }
}

impl fmt::Display for FieldSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for field in self.iter() {
            if !first {
                f.write_str(", ")?;
            }
            f.write_str(field.name())?;
            first = false;
        }
        Ok(())
    }
}

/// Unvalidated breath measurement as submitted at the ingestion boundary.
///
/// Field names and wire renames line up with the capture device's JSON
/// payload, so this type doubles as the wire-level sample object. Absent
/// keys deserialize to `None` and are reported by validation as missing
/// fields.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SamplePayload {
    /// Channel s0 reading, in ADC counts.
    #[cfg_attr(feature = "serde", serde(default))]
    pub s0: Option<f32>,

    /// Channel s1 reading, in ADC counts.
    #[cfg_attr(feature = "serde", serde(default))]
    pub s1: Option<f32>,

    /// Channel s2 reading, in ADC counts.
    #[cfg_attr(feature = "serde", serde(default))]
    pub s2: Option<f32>,

    /// Channel s3 reading, in ADC counts.
    #[cfg_attr(feature = "serde", serde(default))]
    pub s3: Option<f32>,

    /// Exhaled-air temperature, in °C.
    #[cfg_attr(feature = "serde", serde(default, rename = "temp"))]
    pub temperature_c: Option<f32>,

    /// Exhaled-air relative humidity, in percent.
    #[cfg_attr(feature = "serde", serde(default, rename = "humidity"))]
    pub humidity_pct: Option<f32>,

    /// Capture window length, in seconds. Defaults to
    /// [`DEFAULT_SAMPLE_DURATION_S`] when absent.
    #[cfg_attr(
        feature = "serde",
        serde(
            default,
            rename = "sampleDuration",
            skip_serializing_if = "Option::is_none"
        )
    )]
    pub sample_duration_s: Option<f32>,
}

impl SamplePayload {
    /// Reading of the given measurement field, if supplied.
    pub fn field(&self, field: SampleField) -> Option<f32> {
        match field {
            SampleField::S0 => self.s0,
            SampleField::S1 => self.s1,
            SampleField::S2 => self.s2,
            SampleField::S3 => self.s3,
            SampleField::Temperature => self.temperature_c,
            SampleField::Humidity => self.humidity_pct,
        }
    }

    /// Reading of the given gas channel, if supplied.
    pub fn channel(&self, channel: Channel) -> Option<f32> {
        match channel {
            Channel::S0 => self.s0,
            Channel::S1 => self.s1,
            Channel::S2 => self.s2,
            Channel::S3 => self.s3,
        }
    }

    /// The set of required fields absent from this payload.
    pub fn missing_fields(&self) -> FieldSet {
        let mut missing = FieldSet::empty();
        for field in SampleField::ALL {
            if self.field(field).is_none() {
                missing.insert(field);
            }
        }
        missing
    }
}

/// Validated, immutable breath measurement.
///
/// Produced by [`SampleValidator::accept`](crate::validator::SampleValidator::accept).
/// Once constructed it is only ever read: feature derivation and anomaly
/// reporting consume it by reference.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawSample {
    /// Gas-channel readings in canonical order, in ADC counts.
    pub channels: [f32; CHANNEL_COUNT],

    /// Exhaled-air temperature, in °C.
    pub temperature_c: f32,

    /// Exhaled-air relative humidity, in percent.
    pub humidity_pct: f32,

    /// Capture window length, in seconds.
    pub sample_duration_s: f32,
}

impl RawSample {
    /// Reading of the given gas channel.
    pub fn channel(&self, channel: Channel) -> f32 {
        self.channels[channel.index()]
    }

    /// Build from a payload whose six measurement fields are known to be
    /// present. Field presence must already have been checked; absent
    /// duration falls back to the capture default.
    pub(crate) fn from_complete_payload(payload: &SamplePayload) -> Self {
        let mut channels = [0.0; CHANNEL_COUNT];
        for ch in Channel::ALL {
            // Presence is the validator's structural invariant
            channels[ch.index()] = payload.channel(ch).unwrap_or(0.0);
        }
        Self {
            channels,
            temperature_c: payload.temperature_c.unwrap_or(0.0),
            humidity_pct: payload.humidity_pct.unwrap_or(0.0),
            sample_duration_s: payload.sample_duration_s.unwrap_or(DEFAULT_SAMPLE_DURATION_S),
        }
    }
}
