//! Timestamp text layouts.
//!
//! Layouts are tried in a fixed order and the first one that consumes the
//! whole input wins. Longer, more specific layouts come before their
//! prefixes. Components a layout lacks default to year 0, January, day 1,
//! midnight and UTC.
//!
//! A layout may accept more than one concrete form: the fractional
//! second after `:05` is optional, `Z07:00` is either a literal `Z` or a
//! `±hh:mm` offset, and `Z07` is either `Z` or `±hh`.

use std::num::NonZeroU8;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::parsing::Parsed;
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

type Form = &'static [BorrowedFormatItem<'static>];

/// One accepted layout, named in reference-time notation.
pub struct Layout {
    pub name: &'static str,
    forms: &'static [Form],
}

// Date and time, seconds precision.
const DT_FRAC_Z: Form = format_description!(
    "[year]-[month]-[day]T[hour padding:none]:[minute]:[second].[subsecond]Z"
);
const DT_FRAC_HM: Form = format_description!(
    "[year]-[month]-[day]T[hour padding:none]:[minute]:[second].[subsecond][offset_hour sign:mandatory]:[offset_minute]"
);
const DT_FRAC_H: Form = format_description!(
    "[year]-[month]-[day]T[hour padding:none]:[minute]:[second].[subsecond][offset_hour sign:mandatory]"
);
const DT_FRAC: Form =
    format_description!("[year]-[month]-[day]T[hour padding:none]:[minute]:[second].[subsecond]");
const DT_Z: Form = format_description!("[year]-[month]-[day]T[hour padding:none]:[minute]:[second]Z");
const DT_HM: Form = format_description!(
    "[year]-[month]-[day]T[hour padding:none]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
);
const DT_H: Form = format_description!(
    "[year]-[month]-[day]T[hour padding:none]:[minute]:[second][offset_hour sign:mandatory]"
);
const DT: Form = format_description!("[year]-[month]-[day]T[hour padding:none]:[minute]:[second]");

// Date and time, coarser than seconds.
const DM_Z: Form = format_description!("[year]-[month]-[day]T[hour padding:none]:[minute]Z");
const DM: Form = format_description!("[year]-[month]-[day]T[hour padding:none]:[minute]");
const DH_Z: Form = format_description!("[year]-[month]-[day]T[hour padding:none]Z");
const DH: Form = format_description!("[year]-[month]-[day]T[hour padding:none]");

// Date only.
const DATE: Form = format_description!("[year]-[month]-[day]");
const YEAR_MONTH: Form = format_description!("[year]-[month]");
const YEAR: Form = format_description!("[year]");

// Clock only, seconds precision.
const T_FRAC_Z: Form = format_description!("[hour padding:none]:[minute]:[second].[subsecond]Z");
const T_FRAC_HM: Form = format_description!(
    "[hour padding:none]:[minute]:[second].[subsecond][offset_hour sign:mandatory]:[offset_minute]"
);
const T_FRAC_H: Form = format_description!(
    "[hour padding:none]:[minute]:[second].[subsecond][offset_hour sign:mandatory]"
);
const T_FRAC: Form = format_description!("[hour padding:none]:[minute]:[second].[subsecond]");
const T_Z: Form = format_description!("[hour padding:none]:[minute]:[second]Z");
const T_HM: Form = format_description!(
    "[hour padding:none]:[minute]:[second][offset_hour sign:mandatory]:[offset_minute]"
);
const T_H: Form =
    format_description!("[hour padding:none]:[minute]:[second][offset_hour sign:mandatory]");
const T: Form = format_description!("[hour padding:none]:[minute]:[second]");

// Clock only, coarser than seconds.
const TM_Z: Form = format_description!("[hour padding:none]:[minute]Z");
const TM: Form = format_description!("[hour padding:none]:[minute]");
const TH_Z: Form = format_description!("[hour padding:none]Z");
const TH: Form = format_description!("[hour padding:none]");

/// Accepted layouts in priority order.
pub static LAYOUTS: [Layout; 27] = [
    Layout {
        name: "2006-01-02T15:04:05.999999999Z07:00",
        forms: &[DT_FRAC_Z, DT_FRAC_HM, DT_Z, DT_HM],
    },
    Layout {
        name: "2006-01-02T15:04:05.999999999Z07",
        forms: &[DT_FRAC_Z, DT_FRAC_H, DT_Z, DT_H],
    },
    Layout {
        name: "2006-01-02T15:04:05.999999999Z",
        forms: &[DT_FRAC_Z, DT_Z],
    },
    Layout {
        name: "2006-01-02T15:04:05.999999999",
        forms: &[DT_FRAC, DT],
    },
    Layout {
        name: "2006-01-02T15:04:05Z07:00",
        forms: &[DT_Z, DT_HM, DT_FRAC_Z, DT_FRAC_HM],
    },
    Layout {
        name: "2006-01-02T15:04:05Z07",
        forms: &[DT_Z, DT_H, DT_FRAC_Z, DT_FRAC_H],
    },
    Layout {
        name: "2006-01-02T15:04:05Z",
        forms: &[DT_Z, DT_FRAC_Z],
    },
    Layout {
        name: "2006-01-02T15:04:05",
        forms: &[DT, DT_FRAC],
    },
    Layout {
        name: "2006-01-02T15:04Z",
        forms: &[DM_Z],
    },
    Layout {
        name: "2006-01-02T15:04",
        forms: &[DM],
    },
    Layout {
        name: "2006-01-02T15Z",
        forms: &[DH_Z],
    },
    Layout {
        name: "2006-01-02T15",
        forms: &[DH],
    },
    Layout {
        name: "2006-01-02",
        forms: &[DATE],
    },
    Layout {
        name: "2006-01",
        forms: &[YEAR_MONTH],
    },
    Layout {
        name: "2006",
        forms: &[YEAR],
    },
    Layout {
        name: "15:04:05.999999999Z07:00",
        forms: &[T_FRAC_Z, T_FRAC_HM, T_Z, T_HM],
    },
    Layout {
        name: "15:04:05.999999999Z07",
        forms: &[T_FRAC_Z, T_FRAC_H, T_Z, T_H],
    },
    Layout {
        name: "15:04:05.999999999Z",
        forms: &[T_FRAC_Z, T_Z],
    },
    Layout {
        name: "15:04:05.999999999",
        forms: &[T_FRAC, T],
    },
    Layout {
        name: "15:04:05Z07:00",
        forms: &[T_Z, T_HM, T_FRAC_Z, T_FRAC_HM],
    },
    Layout {
        name: "15:04:05Z07",
        forms: &[T_Z, T_H, T_FRAC_Z, T_FRAC_H],
    },
    Layout {
        name: "15:04:05Z",
        forms: &[T_Z, T_FRAC_Z],
    },
    Layout {
        name: "15:04:05",
        forms: &[T, T_FRAC],
    },
    Layout {
        name: "15:04Z",
        forms: &[TM_Z],
    },
    Layout {
        name: "15:04",
        forms: &[TM],
    },
    Layout {
        name: "15Z",
        forms: &[TH_Z],
    },
    Layout {
        name: "15",
        forms: &[TH],
    },
];

impl Layout {
    /// Parse `text` with this layout, requiring the whole input to match.
    pub fn parse(&self, text: &str) -> Option<OffsetDateTime> {
        self.forms.iter().find_map(|form| parse_form(text, form))
    }
}

/// Parse `text` with the first matching layout. Returns the winning layout
/// name alongside the value.
pub fn parse(text: &str) -> Option<(&'static str, OffsetDateTime)> {
    LAYOUTS
        .iter()
        .find_map(|layout| layout.parse(text).map(|at| (layout.name, at)))
}

fn parse_form(text: &str, form: &[BorrowedFormatItem<'_>]) -> Option<OffsetDateTime> {
    let mut parsed = Parsed::new();
    let rest = parsed.parse_items(text.as_bytes(), form).ok()?;
    if !rest.is_empty() {
        return None;
    }

    let date = Date::from_calendar_date(
        parsed.year().unwrap_or(0),
        parsed.month().unwrap_or(Month::January),
        parsed.day().map_or(1, NonZeroU8::get),
    )
    .ok()?;
    let time = Time::from_hms_nano(
        parsed.hour_24().unwrap_or(0),
        parsed.minute().unwrap_or(0),
        parsed.second().unwrap_or(0),
        parsed.subsecond().unwrap_or(0),
    )
    .ok()?;
    let offset = match parsed.offset_hour() {
        Some(hours) => {
            UtcOffset::from_hms(hours, parsed.offset_minute_signed().unwrap_or(0), 0).ok()?
        }
        None => UtcOffset::UTC,
    };

    Some(PrimitiveDateTime::new(date, time).assume_offset(offset))
}
