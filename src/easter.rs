//! Gregorian Easter Sunday.

use jiff::civil::Date;

/// Month and day of Easter Sunday in the Gregorian calendar
/// (anonymous Gregorian algorithm, as given by Butcher and Meeus).
pub fn easter_sunday(year: i16) -> (i8, i8) {
    let y = i32::from(year);
    let a = y.rem_euclid(19);
    let b = y.div_euclid(100);
    let c = y.rem_euclid(100);
    let d = b.div_euclid(4);
    let e = b.rem_euclid(4);
    let f = (b + 8).div_euclid(25);
    let g = (b - f + 1).div_euclid(3);
    let h = (19 * a + b - d - g + 15).rem_euclid(30);
    let i = c.div_euclid(4);
    let k = c.rem_euclid(4);
    let l = (32 + 2 * e + 2 * i - h - k).rem_euclid(7);
    let m = (a + 11 * h + 22 * l).div_euclid(451);
    let n = h + l - 7 * m + 114;
    // n / 31 is always 3 or 4 and 1 + n % 31 is at most 31.
    ((n / 31) as i8, (1 + n % 31) as i8)
}

/// Easter Sunday of `year`, or `None` when the year is outside the range
/// `jiff` can represent.
pub fn easter_date(year: i16) -> Option<Date> {
    let (month, day) = easter_sunday(year);
    Date::new(year, month, day).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    #[test]
    fn known_easter_sundays() {
        let cases = [
            (1900, (4, 15)),
            (2000, (4, 23)),
            (2007, (4, 8)),
            (2024, (3, 31)),
            (2025, (4, 20)),
            (2026, (4, 5)),
            (2027, (3, 28)),
            (2028, (4, 16)),
            (2029, (4, 1)),
            (2030, (4, 21)),
        ];
        for (year, expected) in cases {
            assert_eq!(easter_sunday(year), expected, "year {year}");
        }
    }

    #[test]
    fn easter_is_always_a_sunday_between_march_22_and_april_25() {
        for year in 1583..=2500 {
            let d = easter_date(year).unwrap();
            assert_eq!(d.weekday(), jiff::civil::Weekday::Sunday, "year {year}");
            assert!(d >= date(year, 3, 22) && d <= date(year, 4, 25), "year {year}: {d}");
        }
    }

    #[test]
    fn out_of_range_year_has_no_date() {
        assert!(easter_date(10_000).is_none());
    }
}
