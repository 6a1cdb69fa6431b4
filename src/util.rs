use chrono::NaiveDate;
use num_format::{Locale, ToFormattedStr, ToFormattedString};
use std::str::FromStr;
use std::sync::LazyLock;
use sys_locale::get_locale;

static LOCALE: LazyLock<Locale> = LazyLock::new(|| {
    let locale_str = get_locale().unwrap_or(String::from("en-US"));
    Locale::from_str(&locale_str).unwrap_or(Locale::en)
});

pub struct Util;

impl Util {
    /// Human-readable age of a release date relative to `today`.
    pub fn relative_date(date: NaiveDate, today: NaiveDate) -> String {
        let days = today.signed_duration_since(date).num_days();

        if days < 0 {
            "in the future".to_string()
        } else if days == 0 {
            "today".to_string()
        } else if days == 1 {
            "yesterday".to_string()
        } else if days < 60 {
            format!("{} days ago", days)
        } else if days < 730 {
            format!("{} months ago", days / 30)
        } else {
            format!("{} years ago", days / 365)
        }
    }

    /// Formats a number, adding separators, using the current locale.
    pub fn format_number<T>(number: T) -> String
    where
        T: ToFormattedStr,
    {
        number.to_formatted_string(&*LOCALE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn relative_dates_read_naturally() {
        let today = date("2022-03-20");
        assert_eq!(Util::relative_date(today, today), "today");
        assert_eq!(Util::relative_date(date("2022-03-19"), today), "yesterday");
        assert_eq!(Util::relative_date(date("2022-03-12"), today), "8 days ago");
        assert_eq!(Util::relative_date(date("2021-10-20"), today), "5 months ago");
        assert_eq!(Util::relative_date(date("2019-03-20"), today), "3 years ago");
        assert_eq!(Util::relative_date(date("2022-04-01"), today), "in the future");
    }
}
